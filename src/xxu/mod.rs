//! XXU container format implementation

pub mod config;
pub mod constants;
pub mod header;
pub mod packer;
pub mod record;
