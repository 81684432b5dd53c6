//! xxupack - XXU (73u/8xu) calculator OS-upgrade container packer
//!
//! This crate packs a firmware image into the vendor XXU container format:
//! a fixed binary file header followed by colon-prefixed, hex-encoded,
//! checksummed records and a terminating marker string.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::explicit_iter_loop,
)]

pub mod api;
pub mod exceptions;
pub mod exit_codes;
pub mod logger;
pub mod version;
pub mod xxu;

// Re-export main API functions
pub use api::pack_to_path;
pub use exceptions::XxuError;

// Re-export format-specific types for advanced usage
pub use xxu::config::{CalcModel, HighBitMode, OsVersion, PackConfig};
pub use xxu::packer::pack;
