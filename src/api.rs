//! High-level API for xxupack operations

use crate::exceptions::{Result, XxuError};
use crate::xxu::config::PackConfig;
use crate::xxu::packer::pack;
use log::{debug, info};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;

/// Pack a firmware image read from `input` (stdin when `None`) into an XXU
/// container written to `output` (stdout when `None`).
///
/// Open failures are fatal and name the offending path. Streams close on
/// every exit path; a failure mid-stream leaves a truncated container behind,
/// as the format has no atomic-replace step.
pub fn pack_to_path(
    config: &PackConfig,
    input: Option<&Path>,
    output: Option<&Path>,
) -> Result<()> {
    let firmware = read_firmware(input)?;
    debug!("read {} firmware bytes", firmware.len());

    match output {
        Some(path) => {
            let mut file = File::create(path).map_err(|e| {
                XxuError::OutputError(format!("unable to open XXU file {}: {e}", path.display()))
            })?;
            pack(config, &firmware, &mut file)?;
            file.flush()?;
            info!("wrote XXU container to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            pack(config, &firmware, &mut lock)?;
            lock.flush()?;
        }
    }

    Ok(())
}

/// Read the whole firmware image from a named file or stdin
fn read_firmware(input: Option<&Path>) -> Result<Vec<u8>> {
    match input {
        Some(path) => std::fs::read(path).map_err(|e| {
            XxuError::InputError(format!("unable to open hex file {}: {e}", path.display()))
        }),
        None => {
            let mut buf = Vec::new();
            io::stdin().lock().read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xxu::constants::{END_MARKER, MAGIC};
    use tempfile::TempDir;

    #[test]
    fn test_pack_to_file() {
        let temp_dir = TempDir::new().unwrap();
        let hex_path = temp_dir.path().join("os.hex");
        let out_path = temp_dir.path().join("os.8xu");

        std::fs::write(&hex_path, vec![0x42u8; 40]).unwrap();

        let config = PackConfig::default();
        pack_to_path(&config, Some(&hex_path), Some(&out_path)).unwrap();

        let container = std::fs::read(&out_path).unwrap();
        assert!(container.starts_with(MAGIC));
        assert!(container.ends_with(END_MARKER));
    }

    #[test]
    fn test_missing_input_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope.hex");
        let out_path = temp_dir.path().join("os.8xu");

        let err = pack_to_path(&PackConfig::default(), Some(&missing), Some(&out_path))
            .unwrap_err();
        assert!(err.to_string().contains("nope.hex"));
        // No output was produced
        assert!(!out_path.exists());
    }

    #[test]
    fn test_unwritable_output_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let hex_path = temp_dir.path().join("os.hex");
        std::fs::write(&hex_path, [0u8; 4]).unwrap();

        let bad_out = temp_dir.path().join("no-such-dir").join("os.8xu");
        let err =
            pack_to_path(&PackConfig::default(), Some(&hex_path), Some(&bad_out)).unwrap_err();
        assert!(err.to_string().contains("os.8xu"));
    }
}
