//! Program image (ROM) loading for the TD4.
//!
//! A TD4 program is a flat binary file: no header, no magic number, no
//! checksum. Only the first 16 bytes are meaningful; anything past that is
//! ignored, and a shorter file leaves the remaining memory cells at zero.

use crate::cpu::machine::MEMORY_SIZE;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

/// Load a program image from disk into a full 16-byte memory image.
///
/// Reads at most [`MEMORY_SIZE`] bytes; a short or empty file zero-pads
/// the tail. Partial reads are not an error.
pub fn load_rom<P: AsRef<Path>>(path: P) -> Result<[u8; MEMORY_SIZE], RomError> {
    let path = path.as_ref();
    let mut file = std::fs::File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RomError::NotFound(path.display().to_string())
        } else {
            RomError::Io(e)
        }
    })?;

    let mut image = [0u8; MEMORY_SIZE];
    let mut filled = 0;
    while filled < MEMORY_SIZE {
        match file.read(&mut image[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(RomError::Io(e)),
        }
    }

    Ok(image)
}

/// Save a program image to disk verbatim.
pub fn save_rom<P: AsRef<Path>>(path: P, image: &[u8]) -> Result<(), RomError> {
    std::fs::write(path, image)?;
    Ok(())
}

/// Errors that can occur while loading or saving a program image.
#[derive(Debug, Error)]
pub enum RomError {
    #[error("program file not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("td4-rom-test-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_rom(temp_path("missing.bin")).unwrap_err();
        assert!(matches!(err, RomError::NotFound(_)));
    }

    #[test]
    fn test_load_short_image_zero_pads() {
        let path = temp_path("short.bin");
        save_rom(&path, &[0x31, 0xB5, 0xF0]).unwrap();
        let image = load_rom(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(&image[..3], &[0x31, 0xB5, 0xF0]);
        assert_eq!(&image[3..], &[0u8; 13]);
    }

    #[test]
    fn test_load_long_image_truncates() {
        let path = temp_path("long.bin");
        let long: Vec<u8> = (0..40).collect();
        save_rom(&path, &long).unwrap();
        let image = load_rom(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image.to_vec(), long[..MEMORY_SIZE].to_vec());
    }

    #[test]
    fn test_load_empty_image() {
        let path = temp_path("empty.bin");
        save_rom(&path, &[]).unwrap();
        let image = load_rom(&path).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image, [0u8; MEMORY_SIZE]);
    }
}
