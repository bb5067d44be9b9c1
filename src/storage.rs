use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::PACKAGE_EXTENSION;

/// File name a downloaded package is saved under
pub fn package_file_name(deck_id: &str) -> String {
    let safe: String = deck_id
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("{}.{}", safe, PACKAGE_EXTENSION)
}

/// Write package bytes into `dir`, creating it if needed; returns the file path
pub fn save_package(dir: &Path, deck_id: &str, bytes: &[u8]) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating download directory {}", dir.display()))?;
    }
    let path = dir.join(package_file_name(deck_id));
    fs::write(&path, bytes).with_context(|| format!("writing {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_named_after_deck() {
        assert_eq!(package_file_name("spanish_vocab"), "spanish_vocab.apkg");
        assert_eq!(package_file_name("../evil"), ".._evil.apkg");
    }

    #[test]
    fn save_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("nested").join("packages");
        let path = save_package(&target, "trip", b"PK\x03\x04").unwrap();

        assert_eq!(path, target.join("trip.apkg"));
        assert_eq!(fs::read(&path).unwrap(), b"PK\x03\x04");
    }
}
