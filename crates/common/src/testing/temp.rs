//! Temporary directory helpers

use std::path::{Path, PathBuf};
use std::{fs, io};

/// Temporary directory that is automatically deleted when dropped
#[derive(Debug)]
pub struct TempDir {
    path: PathBuf,
}

impl TempDir {
    /// Create a new temporary directory with a prefix
    pub fn new(prefix: &str) -> io::Result<Self> {
        let dir_name = format!("{}-{}", prefix, uuid::Uuid::new_v4());
        let path = std::env::temp_dir().join(dir_name);

        fs::create_dir_all(&path)?;

        Ok(Self { path })
    }

    /// Get the path to the temporary directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create a file in the temporary directory
    pub fn create_file(&self, name: &str, contents: &str) -> io::Result<PathBuf> {
        let file_path = self.path.join(name);
        fs::write(&file_path, contents)?;
        Ok(file_path)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_dir_all(&self.path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_directory_on_drop() {
        let path = {
            let temp_dir = TempDir::new("campuscal-temp").unwrap();
            temp_dir.create_file("probe.txt", "hello").unwrap();
            assert!(temp_dir.path().join("probe.txt").exists());
            temp_dir.path().to_path_buf()
        };

        assert!(!path.exists());
    }
}
