//! Working-tree file helpers

use std::io::ErrorKind;
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Read a file as UTF-8, returning `None` if it does not exist
pub async fn read_optional(path: &Path) -> Result<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Write a file, creating parent directories as needed
pub async fn write(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    tokio::fs::write(path, content).await?;
    debug!(path = %path.display(), bytes = content.len(), "wrote file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_read_missing_file() {
        let temp = TempDir::new().unwrap();
        let content = read_optional(&temp.path().join("missing.txt")).await.unwrap();
        assert!(content.is_none());
    }

    #[tokio::test]
    async fn test_write_creates_parents() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a").join("b").join("file.txt");
        write(&path, "hello").await.unwrap();
        assert_eq!(read_optional(&path).await.unwrap().as_deref(), Some("hello"));
    }
}
