use std::io;
use std::path::PathBuf;
use tokio::fs;

/// Video files on local disk, addressed by paths relative to a root.
#[derive(Debug, Clone)]
pub struct VideoStorage {
    root: PathBuf,
}

impl VideoStorage {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn resolve(&self, relative_path: &str) -> PathBuf {
        self.root.join(relative_path)
    }

    /// Write `content` verbatim at `relative_path`, creating parent
    /// directories as needed. An existing file with the same content
    /// address is simply overwritten with identical bytes.
    pub async fn store(&self, relative_path: &str, content: &[u8]) -> io::Result<PathBuf> {
        let path = self.resolve(relative_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, content).await?;
        Ok(path)
    }

    pub async fn open(&self, relative_path: &str) -> io::Result<fs::File> {
        fs::File::open(self.resolve(relative_path)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_store_creates_date_directories() {
        let dir = TempDir::new().unwrap();
        let storage = VideoStorage::new(dir.path().to_path_buf());

        let path = storage
            .store("2024/06/01/abc.mp4", b"payload")
            .await
            .unwrap();

        assert_eq!(path, dir.path().join("2024/06/01/abc.mp4"));
        assert_eq!(fs::read(&path).await.unwrap(), b"payload");
    }

    #[tokio::test]
    async fn test_store_same_address_twice() {
        let dir = TempDir::new().unwrap();
        let storage = VideoStorage::new(dir.path().to_path_buf());

        storage.store("2024/06/01/abc.mp4", b"same").await.unwrap();
        storage.store("2024/06/01/abc.mp4", b"same").await.unwrap();

        let mut entries = fs::read_dir(dir.path().join("2024/06/01")).await.unwrap();
        let mut count = 0;
        while entries.next_entry().await.unwrap().is_some() {
            count += 1;
        }
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_open_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let storage = VideoStorage::new(dir.path().to_path_buf());

        let err = storage.open("1999/01/01/missing.mp4").await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
