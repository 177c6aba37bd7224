use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::path::Path;
use tokio::io::AsyncWriteExt;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn full_path(&self, path: &str) -> String {
        Path::new(&self.base_path).join(path).to_string_lossy().into_owned()
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        tokio::fs::write(full_path, data).await?;
        Ok(())
    }

    async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.full_path(path))
            .await?;

        file.write_all(data).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().join("out").to_string_lossy().into_owned());

        storage.write_file("nested/product_data.csv", b"name\n").await.unwrap();

        let data = tokio::fs::read(storage.full_path("nested/product_data.csv")).await.unwrap();
        assert_eq!(data, b"name\n");
        assert!(storage.full_path("nested/product_data.csv").ends_with("product_data.csv"));
    }

    #[tokio::test]
    async fn test_append_after_write_keeps_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path().to_string_lossy().into_owned());

        storage.write_file("product_data.csv", b"name\n").await.unwrap();
        storage.append_file("product_data.csv", b"a\n").await.unwrap();
        storage.append_file("product_data.csv", b"b\n").await.unwrap();

        let data = tokio::fs::read(storage.full_path("product_data.csv")).await.unwrap();
        assert_eq!(data, b"name\na\nb\n");
    }
}
