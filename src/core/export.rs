use crate::domain::model::{Product, ProductRecord};
use crate::domain::ports::{Exporter, Storage};
use crate::utils::error::{CrawlError, Result};
use async_trait::async_trait;

/// Streams products to a CSV file through [`Storage`]: the header is
/// written when the exporter is created and every row is appended as soon
/// as it is exported.
pub struct CsvExporter<S: Storage> {
    storage: S,
    output_path: String,
    file_name: String,
    rows: usize,
}

impl<S: Storage> CsvExporter<S> {
    /// Truncates the output file and writes the header row.
    pub async fn create(storage: S, output_path: &str, file_name: &str) -> Result<Self> {
        let header = encode_row(|writer| writer.write_record(ProductRecord::FIELDNAMES))?;
        storage.write_file(file_name, &header).await?;

        Ok(Self {
            storage,
            output_path: output_path.to_string(),
            file_name: file_name.to_string(),
            rows: 0,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
}

fn encode_row<F>(write: F) -> Result<Vec<u8>>
where
    F: FnOnce(&mut csv::Writer<Vec<u8>>) -> csv::Result<()>,
{
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    write(&mut writer)?;
    writer
        .into_inner()
        .map_err(|e| CrawlError::IoError(std::io::Error::new(e.error().kind(), e.to_string())))
}

#[async_trait]
impl<S: Storage> Exporter for CsvExporter<S> {
    async fn export_item(&mut self, product: Product) -> Result<()> {
        let record = ProductRecord::from(product);
        let row = encode_row(|writer| writer.serialize(&record))?;

        self.storage.append_file(&self.file_name, &row).await?;
        self.rows += 1;
        Ok(())
    }

    async fn finish(&mut self) -> Result<String> {
        tracing::debug!("Exported {} rows to {}", self.rows, self.file_name);

        let output_path = std::path::Path::new(&self.output_path)
            .join(&self.file_name)
            .to_str()
            .map(str::to_string)
            .ok_or_else(|| CrawlError::ConfigError {
                message: format!("output path is not valid UTF-8: {}", self.output_path),
            })?;
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn read_file(&self, path: &str) -> String {
            let files = self.files.lock().await;
            String::from_utf8(files.get(path).cloned().unwrap_or_default()).unwrap()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.entry(path.to_string()).or_default().extend_from_slice(data);
            Ok(())
        }
    }

    const HEADER: &str =
        "name,href,grivna_price,dollar_price,instock,image_href,description,images_href,date_parsed\n";

    fn complete_product() -> Product {
        Product {
            name: Some("Чехол, черный".to_string()),
            href: Some("product/case-1".to_string()),
            grivna_price: Some(499.0),
            dollar_price: Some(12.5),
            instock: Some(true),
            image_href: None,
            description: Some("Line one\nLine two".to_string()),
            images_href: vec!["/img/1.jpg".to_string(), "/img/2.jpg".to_string()],
            date_parsed: Some(Local.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap()),
        }
    }

    #[test]
    fn test_empty_export_writes_header_only() {
        tokio_test::block_on(async {
            let storage = MockStorage::default();
            let mut exporter = CsvExporter::create(storage.clone(), "out", "product_data.csv")
                .await
                .unwrap();

            let path = exporter.finish().await.unwrap();
            assert_eq!(path, "out/product_data.csv");
            assert_eq!(storage.read_file("product_data.csv").await, HEADER);
        });
    }

    #[tokio::test]
    async fn test_export_row_formatting() {
        let storage = MockStorage::default();
        let mut exporter = CsvExporter::create(storage.clone(), "out", "product_data.csv")
            .await
            .unwrap();

        exporter.export_item(complete_product()).await.unwrap();
        exporter.export_item(Product::default()).await.unwrap();
        assert_eq!(exporter.rows(), 2);
        exporter.finish().await.unwrap();

        let data = storage.read_file("product_data.csv").await;
        let mut reader = csv::Reader::from_reader(data.as_bytes());

        let headers: Vec<String> = reader.headers().unwrap().iter().map(str::to_string).collect();
        assert_eq!(headers, ProductRecord::FIELDNAMES);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Чехол, черный");
        assert_eq!(&rows[0][1], "product/case-1");
        assert_eq!(rows[0][2].parse::<f64>().unwrap(), 499.0);
        assert_eq!(&rows[0][3], "12.5");
        assert_eq!(&rows[0][4], "true");
        assert_eq!(&rows[0][5], "");
        assert_eq!(&rows[0][6], "Line one\nLine two");
        assert_eq!(&rows[0][7], "/img/1.jpg,/img/2.jpg");
        assert_eq!(&rows[0][8], "2024-03-01 12:30:00.000000");

        assert!(rows[1].iter().all(str::is_empty));
    }

    #[tokio::test]
    async fn test_rows_reach_storage_before_finish() {
        let storage = MockStorage::default();
        let mut exporter = CsvExporter::create(storage.clone(), "out", "product_data.csv")
            .await
            .unwrap();
        assert_eq!(storage.read_file("product_data.csv").await, HEADER);

        exporter.export_item(complete_product()).await.unwrap();
        exporter.export_item(Product::default()).await.unwrap();

        let content = storage.read_file("product_data.csv").await;
        assert!(content.starts_with(HEADER));
        assert!(content.contains("product/case-1"));
        assert!(content.ends_with(",,,,,,,,\n"));
    }

    #[tokio::test]
    async fn test_create_truncates_previous_output() {
        let storage = MockStorage::default();
        storage.write_file("product_data.csv", b"stale\n").await.unwrap();

        CsvExporter::create(storage.clone(), "out", "product_data.csv")
            .await
            .unwrap();
        assert_eq!(storage.read_file("product_data.csv").await, HEADER);
    }
}
