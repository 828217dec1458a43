use super::backend::StorageBackend;
use super::record::{read_csv, write_csv, ProductRecord};
use crate::error::{Result, ShopError};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Stores the product table in a single CSV file.
pub struct CsvBackend {
    path: PathBuf,
}

impl CsvBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn ensure_parent(&self) -> Result<()> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() && !dir.exists() => {
                fs::create_dir_all(dir).map_err(ShopError::Io)
            }
            _ => Ok(()),
        }
    }

    fn tmp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("products");
        self.path
            .with_file_name(format!(".{}-{}.tmp", name, std::process::id()))
    }
}

impl StorageBackend for CsvBackend {
    fn read_records(&self) -> Result<Option<Vec<ProductRecord>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let file = File::open(&self.path).map_err(ShopError::Io)?;
        read_csv(BufReader::new(file)).map(Some)
    }

    fn write_records(&self, records: &[ProductRecord]) -> Result<()> {
        self.ensure_parent()?;

        // Atomic write
        let tmp_path = self.tmp_path();
        let written = File::create(&tmp_path)
            .map_err(ShopError::Io)
            .and_then(|file| {
                let mut writer = BufWriter::new(file);
                write_csv(&mut writer, records)?;
                writer.flush().map_err(ShopError::Io)
            })
            .and_then(|()| fs::rename(&tmp_path, &self.path).map_err(ShopError::Io));

        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }

    fn location(&self) -> &Path {
        &self.path
    }
}
