use crate::error::{Result, ShopError};
use crate::model::Product;
use crate::store::record::{ProductRecord, COLUMNS};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// What an export wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSummary {
    pub path: PathBuf,
    pub count: usize,
}

/// An export format.
pub trait Exporter {
    /// Writes `products` to `path`, adding the default extension when `path`
    /// has none.
    fn export(&self, products: &[Product], path: &Path) -> Result<ExportSummary> {
        let path = with_default_extension(path, self.default_extension());
        let file = File::create(&path).map_err(ShopError::Io)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, products)?;
        writer.flush().map_err(ShopError::Io)?;
        Ok(ExportSummary {
            path,
            count: products.len(),
        })
    }

    fn write_to(&self, writer: &mut dyn Write, products: &[Product]) -> Result<()>;

    fn default_extension(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter;

impl Exporter for JsonExporter {
    fn write_to(&self, writer: &mut dyn Write, products: &[Product]) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, products)?;
        writeln!(writer).map_err(ShopError::Io)?;
        Ok(())
    }

    fn default_extension(&self) -> &'static str {
        "json"
    }
}

/// Same columns as the primary store, but the header is always written.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn write_to(&self, writer: &mut dyn Write, products: &[Product]) -> Result<()> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(COLUMNS)?;
        for product in products {
            wtr.write_record(ProductRecord::from(product).to_row())?;
        }
        wtr.flush().map_err(ShopError::Io)?;
        Ok(())
    }

    fn default_extension(&self) -> &'static str {
        "csv"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            ExportFormat::Json => Box::new(JsonExporter),
            ExportFormat::Csv => Box::new(CsvExporter),
        }
    }
}

pub fn run(products: &[Product], format: ExportFormat, path: &Path) -> Result<ExportSummary> {
    let summary = format.exporter().export(products, path)?;
    tracing::info!(
        count = summary.count,
        path = %summary.path.display(),
        "exported products"
    );
    Ok(summary)
}

fn with_default_extension(path: &Path, ext: &str) -> PathBuf {
    if path.extension().is_some() {
        path.to_path_buf()
    } else {
        path.with_extension(ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::record::read_csv;
    use tempfile::TempDir;

    fn products() -> Vec<Product> {
        vec![
            Product::new("1", "Widget", "Tools", 2.5, 5, "Acme"),
            Product::new("2", "Hose", "Garden", 12.0, 1, ""),
        ]
    }

    #[test]
    fn json_has_one_element_per_product() {
        let mut buf = Vec::new();
        JsonExporter.write_to(&mut buf, &products()).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        let items = value.as_array().unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["product_id"], "1");
        assert_eq!(items[0]["price"], 2.5);
        assert_eq!(items[1]["supplier"], "");
        assert!(items[1]["date_added"].is_string());
    }

    #[test]
    fn csv_matches_store_shape() {
        let mut buf = Vec::new();
        CsvExporter.write_to(&mut buf, &products()).unwrap();

        let rows = read_csv(buf.as_slice()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], ProductRecord::from(&products()[0]));
    }

    #[test]
    fn csv_writes_header_for_empty_export() {
        let mut buf = Vec::new();
        CsvExporter.write_to(&mut buf, &[]).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap().trim_end(), COLUMNS.join(","));
    }

    #[test]
    fn run_reports_path_and_count() {
        let dir = TempDir::new().unwrap();
        let summary = run(&products(), ExportFormat::Json, &dir.path().join("out")).unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.path, dir.path().join("out.json"));
        assert!(summary.path.exists());

        let summary = run(&products(), ExportFormat::Csv, &dir.path().join("x.txt")).unwrap();
        assert_eq!(summary.path, dir.path().join("x.txt"));
    }
}
