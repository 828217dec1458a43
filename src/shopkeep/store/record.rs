use crate::error::{Result, ShopError};
use crate::model::Product;
use serde::{Deserialize, Serialize, Serializer};
use std::io::{Read, Write};

/// Column order of the product table.
pub const COLUMNS: [&str; 7] = [
    "product_id",
    "name",
    "category",
    "price",
    "quantity",
    "supplier",
    "date_added",
];

/// One row of the product table, also used as the JSON export shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub product_id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    #[serde(default)]
    pub supplier: String,
    #[serde(default)]
    pub date_added: Option<String>,
}

impl From<&Product> for ProductRecord {
    fn from(p: &Product) -> Self {
        Self {
            product_id: p.id().to_string(),
            name: p.name().to_string(),
            category: p.category().to_string(),
            price: p.price(),
            quantity: p.quantity(),
            supplier: p.supplier().to_string(),
            date_added: Some(p.date_added().to_string()),
        }
    }
}

/// Products serialize in their stored row shape.
impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        ProductRecord::from(self).serialize(serializer)
    }
}

impl ProductRecord {
    /// The row as CSV fields, in [`COLUMNS`] order.
    pub fn to_row(&self) -> [String; 7] {
        [
            self.product_id.clone(),
            self.name.clone(),
            self.category.clone(),
            decimal_text(self.price),
            self.quantity.to_string(),
            self.supplier.clone(),
            self.date_added.clone().unwrap_or_default(),
        ]
    }

    /// Builds the product. A missing or empty `date_added` keeps the fresh
    /// stamp from the constructor.
    pub fn into_product(self) -> Product {
        let mut product = Product::new(
            self.product_id,
            self.name,
            self.category,
            self.price,
            self.quantity,
            self.supplier,
        );
        if let Some(date_added) = self.date_added.filter(|d| !d.is_empty()) {
            product.restore_date_added(date_added);
        }
        product
    }
}

/// Writes `records` as CSV. Nothing at all is written for an empty slice.
pub fn write_csv<W: Write>(writer: W, records: &[ProductRecord]) -> Result<()> {
    if records.is_empty() {
        return Ok(());
    }
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.write_record(record.to_row())?;
    }
    wtr.flush().map_err(ShopError::Io)?;
    Ok(())
}

/// Plain decimal notation, never exponent form; integral values keep a `.0`.
pub fn decimal_text(value: f64) -> String {
    let text = value.to_string();
    if text.contains('.') || !value.is_finite() {
        text
    } else {
        format!("{}.0", text)
    }
}

/// Reads every row; the first bad row fails the whole read.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ProductRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<ProductRecord>().enumerate() {
        let record = row.map_err(|e| ShopError::MalformedRow {
            row: i + 1,
            message: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> ProductRecord {
        ProductRecord {
            product_id: id.into(),
            name: "Widget, large".into(),
            category: "Tools".into(),
            price: 19.99,
            quantity: 3,
            supplier: "Acme \"Global\"".into(),
            date_added: Some("2025-03-04 05:06:07".into()),
        }
    }

    #[test]
    fn empty_slice_writes_no_header() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[]).unwrap();
        assert!(buf.is_empty());
    }

    #[test]
    fn header_follows_column_order() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[record("1")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text.lines().next().unwrap(), COLUMNS.join(","));
    }

    #[test]
    fn quoted_fields_survive() {
        let mut buf = Vec::new();
        write_csv(&mut buf, &[record("1"), record("2")]).unwrap();
        let back = read_csv(buf.as_slice()).unwrap();
        assert_eq!(back, vec![record("1"), record("2")]);
    }

    #[test]
    fn missing_optional_columns_default() {
        let text = "product_id,name,category,price,quantity\n4,Nail,Hardware,0.1,500\n";
        let rows = read_csv(text.as_bytes()).unwrap();
        assert_eq!(rows[0].supplier, "");
        assert_eq!(rows[0].date_added, None);
        assert_eq!(rows[0].quantity, 500);
    }

    #[test]
    fn bad_row_reports_its_number() {
        let text = "product_id,name,category,price,quantity,supplier,date_added\n\
                    1,A,x,1.0,1,,\n\
                    2,B,x,cheap,1,,\n";
        let err = read_csv(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ShopError::MalformedRow { row: 2, .. }));
    }

    #[test]
    fn prices_are_written_without_exponent() {
        let mut big = record("1");
        big.price = 1e21;
        let mut small = record("2");
        small.price = 0.0000001;
        let mut whole = record("3");
        whole.price = 12.0;

        let mut buf = Vec::new();
        write_csv(&mut buf, &[big.clone(), small.clone(), whole.clone()]).unwrap();
        let text = String::from_utf8(buf.clone()).unwrap();
        assert!(text.contains(",1000000000000000000000.0,"));
        assert!(text.contains(",0.0000001,"));
        assert!(text.contains(",12.0,"));
        assert!(!text.contains("e-") && !text.contains("e21"));

        let back = read_csv(buf.as_slice()).unwrap();
        assert_eq!(back, vec![big, small, whole]);
    }

    #[test]
    fn into_product_restores_date_added() {
        let product = record("9").into_product();
        assert_eq!(product.date_added(), "2025-03-04 05:06:07");

        let mut fresh = record("9");
        fresh.date_added = Some(String::new());
        assert_ne!(fresh.into_product().date_added(), "");
    }
}
