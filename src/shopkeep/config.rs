use crate::error::{Result, ShopError};
use crate::model::DEFAULT_LOW_STOCK_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "shopkeep.json";

/// Configuration for shopkeep, stored in `<home>/shopkeep.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ShopConfig {
    /// Product table, relative to the shop home unless absolute
    pub data_file: PathBuf,

    /// Default target for `export json`
    pub export_json: PathBuf,

    /// Default target for `export csv`
    pub export_csv: PathBuf,

    /// Quantities strictly below this count as low stock
    pub low_stock_threshold: i64,
}

impl Default for ShopConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("shop_data.csv"),
            export_json: PathBuf::from("shop_export.json"),
            export_csv: PathBuf::from("shop_export.csv"),
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl ShopConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(ShopError::Io)?;
        let config: ShopConfig =
            serde_json::from_str(&content).map_err(ShopError::Serialization)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(ShopError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(ShopError::Serialization)?;
        fs::write(config_path, content).map_err(ShopError::Io)?;
        Ok(())
    }

    /// Absolute location of the product table for a given shop home.
    pub fn data_path(&self, home: &Path) -> PathBuf {
        home.join(&self.data_file)
    }
}
