use chrono::NaiveDateTime;
use contracts::enums::GenerationStrategy;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CUSTOMERS_FILE: &str = "clientes.csv";
pub const PRODUCTS_FILE: &str = "productos.csv";
pub const SALES_FILE: &str = "ventas_empresa.csv";
pub const ENRICHED_SALES_FILE: &str = "ventas_limpias.csv";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub data: DataConfig,
    pub generation: GenerationConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    pub raw_dir: String,
    pub processed_dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    pub seed: u64,
    pub customer_id_min: i64,
    pub customer_id_max: i64,
    pub transactions: usize,
    #[serde(default)]
    pub strategy: GenerationStrategy,
    /// First transaction timestamp, one sale per hour after it
    pub start: NaiveDateTime,
    pub max_email_attempts: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[data]
raw_dir = "data/raw"
processed_dir = "data/processed"

[generation]
seed = 42
customer_id_min = 1000
customer_id_max = 1999
transactions = 5000
strategy = "dimension_join"
start = "2024-01-01T00:00:00"
max_email_attempts = 1000

[server]
port = 3000
"#;

/// Load configuration
///
/// Search order:
/// 1. Explicit path (from `--config`)
/// 2. config.toml next to the executable
/// 3. Embedded default config
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        tracing::info!("Loading config from: {}", path.display());
        return parse_file(path);
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                return parse_file(&config_path);
            } else {
                tracing::debug!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    default_config()
}

pub fn default_config() -> anyhow::Result<Config> {
    Ok(toml::from_str(DEFAULT_CONFIG)?)
}

fn parse_file(path: &Path) -> anyhow::Result<Config> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("cannot read config {}: {e}", path.display()))?;
    let config: Config = toml::from_str(&contents)?;
    Ok(config)
}

impl DataConfig {
    pub fn customers_path(&self) -> PathBuf {
        Path::new(&self.raw_dir).join(CUSTOMERS_FILE)
    }

    pub fn products_path(&self) -> PathBuf {
        Path::new(&self.raw_dir).join(PRODUCTS_FILE)
    }

    pub fn sales_path(&self) -> PathBuf {
        Path::new(&self.raw_dir).join(SALES_FILE)
    }

    pub fn enriched_sales_path(&self) -> PathBuf {
        Path::new(&self.processed_dir).join(ENRICHED_SALES_FILE)
    }
}
