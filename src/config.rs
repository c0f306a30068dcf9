use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 默认配置文件名 (可选, 不存在时忽略)
pub const CONFIG_FILE: &str = "order-reports";
/// 环境变量前缀, 例如 ORDER_REPORTS__DATABASE__PATH
pub const ENV_PREFIX: &str = "ORDER_REPORTS";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub sales: SalesConfig,
    pub reports: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// 文件路径或 sqlite: URL
    pub path: String,
    pub create_if_missing: bool,
    pub slow_statement_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesConfig {
    pub csv_path: String,
    pub min_value: f64,
    pub max_value: f64,
    pub ascending: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_n: i64,
    pub invoice_min_value: f64,
    pub invoice_max_value: f64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "databases/Chinook_Sqlite.sqlite".to_string(),
            create_if_missing: false,
            slow_statement_secs: 5,
        }
    }
}

impl Default for SalesConfig {
    fn default() -> Self {
        Self {
            csv_path: "dataset/SalesTransactions.csv".to_string(),
            min_value: 500.0,
            max_value: 900.0,
            ascending: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            invoice_min_value: 10.0,
            invoice_max_value: 20.0,
        }
    }
}

impl AppConfig {
    /// 加载顺序: 默认值 -> 配置文件 -> 环境变量
    ///
    /// `file` 为 None 时读取当前目录下可选的 `order-reports.{toml,json,yaml}`.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(CONFIG_FILE).required(false),
        };

        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file_source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    /// 从默认配置文件和环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }
}
