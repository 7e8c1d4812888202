use log::info;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Where record sets come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DataSource {
    /// Static CSV artifacts under `csv.base` (path or URL).
    Csv,
    /// The Google Sheets values API.
    GoogleSheets,
    /// In-memory fixture data; development only.
    Mock,
}

/// Static CSV source settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    /// Directory path or HTTP base URL holding `{Name}.csv` artifacts.
    pub base: String,
}

impl Default for CsvConfig {
    fn default() -> Self {
        CsvConfig {
            base: "data".to_string(),
        }
    }
}

/// Google Sheets values API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub api_key: String,
    /// API root; overridable so tests can point at a local server.
    pub base_url: String,
    /// Logical source name -> sheet tab name, for the few that differ.
    pub tabs: HashMap<String, String>,
    /// Values range appended to the tab name.
    pub range: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        let mut tabs = HashMap::new();
        // The solicitation file and its sheet tab are spelled differently
        tabs.insert("Solicitacao".to_string(), "Solicitacoes".to_string());
        SheetsConfig {
            spreadsheet_id: String::new(),
            api_key: String::new(),
            base_url: "https://sheets.googleapis.com/v4/spreadsheets".to_string(),
            tabs,
            range: "A:ZZ".to_string(),
        }
    }
}

/// Cache policy for loaded record sets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Seconds a cached record set stays valid. Pages historically used 5
    /// to 30 minutes; 5 is the default.
    pub timeout_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            enabled: true,
            timeout_secs: 5 * 60,
        }
    }
}

/// Table presentation defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    pub items_per_page: usize,
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig { items_per_page: 25 }
    }
}

/// Session settings. Authentication here is deliberately simple - a role
/// check over sheet-stored users, not a hardened identity system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub enabled: bool,
    pub session_timeout_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            enabled: true,
            session_timeout_secs: 8 * 60 * 60,
        }
    }
}

/// Top-level application configuration.
///
/// Loaded from a JSON file when one exists, otherwise the defaults apply.
/// Mirrors the flat CONFIG object the dashboard always ran on: source
/// selection, cache TTL, sheet coordinates, UI paging, auth.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_source: DataSource,
    pub csv: CsvConfig,
    pub google_sheets: SheetsConfig,
    pub cache: CacheConfig,
    pub ui: UiConfig,
    pub auth: AuthConfig,
    /// Directory for compressed record-set backups.
    pub backup_dir: String,
    /// Path of the JSON audit trail.
    pub audit_file: String,
    /// Bind address for the web server.
    pub bind_addr: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            data_source: DataSource::Csv,
            csv: CsvConfig::default(),
            google_sheets: SheetsConfig::default(),
            cache: CacheConfig::default(),
            ui: UiConfig::default(),
            auth: AuthConfig::default(),
            backup_dir: "backups".to_string(),
            audit_file: "database/audit.json".to_string(),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file, falling back to defaults when
    /// the file does not exist.
    ///
    /// # Arguments
    /// * `path` - Path to the JSON configuration file
    ///
    /// # Returns
    /// * `Result<AppConfig, Box<dyn Error>>` - The configuration, or a
    ///   parse/read error for a file that exists but is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let path = path.as_ref();
        if !path.exists() {
            info!("config file {} not found, using defaults", path.display());
            return Ok(AppConfig::default());
        }
        let text = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&text)?;
        Ok(config)
    }

    /// The cache TTL as a `Duration`.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache.timeout_secs)
    }

    /// The session lifetime as a `Duration`.
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.auth.session_timeout_secs)
    }

    /// The sheet tab backing a logical source name.
    pub fn tab_for(&self, source_name: &str) -> String {
        self.google_sheets
            .tabs
            .get(source_name)
            .cloned()
            .unwrap_or_else(|| source_name.to_string())
    }
}
