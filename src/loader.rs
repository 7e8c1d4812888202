use crate::backup;
use crate::config::{AppConfig, DataSource};
use crate::csv;
use crate::fixtures;
use crate::record::Record;
use crate::sheets;
use log::{info, warn};
use serde::Serialize;
use std::collections::HashMap;
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};

/// Error type for the data-access layer.
pub type LoadError = Box<dyn Error + Send + Sync>;

/// The standard record sets loaded together for dashboard pages.
pub const SOURCE_SOLICITACOES: &str = "Solicitacao";
pub const SOURCE_FOTOGRAFOS: &str = "Fotografos";
pub const SOURCE_CLIENTES: &str = "Clientes";
pub const SOURCE_CORRETORES: &str = "Corretores";
pub const SOURCE_REDES: &str = "Rede";
pub const SOURCE_USUARIOS: &str = "Usuarios";

struct CacheEntry {
    records: Vec<Record>,
    fetched_at: Instant,
}

/// Aggregate statistics over a service-request set.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    pub total: usize,
    /// Requests scheduled for the current date.
    pub today: usize,
    /// Raw status string -> count.
    pub by_status: HashMap<String, usize>,
}

/// All the reference sets a page may cross-reference.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardData {
    pub solicitacoes: Vec<Record>,
    pub fotografos: Vec<Record>,
    pub clientes: Vec<Record>,
    pub corretores: Vec<Record>,
    pub redes: Vec<Record>,
}

/// Named-source record loader with a TTL cache and a layered fallback.
///
/// `load` resolves a logical source name against the configured data source
/// (static CSV artifacts, the Google Sheets values API, or fixtures),
/// parses the payload into records, and caches the set. A valid cache hit
/// performs no fetch. On fetch or parse failure the loader degrades:
/// local compressed backup first, then the stale cache entry, and only with
/// neither does the error reach the caller.
///
/// The cache lock is never held across a fetch, so two concurrent loads of
/// a cold source may both fetch; the later store wins. That matches the
/// system this replaces and is harmless for read-only data.
pub struct DataLoader {
    config: AppConfig,
    client: reqwest::Client,
    cache: RwLock<HashMap<String, CacheEntry>>,
    ttl: Duration,
    fetches: AtomicU64,
    backups_enabled: bool,
}

impl DataLoader {
    /// Build a loader from application configuration.
    pub fn new(config: AppConfig) -> Self {
        let ttl = config.cache_ttl();
        DataLoader {
            config,
            client: reqwest::Client::new(),
            cache: RwLock::new(HashMap::new()),
            ttl,
            fetches: AtomicU64::new(0),
            backups_enabled: true,
        }
    }

    /// Override the cache TTL; used by tests with millisecond values.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Disable backup snapshots; used by tests that pin the fallback order.
    pub fn without_backups(mut self) -> Self {
        self.backups_enabled = false;
        self
    }

    /// Total number of fetches performed (cache misses). Observable so the
    /// TTL contract stays testable.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Load a named record set, honoring the cache policy.
    ///
    /// # Arguments
    /// * `source_name` - Logical source name, e.g. `"Solicitacao"`
    ///
    /// # Returns
    /// * `Result<Vec<Record>, LoadError>` - The records, possibly from a
    ///   backup or stale cache when the primary source fails
    pub async fn load(&self, source_name: &str) -> Result<Vec<Record>, LoadError> {
        if self.config.cache.enabled {
            let cache = self.cache.read().unwrap();
            if let Some(entry) = cache.get(source_name) {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.records.clone());
                }
            }
        }

        match self.fetch_records(source_name).await {
            Ok(records) => {
                info!("{source_name}: loaded {} records", records.len());
                if self.backups_enabled {
                    let dir = PathBuf::from(&self.config.backup_dir);
                    if let Err(e) = backup::save_records(&dir, source_name, &records) {
                        warn!("{source_name}: backup snapshot failed: {e}");
                    }
                }
                self.store(source_name, records.clone());
                Ok(records)
            }
            Err(e) => {
                warn!("{source_name}: fetch failed: {e}");

                if self.backups_enabled {
                    let dir = PathBuf::from(&self.config.backup_dir);
                    if let Ok(records) = backup::load_records(&dir, source_name) {
                        warn!(
                            "{source_name}: serving {} records from local backup",
                            records.len()
                        );
                        self.store(source_name, records.clone());
                        return Ok(records);
                    }
                }

                let cache = self.cache.read().unwrap();
                if let Some(entry) = cache.get(source_name) {
                    warn!("{source_name}: serving stale cache");
                    return Ok(entry.records.clone());
                }

                Err(e)
            }
        }
    }

    /// Fetch and parse the primary payload for a source name.
    async fn fetch_records(&self, source_name: &str) -> Result<Vec<Record>, LoadError> {
        self.fetches.fetch_add(1, Ordering::Relaxed);

        match self.config.data_source {
            DataSource::Csv => {
                let base = &self.config.csv.base;
                let text = if base.starts_with("http://") || base.starts_with("https://") {
                    let url = format!("{}/{}.csv", base.trim_end_matches('/'), source_name);
                    let response = self.client.get(&url).send().await?;
                    if !response.status().is_success() {
                        return Err(format!("HTTP {} fetching {url}", response.status()).into());
                    }
                    response.text().await?
                } else {
                    let path = PathBuf::from(base).join(format!("{source_name}.csv"));
                    tokio::fs::read_to_string(&path).await.map_err(|e| {
                        format!("reading {}: {e}", path.display())
                    })?
                };
                Ok(csv::parse_auto(&text))
            }
            DataSource::GoogleSheets => {
                let tab = self.config.tab_for(source_name);
                let url = sheets::values_url(&self.config.google_sheets, &tab);
                let response = self.client.get(&url).send().await?;
                if !response.status().is_success() {
                    return Err(format!("HTTP {} fetching tab {tab}", response.status()).into());
                }
                let values: sheets::ValuesResponse = response.json().await?;
                Ok(sheets::values_to_records(values))
            }
            DataSource::Mock => Ok(fixtures::records_for(source_name)),
        }
    }

    fn store(&self, source_name: &str, records: Vec<Record>) {
        self.cache.write().unwrap().insert(
            source_name.to_string(),
            CacheEntry {
                records,
                fetched_at: Instant::now(),
            },
        );
    }

    /// Drop one cached record set so the next load refetches.
    pub fn invalidate(&self, source_name: &str) {
        self.cache.write().unwrap().remove(source_name);
    }

    /// Drop every cached record set.
    pub fn clear_cache(&self) {
        self.cache.write().unwrap().clear();
    }

    /// Load the full set of dashboard reference data.
    pub async fn load_all(&self) -> Result<DashboardData, LoadError> {
        Ok(DashboardData {
            solicitacoes: self.load(SOURCE_SOLICITACOES).await?,
            fotografos: self.load(SOURCE_FOTOGRAFOS).await?,
            clientes: self.load(SOURCE_CLIENTES).await?,
            corretores: self.load(SOURCE_CORRETORES).await.unwrap_or_default(),
            redes: self.load(SOURCE_REDES).await.unwrap_or_default(),
        })
    }
}

/// Compute total / today / by-status counts for a service-request set.
///
/// "Today" matches records whose scheduled date starts with the current ISO
/// date.
pub fn statistics(records: &[Record]) -> Statistics {
    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let mut by_status: HashMap<String, usize> = HashMap::new();
    let mut today_count = 0;

    for record in records {
        let status = record
            .raw_status()
            .unwrap_or("Nao definido")
            .to_string();
        *by_status.entry(status).or_insert(0) += 1;

        if let Some(date) = record.schedule_date() {
            if date.starts_with(&today) {
                today_count += 1;
            }
        }
    }

    Statistics {
        total: records.len(),
        today: today_count,
        by_status,
    }
}
