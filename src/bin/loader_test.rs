use fotosys::config::{AppConfig, DataSource, SheetsConfig};
use fotosys::loader::{statistics, DataLoader, SOURCE_SOLICITACOES};
use fotosys::query::{filter, Criterion};
use fotosys::sheets::{values_to_records, values_url, ValuesResponse};
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn csv_config(data_dir: &TempDir, backup_dir: &TempDir) -> AppConfig {
    let mut config = AppConfig::default();
    config.data_source = DataSource::Csv;
    config.csv.base = data_dir.path().to_string_lossy().to_string();
    config.backup_dir = backup_dir.path().to_string_lossy().to_string();
    config
}

fn write_solicitacoes(data_dir: &TempDir, text: &str) {
    fs::write(data_dir.path().join("Solicitacao.csv"), text).unwrap();
}

// Cache validity: a hit inside the TTL performs no fetch, a query after
// expiry performs exactly one new fetch
async fn test_cache_ttl() {
    println!("\n====== Testing cache TTL ======");

    let mut config = AppConfig::default();
    config.data_source = DataSource::Mock;
    let loader = DataLoader::new(config)
        .with_ttl(Duration::from_millis(100))
        .without_backups();

    let first = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert!(!first.is_empty());
    assert_eq!(loader.fetch_count(), 1);
    println!("✓ Cold load fetched once ({} records)", first.len());

    let _second = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(loader.fetch_count(), 1);
    println!("✓ Load inside the TTL hit the cache");

    tokio::time::sleep(Duration::from_millis(150)).await;
    let _third = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(loader.fetch_count(), 2);
    println!("✓ Load after expiry fetched exactly once more");

    loader.invalidate(SOURCE_SOLICITACOES);
    let _fourth = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(loader.fetch_count(), 3);
    println!("✓ invalidate() forced a refetch");
}

// End-to-end: load a CSV artifact, then filter through the facade
async fn test_csv_end_to_end() {
    println!("\n====== Testing CSV load + filter ======");

    let data_dir = TempDir::new().unwrap();
    let backup_dir = TempDir::new().unwrap();
    write_solicitacoes(&data_dir, "Status;Cliente\nPendente;Ana\nAgendado;Bruno\n");

    let loader = DataLoader::new(csv_config(&data_dir, &backup_dir));
    let records = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(records.len(), 2);
    println!("✓ Loaded {} records from the CSV artifact", records.len());

    let mut criteria = HashMap::new();
    criteria.insert("Status".to_string(), Criterion::Equals("Agendado".to_string()));
    let result = filter(&records, &criteria);
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].get("Status"), Some("Agendado"));
    assert_eq!(result[0].get("Cliente"), Some("Bruno"));
    println!("✓ Filter returned exactly the Agendado/Bruno record");
}

// With the artifact gone, the local backup snapshot keeps data flowing
async fn test_backup_fallback() {
    println!("\n====== Testing backup fallback ======");

    let data_dir = TempDir::new().unwrap();
    let backup_dir = TempDir::new().unwrap();
    write_solicitacoes(&data_dir, "Status;Cliente\nPendente;Ana\nAgendado;Bruno\n");

    let loader = DataLoader::new(csv_config(&data_dir, &backup_dir));
    let records = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(records.len(), 2);

    fs::remove_file(data_dir.path().join("Solicitacao.csv")).unwrap();
    loader.invalidate(SOURCE_SOLICITACOES);

    let recovered = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(recovered, records);
    println!("✓ Backup snapshot served {} records after the source vanished", recovered.len());
}

// With backups disabled, an expired cache entry still serves as last resort
async fn test_stale_cache_fallback() {
    println!("\n====== Testing stale-cache fallback ======");

    let data_dir = TempDir::new().unwrap();
    let backup_dir = TempDir::new().unwrap();
    write_solicitacoes(&data_dir, "Status;Cliente\nPendente;Ana\n");

    let loader = DataLoader::new(csv_config(&data_dir, &backup_dir))
        .with_ttl(Duration::from_millis(50))
        .without_backups();

    let records = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(records.len(), 1);

    fs::remove_file(data_dir.path().join("Solicitacao.csv")).unwrap();
    tokio::time::sleep(Duration::from_millis(80)).await;

    let stale = loader.load(SOURCE_SOLICITACOES).await.unwrap();
    assert_eq!(stale, records);
    println!("✓ Stale cache served after fetch failure");
}

// With no cache and no backup, the error reaches the caller
async fn test_cold_failure_propagates() {
    println!("\n====== Testing cold failure ======");

    let data_dir = TempDir::new().unwrap();
    let backup_dir = TempDir::new().unwrap();

    let loader = DataLoader::new(csv_config(&data_dir, &backup_dir)).without_backups();
    let result = loader.load(SOURCE_SOLICITACOES).await;
    assert!(result.is_err());
    println!("✓ Missing artifact with empty cache propagated an error");
}

// Every reference set the screens cross-reference comes back populated
async fn test_load_all() {
    println!("\n====== Testing load_all ======");

    let mut config = AppConfig::default();
    config.data_source = DataSource::Mock;
    let loader = DataLoader::new(config).without_backups();

    let data = loader.load_all().await.unwrap();
    assert!(!data.solicitacoes.is_empty());
    assert!(!data.fotografos.is_empty());
    assert!(!data.clientes.is_empty());
    assert!(!data.corretores.is_empty());
    assert!(!data.redes.is_empty());
    assert!(data.fotografos.iter().all(|r| r.get("Nome").is_some()));
    println!("✓ All five reference sets loaded from fixtures");

    let fetches = loader.fetch_count();
    let _again = loader.load_all().await.unwrap();
    assert_eq!(loader.fetch_count(), fetches);
    println!("✓ Second load_all served entirely from cache");
}

// Sheets omits trailing empty cells; rows must pad/truncate to the header
fn test_sheets_values_mapping() {
    println!("\n====== Testing Sheets values mapping ======");

    let response = ValuesResponse {
        values: vec![
            vec!["Status".to_string(), "Cliente".to_string(), "Fotografo".to_string()],
            vec!["Pendente".to_string(), "Ana".to_string()],
            vec![
                "Agendado".to_string(),
                "Bruno".to_string(),
                "Joao Silva".to_string(),
                "extra".to_string(),
            ],
        ],
    };
    let records = values_to_records(response);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("Status"), Some("Pendente"));
    assert_eq!(records[0].get("Fotografo"), Some(""));
    assert_eq!(records[1].get("Fotografo"), Some("Joao Silva"));
    assert_eq!(records[1].len(), 3);
    println!("✓ Short rows padded, long rows truncated to the header");

    assert!(values_to_records(ValuesResponse { values: vec![] }).is_empty());
    println!("✓ Empty values response yields no records");

    let mut config = SheetsConfig::default();
    config.spreadsheet_id = "abc123".to_string();
    config.api_key = "secret".to_string();
    let url = values_url(&config, "Solicitacoes");
    assert_eq!(
        url,
        "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/Solicitacoes!A:ZZ?key=secret"
    );
    println!("✓ Values URL assembled from the Sheets coordinates");
}

fn test_statistics() {
    println!("\n====== Testing statistics ======");

    let today = chrono::Local::now().format("%Y-%m-%d").to_string();
    let records = vec![
        fotosys::fixtures::solicitacao("SR-1", fotosys::ServiceStatus::Pendente, "Ana", "Joao Silva", &format!("{today} 10:00:00")),
        fotosys::fixtures::solicitacao("SR-2", fotosys::ServiceStatus::Agendado, "Bruno", "Maria Santos", "2020-01-01 10:00:00"),
        fotosys::fixtures::solicitacao("SR-3", fotosys::ServiceStatus::Agendado, "Carla", "Pedro Costa", &format!("{today} 14:00:00")),
    ];

    let stats = statistics(&records);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.today, 2);
    assert_eq!(stats.by_status.get("Agendado"), Some(&2));
    assert_eq!(stats.by_status.get("Pendente"), Some(&1));
    println!("✓ total={} today={} by_status groups correct", stats.total, stats.today);
}

pub async fn run_tests() {
    println!("Starting data loader tests");
    test_cache_ttl().await;
    test_csv_end_to_end().await;
    test_backup_fallback().await;
    test_stale_cache_fallback().await;
    test_cold_failure_propagates().await;
    test_load_all().await;
    test_sheets_values_mapping();
    test_statistics();
    println!("\nAll tests passed!");
}

#[tokio::main]
async fn main() {
    run_tests().await;
}
