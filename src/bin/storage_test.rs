use fotosys::audit::AuditLog;
use fotosys::backup;
use fotosys::export;
use fotosys::fixtures::solicitacao;
use fotosys::record::Record;
use fotosys::status::ServiceStatus;
use tempfile::TempDir;

fn sample_records() -> Vec<Record> {
    vec![
        solicitacao("SR-1", ServiceStatus::Pendente, "Ana Souza", "Joao Silva", "2025-08-20 10:00:00"),
        solicitacao("SR-2", ServiceStatus::Agendado, "Lima, \"Bruno\"", "Maria Santos", "2025-08-21 09:00:00"),
    ]
}

fn test_backup_round_trip() {
    println!("\n====== Testing backup snapshots ======");

    let dir = TempDir::new().unwrap();
    let records = sample_records();

    assert!(!backup::has_backup(dir.path(), "Solicitacao"));
    backup::save_records(dir.path(), "Solicitacao", &records).unwrap();
    assert!(backup::has_backup(dir.path(), "Solicitacao"));
    println!("✓ Snapshot written");

    let restored = backup::load_records(dir.path(), "Solicitacao").unwrap();
    assert_eq!(restored, records);
    println!("✓ Snapshot restored {} records intact", restored.len());

    assert!(backup::load_records(dir.path(), "Inexistente").is_err());
    println!("✓ Missing snapshot reports an error");
}

fn test_audit_cap() {
    println!("\n====== Testing audit trail cap ======");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.json");
    let audit = AuditLog::open(&path);

    for i in 0..1005 {
        audit
            .record("gestor@example.com", "status_change", &format!("SR-{i}"), "test")
            .unwrap();
    }
    assert_eq!(audit.len(), 1000);
    let entries = audit.entries();
    // The five oldest entries were dropped
    assert_eq!(entries[0].record_id, "SR-5");
    assert_eq!(entries[999].record_id, "SR-1004");
    println!("✓ Trail capped at 1000, oldest entries dropped");

    // Reopening reads the persisted trail back
    let reopened = AuditLog::open(&path);
    assert_eq!(reopened.len(), 1000);
    assert_eq!(reopened.entries()[0].record_id, "SR-5");
    println!("✓ Persisted trail survives reopen");
}

fn test_audit_corrupt_file() {
    println!("\n====== Testing corrupt audit file ======");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("audit.json");
    std::fs::write(&path, "not json at all").unwrap();

    let audit = AuditLog::open(&path);
    assert!(audit.is_empty());
    audit.record("u", "a", "r", "d").unwrap();
    assert_eq!(audit.len(), 1);
    println!("✓ Corrupt file starts the trail empty instead of failing");
}

fn test_csv_export() {
    println!("\n====== Testing CSV export ======");

    let records = sample_records();
    let headers = export::collect_headers(&records);
    assert!(headers.contains(&"Status".to_string()));
    assert!(headers.contains(&"Cliente".to_string()));

    let csv_text = export::to_csv(&headers, &records, ';');
    let lines: Vec<&str> = csv_text.trim_end().lines().collect();
    assert_eq!(lines.len(), 3);
    println!("✓ Export produced header plus {} rows", lines.len() - 1);

    // Quoting survives a round trip through the import parser
    let reparsed = fotosys::csv::parse(&csv_text, ';');
    assert_eq!(reparsed.len(), 2);
    let bruno = reparsed
        .iter()
        .find(|r| r.get("ID") == Some("SR-2"))
        .unwrap();
    assert_eq!(bruno.get("Cliente"), Some("Lima, \"Bruno\""));
    println!("✓ Escaped client name round-tripped");
}

fn test_xlsx_export() {
    println!("\n====== Testing XLSX export ======");

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("solicitacoes.xlsx");
    let records = sample_records();
    let headers = export::collect_headers(&records);

    export::to_xlsx(&headers, &records, &path).unwrap();
    let metadata = std::fs::metadata(&path).unwrap();
    assert!(metadata.len() > 0);
    println!("✓ Workbook written ({} bytes)", metadata.len());
}

pub fn run_tests() {
    println!("Starting storage tests");
    test_backup_round_trip();
    test_audit_cap();
    test_audit_corrupt_file();
    test_csv_export();
    test_xlsx_export();
    println!("\nAll tests passed!");
}

fn main() {
    run_tests();
}
