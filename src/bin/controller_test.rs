use fotosys::audit::AuditLog;
use fotosys::controller::{PageController, Screen, ALL_SCREENS};
use fotosys::fixtures::solicitacao;
use fotosys::query::{Criterion, SortDirection};
use fotosys::record::Record;
use fotosys::session::{self, Role};
use fotosys::status::{ServiceStatus, ALL_STATUSES};
use std::time::Duration;
use tempfile::TempDir;

fn sample_records() -> Vec<Record> {
    vec![
        solicitacao("SR-1", ServiceStatus::Pendente, "Ana Souza", "Joao Silva", "2025-08-20 10:00:00"),
        solicitacao("SR-2", ServiceStatus::Agendado, "Bruno Lima", "Maria Santos", "2025-08-21 09:00:00"),
        solicitacao("SR-3", ServiceStatus::Confirmado, "Carla Dias", "Joao Silva", "2025-08-21 14:00:00"),
        solicitacao("SR-4", ServiceStatus::Realizado, "Diego Alves", "Pedro Costa", "2025-08-18 16:00:00"),
        solicitacao("SR-5", ServiceStatus::Pendente, "Elisa Rocha", "Ana Oliveira", "2025-08-22 11:00:00"),
        solicitacao("SR-6", ServiceStatus::Cancelado, "Fabio Nunes", "Pedro Costa", "2025-08-19 08:00:00"),
    ]
}

fn test_screen_slugs() {
    println!("\n====== Testing screen slugs ======");
    for screen in ALL_SCREENS {
        assert_eq!(Screen::from_slug(screen.slug()), Some(*screen));
    }
    assert_eq!(Screen::from_slug("nope"), None);
    println!("✓ All {} slugs round-trip", ALL_SCREENS.len());
}

fn test_default_criteria() {
    println!("\n====== Testing per-screen baseline criteria ======");

    let mut ctrl = PageController::new(Screen::Pending, 25);
    ctrl.set_records(sample_records());
    let view = ctrl.view();
    assert_eq!(view.total_records, 2);
    assert!(view.records.iter().all(|r| r.get("Status") == Some("Pendente")));
    println!("✓ Pending shows only Pendente records");

    let mut ctrl = PageController::new(Screen::Scheduled, 25);
    ctrl.set_records(sample_records());
    assert_eq!(ctrl.view().total_records, 2);
    println!("✓ Scheduled shows Agendado and Confirmado");

    let mut ctrl = PageController::new(Screen::Conference, 25);
    ctrl.set_records(sample_records());
    assert_eq!(ctrl.view().total_records, 1);
    println!("✓ Conference shows the Realizado record");
}

fn test_user_filters_and_pagination() {
    println!("\n====== Testing view pipeline ======");

    let mut ctrl = PageController::new(Screen::Pending, 1);
    ctrl.set_records(sample_records());
    ctrl.set_sort("Cliente", SortDirection::Desc);

    let view = ctrl.view();
    assert_eq!(view.total_records, 2);
    assert_eq!(view.total_pages, 2);
    assert_eq!(view.page, 1);
    assert_eq!(view.records.len(), 1);
    assert_eq!(view.records[0].get("Cliente"), Some("Elisa Rocha"));
    println!("✓ Page 1 of 2 carries the sorted head");

    ctrl.set_page(99);
    let view = ctrl.view();
    assert_eq!(view.page, 2);
    assert_eq!(view.records[0].get("Cliente"), Some("Ana Souza"));
    println!("✓ Out-of-range page clamped to the last page");

    ctrl.set_criterion("Cliente", Criterion::Contains("elisa".to_string()));
    let view = ctrl.view();
    assert_eq!(view.total_records, 1);
    assert_eq!(view.page, 1);
    println!("✓ Setting a filter resets to page 1");

    ctrl.clear_criteria();
    assert_eq!(ctrl.view().total_records, 2);
    println!("✓ clear_criteria restores the baseline view");
}

fn test_selection() {
    println!("\n====== Testing bulk selection ======");

    let mut ctrl = PageController::new(Screen::Pending, 25);
    ctrl.set_records(sample_records());

    ctrl.toggle_selection("SR-1");
    ctrl.toggle_selection("SR-5");
    assert_eq!(ctrl.selection().len(), 2);
    ctrl.toggle_selection("SR-1");
    assert_eq!(ctrl.selection().len(), 1);
    println!("✓ toggle_selection adds and removes");

    ctrl.select_all_visible();
    assert!(ctrl.selection().contains("SR-1"));
    assert!(ctrl.selection().contains("SR-5"));
    // Records outside the screen's baseline criteria stay unselected
    assert!(!ctrl.selection().contains("SR-2"));
    println!("✓ select_all_visible respects the filtered view");

    // Selection entries for records that disappear on reload are dropped
    ctrl.set_records(vec![sample_records().remove(0)]);
    assert_eq!(ctrl.selection().len(), 1);
    assert!(ctrl.selection().contains("SR-1"));
    println!("✓ Reload pruned stale selection entries");

    ctrl.clear_selection();
    assert!(ctrl.selection().is_empty());
    println!("✓ clear_selection empties the set");
}

fn test_apply_status() {
    println!("\n====== Testing the status write stub ======");

    let dir = TempDir::new().unwrap();
    let audit = AuditLog::open(dir.path().join("audit.json"));

    let mut ctrl = PageController::new(Screen::Pending, 25);
    ctrl.set_records(sample_records());

    ctrl.apply_status("SR-1", ServiceStatus::Agendado, "gestor@example.com", &audit)
        .unwrap();
    assert_eq!(
        ctrl.record_by_id("SR-1").unwrap().get("Status"),
        Some("Agendado")
    );
    assert_eq!(audit.len(), 1);
    let entry = &audit.entries()[0];
    assert_eq!(entry.action, "status_change");
    assert_eq!(entry.record_id, "SR-1");
    assert_eq!(entry.details, "Pendente -> Agendado");
    println!("✓ Valid transition applied and audited");

    // Pendente cannot jump straight to Faturado
    let err = ctrl
        .apply_status("SR-5", ServiceStatus::Faturado, "gestor@example.com", &audit)
        .unwrap_err();
    assert!(err.to_string().contains("invalid transition"));
    assert_eq!(audit.len(), 1);
    println!("✓ Invalid transition rejected without an audit entry");

    // Terminal states reject everything
    let err = ctrl
        .apply_status("SR-6", ServiceStatus::Pendente, "gestor@example.com", &audit)
        .unwrap_err();
    assert!(err.to_string().contains("invalid transition"));
    println!("✓ Cancelado is terminal");

    let err = ctrl
        .apply_status("SR-999", ServiceStatus::Agendado, "gestor@example.com", &audit)
        .unwrap_err();
    assert!(err.to_string().contains("not found"));
    println!("✓ Unknown id reported");
}

fn test_status_vocabulary() {
    println!("\n====== Testing status normalization ======");

    assert_eq!(ServiceStatus::parse("pendente"), Some(ServiceStatus::Pendente));
    assert_eq!(ServiceStatus::parse(" AGENDADO "), Some(ServiceStatus::Agendado));
    assert_eq!(ServiceStatus::parse("Em edição"), Some(ServiceStatus::EmEdicao));
    assert_eq!(ServiceStatus::parse("em_edicao"), Some(ServiceStatus::EmEdicao));
    // Faturado stays distinct from Realizado
    assert_eq!(ServiceStatus::parse("Faturado"), Some(ServiceStatus::Faturado));
    assert_ne!(ServiceStatus::parse("Faturado"), Some(ServiceStatus::Realizado));
    assert_eq!(ServiceStatus::parse("whatever"), None);
    println!("✓ Normalization handles case, accents, underscores");

    // Badge classes and chip colors, as /api/statuses serves them
    assert_eq!(ServiceStatus::Pendente.badge(), "warning");
    assert_eq!(ServiceStatus::Cancelado.badge(), "danger");
    assert_eq!(ServiceStatus::Agendado.hex_color(), "#007bff");
    assert!(ALL_STATUSES
        .iter()
        .all(|s| s.hex_color().starts_with('#') && s.hex_color().len() == 7));
    println!("✓ Every status carries a badge class and a hex chip color");

    assert!(ServiceStatus::Realizado.can_transition(ServiceStatus::Faturado));
    assert!(!ServiceStatus::Faturado.can_transition(ServiceStatus::Realizado));
    assert!(ServiceStatus::Agendado.can_transition(ServiceStatus::Pendente));
    assert!(ServiceStatus::Faturado.is_terminal());
    println!("✓ Lifecycle transitions hold");
}

fn test_sessions() {
    println!("\n====== Testing sessions and roles ======");

    let users = fotosys::fixtures::sample_usuarios();

    let (token, sess) = session::login(
        &users,
        "GESTOR@example.com",
        "gestor123",
        Duration::from_secs(60),
    )
    .unwrap();
    assert_eq!(sess.role, Role::Gestor);
    assert!(session::validate(&token).is_some());
    println!("✓ Login matched email case-insensitively");

    session::logout(&token);
    assert!(session::validate(&token).is_none());
    println!("✓ Logout dropped the session");

    assert!(session::login(&users, "gestor@example.com", "wrong", Duration::from_secs(60)).is_none());
    println!("✓ Bad password rejected");

    let (expired, _) = session::login(
        &users,
        "foto@example.com",
        "foto123",
        Duration::from_secs(0),
    )
    .unwrap();
    assert!(session::validate(&expired).is_none());
    println!("✓ Expired session rejected and pruned");

    assert!(Role::Admin.at_least(Role::Gestor));
    assert!(Role::Gestor.at_least(Role::Gestor));
    assert!(!Role::Fotografo.at_least(Role::Editor));
    println!("✓ Role hierarchy ordering holds");
}

pub fn run_tests() {
    println!("Starting controller tests");
    test_screen_slugs();
    test_default_criteria();
    test_user_filters_and_pagination();
    test_selection();
    test_apply_status();
    test_status_vocabulary();
    test_sessions();
    println!("\nAll tests passed!");
}

fn main() {
    run_tests();
}
