use crate::audit::AuditLog;
use crate::query::{self, Criterion, SortDirection};
use crate::record::Record;
use crate::status::ServiceStatus;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::error::Error;

/// The dashboard screens, one controller each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Screen {
    /// New service requests awaiting triage.
    Intake,
    /// Requests awaiting scheduling.
    Pending,
    /// Scheduled and confirmed shoots.
    Scheduled,
    /// Performed shoots under quality review.
    Conference,
    /// Edited and delivered work.
    Completed,
    /// Delivered or performed work moving toward billing.
    Billing,
}

pub const ALL_SCREENS: &[Screen] = &[
    Screen::Intake,
    Screen::Pending,
    Screen::Scheduled,
    Screen::Conference,
    Screen::Completed,
    Screen::Billing,
];

impl Screen {
    /// URL slug for the screen, as used in API routes.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Pending => "pending",
            Self::Scheduled => "scheduled",
            Self::Conference => "conference",
            Self::Completed => "completed",
            Self::Billing => "billing",
        }
    }

    /// Parse a URL slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        ALL_SCREENS.iter().copied().find(|s| s.slug() == slug)
    }

    /// Baseline criteria a screen always applies before user filters.
    pub fn default_criteria(&self) -> HashMap<String, Criterion> {
        let statuses: &[ServiceStatus] = match self {
            Self::Intake => &[ServiceStatus::Novo],
            Self::Pending => &[ServiceStatus::Pendente],
            Self::Scheduled => &[ServiceStatus::Agendado, ServiceStatus::Confirmado],
            Self::Conference => &[ServiceStatus::Realizado, ServiceStatus::EmEdicao],
            Self::Completed => &[ServiceStatus::Editado, ServiceStatus::Entregue],
            Self::Billing => &[ServiceStatus::Realizado, ServiceStatus::Entregue],
        };
        let mut criteria = HashMap::new();
        criteria.insert(
            "Status".to_string(),
            Criterion::AnyOf(statuses.iter().map(|s| s.label().to_string()).collect()),
        );
        criteria
    }
}

/// One rendered page of a controller's view, plus pagination metadata.
#[derive(Debug, Clone, Serialize)]
pub struct PageView {
    pub records: Vec<Record>,
    pub page: usize,
    pub page_size: usize,
    pub total_records: usize,
    pub total_pages: usize,
}

/// Per-screen state holder: the loaded record set, the user's filter / sort
/// / pagination state, and the bulk-action selection.
///
/// Controllers never talk to the network themselves; the caller loads
/// records through the [`DataLoader`](crate::loader::DataLoader) and hands
/// them over, so the same controller drives the web handlers, the CLI, and
/// the tests.
pub struct PageController {
    pub screen: Screen,
    records: Vec<Record>,
    criteria: HashMap<String, Criterion>,
    sort_key: Option<String>,
    sort_dir: SortDirection,
    page: usize,
    page_size: usize,
    selection: HashSet<String>,
}

impl PageController {
    pub fn new(screen: Screen, page_size: usize) -> Self {
        PageController {
            screen,
            records: Vec::new(),
            criteria: HashMap::new(),
            sort_key: None,
            sort_dir: SortDirection::Asc,
            page: 1,
            page_size,
            selection: HashSet::new(),
        }
    }

    /// Replace the loaded record set. Selection entries whose record
    /// disappeared are dropped; filter and pagination state survive.
    pub fn set_records(&mut self, records: Vec<Record>) {
        let ids: HashSet<String> = records
            .iter()
            .filter_map(|r| r.id().map(String::from))
            .collect();
        self.selection.retain(|id| ids.contains(id));
        self.records = records;
    }

    /// Number of loaded records, before any filtering.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Set or replace one user filter criterion.
    pub fn set_criterion(&mut self, field: &str, criterion: Criterion) {
        self.criteria.insert(field.to_string(), criterion);
        self.page = 1;
    }

    /// Drop all user filters (the screen's baseline criteria still apply).
    pub fn clear_criteria(&mut self) {
        self.criteria.clear();
        self.page = 1;
    }

    pub fn set_sort(&mut self, key: &str, direction: SortDirection) {
        self.sort_key = Some(key.to_string());
        self.sort_dir = direction;
    }

    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    /// Change the page size and return to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size > 0 {
            self.page_size = page_size;
            self.page = 1;
        }
    }

    /// Toggle one record in the bulk-action selection.
    pub fn toggle_selection(&mut self, id: &str) {
        if !self.selection.remove(id) {
            self.selection.insert(id.to_string());
        }
    }

    /// Mark a set of ids selected or unselected.
    pub fn set_selected(&mut self, ids: &[String], selected: bool) {
        for id in ids {
            if selected {
                self.selection.insert(id.clone());
            } else {
                self.selection.remove(id);
            }
        }
    }

    /// Select every record in the current filtered view (all pages).
    pub fn select_all_visible(&mut self) {
        let visible = self.filtered(Local::now().date_naive());
        for record in &visible {
            if let Some(id) = record.id() {
                self.selection.insert(id.to_string());
            }
        }
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &HashSet<String> {
        &self.selection
    }

    fn filtered(&self, today: NaiveDate) -> Vec<Record> {
        let base = query::filter_on(&self.records, &self.screen.default_criteria(), today);
        query::filter_on(&base, &self.criteria, today)
    }

    /// Compute the derived view: baseline criteria, user criteria, sort,
    /// then pagination with clamping.
    pub fn view(&self) -> PageView {
        self.view_on(Local::now().date_naive())
    }

    /// [`view`](Self::view) with an explicit "today" for date-range filters.
    pub fn view_on(&self, today: NaiveDate) -> PageView {
        let mut filtered = self.filtered(today);
        if let Some(key) = &self.sort_key {
            filtered = query::sort(&filtered, key, self.sort_dir);
        }
        let total_records = filtered.len();
        let page = query::clamp_page(total_records, self.page, self.page_size);
        let total_pages = if total_records == 0 || self.page_size == 0 {
            1
        } else {
            (total_records + self.page_size - 1) / self.page_size
        };
        PageView {
            records: query::paginate(&filtered, page, self.page_size),
            page,
            page_size: self.page_size,
            total_records,
            total_pages,
        }
    }

    /// Find a loaded record by id; no network round-trip.
    pub fn record_by_id(&self, id: &str) -> Option<&Record> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    /// The write stub: validate and apply a status change on the in-memory
    /// copy and append an audit entry. Nothing is written back to the data
    /// source - there is no write path to the sheet.
    ///
    /// # Arguments
    /// * `id` - Record id
    /// * `new_status` - Target status; the lifecycle must allow the move
    /// * `user` - Acting username, for the audit trail
    /// * `audit` - The audit log
    ///
    /// # Returns
    /// * `Err` on unknown id, unparsable current status, or a transition
    ///   the lifecycle forbids
    pub fn apply_status(
        &mut self,
        id: &str,
        new_status: ServiceStatus,
        user: &str,
        audit: &AuditLog,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let record = self
            .records
            .iter_mut()
            .find(|r| r.id() == Some(id))
            .ok_or_else(|| format!("record {id} not found"))?;

        let current = record
            .status()
            .ok_or_else(|| format!("record {id} has no recognizable status"))?;

        if !current.can_transition(new_status) {
            return Err(format!(
                "invalid transition {} -> {} for record {id}",
                current.label(),
                new_status.label()
            )
            .into());
        }

        record.set("Status", new_status.label());
        audit.record(
            user,
            "status_change",
            id,
            &format!("{} -> {}", current.label(), new_status.label()),
        )?;
        Ok(())
    }
}
