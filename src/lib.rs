/*!
# Sistema Fotografico

A server-side dashboard for a photography-scheduling operation, built in
Rust over spreadsheet-shaped data.

## Overview

The business runs on Google Sheets: service requests (Solicitacoes) move
from intake through scheduling, field registration, quality review, and
billing, with photographers, clients, brokers, and networks as read-only
reference sets. This crate replaces the old collection of browser pages
with one service: a data-access layer over CSV artifacts / the Sheets
values API, a shared query facade, one controller per screen, and an axum
JSON API on top.

## Architecture

### Data layer
- **CSV parsing** - delimiter-aware line parser with quoted-field escaping
- **Sheets values API** - read-only values-range client
- **Data loader** - named sources with a TTL cache and a layered fallback
  (primary source, compressed local backup, stale cache)
- **Backups** - Gzip + bincode snapshots per record set

### Query layer
- **Filter / sort / pagination facade** - the one derived-view pipeline
  every screen uses; equality, substring, and relative-date predicates,
  numeric-then-date-then-string sort coercion, clamped pagination
- **Status vocabulary** - one closed enum with the consolidated label,
  color, and lifecycle tables the legacy pages each duplicated

### Screens
- **Page controllers** - per-screen state holders (filters, sort, page,
  bulk selection) fed records by the loader; status changes are simulated
  writes recorded in the audit trail, never written back to the sheet
- **Web app** - axum routes over a shared `AppState`, JSON in/out
- **CLI** - interactive table browser over the same controllers

## Modules

- **record**: untyped tabular record with alternate-header accessors
- **status**: the ServiceStatus vocabulary, colors, lifecycle
- **csv**: delimited-text parsing and escaping
- **sheets**: Google Sheets values endpoint support
- **loader**: TTL-cached named-source loading with fallback
- **backup**: compressed record-set snapshots
- **query**: the filter / sort / paginate facade
- **controller**: per-screen state and the status write stub
- **audit**: capped JSON audit trail
- **session**: roles and token sessions
- **export**: CSV / XLSX export
- **config**: JSON-file configuration with defaults
- **fixtures**: mock record factories for the Mock source and tests
- **app**: routing and handlers
*/

pub mod app;
pub mod audit;
pub mod backup;
pub mod config;
pub mod controller;
pub mod csv;
pub mod export;
pub mod fixtures;
pub mod loader;
pub mod query;
pub mod record;
pub mod session;
pub mod sheets;
pub mod status;

pub use audit::{AuditEntry, AuditLog};
pub use config::{AppConfig, DataSource};
pub use controller::{PageController, PageView, Screen};
pub use loader::{DataLoader, Statistics};
pub use query::{Criterion, DateToken, SortDirection};
pub use record::Record;
pub use status::ServiceStatus;
