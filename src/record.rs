use crate::status::ServiceStatus;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Alternate spellings used for the record identifier across sheets.
pub const ID_FIELDS: &[&str] = &["ID", "Record ID", "ID Solicitacao", "Codigo da Solicitacao"];

/// Alternate spellings used for the status column across sheets.
pub const STATUS_FIELDS: &[&str] = &["Status", "Status da Solicitacao"];

/// Alternate spellings used for the scheduled-date column across sheets.
pub const SCHEDULE_DATE_FIELDS: &[&str] = &["Data do agendamento", "Data Agendamento"];

/// Alternate spellings used for the assigned photographer across sheets.
pub const PHOTOGRAPHER_FIELDS: &[&str] = &["Fotografo", "Nome do Fotografo"];

/// One tabular record: a header-row/data-row pairing from a spreadsheet tab
/// or CSV artifact.
///
/// All entities in the system (service requests, photographers, clients,
/// brokers, networks) travel as untyped key-value records; there is no
/// schema enforcement at the source. The accessors below paper over the
/// header-spelling drift between the different sheets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Field name -> raw cell text.
    pub fields: HashMap<String, String>,
}

impl Record {
    /// Build a record from (field, value) pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Record {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a field value by exact header name.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Look up a field trying each alternate header name in order.
    ///
    /// Empty cells are skipped so that a sheet carrying both spellings with
    /// one of them blank still resolves to the populated one.
    pub fn get_any(&self, fields: &[&str]) -> Option<&str> {
        fields
            .iter()
            .filter_map(|f| self.get(f))
            .find(|v| !v.trim().is_empty())
    }

    /// Set a field value, inserting the column if it is new.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        self.fields.insert(field.to_string(), value.into());
    }

    /// The record identifier, if any of the known id columns is populated.
    pub fn id(&self) -> Option<&str> {
        self.get_any(ID_FIELDS)
    }

    /// The raw status cell, whatever its header spelling.
    pub fn raw_status(&self) -> Option<&str> {
        self.get_any(STATUS_FIELDS)
    }

    /// The status parsed into the closed vocabulary, or `None` when the cell
    /// is missing or does not normalize.
    pub fn status(&self) -> Option<ServiceStatus> {
        self.raw_status().and_then(ServiceStatus::parse)
    }

    /// The scheduled date cell, whatever its header spelling.
    pub fn schedule_date(&self) -> Option<&str> {
        self.get_any(SCHEDULE_DATE_FIELDS)
    }

    /// The assigned photographer, whatever its header spelling.
    pub fn photographer(&self) -> Option<&str> {
        self.get_any(PHOTOGRAPHER_FIELDS)
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the record carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
