use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle status of a service request.
///
/// The data source stores status as free text and the legacy pages each
/// carried their own label/color tables with slightly different mappings.
/// This enum is the single consolidated vocabulary: raw strings are
/// normalized once at the loader boundary and everything past it works with
/// the closed variant set. `Faturado` is kept distinct from `Realizado` (the
/// legacy code disagreed with itself on that point; billing screens depend
/// on the distinction).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceStatus {
    /// Fresh intake, not yet triaged.
    Novo,
    /// Awaiting scheduling.
    Pendente,
    /// Scheduled with a photographer.
    Agendado,
    /// Schedule confirmed by the client.
    Confirmado,
    /// Shoot performed, material pending review.
    Realizado,
    /// Material under editing.
    EmEdicao,
    /// Editing finished.
    Editado,
    /// Delivered to the client.
    Entregue,
    /// Canceled at any point before delivery.
    Cancelado,
    /// Billed; terminal.
    Faturado,
}

/// Every status, in lifecycle order. Handy for populating filter inputs.
pub const ALL_STATUSES: &[ServiceStatus] = &[
    ServiceStatus::Novo,
    ServiceStatus::Pendente,
    ServiceStatus::Agendado,
    ServiceStatus::Confirmado,
    ServiceStatus::Realizado,
    ServiceStatus::EmEdicao,
    ServiceStatus::Editado,
    ServiceStatus::Entregue,
    ServiceStatus::Cancelado,
    ServiceStatus::Faturado,
];

impl ServiceStatus {
    /// Normalize a raw status cell into the closed vocabulary.
    ///
    /// Matching is case-insensitive and tolerant of the accent and
    /// underscore variants the sheets contain ("Em edição", "em_edicao").
    /// Unknown strings yield `None` rather than being coerced.
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .chars()
            .map(|c| match c {
                'á' | 'ã' | 'â' | 'à' => 'a',
                'é' | 'ê' => 'e',
                'í' => 'i',
                'ó' | 'õ' | 'ô' => 'o',
                'ú' => 'u',
                'ç' => 'c',
                '_' => ' ',
                other => other,
            })
            .collect();

        match normalized.as_str() {
            "novo" | "nova" => Some(Self::Novo),
            "pendente" => Some(Self::Pendente),
            "agendado" | "agendada" => Some(Self::Agendado),
            "confirmado" | "confirmada" => Some(Self::Confirmado),
            "realizado" | "realizada" => Some(Self::Realizado),
            "em edicao" | "em andamento" => Some(Self::EmEdicao),
            "editado" | "editada" => Some(Self::Editado),
            "entregue" => Some(Self::Entregue),
            "cancelado" | "cancelada" => Some(Self::Cancelado),
            "faturado" | "faturada" => Some(Self::Faturado),
            _ => None,
        }
    }

    /// Canonical display label, as stored back into the status column.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Novo => "Novo",
            Self::Pendente => "Pendente",
            Self::Agendado => "Agendado",
            Self::Confirmado => "Confirmado",
            Self::Realizado => "Realizado",
            Self::EmEdicao => "Em edicao",
            Self::Editado => "Editado",
            Self::Entregue => "Entregue",
            Self::Cancelado => "Cancelado",
            Self::Faturado => "Faturado",
        }
    }

    /// Bootstrap badge class used by the dashboard tables.
    pub fn badge(&self) -> &'static str {
        match self {
            Self::Novo => "primary",
            Self::Pendente => "warning",
            Self::Agendado => "info",
            Self::Confirmado => "success",
            Self::Realizado => "success",
            Self::EmEdicao => "warning",
            Self::Editado => "success",
            Self::Entregue => "secondary",
            Self::Cancelado => "danger",
            Self::Faturado => "dark",
        }
    }

    /// Hex color for the calendar/status chips.
    pub fn hex_color(&self) -> &'static str {
        match self {
            Self::Novo => "#6c757d",
            Self::Pendente => "#fd7e14",
            Self::Agendado => "#007bff",
            Self::Confirmado => "#28a745",
            Self::Realizado => "#ffc107",
            Self::EmEdicao => "#e83e8c",
            Self::Editado => "#17a2b8",
            Self::Entregue => "#6f42c1",
            Self::Cancelado => "#dc3545",
            Self::Faturado => "#343a40",
        }
    }

    /// Whether the lifecycle allows moving from `self` to `to`.
    ///
    /// Scheduling may fall back to `Pendente` (reschedule request) and a
    /// confirmed shoot may return to `Agendado`. `Cancelado` and `Faturado`
    /// are terminal.
    pub fn can_transition(&self, to: Self) -> bool {
        use ServiceStatus::*;
        matches!(
            (self, to),
            (Novo, Pendente)
                | (Novo, Cancelado)
                | (Pendente, Agendado)
                | (Pendente, Cancelado)
                | (Agendado, Confirmado)
                | (Agendado, Pendente)
                | (Agendado, Cancelado)
                | (Confirmado, Realizado)
                | (Confirmado, Agendado)
                | (Confirmado, Cancelado)
                | (Realizado, EmEdicao)
                | (Realizado, Faturado)
                | (EmEdicao, Editado)
                | (Editado, Entregue)
                | (Entregue, Faturado)
        )
    }

    /// True for states with no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelado | Self::Faturado)
    }
}

impl fmt::Display for ServiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
