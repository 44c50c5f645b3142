use chrono::{DateTime, Months, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::item;

/// How urgently an alert should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Secondary,
    Destructive,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    Disabled,
    NegativeStock,
    LowStock,
    ValorReferenciaExpired,
    ValorReferenciaExpiringSoon,
    AtaExpired,
    AtaExpiringSoon,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Alert {
    pub kind: AlertKind,
    pub label: &'static str,
    pub severity: Severity,
}

impl Alert {
    fn new(kind: AlertKind, label: &'static str, severity: Severity) -> Self {
        Self {
            kind,
            label,
            severity,
        }
    }
}

/// Window ahead of `now` within which an expirable date counts as
/// "expiring soon".
const EXPIRY_HORIZON_MONTHS: u32 = 3;

/// Computes the active alerts for an item at a given instant.
///
/// Stock alerts are mutually exclusive (disabled > negative > low); the two
/// expiration dates are evaluated independently of each other and of the
/// stock state, so an item can carry up to three alerts at once. Absent
/// dates raise nothing. Deterministic for a given `(item, now)` pair.
pub fn compute_alerts(item: &item::Model, now: DateTime<Utc>) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if !item.ativo {
        alerts.push(Alert::new(
            AlertKind::Disabled,
            "Desativado",
            Severity::Secondary,
        ));
    } else if item.estoque_atual < 0 {
        // The balance invariant should make this unreachable; report it
        // instead of trusting it.
        alerts.push(Alert::new(
            AlertKind::NegativeStock,
            "Negativo",
            Severity::Destructive,
        ));
    } else if item.estoque_atual <= item.estoque_minimo {
        alerts.push(Alert::new(
            AlertKind::LowStock,
            "Baixo Estoque",
            Severity::Destructive,
        ));
    }

    let horizon = now
        .checked_add_months(Months::new(EXPIRY_HORIZON_MONTHS))
        .unwrap_or(DateTime::<Utc>::MAX_UTC);

    if let Some(validade) = item.validade_valor_referencia {
        if validade < now {
            alerts.push(Alert::new(
                AlertKind::ValorReferenciaExpired,
                "Ref. Vencida",
                Severity::Destructive,
            ));
        } else if validade < horizon {
            alerts.push(Alert::new(
                AlertKind::ValorReferenciaExpiringSoon,
                "Ref. Vence Logo",
                Severity::Warning,
            ));
        }
    }

    if let Some(validade) = item.validade_ata {
        if validade < now {
            alerts.push(Alert::new(
                AlertKind::AtaExpired,
                "ATA Vencida",
                Severity::Destructive,
            ));
        } else if validade < horizon {
            alerts.push(Alert::new(
                AlertKind::AtaExpiringSoon,
                "ATA Vence Logo",
                Severity::Warning,
            ));
        }
    }

    alerts
}
