//! Delivery partner records.
//!
//! Partners live in the partner directory. Load and completion counters are only moved by
//! the [`PartnerAction`](crate::partner_actor::PartnerAction)s the order store sends while
//! matching and advancing orders; administrators edit everything else through
//! [`PartnerUpdate`].
use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::Display;

/// Type-safe identifier for Partners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub u32);

impl From<u32> for PartnerId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for PartnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "partner_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartnerStatus {
    Active,
    Inactive,
}

impl Display for PartnerStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PartnerStatus::Active => f.write_str("active"),
            PartnerStatus::Inactive => f.write_str("inactive"),
        }
    }
}

/// Working hours. Informational only; matching does not look at shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shift {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PartnerMetrics {
    /// Between 0 and 5 inclusive.
    pub rating: f32,
    pub completed_orders: u32,
    pub cancelled_orders: u32,
}

impl Default for PartnerMetrics {
    fn default() -> Self {
        Self {
            rating: Partner::DEFAULT_RATING,
            completed_orders: 0,
            cancelled_orders: 0,
        }
    }
}

/// Opaque login secret. Never printed and never serialized.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partner {
    pub id: PartnerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(skip)]
    pub credential: Credential,
    /// Delivery zones this partner serves. Never empty.
    pub areas: BTreeSet<String>,
    pub shift: Option<Shift>,
    pub status: PartnerStatus,
    /// Open assignments (assigned or picked orders).
    pub current_load: u32,
    pub metrics: PartnerMetrics,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Partner {
    pub const DEFAULT_RATING: f32 = 5.0;
    pub const MAX_RATING: f32 = 5.0;

    pub fn covers(&self, area: &str) -> bool {
        self.areas.contains(area)
    }

    pub fn is_active(&self) -> bool {
        self.status == PartnerStatus::Active
    }
}

/// Payload for onboarding a partner.
#[derive(Debug, Clone)]
pub struct PartnerCreate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub credential: Credential,
    pub areas: BTreeSet<String>,
    pub shift: Option<Shift>,
}

/// Administrative edits. `None` leaves a field as it is.
#[derive(Debug, Clone, Default)]
pub struct PartnerUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub areas: Option<BTreeSet<String>>,
    /// `Some(None)` clears the shift.
    pub shift: Option<Option<Shift>>,
    pub rating: Option<f32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartnerFilter {
    pub area: Option<String>,
    pub status: Option<PartnerStatus>,
}

impl PartnerFilter {
    pub fn in_area(area: impl Into<String>) -> Self {
        Self {
            area: Some(area.into()),
            status: None,
        }
    }

    pub fn matches(&self, partner: &Partner) -> bool {
        self.area.as_deref().map_or(true, |area| partner.covers(area))
            && self.status.map_or(true, |status| status == partner.status)
    }
}
