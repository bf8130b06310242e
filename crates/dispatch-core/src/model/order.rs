//! A customer order awaiting delivery.
//!
//! # Actor Framework
//! Orders live in the order store, a [`ResourceActor`](dispatch_actor::ResourceActor).
//! See the `ActorEntity` impl on [`Order`] for:
//! - Creation parameters ([`OrderCreate`])
//! - List filters ([`OrderFilter`])
//! - Matching and lifecycle actions ([`OrderAction`](crate::order_actor::OrderAction))
use crate::model::PartnerId;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for Orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderId(pub u32);

impl From<u32> for OrderId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "order_{}", self.0)
    }
}

/// Where an order is in its delivery lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    Picked,
    Delivered,
}

impl OrderStatus {
    /// Statuses that hold a partner reference.
    pub fn holds_partner(self) -> bool {
        !matches!(self, OrderStatus::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::Picked => "picked",
            OrderStatus::Delivered => "delivered",
        }
    }
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
}

/// One line of an order. Prices are in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub quantity: u32,
    pub unit_price_cents: u64,
}

impl OrderItem {
    /// `quantity * unit_price_cents`, or `None` if it does not fit in a `u64`.
    pub fn line_total_cents(&self) -> Option<u64> {
        u64::from(self.quantity).checked_mul(self.unit_price_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub customer: Customer,
    /// Delivery zone label; matched exactly against partner areas.
    pub area: String,
    pub items: Vec<OrderItem>,
    pub total_cents: u64,
    pub scheduled_for: DateTime<Utc>,
    pub status: OrderStatus,
    pub assigned_to: Option<PartnerId>,
    /// Number of cancellations so far. Ledger entries are scoped to a round.
    pub assignment_round: u32,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Human-readable order number derived from the store id.
    pub fn number_for(id: OrderId) -> String {
        format!("ORD-{:06}", id.0)
    }
}

/// Payload for placing a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub customer: Customer,
    pub area: String,
    pub items: Vec<OrderItem>,
    pub scheduled_for: DateTime<Utc>,
    /// Total quoted to the customer, if any. Must equal the sum of the items.
    pub declared_total_cents: Option<u64>,
}

/// Orders are never edited through the update path; status moves only via actions.
#[derive(Debug)]
pub enum OrderUpdate {}

/// Criteria for listing orders. Empty fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub area: Option<String>,
    /// Calendar day (UTC) of the scheduled delivery.
    pub date: Option<NaiveDate>,
}

impl OrderFilter {
    pub fn with_status(status: OrderStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.status.map_or(true, |status| status == order.status)
            && self.area.as_ref().map_or(true, |area| *area == order.area)
            && self
                .date
                .map_or(true, |date| order.scheduled_for.date_naive() == date)
    }
}
