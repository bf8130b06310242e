//! # Order Lifecycle
//!
//! The order state machine as a pure transition table:
//!
//! ```text
//! pending --Assign--> assigned --Pickup--> picked --Deliver--> delivered
//!    ^                    |                   |
//!    +------Cancel--------+-------------------+
//! ```
//!
//! `delivered` is terminal. Nothing skips a state and nothing moves backwards except
//! `Cancel`, which returns an open order to `pending` so it can be matched again.
//! Partner-side effects of a transition (releasing load, bumping counters) are the order
//! actor's job; this module only decides whether a move is legal.

use crate::model::OrderStatus;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transition {
    /// A match succeeded.
    Assign,
    /// The partner confirmed pickup.
    Pickup,
    /// The partner confirmed delivery.
    Deliver,
    /// The assignment was called off.
    Cancel,
}

impl Transition {
    pub fn as_str(self) -> &'static str {
        match self {
            Transition::Assign => "assign",
            Transition::Pickup => "pick up",
            Transition::Deliver => "deliver",
            Transition::Cancel => "cancel",
        }
    }
}

impl Display for Transition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot {transition} an order that is {from}")]
pub struct IllegalTransition {
    pub from: OrderStatus,
    pub transition: Transition,
}

impl OrderStatus {
    /// The status reached by applying `transition`, or why it is not allowed.
    pub fn apply(self, transition: Transition) -> Result<OrderStatus, IllegalTransition> {
        use OrderStatus::*;
        use Transition::*;
        match (self, transition) {
            (Pending, Assign) => Ok(Assigned),
            (Assigned, Pickup) => Ok(Picked),
            (Picked, Deliver) => Ok(Delivered),
            (Assigned | Picked, Cancel) => Ok(Pending),
            (from, transition) => Err(IllegalTransition { from, transition }),
        }
    }

    pub fn is_terminal(self) -> bool {
        self == OrderStatus::Delivered
    }
}
