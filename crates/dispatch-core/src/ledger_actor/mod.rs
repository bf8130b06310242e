//! # Assignment Ledger
//!
//! Append-only record of every match attempt. The ledger is the source of truth for the
//! assignment metrics, so nothing here can be edited or removed once written: the update
//! and action types are uninhabited and `on_delete` always refuses.
//!
//! Uniqueness of success entries is enforced at append time through
//! [`conflicts_with`](dispatch_actor::ActorEntity::conflicts_with), scoped to the order's
//! assignment round so that a cancelled order can be matched again.

pub mod entity;
pub mod error;

pub use entity::{LedgerAction, LedgerUpdate};
pub use error::*;

use crate::clients::LedgerClient;
use crate::model::AssignmentEntry;
use dispatch_actor::ResourceActor;

/// Creates a new Ledger actor and its client. Run it with a [`Clock`](crate::clock::Clock).
pub fn new(mailbox_size: usize) -> (ResourceActor<AssignmentEntry>, LedgerClient) {
    let (actor, generic_client) = ResourceActor::new(mailbox_size);
    (actor, LedgerClient::new(generic_client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::stepping_clock;
    use crate::model::{AssignmentDraft, AssignmentFilter, FailureReason, OrderId, PartnerId};
    use chrono::{Duration, TimeZone, Utc};
    use dispatch_actor::ActorClient;

    fn spawn_ledger() -> LedgerClient {
        let (actor, client) = new(8);
        let start = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
        tokio::spawn(actor.run(stepping_clock(start, Duration::minutes(1))));
        client
    }

    fn success(order: u32, partner: u32, round: u32) -> AssignmentDraft {
        AssignmentDraft::Success {
            order_id: OrderId(order),
            partner_id: PartnerId(partner),
            round,
        }
    }

    #[tokio::test]
    async fn second_success_in_a_round_is_rejected() {
        let ledger = spawn_ledger();
        let first = ledger.append(success(1, 1, 0)).await.unwrap();

        let err = ledger.append(success(1, 2, 0)).await.unwrap_err();
        assert_eq!(err, LedgerError::DuplicateSuccess(first.to_string()));

        // A new round (after a cancellation) may succeed again.
        ledger.append(success(1, 2, 1)).await.unwrap();
        // Other orders are unaffected.
        ledger.append(success(2, 1, 0)).await.unwrap();

        let for_order = ledger.query(AssignmentFilter::for_order(OrderId(1))).await.unwrap();
        assert_eq!(for_order.len(), 2);
    }

    #[tokio::test]
    async fn failures_accumulate_and_query_bounds_are_inclusive() {
        let ledger = spawn_ledger();
        for _ in 0..3 {
            ledger
                .append(AssignmentDraft::Failed {
                    order_id: OrderId(4),
                    reason: FailureReason::NoEligiblePartnerInArea,
                    round: 0,
                })
                .await
                .unwrap();
        }
        let all = ledger.query(AssignmentFilter::default()).await.unwrap();
        assert_eq!(all.len(), 3);

        let window = AssignmentFilter {
            from: Some(all[1].created_at),
            to: Some(all[2].created_at),
            ..AssignmentFilter::default()
        };
        let ids: Vec<_> = ledger
            .query(window)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![all[1].id, all[2].id]);
    }

    #[tokio::test]
    async fn entries_cannot_be_deleted() {
        let ledger = spawn_ledger();
        let id = ledger.append(success(1, 1, 0)).await.unwrap();
        assert_eq!(ledger.delete(id).await, Err(LedgerError::AppendOnly));
        assert!(ledger.get(id).await.unwrap().is_some());
    }
}
