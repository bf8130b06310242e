use chrono::{Duration, TimeZone, Utc};
use dispatch_actor::mock::MockClient;
use dispatch_actor::{ActorClient, FrameworkError};
use dispatch_core::clients::{LedgerClient, OrderClient, PartnerClient};
use dispatch_core::clock::stepping_clock;
use dispatch_core::ledger_actor::LedgerError;
use dispatch_core::model::{
    AssignmentEntry, AssignmentId, Credential, Customer, OrderCreate, OrderId, OrderItem,
    OrderStatus, Partner, PartnerId, PartnerMetrics, PartnerStatus,
};
use dispatch_core::order_actor::{self, MatchOutcome, OrderContext, OrderError};
use dispatch_core::partner_actor::{PartnerActionResult, PartnerError};

/// Real Order actor with mocked partner directory and ledger.
///
/// The order store's matching and lifecycle logic runs for real; every call it makes to
/// its dependencies is answered from a script, which lets these tests inject races and
/// failures that are hard to provoke with real actors.
struct Harness {
    orders: OrderClient,
    partners: MockClient<Partner>,
    ledger: MockClient<AssignmentEntry>,
}

impl Harness {
    fn new(capacity_ceiling: u32) -> Self {
        let partners = MockClient::<Partner>::new();
        let ledger = MockClient::<AssignmentEntry>::new();
        let (order_actor, orders) = order_actor::new(8);
        let start = Utc.with_ymd_and_hms(2024, 4, 2, 9, 0, 0).unwrap();
        tokio::spawn(order_actor.run(OrderContext {
            partners: PartnerClient::new(partners.client()),
            ledger: LedgerClient::new(ledger.client()),
            clock: stepping_clock(start, Duration::seconds(30)),
            capacity_ceiling,
        }));
        Self {
            orders,
            partners,
            ledger,
        }
    }

    fn verify(&self) {
        self.partners.verify();
        self.ledger.verify();
    }
}

fn partner(id: u32, load: u32) -> Partner {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(id.into());
    Partner {
        id: PartnerId(id),
        name: format!("Partner {id}"),
        email: format!("p{id}@example.com"),
        phone: String::new(),
        credential: Credential::new("secret"),
        areas: ["North".to_string()].into_iter().collect(),
        shift: None,
        status: PartnerStatus::Active,
        current_load: load,
        metrics: PartnerMetrics::default(),
        created_at: at,
        updated_at: at,
    }
}

fn north_order() -> OrderCreate {
    OrderCreate {
        customer: Customer {
            name: "Dana".into(),
            phone: "555-0142".into(),
            address: "4 Quay St".into(),
        },
        area: "North".into(),
        items: vec![
            OrderItem {
                name: "Bread".into(),
                quantity: 2,
                unit_price_cents: 300,
            },
            OrderItem {
                name: "Milk".into(),
                quantity: 1,
                unit_price_cents: 150,
            },
        ],
        scheduled_for: Utc.with_ymd_and_hms(2024, 4, 2, 18, 0, 0).unwrap(),
        declared_total_cents: None,
    }
}

fn at_capacity(id: u32) -> FrameworkError {
    FrameworkError::EntityError(Box::new(PartnerError::AtCapacity {
        id: PartnerId(id),
        load: 1,
        capacity: 1,
    }))
}

#[tokio::test]
async fn test_place_order_computes_total_and_number() {
    let harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();
    assert_eq!(id, OrderId(1));

    let order = harness.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.order_number, "ORD-000001");
    assert_eq!(order.total_cents, 750);
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.assigned_to, None);
    harness.verify();
}

#[tokio::test]
async fn test_invalid_orders_are_rejected() {
    let harness = Harness::new(3);

    let mut wrong_total = north_order();
    wrong_total.declared_total_cents = Some(700);
    assert!(matches!(
        harness.orders.place_order(wrong_total).await,
        Err(OrderError::Validation(_))
    ));

    let mut zero_quantity = north_order();
    zero_quantity.items[0].quantity = 0;
    assert!(matches!(
        harness.orders.place_order(zero_quantity).await,
        Err(OrderError::Validation(_))
    ));

    let mut no_items = north_order();
    no_items.items.clear();
    assert!(matches!(
        harness.orders.place_order(no_items).await,
        Err(OrderError::Validation(_))
    ));

    let mut overflowing = north_order();
    overflowing.items[0].quantity = u32::MAX;
    overflowing.items[0].unit_price_cents = u64::MAX;
    assert_eq!(overflowing.items[0].line_total_cents(), None);
    assert!(matches!(
        harness.orders.place_order(overflowing).await,
        Err(OrderError::Validation(msg)) if msg.contains("overflows")
    ));

    let mut matching_total = north_order();
    matching_total.declared_total_cents = Some(750);
    assert!(harness.orders.place_order(matching_total).await.is_ok());
}

#[tokio::test]
async fn test_lost_reservation_is_retried_once() {
    let mut harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    // First pick loses the race, the retry sees fresh loads and picks someone else.
    harness.partners.expect_list().return_ok(vec![partner(1, 0)]);
    harness.partners.expect_action(PartnerId(1)).return_err(at_capacity(1));
    harness
        .partners
        .expect_list()
        .return_ok(vec![partner(1, 1), partner(2, 0)]);
    harness
        .partners
        .expect_action(PartnerId(2))
        .return_ok(PartnerActionResult::Reserve(1));
    harness.ledger.expect_create().return_ok(AssignmentId(1));

    let outcome = harness.orders.match_order(id).await.unwrap();
    assert_eq!(
        outcome,
        MatchOutcome::Assigned {
            partner_id: PartnerId(2),
            entry_id: AssignmentId(1)
        }
    );

    let order = harness.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Assigned);
    assert_eq!(order.assigned_to, Some(PartnerId(2)));
    harness.verify();
}

#[tokio::test]
async fn test_second_lost_reservation_surfaces_conflict() {
    let mut harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    for _ in 0..2 {
        harness.partners.expect_list().return_ok(vec![partner(1, 0)]);
        harness.partners.expect_action(PartnerId(1)).return_err(at_capacity(1));
    }

    let err = harness.orders.match_order(id).await.unwrap_err();
    assert!(matches!(err, OrderError::ConcurrencyConflict(_)));

    let order = harness.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    // No ledger traffic at all.
    harness.verify();
}

#[tokio::test]
async fn test_failed_ledger_append_rolls_back_reservation() {
    let mut harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    harness.partners.expect_list().return_ok(vec![partner(1, 0)]);
    harness
        .partners
        .expect_action(PartnerId(1))
        .return_ok(PartnerActionResult::Reserve(1));
    harness
        .ledger
        .expect_create()
        .return_err(FrameworkError::Conflict("assignment_3".into()));
    // The rollback release.
    harness
        .partners
        .expect_action(PartnerId(1))
        .return_ok(PartnerActionResult::Release(0));

    let err = harness.orders.match_order(id).await.unwrap_err();
    assert_eq!(
        err,
        OrderError::Ledger(LedgerError::DuplicateSuccess("assignment_3".into()))
    );

    let order = harness.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.assigned_to, None);
    harness.verify();
}

#[tokio::test]
async fn test_no_partner_is_recorded_not_raised() {
    let mut harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    harness.partners.expect_list().return_ok(vec![]);
    harness.ledger.expect_create().return_ok(AssignmentId(5));

    let outcome = harness.orders.match_order(id).await.unwrap();
    assert!(matches!(
        outcome,
        MatchOutcome::Unassigned {
            entry_id: AssignmentId(5),
            ..
        }
    ));
    assert_eq!(
        harness.orders.get(id).await.unwrap().unwrap().status,
        OrderStatus::Pending
    );
    harness.verify();
}

#[tokio::test]
async fn test_failed_release_leaves_order_unchanged() {
    let mut harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    harness.partners.expect_list().return_ok(vec![partner(1, 0)]);
    harness
        .partners
        .expect_action(PartnerId(1))
        .return_ok(PartnerActionResult::Reserve(1));
    harness.ledger.expect_create().return_ok(AssignmentId(1));
    harness.orders.match_order(id).await.unwrap();
    harness.orders.mark_picked(id).await.unwrap();

    harness
        .partners
        .expect_action(PartnerId(1))
        .return_err(FrameworkError::ActorClosed);
    let err = harness.orders.mark_delivered(id).await.unwrap_err();
    assert!(matches!(
        err,
        OrderError::Partner(PartnerError::ActorCommunicationError(_))
    ));

    let order = harness.orders.get(id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Picked);
    assert_eq!(order.assigned_to, Some(PartnerId(1)));
    harness.verify();
}

#[tokio::test]
async fn test_out_of_sequence_transitions_touch_nothing() {
    let harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    // Pending orders cannot be picked, delivered or cancelled; no partner call is made.
    assert!(matches!(
        harness.orders.mark_picked(id).await,
        Err(OrderError::InvalidTransition {
            from: OrderStatus::Pending,
            ..
        })
    ));
    assert!(matches!(
        harness.orders.mark_delivered(id).await,
        Err(OrderError::InvalidTransition { .. })
    ));
    assert!(matches!(
        harness.orders.cancel(id).await,
        Err(OrderError::InvalidTransition { .. })
    ));
    harness.verify();
}

#[tokio::test]
async fn test_orders_are_never_deleted() {
    let harness = Harness::new(3);
    let id = harness.orders.place_order(north_order()).await.unwrap();

    assert!(matches!(
        harness.orders.delete(id).await,
        Err(OrderError::InvalidState {
            operation: "delete",
            ..
        })
    ));
    assert!(harness.orders.get(id).await.unwrap().is_some());

    assert!(matches!(
        harness.orders.match_order(OrderId(99)).await,
        Err(OrderError::NotFound(_))
    ));
}
