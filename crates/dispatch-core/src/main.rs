//! # Dispatch demo
//!
//! Wires up the [`DispatchSystem`] from configuration, onboards two partners, and walks
//! orders through matching, a failed match, delivery and cancellation, then prints the
//! dashboard figures.
//!
//! ```bash
//! RUST_LOG=info cargo run -p dispatch-core
//! DISPATCH_CAPACITY_CEILING=1 RUST_LOG=debug cargo run -p dispatch-core
//! ```

use chrono::{Duration, Utc};
use dispatch_core::config::DispatchConfig;
use dispatch_core::metrics::Bucketing;
use dispatch_core::model::{Credential, Customer, OrderCreate, OrderItem, PartnerCreate};
use dispatch_core::runtime::{setup_tracing, DispatchSystem};
use tracing::{info, Instrument};

fn order(customer: &str, area: &str) -> OrderCreate {
    OrderCreate {
        customer: Customer {
            name: customer.to_string(),
            phone: "555-0100".to_string(),
            address: format!("1 {area} Street"),
        },
        area: area.to_string(),
        items: vec![
            OrderItem {
                name: "Groceries".to_string(),
                quantity: 2,
                unit_price_cents: 1_250,
            },
            OrderItem {
                name: "Flowers".to_string(),
                quantity: 1,
                unit_price_cents: 900,
            },
        ],
        scheduled_for: Utc::now() + Duration::hours(2),
        declared_total_cents: Some(3_400),
    }
}

fn partner(name: &str, email: &str, areas: &[&str]) -> PartnerCreate {
    PartnerCreate {
        name: name.to_string(),
        email: email.to_string(),
        phone: "555-0111".to_string(),
        credential: Credential::new("changeme"),
        areas: areas.iter().map(|a| a.to_string()).collect(),
        shift: None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = DispatchConfig::load()?;
    setup_tracing(&config.log_filter);
    info!(?config, "Starting dispatch demo");

    let system = DispatchSystem::new(config);

    system
        .onboard_partner(partner("Asha", "asha@example.com", &["North"]))
        .await?;
    system
        .onboard_partner(partner("Bilal", "bilal@example.com", &["North", "South"]))
        .await?;

    let north = system.place_order(order("Carmen", "North")).await?;
    let east = system.place_order(order("Deniz", "East")).await?;
    let south = system.place_order(order("Emeka", "South")).await?;

    for (id, result) in system.match_batch(&[north, east, south]).await {
        match result {
            Ok(outcome) => info!(order = %id, ?outcome, "Match"),
            Err(e) => info!(order = %id, error = %e, "Match refused"),
        }
    }

    async {
        system.mark_picked(north).await?;
        system.mark_delivered(north).await?;
        // A retried delivery is refused without touching the partner again.
        if let Err(e) = system.mark_delivered(north).await {
            info!(error = %e, "Retry refused");
        }
        Ok::<_, dispatch_core::order_actor::OrderError>(())
    }
    .instrument(tracing::info_span!("delivery", order = %north))
    .await?;

    let cancelled = system.cancel(south).await?;
    info!(order = %cancelled.id, round = cancelled.assignment_round, "Cancelled, back to pending");

    let metrics = system.assignment_metrics().await?;
    info!(
        total_assigned = metrics.total_assigned,
        success_rate = metrics.success_rate,
        "Assignment metrics"
    );
    for reason in &metrics.failure_reasons {
        info!(reason = %reason.reason, count = reason.count, "Failure reason");
    }
    for row in system.location_performance().await? {
        info!(
            area = %row.area,
            completed = row.completed_orders,
            partners = row.partners,
            "Location"
        );
    }
    for point in system.order_trends(Bucketing::Day, None).await? {
        info!(bucket = %point.label, orders = point.orders, delivered = point.delivered, "Trend");
    }
    let counts = system.order_status_counts().await?;
    info!(?counts, "Order status counts");
    let summary = system.partner_summary().await?;
    info!(?summary, "Partner summary");

    system.shutdown().await?;
    Ok(())
}
