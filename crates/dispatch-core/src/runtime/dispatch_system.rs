use crate::clients::{LedgerClient, OrderClient, PartnerClient};
use crate::clock::{system_clock, Clock};
use crate::config::DispatchConfig;
use crate::ledger_actor::{self, LedgerError};
use crate::metrics::{
    self, AssignmentMetrics, AssignmentStats, Bucketing, DateWindow, LocationPerformance,
    OrderStatusCounts, PartnerSummary, TrendPoint,
};
use crate::model::{
    AssignmentEntry, AssignmentFilter, Order, OrderCreate, OrderFilter, OrderId, OrderStatus,
    Partner, PartnerCreate, PartnerFilter, PartnerId, PartnerStatus, PartnerUpdate,
};
use crate::order_actor::{self, MatchOutcome, OrderContext, OrderError};
use crate::partner_actor::{self, PartnerError};
use chrono::{DateTime, Utc};
use dispatch_actor::ActorClient;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

/// The three stores read at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub orders: Vec<Order>,
    pub partners: Vec<Partner>,
    pub entries: Vec<AssignmentEntry>,
}

/// The runtime orchestrator for the dispatch engine.
///
/// `DispatchSystem` is responsible for:
/// - **Lifecycle Management**: starting and stopping the partner, ledger and order actors
/// - **Dependency Wiring**: handing the order store its partner and ledger clients
/// - **Consistent Reads**: metrics see all three stores at one instant
///
/// # Consistency gate
///
/// The gate only orders mutations against snapshots. Every mutating call holds it in
/// shared mode for its whole duration, so mutations never wait on each other here; the
/// order actor's mailbox serializes them anyway. A [`snapshot`](Self::snapshot) takes it
/// exclusively, which waits for in-flight mutations and keeps new ones out while the
/// three stores are listed. A match therefore never shows up half-applied in the metrics,
/// e.g. with the partner's load raised but the order still pending.
///
/// # Example
///
/// ```ignore
/// let system = DispatchSystem::new(DispatchConfig::default());
/// let order_id = system.place_order(order_data).await?;
/// let outcome = system.match_order(order_id).await?;
/// let metrics = system.assignment_metrics().await?;
/// system.shutdown().await?;
/// ```
pub struct DispatchSystem {
    orders: OrderClient,
    partners: PartnerClient,
    ledger: LedgerClient,
    gate: Arc<RwLock<()>>,
    config: DispatchConfig,
    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl DispatchSystem {
    /// Starts all actors on the system clock. Must be called inside a Tokio runtime.
    pub fn new(config: DispatchConfig) -> Self {
        Self::with_clock(config, system_clock())
    }

    /// Starts all actors with an injected clock.
    pub fn with_clock(config: DispatchConfig, clock: Clock) -> Self {
        let (partner_actor, partners) = partner_actor::new(config.mailbox_size);
        let (ledger_actor, ledger) = ledger_actor::new(config.mailbox_size);
        let (order_actor, orders) = order_actor::new(config.mailbox_size);

        // Leaves first, then the order store with its dependencies.
        let partner_handle = tokio::spawn(partner_actor.run(clock.clone()));
        let ledger_handle = tokio::spawn(ledger_actor.run(clock.clone()));
        let order_handle = tokio::spawn(order_actor.run(OrderContext {
            partners: partners.clone(),
            ledger: ledger.clone(),
            clock,
            capacity_ceiling: config.capacity_ceiling,
        }));

        info!(
            capacity_ceiling = config.capacity_ceiling,
            mailbox_size = config.mailbox_size,
            "Dispatch system started"
        );
        Self {
            orders,
            partners,
            ledger,
            gate: Arc::new(RwLock::new(())),
            config,
            // Order first: it holds clones of the other two clients.
            handles: vec![order_handle, partner_handle, ledger_handle],
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    // =========================================================================
    // Orders
    // =========================================================================

    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        let _shared = self.gate.read().await;
        self.orders.place_order(params).await
    }

    pub async fn get_order(&self, id: OrderId) -> Result<Order, OrderError> {
        self.orders
            .get(id)
            .await?
            .ok_or_else(|| OrderError::NotFound(id.to_string()))
    }

    pub async fn list_orders(&self, filter: OrderFilter) -> Result<Vec<Order>, OrderError> {
        self.orders.list(filter).await
    }

    /// Try to assign a partner to a pending order.
    pub async fn match_order(&self, id: OrderId) -> Result<MatchOutcome, OrderError> {
        let _shared = self.gate.read().await;
        self.orders.match_order(id).await
    }

    /// Match several orders one after another. One result per id, in input order; a
    /// failure for one order does not stop the batch.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn match_batch(
        &self,
        ids: &[OrderId],
    ) -> Vec<(OrderId, Result<MatchOutcome, OrderError>)> {
        let mut results = Vec::with_capacity(ids.len());
        for &id in ids {
            results.push((id, self.match_order(id).await));
        }
        let assigned = results
            .iter()
            .filter(|(_, r)| matches!(r, Ok(MatchOutcome::Assigned { .. })))
            .count();
        info!(assigned, "Batch finished");
        results
    }

    /// Match every order that is currently pending.
    pub async fn match_pending(
        &self,
    ) -> Result<Vec<(OrderId, Result<MatchOutcome, OrderError>)>, OrderError> {
        let pending: Vec<OrderId> = self
            .orders
            .list(OrderFilter::with_status(OrderStatus::Pending))
            .await?
            .into_iter()
            .map(|o| o.id)
            .collect();
        Ok(self.match_batch(&pending).await)
    }

    pub async fn mark_picked(&self, id: OrderId) -> Result<Order, OrderError> {
        let _shared = self.gate.read().await;
        self.orders.mark_picked(id).await
    }

    pub async fn mark_delivered(&self, id: OrderId) -> Result<Order, OrderError> {
        let _shared = self.gate.read().await;
        self.orders.mark_delivered(id).await
    }

    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        let _shared = self.gate.read().await;
        self.orders.cancel(id).await
    }

    // =========================================================================
    // Partners
    // =========================================================================

    pub async fn onboard_partner(&self, params: PartnerCreate) -> Result<PartnerId, PartnerError> {
        let _shared = self.gate.read().await;
        self.partners.onboard(params).await
    }

    pub async fn update_partner(
        &self,
        id: PartnerId,
        update: PartnerUpdate,
    ) -> Result<Partner, PartnerError> {
        let _shared = self.gate.read().await;
        self.partners.update_partner(id, update).await
    }

    pub async fn set_partner_status(
        &self,
        id: PartnerId,
        status: PartnerStatus,
    ) -> Result<Partner, PartnerError> {
        let _shared = self.gate.read().await;
        self.partners.set_status(id, status).await
    }

    /// Remove a partner. Refused while the partner holds open assignments.
    pub async fn remove_partner(&self, id: PartnerId) -> Result<(), PartnerError> {
        let _shared = self.gate.read().await;
        self.partners.delete(id).await
    }

    pub async fn get_partner(&self, id: PartnerId) -> Result<Partner, PartnerError> {
        self.partners
            .get(id)
            .await?
            .ok_or_else(|| PartnerError::NotFound(id.to_string()))
    }

    pub async fn list_partners(&self, filter: PartnerFilter) -> Result<Vec<Partner>, PartnerError> {
        self.partners.list_partners(filter).await
    }

    // =========================================================================
    // Ledger & metrics
    // =========================================================================

    pub async fn assignments(
        &self,
        filter: AssignmentFilter,
    ) -> Result<Vec<AssignmentEntry>, LedgerError> {
        self.ledger.query(filter).await
    }

    /// All three stores, with no mutation in between.
    pub async fn snapshot(&self) -> Result<Snapshot, OrderError> {
        let _exclusive = self.gate.write().await;
        Ok(Snapshot {
            orders: self.orders.list(OrderFilter::default()).await?,
            partners: self.partners.list(PartnerFilter::default()).await?,
            entries: self.ledger.list(AssignmentFilter::default()).await?,
        })
    }

    pub async fn assignment_metrics(&self) -> Result<AssignmentMetrics, OrderError> {
        Ok(metrics::assignment_metrics(&self.snapshot().await?.entries))
    }

    pub async fn order_trends(
        &self,
        bucketing: Bucketing,
        window: Option<DateWindow>,
    ) -> Result<Vec<TrendPoint>, OrderError> {
        Ok(metrics::order_trends(
            &self.snapshot().await?.orders,
            bucketing,
            window,
        ))
    }

    pub async fn location_performance(&self) -> Result<Vec<LocationPerformance>, OrderError> {
        let snapshot = self.snapshot().await?;
        Ok(metrics::location_performance(
            &snapshot.orders,
            &snapshot.partners,
        ))
    }

    pub async fn assignment_stats(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<AssignmentStats, OrderError> {
        let snapshot = self.snapshot().await?;
        Ok(metrics::assignment_stats(
            &snapshot.entries,
            &snapshot.orders,
            from,
            to,
        ))
    }

    pub async fn partner_summary(&self) -> Result<PartnerSummary, OrderError> {
        Ok(metrics::partner_summary(&self.snapshot().await?.partners))
    }

    pub async fn order_status_counts(&self) -> Result<OrderStatusCounts, OrderError> {
        Ok(metrics::order_status_counts(&self.snapshot().await?.orders))
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the mailboxes. The order actor goes first and takes its
    /// clones of the partner and ledger clients with it, after which those two stop too.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down dispatch system...");
        drop(self.orders);
        drop(self.partners);
        drop(self.ledger);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Dispatch system shutdown complete.");
        Ok(())
    }
}
