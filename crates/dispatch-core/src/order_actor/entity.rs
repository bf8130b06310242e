//! [`ActorEntity`] implementation for [`Order`].
//!
//! Orders depend on the partner directory and the ledger, which arrive through
//! [`OrderContext`] when the actor is started.

use super::actions::{OrderAction, OrderActionResult};
use super::error::OrderError;
use crate::clients::{LedgerClient, PartnerClient};
use crate::clock::Clock;
use crate::lifecycle::Transition;
use crate::model::{
    Order, OrderCreate, OrderFilter, OrderId, OrderStatus, OrderUpdate, PartnerId,
};
use crate::partner_actor::ReleaseReason;
use async_trait::async_trait;
use dispatch_actor::ActorEntity;
use tracing::info;

/// Dependencies of the order store.
#[derive(Clone)]
pub struct OrderContext {
    pub partners: PartnerClient,
    pub ledger: LedgerClient,
    pub clock: Clock,
    /// Maximum open assignments per partner.
    pub capacity_ceiling: u32,
}

fn validate(params: &OrderCreate) -> Result<u64, OrderError> {
    if params.customer.name.trim().is_empty() {
        return Err(OrderError::Validation("customer name must not be empty".into()));
    }
    if params.area.trim().is_empty() {
        return Err(OrderError::Validation("delivery area must not be empty".into()));
    }
    if params.items.is_empty() {
        return Err(OrderError::Validation("an order needs at least one item".into()));
    }

    let mut total: u64 = 0;
    for item in &params.items {
        if item.quantity == 0 {
            return Err(OrderError::Validation(format!(
                "item '{}' has zero quantity",
                item.name
            )));
        }
        total = item
            .line_total_cents()
            .and_then(|line| total.checked_add(line))
            .ok_or_else(|| OrderError::Validation("order total overflows".into()))?;
    }

    if let Some(declared) = params.declared_total_cents {
        if declared != total {
            return Err(OrderError::Validation(format!(
                "declared total {declared} does not equal item total {total}"
            )));
        }
    }
    Ok(total)
}

impl Order {
    /// The partner an open order is assigned to.
    fn holder(&self) -> Result<PartnerId, OrderError> {
        self.assigned_to.ok_or(OrderError::InvalidState {
            id: self.id,
            status: self.status,
            operation: "release the partner of",
        })
    }

    /// Moves an open order forward or back, releasing its partner first when the move
    /// ends the assignment. Nothing on `self` changes unless the release succeeded.
    async fn advance(
        &mut self,
        transition: Transition,
        ctx: &OrderContext,
    ) -> Result<(), OrderError> {
        let id = self.id;
        let next = self
            .status
            .apply(transition)
            .map_err(|e| OrderError::InvalidTransition {
                id,
                from: e.from,
                transition: e.transition,
            })?;

        let release = match transition {
            Transition::Deliver => Some(ReleaseReason::Completed),
            Transition::Cancel => Some(ReleaseReason::Cancelled),
            Transition::Assign | Transition::Pickup => None,
        };
        if let Some(reason) = release {
            let partner_id = self.holder()?;
            ctx.partners.release(partner_id, reason).await?;
        }

        info!(order = %self.id, from = %self.status, to = %next, "Transition");
        self.status = next;
        if transition == Transition::Cancel {
            self.assigned_to = None;
            self.assignment_round += 1;
        }
        Ok(())
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = OrderUpdate;
    type Filter = OrderFilter;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = OrderContext;
    type Error = OrderError;

    fn from_create_params(
        id: OrderId,
        params: OrderCreate,
        ctx: &OrderContext,
    ) -> Result<Self, OrderError> {
        let total_cents = validate(&params)?;
        Ok(Self {
            id,
            order_number: Order::number_for(id),
            customer: params.customer,
            area: params.area,
            items: params.items,
            total_cents,
            scheduled_for: params.scheduled_for,
            status: OrderStatus::Pending,
            assigned_to: None,
            assignment_round: 0,
            created_at: (ctx.clock)(),
        })
    }

    fn matches(&self, filter: &OrderFilter) -> bool {
        filter.matches(self)
    }

    async fn on_update(
        &mut self,
        update: OrderUpdate,
        _ctx: &OrderContext,
    ) -> Result<(), OrderError> {
        match update {}
    }

    /// Order history backs the ledger, so orders are kept forever.
    async fn on_delete(&self, _ctx: &OrderContext) -> Result<(), OrderError> {
        Err(OrderError::InvalidState {
            id: self.id,
            status: self.status,
            operation: "delete",
        })
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        ctx: &OrderContext,
    ) -> Result<OrderActionResult, OrderError> {
        match action {
            OrderAction::Match => {
                let outcome = self.assign(ctx).await?;
                Ok(OrderActionResult::Match(outcome))
            }
            OrderAction::MarkPicked => {
                self.advance(Transition::Pickup, ctx).await?;
                Ok(OrderActionResult::MarkPicked(self.clone()))
            }
            OrderAction::MarkDelivered => {
                self.advance(Transition::Deliver, ctx).await?;
                Ok(OrderActionResult::MarkDelivered(self.clone()))
            }
            OrderAction::Cancel => {
                self.advance(Transition::Cancel, ctx).await?;
                Ok(OrderActionResult::Cancel(self.clone()))
            }
        }
    }
}
