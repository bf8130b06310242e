//! # Order Client
//!
//! High-level API for the order store. Matching and lifecycle orchestration happen in the
//! Order actor's action handler; this client only sends the action and unpacks the result.
use crate::model::{Order, OrderCreate, OrderId};
use crate::order_actor::{MatchOutcome, OrderAction, OrderActionResult, OrderError};
use async_trait::async_trait;
use dispatch_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, info, instrument};

/// Client for interacting with the Order actor.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, params), fields(area = %params.area))]
    pub async fn place_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        let id = self.inner.create(params).await.map_err(Self::map_error)?;
        info!(order = %id, "Order placed");
        Ok(id)
    }

    /// Try to assign a partner to a pending order.
    #[instrument(skip(self))]
    pub async fn match_order(&self, id: OrderId) -> Result<MatchOutcome, OrderError> {
        match self.inner.perform_action(id, OrderAction::Match).await {
            Ok(OrderActionResult::Match(outcome)) => Ok(outcome),
            Ok(_) => unreachable!("Match action must return Match result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn mark_picked(&self, id: OrderId) -> Result<Order, OrderError> {
        match self.inner.perform_action(id, OrderAction::MarkPicked).await {
            Ok(OrderActionResult::MarkPicked(order)) => Ok(order),
            Ok(_) => unreachable!("MarkPicked action must return MarkPicked result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn mark_delivered(&self, id: OrderId) -> Result<Order, OrderError> {
        match self.inner.perform_action(id, OrderAction::MarkDelivered).await {
            Ok(OrderActionResult::MarkDelivered(order)) => Ok(order),
            Ok(_) => unreachable!("MarkDelivered action must return MarkDelivered result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    #[instrument(skip(self))]
    pub async fn cancel(&self, id: OrderId) -> Result<Order, OrderError> {
        match self.inner.perform_action(id, OrderAction::Cancel).await {
            Ok(OrderActionResult::Cancel(order)) => Ok(order),
            Ok(_) => unreachable!("Cancel action must return Cancel result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<OrderError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}
