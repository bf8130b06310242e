//! # Partner Client
//!
//! High-level API for the partner directory. Administrative calls are public; load
//! changes (`reserve`, `release`) are only reachable from the order store.
use crate::model::{Partner, PartnerCreate, PartnerFilter, PartnerId, PartnerStatus, PartnerUpdate};
use crate::partner_actor::{PartnerAction, PartnerActionResult, PartnerError, ReleaseReason};
use async_trait::async_trait;
use dispatch_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

/// Client for interacting with the Partner actor.
#[derive(Clone)]
pub struct PartnerClient {
    inner: ResourceClient<Partner>,
}

impl PartnerClient {
    pub fn new(inner: ResourceClient<Partner>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Partner> for PartnerClient {
    type Error = PartnerError;

    fn inner(&self) -> &ResourceClient<Partner> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<PartnerError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => PartnerError::NotFound(id),
            Err(FrameworkError::Conflict(existing)) => {
                PartnerError::Validation(format!("email already registered to {existing}"))
            }
            Err(other) => PartnerError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl PartnerClient {
    #[instrument(skip(self, params), fields(email = %params.email))]
    pub async fn onboard(&self, params: PartnerCreate) -> Result<PartnerId, PartnerError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    #[instrument(skip(self))]
    pub async fn update_partner(
        &self,
        id: PartnerId,
        update: PartnerUpdate,
    ) -> Result<Partner, PartnerError> {
        debug!("Sending request");
        self.inner.update(id, update).await.map_err(Self::map_error)
    }

    /// Partners matching `filter`, in id order.
    pub async fn list_partners(&self, filter: PartnerFilter) -> Result<Vec<Partner>, PartnerError> {
        self.list(filter).await
    }

    #[instrument(skip(self))]
    pub async fn set_status(
        &self,
        id: PartnerId,
        status: PartnerStatus,
    ) -> Result<Partner, PartnerError> {
        debug!("Setting partner status");
        match self
            .inner
            .perform_action(id, PartnerAction::SetStatus(status))
            .await
        {
            Ok(PartnerActionResult::SetStatus(partner)) => Ok(partner),
            Ok(_) => unreachable!("SetStatus action must return SetStatus result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Take one slot if the partner is active and below `capacity`. Returns the new load.
    #[instrument(skip(self))]
    pub(crate) async fn reserve(&self, id: PartnerId, capacity: u32) -> Result<u32, PartnerError> {
        debug!("Reserving partner slot");
        match self
            .inner
            .perform_action(id, PartnerAction::Reserve { capacity })
            .await
        {
            Ok(PartnerActionResult::Reserve(load)) => Ok(load),
            Ok(_) => unreachable!("Reserve action must return Reserve result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }

    /// Give one slot back. Returns the new load.
    #[instrument(skip(self))]
    pub(crate) async fn release(
        &self,
        id: PartnerId,
        reason: ReleaseReason,
    ) -> Result<u32, PartnerError> {
        debug!("Releasing partner slot");
        match self
            .inner
            .perform_action(id, PartnerAction::Release(reason))
            .await
        {
            Ok(PartnerActionResult::Release(load)) => Ok(load),
            Ok(_) => unreachable!("Release action must return Release result"),
            Err(e) => Err(Self::map_error(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_actor::mock::{create_mock_client, expect_action};

    #[tokio::test]
    async fn test_reserve_sends_capacity_and_returns_load() {
        let (client, mut receiver) = create_mock_client::<Partner>(10);
        let partner_client = PartnerClient::new(client);

        let reserve_task =
            tokio::spawn(async move { partner_client.reserve(PartnerId(1), 3).await });

        let (id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(id, PartnerId(1));
        assert!(matches!(action, PartnerAction::Reserve { capacity: 3 }));
        responder.send(Ok(PartnerActionResult::Reserve(2))).unwrap();

        assert_eq!(reserve_task.await.unwrap(), Ok(2));
    }

    #[tokio::test]
    async fn test_entity_errors_arrive_typed() {
        let (client, mut receiver) = create_mock_client::<Partner>(10);
        let partner_client = PartnerClient::new(client);

        let reserve_task =
            tokio::spawn(async move { partner_client.reserve(PartnerId(2), 1).await });

        let (_, _, responder) = expect_action(&mut receiver).await.unwrap();
        let full = PartnerError::AtCapacity {
            id: PartnerId(2),
            load: 1,
            capacity: 1,
        };
        responder
            .send(Err(FrameworkError::EntityError(Box::new(full.clone()))))
            .unwrap();

        assert_eq!(reserve_task.await.unwrap(), Err(full));
    }

    #[tokio::test]
    async fn test_framework_errors_map_onto_partner_errors() {
        let (client, mut receiver) = create_mock_client::<Partner>(10);
        let partner_client = PartnerClient::new(client);

        let release_task = tokio::spawn(async move {
            partner_client
                .release(PartnerId(9), ReleaseReason::Completed)
                .await
        });
        let (_, _, responder) = expect_action(&mut receiver).await.unwrap();
        responder
            .send(Err(FrameworkError::NotFound("partner_9".into())))
            .unwrap();
        assert_eq!(
            release_task.await.unwrap(),
            Err(PartnerError::NotFound("partner_9".into()))
        );

        let closed = PartnerClient::map_error(FrameworkError::ActorClosed);
        assert!(matches!(closed, PartnerError::ActorCommunicationError(_)));
    }
}
