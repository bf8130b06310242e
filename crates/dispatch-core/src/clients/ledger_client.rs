//! # Ledger Client
//!
//! Append and query access to the assignment ledger.
use crate::ledger_actor::LedgerError;
use crate::model::{AssignmentDraft, AssignmentEntry, AssignmentFilter, AssignmentId};
use async_trait::async_trait;
use dispatch_actor::{ActorClient, FrameworkError, ResourceClient};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct LedgerClient {
    inner: ResourceClient<AssignmentEntry>,
}

impl LedgerClient {
    pub fn new(inner: ResourceClient<AssignmentEntry>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<AssignmentEntry> for LedgerClient {
    type Error = LedgerError;

    fn inner(&self) -> &ResourceClient<AssignmentEntry> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.into_entity_error::<LedgerError>() {
            Ok(typed) => typed,
            Err(FrameworkError::NotFound(id)) => LedgerError::NotFound(id),
            Err(FrameworkError::Conflict(existing)) => LedgerError::DuplicateSuccess(existing),
            Err(other) => LedgerError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl LedgerClient {
    /// Record one match attempt.
    #[instrument(skip(self))]
    pub(crate) async fn append(&self, draft: AssignmentDraft) -> Result<AssignmentId, LedgerError> {
        debug!("Sending request");
        self.inner.create(draft).await.map_err(Self::map_error)
    }

    /// Entries matching `filter`, in append order.
    pub async fn query(
        &self,
        filter: AssignmentFilter,
    ) -> Result<Vec<AssignmentEntry>, LedgerError> {
        self.list(filter).await
    }
}
