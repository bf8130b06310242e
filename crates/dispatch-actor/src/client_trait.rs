//! # ActorClient Trait
//!
//! Common read/delete surface for domain clients built on top of a [`ResourceClient`].
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for domain clients to inherit the standard store operations.
///
/// Implementors provide access to the inner [`ResourceClient`] and a mapping from
/// [`FrameworkError`] into their own error type; `get`, `list` and `delete` come for free.
///
/// ```rust
/// use dispatch_actor::{ActorClient, ActorEntity, FrameworkError, ResourceClient};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Van { id: u32 }
/// #[derive(Debug)] struct VanCreate;
/// #[derive(Debug)] enum VanUpdate {}
/// #[derive(Debug, Default)] struct VanFilter;
/// #[derive(Debug)] enum VanAction {}
/// #[derive(Debug, thiserror::Error)]
/// enum VanError {
///     #[error("van not found: {0}")] NotFound(String),
///     #[error("actor communication error: {0}")] Comm(String),
/// }
///
/// #[async_trait]
/// impl ActorEntity for Van {
///     type Id = u32; type Create = VanCreate; type Update = VanUpdate; type Filter = VanFilter;
///     type Action = VanAction; type ActionResult = (); type Context = (); type Error = VanError;
///     fn from_create_params(id: u32, _: VanCreate, _: &()) -> Result<Self, VanError> { Ok(Self { id }) }
///     fn matches(&self, _: &VanFilter) -> bool { true }
///     async fn on_update(&mut self, u: VanUpdate, _: &()) -> Result<(), VanError> { match u {} }
///     async fn handle_action(&mut self, a: VanAction, _: &()) -> Result<(), VanError> { match a {} }
/// }
///
/// struct VanClient { inner: ResourceClient<Van> }
///
/// #[async_trait]
/// impl ActorClient<Van> for VanClient {
///     type Error = VanError;
///     fn inner(&self) -> &ResourceClient<Van> { &self.inner }
///     fn map_error(e: FrameworkError) -> VanError {
///         match e {
///             FrameworkError::NotFound(id) => VanError::NotFound(id),
///             other => VanError::Comm(other.to_string()),
///         }
///     }
/// }
///
/// async fn usage(client: VanClient) {
///     let _ = client.get(1).await;
///     let _ = client.list(VanFilter).await;
/// }
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The domain error type.
    type Error: Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors onto the domain error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch a record by id.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// List records selected by `filter`, in id order.
    #[tracing::instrument(skip(self))]
    async fn list(&self, filter: T::Filter) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().list(filter).await.map_err(Self::map_error)
    }

    /// Delete a record by id.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
