//! # Generic Actor Server
//!
//! `ResourceActor<T>` owns the records of one entity type and processes requests one at a
//! time. Whatever a hook does while handling a request (including awaiting other actors),
//! no other request for the same store is observed in between, which is what gives the
//! domain its per-store mutual exclusion.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// # Usage Pattern
///
/// 1. **Create**: `ResourceActor::new()` returns the actor (server) and a client.
/// 2. **Wire**: pass dependencies (other clients, clocks, limits) into `actor.run(context)`.
/// 3. **Run**: spawn the run loop in a background task.
///
/// ```rust
/// use dispatch_actor::{ActorEntity, ResourceActor};
/// use async_trait::async_trait;
///
/// #[derive(Clone, Debug)] struct Depot { id: u32, bays: u32 }
/// #[derive(Debug)] struct DepotCreate { bays: u32 }
/// #[derive(Debug)] enum DepotUpdate {}
/// #[derive(Debug, Default)] struct DepotFilter;
/// #[derive(Debug)] enum DepotAction { Bays }
/// #[derive(Debug, thiserror::Error)] #[error("depot error")] struct DepotError;
///
/// #[async_trait]
/// impl ActorEntity for Depot {
///     type Id = u32;
///     type Create = DepotCreate;
///     type Update = DepotUpdate;
///     type Filter = DepotFilter;
///     type Action = DepotAction;
///     type ActionResult = u32;
///     type Context = ();
///     type Error = DepotError;
///
///     fn from_create_params(id: u32, p: DepotCreate, _: &()) -> Result<Self, DepotError> {
///         Ok(Self { id, bays: p.bays })
///     }
///     fn matches(&self, _: &DepotFilter) -> bool { true }
///     async fn on_update(&mut self, u: DepotUpdate, _: &()) -> Result<(), DepotError> { match u {} }
///     async fn handle_action(&mut self, _: DepotAction, _: &()) -> Result<u32, DepotError> {
///         Ok(self.bays)
///     }
/// }
///
/// #[tokio::main]
/// async fn main() {
///     let (actor, client) = ResourceActor::<Depot>::new(10);
///     tokio::spawn(actor.run(()));
///     let id = client.create(DepotCreate { bays: 4 }).await.unwrap();
///     assert_eq!(client.perform_action(id, DepotAction::Bays).await.unwrap(), 4);
/// }
/// ```
///
/// ## Operations
///
/// * **Create**: next id from the counter, `from_create_params`, uniqueness check against
///   every stored record (`conflicts_with`), `on_create`, insert.
/// * **Get** / **List**: clones out of the store; `List` keeps id order.
/// * **Update**: `on_update` on the stored record, returns the new state.
/// * **Delete**: `on_delete`, then removal.
/// * **Action**: `handle_action` on the stored record, returns its result.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: BTreeMap<T::Id, T>,
    next_id: u32,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// `buffer_size` is the mailbox capacity; when it is full, client calls wait for room.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: BTreeMap::new(),
            next_id: 1,
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the event loop until every client has been dropped.
    pub async fn run(mut self, context: T::Context) {
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let id = T::Id::from(self.next_id);
                    self.next_id += 1;
                    let result = self.create(id, params, &context).await;
                    match &result {
                        Ok(id) => info!(entity_type, %id, size = self.store.len(), "Created"),
                        Err(e) => warn!(entity_type, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::List { filter, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&filter))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?filter, count = items.len(), "List");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    match item.on_update(update, &context).await {
                        Ok(()) => {
                            info!(entity_type, %id, "Updated");
                            let _ = respond_to.send(Ok(item.clone()));
                        }
                        Err(e) => {
                            warn!(entity_type, %id, error = %e, "Update failed");
                            let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        }
                    }
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let Some(item) = self.store.get(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    if let Err(e) = item.on_delete(&context).await {
                        warn!(entity_type, %id, error = %e, "on_delete refused");
                        let _ = respond_to.send(Err(FrameworkError::EntityError(Box::new(e))));
                        continue;
                    }
                    self.store.remove(&id);
                    info!(entity_type, %id, size = self.store.len(), "Deleted");
                    let _ = respond_to.send(Ok(()));
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let Some(item) = self.store.get_mut(&id) else {
                        warn!(entity_type, %id, "Not found");
                        let _ = respond_to.send(Err(FrameworkError::NotFound(id.to_string())));
                        continue;
                    };
                    let result = item
                        .handle_action(action, &context)
                        .await
                        .map_err(|e| FrameworkError::EntityError(Box::new(e)));
                    match &result {
                        Ok(_) => info!(entity_type, %id, "Action ok"),
                        Err(e) => warn!(entity_type, %id, error = %e, "Action failed"),
                    }
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    async fn create(
        &mut self,
        id: T::Id,
        params: T::Create,
        context: &T::Context,
    ) -> Result<T::Id, FrameworkError> {
        let mut item = T::from_create_params(id.clone(), params, context)
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;

        if let Some((existing_id, _)) = self
            .store
            .iter()
            .find(|(_, existing)| item.conflicts_with(existing))
        {
            return Err(FrameworkError::Conflict(existing_id.to_string()));
        }

        item.on_create(context)
            .await
            .map_err(|e| FrameworkError::EntityError(Box::new(e)))?;
        self.store.insert(id.clone(), item);
        Ok(id)
    }
}
