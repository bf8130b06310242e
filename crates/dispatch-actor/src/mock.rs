//! # Mock Clients for Tests
//!
//! Two ways to stand in for a real actor:
//!
//! - [`MockClient`] queues scripted replies (`expect_list().return_ok(..)`) and answers
//!   requests in order from a background task. Use it when an actor under test depends on
//!   other actors, e.g. an order store whose matching logic talks to a partner directory
//!   and a ledger.
//! - [`create_mock_client`] hands back the raw mailbox receiver so a test can inspect each
//!   request and answer it by hand with the helpers [`expect_list`] and [`expect_action`].
//!
//! | | MockClient | Real actor |
//! |---|---|---|
//! | State | scripted replies | real store |
//! | Error injection | `return_err` | needs the right state |
//! | Use case | logic around a dependency | the actor itself, full system |
//!
//! ```rust
//! use dispatch_actor::mock::MockClient;
//! use dispatch_actor::{ActorEntity, FrameworkError};
//! use async_trait::async_trait;
//!
//! #[derive(Clone, Debug)] struct Rider { id: u32, load: u32 }
//! #[derive(Debug)] struct RiderCreate;
//! #[derive(Debug)] enum RiderUpdate {}
//! #[derive(Debug, Default)] struct RiderFilter;
//! #[derive(Debug)] enum RiderAction { Load }
//! #[derive(Debug, thiserror::Error)] #[error("rider error")] struct RiderError;
//!
//! #[async_trait]
//! impl ActorEntity for Rider {
//!     type Id = u32; type Create = RiderCreate; type Update = RiderUpdate; type Filter = RiderFilter;
//!     type Action = RiderAction; type ActionResult = u32; type Context = (); type Error = RiderError;
//!     fn from_create_params(id: u32, _: RiderCreate, _: &()) -> Result<Self, RiderError> { Ok(Self { id, load: 0 }) }
//!     fn matches(&self, _: &RiderFilter) -> bool { true }
//!     async fn on_update(&mut self, u: RiderUpdate, _: &()) -> Result<(), RiderError> { match u {} }
//!     async fn handle_action(&mut self, _: RiderAction, _: &()) -> Result<u32, RiderError> { Ok(self.load) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let mut mock = MockClient::<Rider>::new();
//!     mock.expect_action(7).return_err(FrameworkError::NotFound("7".into()));
//!
//!     let client = mock.client();
//!     let result = client.perform_action(7, RiderAction::Load).await;
//!     assert!(matches!(result, Err(FrameworkError::NotFound(_))));
//!     mock.verify();
//! }
//! ```

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, oneshot};

/// A scripted reply, tagged with the request kind (and id) it answers.
enum Expectation<T: ActorEntity> {
    List {
        response: Result<Vec<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Action {
        id: T::Id,
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Queue<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

fn check_id<T: ActorEntity>(kind: &str, expected: &T::Id, actual: &T::Id) {
    if expected != actual {
        panic!("{kind} request for {actual}, expected {expected}");
    }
}

/// A mock client with ordered expectations.
///
/// Each incoming request pops the next expectation; a request of the wrong kind or for
/// the wrong id panics the responder task, which the caller sees as
/// [`FrameworkError::ActorDropped`].
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Queue<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations. Must be called inside a runtime.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Queue<T> = Arc::new(Mutex::new(VecDeque::new()));
        let queue = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let next = queue.lock().unwrap().pop_front();

                match (request, next) {
                    (
                        ResourceRequest::List { respond_to, .. },
                        Some(Expectation::List { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { id, respond_to, .. },
                        Some(Expectation::Action { id: expected, response }),
                    ) => {
                        check_id::<T>("Action", &expected, &id);
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns a client wired to this mock.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    fn builder<R>(
        &self,
        wrap: impl FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send + 'static,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            expectations: self.expectations.clone(),
            wrap: Box::new(wrap),
        }
    }

    /// Expects a `list`, whatever the filter.
    pub fn expect_list(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::List { response })
    }

    /// Expects a `create`.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(|response| Expectation::Create { response })
    }

    /// Expects an action on `id`.
    pub fn expect_action(&mut self, id: T::Id) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(move |response| Expectation::Action { id, response })
    }

    /// Panics if any expectation is still queued.
    pub fn verify(&self) {
        let remaining = self.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {remaining} remaining");
        }
    }
}

/// Completes an expectation with either a reply value or an error.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    expectations: Queue<T>,
    wrap: Box<dyn FnOnce(Result<R, FrameworkError>) -> Expectation<T> + Send>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Reply with `value`.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Reply with `error`.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        let expectation = (self.wrap)(response);
        self.expectations.lock().unwrap().push_back(expectation);
    }
}

// =============================================================================
// RAW MAILBOX HELPERS
// =============================================================================

/// Creates a client plus the receiving end of its mailbox.
///
/// The test drives the conversation itself: receive the next request with one of the
/// `expect_*` helpers, assert on its payload, and answer through the returned sender.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Receives the next request if it is a `List`.
pub async fn expect_list<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Filter, oneshot::Sender<Result<Vec<T>, FrameworkError>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::List { filter, respond_to }) => Some((filter, respond_to)),
        _ => None,
    }
}

/// Receives the next request if it is an `Action`.
#[allow(clippy::type_complexity)]
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}
