//! Request-id correlation for retrieves.
//!
//! Each retrieve issued through [`crate::dispatcher::request`] registers a oneshot channel
//! under a fresh request id. The client echoes the id in its reply, which settles exactly that
//! request, whatever slot name it lands in.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;
use uuid::Uuid;

use crate::error_handling::types::RetrieveError;

/// `Ok(None)` means the client answered and the key was absent.
pub type RetrieveOutcome = Result<Option<Value>, RetrieveError>;

/// Observable state of one retrieve.
#[derive(Debug, Clone, PartialEq)]
pub enum RetrieveState {
    /// No reply yet.
    Pending,
    /// The reply arrived; `None` when the key was absent.
    Resolved(Option<Value>),
    Failed(RetrieveError),
}

/// Handle to a retrieve in flight.
///
/// Awaiting it yields the client's answer. [`PendingRetrieve::state`] polls without waiting.
#[derive(Debug)]
pub struct PendingRetrieve {
    request_id: Uuid,
    target: String,
    receiver: oneshot::Receiver<RetrieveOutcome>,
    settled: Option<RetrieveOutcome>,
}

impl PendingRetrieve {
    /// A retrieve that failed before anything was sent.
    pub fn failed(request_id: Uuid, target: String, error: RetrieveError) -> Self {
        let (_, receiver) = oneshot::channel();
        Self {
            request_id,
            target,
            receiver,
            settled: Some(Err(error)),
        }
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    /// Input slot the reply is written to.
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&mut self) -> RetrieveState {
        if self.settled.is_none() {
            self.settled = match self.receiver.try_recv() {
                Ok(outcome) => Some(outcome),
                Err(TryRecvError::Empty) => None,
                Err(TryRecvError::Closed) => Some(Err(RetrieveError::Disconnected)),
            };
        }
        match &self.settled {
            None => RetrieveState::Pending,
            Some(Ok(value)) => RetrieveState::Resolved(value.clone()),
            Some(Err(e)) => RetrieveState::Failed(e.clone()),
        }
    }

    /// Waits at most `limit` for the reply.
    pub async fn with_timeout(self, limit: Duration) -> RetrieveOutcome {
        match tokio::time::timeout(limit, self).await {
            Ok(outcome) => outcome,
            Err(_) => Err(RetrieveError::TimedOut),
        }
    }
}

impl Future for PendingRetrieve {
    type Output = RetrieveOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if let Some(outcome) = self.settled.take() {
            return Poll::Ready(outcome);
        }
        match Pin::new(&mut self.receiver).poll(cx) {
            Poll::Ready(Ok(outcome)) => Poll::Ready(outcome),
            // sender dropped without an answer: the session went away
            Poll::Ready(Err(_)) => Poll::Ready(Err(RetrieveError::Disconnected)),
            Poll::Pending => Poll::Pending,
        }
    }
}

struct PendingEntry {
    target: String,
    sender: oneshot::Sender<RetrieveOutcome>,
}

/// Outstanding retrieves of one session, keyed by request id.
#[derive(Default)]
pub struct PendingTable {
    entries: HashMap<Uuid, PendingEntry>,
}

impl PendingTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, request_id: Uuid, target: String) -> PendingRetrieve {
        self.prune();
        let (sender, receiver) = oneshot::channel();
        self.entries.insert(
            request_id,
            PendingEntry {
                target: target.clone(),
                sender,
            },
        );
        PendingRetrieve {
            request_id,
            target,
            receiver,
            settled: None,
        }
    }

    /// Settles `request_id` with `value`. Returns `false` for unknown ids.
    pub fn resolve(&mut self, request_id: Uuid, value: Option<Value>) -> bool {
        self.settle(request_id, Ok(value))
    }

    pub fn fail(&mut self, request_id: Uuid, error: RetrieveError) -> bool {
        self.settle(request_id, Err(error))
    }

    /// Fails every outstanding retrieve, returning how many were waiting.
    pub fn fail_all(&mut self, error: RetrieveError) -> usize {
        let count = self.entries.len();
        for (_, entry) in self.entries.drain() {
            let _ = entry.sender.send(Err(error.clone()));
        }
        count
    }

    pub fn target_of(&self, request_id: Uuid) -> Option<&str> {
        self.entries.get(&request_id).map(|e| e.target.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn settle(&mut self, request_id: Uuid, outcome: RetrieveOutcome) -> bool {
        match self.entries.remove(&request_id) {
            Some(entry) => {
                let _ = entry.sender.send(outcome);
                true
            }
            None => false,
        }
    }

    // Drops entries whose handle was abandoned, e.g. after a timeout.
    fn prune(&mut self) {
        self.entries.retain(|_, e| !e.sender.is_closed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio_test::task;
    use tokio_test::{assert_pending, assert_ready_eq};

    #[test]
    fn resolves_only_the_matching_request() {
        let mut table = PendingTable::new();
        let first = table.register(Uuid::new_v4(), "p_a".into());
        let second = table.register(Uuid::new_v4(), "p_a".into());

        let mut first = task::spawn(first);
        let mut second = task::spawn(second);
        assert_pending!(first.poll());
        assert_pending!(second.poll());

        let id = second.request_id();
        assert!(table.resolve(id, Some(json!("v2"))));
        assert!(second.is_woken());
        assert_ready_eq!(second.poll(), Ok(Some(json!("v2"))));
        assert_pending!(first.poll());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn state_distinguishes_pending_empty_and_failed() {
        let mut table = PendingTable::new();
        let mut empty = table.register(Uuid::new_v4(), "a".into());
        let mut failed = table.register(Uuid::new_v4(), "b".into());

        assert_eq!(empty.state(), RetrieveState::Pending);
        table.resolve(empty.request_id(), None);
        assert_eq!(empty.state(), RetrieveState::Resolved(None));
        // state is sticky
        assert_eq!(empty.state(), RetrieveState::Resolved(None));

        table.fail(failed.request_id(), RetrieveError::ClientFailure("quota".into()));
        assert_eq!(
            failed.state(),
            RetrieveState::Failed(RetrieveError::ClientFailure("quota".into()))
        );
    }

    #[tokio::test]
    async fn awaiting_after_state_returns_settled_outcome() {
        let mut table = PendingTable::new();
        let mut pending = table.register(Uuid::new_v4(), "a".into());
        table.resolve(pending.request_id(), Some(json!(3)));
        assert_eq!(pending.state(), RetrieveState::Resolved(Some(json!(3))));
        assert_eq!(pending.await, Ok(Some(json!(3))));
    }

    #[tokio::test]
    async fn fail_all_reports_every_waiter() {
        let mut table = PendingTable::new();
        let a = table.register(Uuid::new_v4(), "a".into());
        let b = table.register(Uuid::new_v4(), "b".into());
        assert_eq!(table.fail_all(RetrieveError::Superseded), 2);
        assert!(table.is_empty());
        assert_eq!(a.await, Err(RetrieveError::Superseded));
        assert_eq!(b.await, Err(RetrieveError::Superseded));
    }

    #[tokio::test]
    async fn dropped_table_disconnects_waiters() {
        let mut table = PendingTable::new();
        let pending = table.register(Uuid::new_v4(), "a".into());
        drop(table);
        assert_eq!(pending.await, Err(RetrieveError::Disconnected));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_leaves_no_entry_behind() {
        let mut table = PendingTable::new();
        let id = Uuid::new_v4();
        let pending = table.register(id, "a".into());
        assert_eq!(
            pending.with_timeout(Duration::from_millis(50)).await,
            Err(RetrieveError::TimedOut)
        );
        let _next = table.register(Uuid::new_v4(), "b".into());
        assert_eq!(table.len(), 1);
        assert!(table.target_of(id).is_none());
        assert!(!table.resolve(id, Some(json!(1))));
    }

    #[test]
    fn failed_handle_is_settled_immediately() {
        let mut pending =
            PendingRetrieve::failed(Uuid::new_v4(), "k".into(), RetrieveError::Disconnected);
        assert_eq!(pending.target(), "k");
        assert_eq!(
            pending.state(),
            RetrieveState::Failed(RetrieveError::Disconnected)
        );
    }
}
