// Copyright 2025 the Mixed Reality Rust SDK Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Types and functions to poll Mixed Reality long-running operations (LROs).
//!
//! Several Mixed Reality services start work that takes minutes or hours to
//! complete, such as converting an asset or provisioning a rendering session.
//! The service returns a snapshot of the operation immediately, and the
//! client must query the service until the operation reaches a terminal
//! state.
//!
//! The service-specific crates classify each operation's status values into
//! the common [OperationStatus] buckets, and build pollers from two closures:
//! one to query the remote operation, and (where the service supports it) one
//! to cancel it. This crate provides the polling loop itself.
//!
//! An operation that finishes in the [Failed][OperationStatus::Failed] state
//! is not a polling error. The poller resolves successfully with the final
//! snapshot, and the snapshot carries the service's error payload. Only
//! problems querying the service, such as a dropped connection, reject the
//! polling future.

use gax::Result;
use gax::error::Error;
use gax::error::remote::RemoteError;
use std::future::Future;

mod options;
mod state;
pub use options::PollerOptions;
pub use state::OperationState;

/// The common status buckets for long-running operations.
///
/// Each service defines its own status enumeration. The service-specific
/// crates map those values onto these buckets so the polling loop does not
/// need to know about any particular service.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationStatus {
    /// The service accepted the operation but has not started working on it.
    Pending,
    /// The service is working on the operation.
    Running,
    /// The operation completed successfully.
    Succeeded,
    /// The operation completed with an error reported by the service.
    Failed,
    /// The operation was cancelled before it could complete.
    Cancelled,
}

impl OperationStatus {
    /// Returns true if the operation will never change state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Cancelled)
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Pending => "Pending",
            Self::Running => "Running",
            Self::Succeeded => "Succeeded",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{name}")
    }
}

/// The trait implemented by remote operation snapshots.
///
/// Each service defines its own snapshot type for long-running operations.
/// The snapshot must identify the operation for further queries, classify its
/// status, and expose the service's error payload when the operation failed.
pub trait RemoteOperation {
    /// The identifier used to query the operation.
    fn id(&self) -> &str;

    /// The status of the operation, classified into the common buckets.
    fn status(&self) -> OperationStatus;

    /// The error reported by the service, if the operation failed.
    fn error(&self) -> Option<&RemoteError>;
}

pub(crate) mod sealed {
    pub trait Poller {}
}

/// The trait implemented by LRO pollers.
///
/// # Parameters
/// * `O` - the operation snapshot type returned by the service.
pub trait Poller<O>: sealed::Poller {
    /// Query the current status of the long-running operation.
    ///
    /// Issues at most one request. Returns `None` without contacting the
    /// service when the operation already reached a terminal state. On a
    /// query error the tracked state is left untouched, and the call may be
    /// retried.
    fn poll(&mut self) -> impl Future<Output = Option<Result<OperationStatus>>>;

    /// Poll the long-running operation until it completes.
    ///
    /// Resolves with the final snapshot when the operation reaches a terminal
    /// state, including the [Failed][OperationStatus::Failed] state. Rejects
    /// only when a query fails.
    fn until_done(self) -> impl Future<Output = Result<O>>;

    /// Request cancellation of the long-running operation.
    ///
    /// Not all operations support cancellation. For those that do not, this
    /// returns an [unsupported][gax::error::Error::is_unsupported] error
    /// without contacting the service. A successful return means the service
    /// accepted the request; the operation reaches the
    /// [Cancelled][OperationStatus::Cancelled] state asynchronously and is
    /// observed by further polling.
    fn cancel(&mut self) -> impl Future<Output = Result<()>>;

    /// The state tracked for the long-running operation.
    fn state(&self) -> &OperationState<O>;

    /// Convert a poller to a [futures::Stream] of operation snapshots.
    ///
    /// The stream issues one query per item and ends after yielding the
    /// terminal snapshot. It does not pace itself; callers control the
    /// polling period by how fast they consume it.
    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = Result<O>> + Unpin
    where
        O: Clone;
}

/// Creates a new `impl Poller<O>` for an operation without a cancel endpoint.
///
/// # Parameters
/// * `query` - a closure that queries the operation. It receives the
///   operation identifier as its only input parameter. It should have
///   captured any clients and request options.
/// * `initial` - the snapshot returned by the service when the operation was
///   started or looked up. Polling begins from this snapshot, so an
///   operation that is already terminal completes without any queries.
///
/// # Example
/// ```
/// # use mixedreality_lro::*;
/// # use gax::error::remote::RemoteError;
/// #[derive(Clone, Debug)]
/// struct Operation {
///     id: String,
///     status: OperationStatus,
/// }
/// impl RemoteOperation for Operation {
///     fn id(&self) -> &str {
///         &self.id
///     }
///     fn status(&self) -> OperationStatus {
///         self.status
///     }
///     fn error(&self) -> Option<&RemoteError> {
///         None
///     }
/// }
///
/// # tokio_test::block_on(async {
/// let initial = Operation {
///     id: "op-123".into(),
///     status: OperationStatus::Succeeded,
/// };
/// let poller = new_poller(
///     |id| async move {
///         Ok(Operation {
///             id,
///             status: OperationStatus::Succeeded,
///         })
///     },
///     initial,
///     PollerOptions::default(),
/// );
/// let done = poller.until_done().await?;
/// assert_eq!(done.status(), OperationStatus::Succeeded);
/// # Ok::<(), gax::error::Error>(()) });
/// ```
pub fn new_poller<O, Q, QF>(query: Q, initial: O, options: PollerOptions) -> impl Poller<O>
where
    O: RemoteOperation + Send,
    Q: Fn(String) -> QF + Send + Sync,
    QF: Future<Output = Result<O>> + Send + 'static,
{
    PollerImpl::new(query, None::<Unsupported>, initial, options)
}

/// Creates a new `impl Poller<O>` for an operation with a cancel endpoint.
///
/// In addition to the parameters of [new_poller], this takes:
/// * `cancel` - a closure that requests cancellation of the operation. It
///   receives the operation identifier as its only input parameter.
pub fn new_poller_with_cancel<O, Q, QF, C, CF>(
    query: Q,
    cancel: C,
    initial: O,
    options: PollerOptions,
) -> impl Poller<O>
where
    O: RemoteOperation + Send,
    Q: Fn(String) -> QF + Send + Sync,
    QF: Future<Output = Result<O>> + Send + 'static,
    C: Fn(String) -> CF + Send + Sync,
    CF: Future<Output = Result<()>> + Send + 'static,
{
    PollerImpl::new(query, Some(cancel), initial, options)
}

/// The cancel closure type for operations without a cancel endpoint.
type Unsupported = fn(String) -> std::future::Ready<Result<()>>;

/// An implementation of `Poller` based on closures.
///
/// Thanks to this implementation, the service-specific crates only need to
/// produce small closures wrapping their generated clients.
///
/// # Parameters
/// * `O` - the operation snapshot type returned by the service.
/// * `Q` - the query closure. Queries the status of the operation. It
///   receives the operation identifier as its only input parameter.
/// * `QF` - the type of future returned by `Q`.
/// * `C` - the cancel closure. Requests cancellation of the operation.
/// * `CF` - the type of future returned by `C`.
struct PollerImpl<O, Q, QF, C, CF>
where
    O: RemoteOperation + Send,
    Q: Fn(String) -> QF + Send + Sync,
    QF: Future<Output = Result<O>> + Send + 'static,
    C: Fn(String) -> CF + Send + Sync,
    CF: Future<Output = Result<()>> + Send + 'static,
{
    state: OperationState<O>,
    query: Q,
    cancel: Option<C>,
    options: PollerOptions,
}

impl<O, Q, QF, C, CF> PollerImpl<O, Q, QF, C, CF>
where
    O: RemoteOperation + Send,
    Q: Fn(String) -> QF + Send + Sync,
    QF: Future<Output = Result<O>> + Send + 'static,
    C: Fn(String) -> CF + Send + Sync,
    CF: Future<Output = Result<()>> + Send + 'static,
{
    pub fn new(query: Q, cancel: Option<C>, initial: O, options: PollerOptions) -> Self {
        Self {
            state: OperationState::new(initial),
            query,
            cancel,
            options,
        }
    }
}

impl<O, Q, QF, C, CF> sealed::Poller for PollerImpl<O, Q, QF, C, CF>
where
    O: RemoteOperation + Send,
    Q: Fn(String) -> QF + Send + Sync,
    QF: Future<Output = Result<O>> + Send + 'static,
    C: Fn(String) -> CF + Send + Sync,
    CF: Future<Output = Result<()>> + Send + 'static,
{
}

impl<O, Q, QF, C, CF> Poller<O> for PollerImpl<O, Q, QF, C, CF>
where
    O: RemoteOperation + Send,
    Q: Fn(String) -> QF + Send + Sync,
    QF: Future<Output = Result<O>> + Send + 'static,
    C: Fn(String) -> CF + Send + Sync,
    CF: Future<Output = Result<()>> + Send + 'static,
{
    async fn poll(&mut self) -> Option<Result<OperationStatus>> {
        if self.state.is_completed() {
            return None;
        }
        let id = self.state.result().id().to_string();
        match (self.query)(id).await {
            Ok(snapshot) => {
                self.state.apply(snapshot);
                Some(Ok(self.state.status()))
            }
            Err(e) => Some(Err(e)),
        }
    }

    async fn until_done(mut self) -> Result<O> {
        let mut first = true;
        while !self.state.is_completed() {
            if !(first && self.options.poll_on_start()) {
                tokio::time::sleep(self.options.interval()).await;
            }
            first = false;
            if let Some(step) = self.poll().await {
                step?;
            }
        }
        Ok(self.state.into_result())
    }

    async fn cancel(&mut self) -> Result<()> {
        match &self.cancel {
            None => Err(Error::unsupported("Cancel operation is not supported.")),
            Some(cancel) => {
                let id = self.state.result().id().to_string();
                cancel(id).await
            }
        }
    }

    fn state(&self) -> &OperationState<O> {
        &self.state
    }

    #[cfg(feature = "unstable-stream")]
    fn into_stream(self) -> impl futures::Stream<Item = Result<O>> + Unpin
    where
        O: Clone,
    {
        use futures::stream::unfold;
        Box::pin(unfold(Some(self), move |poller| async move {
            let mut poller = poller?;
            match poller.poll().await {
                Some(Ok(_)) => {
                    let snapshot = poller.state.result().clone();
                    let next = if poller.state.is_completed() {
                        None
                    } else {
                        Some(poller)
                    };
                    Some((Ok(snapshot), next))
                }
                Some(Err(e)) => Some((Err(e), Some(poller))),
                // Terminal before the first query: yield the snapshot once.
                None => Some((Ok(poller.state.result().clone()), None)),
            }
        }))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    struct TestOperation {
        id: String,
        status: OperationStatus,
        error: Option<RemoteError>,
    }

    impl TestOperation {
        fn new(status: OperationStatus) -> Self {
            Self {
                id: "op-001".into(),
                status,
                error: None,
            }
        }
    }

    impl RemoteOperation for TestOperation {
        fn id(&self) -> &str {
            &self.id
        }
        fn status(&self) -> OperationStatus {
            self.status
        }
        fn error(&self) -> Option<&RemoteError> {
            self.error.as_ref()
        }
    }

    // A query closure driving the operation through the given statuses, one
    // per call, repeating the last status if called again.
    fn scripted(
        statuses: &[OperationStatus],
        count: Arc<AtomicUsize>,
    ) -> impl Fn(String) -> std::future::Ready<Result<TestOperation>> + Send + Sync {
        let statuses = statuses.to_vec();
        move |id| {
            let call = count.fetch_add(1, Ordering::SeqCst);
            let status = statuses[call.min(statuses.len() - 1)];
            std::future::ready(Ok(TestOperation {
                id,
                status,
                error: None,
            }))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_success() -> anyhow::Result<()> {
        let count = Arc::new(AtomicUsize::new(0));
        let query = scripted(
            &[
                OperationStatus::Running,
                OperationStatus::Running,
                OperationStatus::Succeeded,
            ],
            count.clone(),
        );
        let initial = TestOperation::new(OperationStatus::Pending);
        let done = new_poller(query, initial, PollerOptions::default())
            .until_done()
            .await?;
        assert_eq!(done.status(), OperationStatus::Succeeded);
        assert_eq!(done.id(), "op-001");
        assert_eq!(count.load(Ordering::SeqCst), 3);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_already_terminal_makes_no_queries() -> anyhow::Result<()> {
        let query = |_: String| {
            std::future::ready(Err::<TestOperation, _>(Error::other(
                "the poller should not query a terminal operation",
            )))
        };
        let initial = TestOperation::new(OperationStatus::Succeeded);
        let done = new_poller(query, initial.clone(), PollerOptions::default())
            .until_done()
            .await?;
        assert_eq!(done, initial);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_failed_operation_is_not_an_error() -> anyhow::Result<()> {
        let payload = RemoteError::default()
            .set_code("InvalidInput")
            .set_message("the input asset could not be read");
        let result = payload.clone();
        let query = move |id: String| {
            let error = Some(payload.clone());
            std::future::ready(Ok(TestOperation {
                id,
                status: OperationStatus::Failed,
                error,
            }))
        };
        let initial = TestOperation::new(OperationStatus::Running);
        let done = new_poller(query, initial, PollerOptions::default())
            .until_done()
            .await?;
        assert_eq!(done.status(), OperationStatus::Failed);
        assert_eq!(done.error(), Some(&result));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_rejects_on_query_error() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let query = move |id: String| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(match call {
                0 => Ok(TestOperation {
                    id,
                    status: OperationStatus::Running,
                    error: None,
                }),
                _ => Err(Error::io("connection reset")),
            })
        };
        let initial = TestOperation::new(OperationStatus::Running);
        let got = new_poller(query, initial, PollerOptions::default())
            .until_done()
            .await;
        assert!(matches!(got, Err(ref e) if e.is_io()), "{got:?}");
        // The error stopped the loop.
        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_honors_interval() -> anyhow::Result<()> {
        let instants = Arc::new(Mutex::new(Vec::new()));
        let record = instants.clone();
        let calls = Arc::new(AtomicUsize::new(0));
        let count = calls.clone();
        let query = move |id: String| {
            record.lock().unwrap().push(tokio::time::Instant::now());
            let status = match count.fetch_add(1, Ordering::SeqCst) {
                0 | 1 => OperationStatus::Running,
                _ => OperationStatus::Succeeded,
            };
            std::future::ready(Ok(TestOperation {
                id,
                status,
                error: None,
            }))
        };
        let start = tokio::time::Instant::now();
        let options = PollerOptions::default().with_interval(Duration::from_secs(7));
        let initial = TestOperation::new(OperationStatus::Running);
        new_poller(query, initial, options).until_done().await?;
        let instants = instants.lock().unwrap();
        let offsets = instants.iter().map(|i| *i - start).collect::<Vec<_>>();
        assert_eq!(
            offsets,
            [
                Duration::from_secs(7),
                Duration::from_secs(14),
                Duration::from_secs(21)
            ]
        );
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_default_interval_is_ten_seconds() -> anyhow::Result<()> {
        let instants = Arc::new(Mutex::new(Vec::new()));
        let record = instants.clone();
        let query = move |id: String| {
            record.lock().unwrap().push(tokio::time::Instant::now());
            std::future::ready(Ok(TestOperation {
                id,
                status: OperationStatus::Succeeded,
                error: None,
            }))
        };
        let start = tokio::time::Instant::now();
        let initial = TestOperation::new(OperationStatus::Running);
        new_poller(query, initial, PollerOptions::default())
            .until_done()
            .await?;
        let instants = instants.lock().unwrap();
        assert_eq!(instants[0] - start, Duration::from_secs(10));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn until_done_poll_on_start_queries_immediately() -> anyhow::Result<()> {
        let instants = Arc::new(Mutex::new(Vec::new()));
        let record = instants.clone();
        let query = move |id: String| {
            record.lock().unwrap().push(tokio::time::Instant::now());
            std::future::ready(Ok(TestOperation {
                id,
                status: OperationStatus::Succeeded,
                error: None,
            }))
        };
        let start = tokio::time::Instant::now();
        let options = PollerOptions::default().with_poll_on_start(true);
        let initial = TestOperation::new(OperationStatus::Running);
        new_poller(query, initial, options).until_done().await?;
        let instants = instants.lock().unwrap();
        assert_eq!(instants[0] - start, Duration::ZERO);
        Ok(())
    }

    #[tokio::test]
    async fn poll_step_by_step() -> anyhow::Result<()> {
        let count = Arc::new(AtomicUsize::new(0));
        let query = scripted(
            &[OperationStatus::Running, OperationStatus::Succeeded],
            count.clone(),
        );
        let initial = TestOperation::new(OperationStatus::Pending);
        let mut poller = new_poller(query, initial, PollerOptions::default());
        assert!(!poller.state().is_completed());

        let got = poller.poll().await;
        assert!(
            matches!(got, Some(Ok(OperationStatus::Running))),
            "{got:?}"
        );
        assert!(!poller.state().is_completed());

        let got = poller.poll().await;
        assert!(
            matches!(got, Some(Ok(OperationStatus::Succeeded))),
            "{got:?}"
        );
        assert!(poller.state().is_completed());

        // Completed operations are not queried again.
        let got = poller.poll().await;
        assert!(got.is_none(), "{got:?}");
        assert_eq!(count.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn poll_error_leaves_state_untouched() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let query = move |id: String| {
            let call = counter.fetch_add(1, Ordering::SeqCst);
            std::future::ready(match call {
                0 => Err(Error::io("connection reset")),
                _ => Ok(TestOperation {
                    id,
                    status: OperationStatus::Succeeded,
                    error: None,
                }),
            })
        };
        let initial = TestOperation::new(OperationStatus::Running);
        let mut poller = new_poller(query, initial, PollerOptions::default());

        let got = poller.poll().await;
        assert!(matches!(got, Some(Err(ref e)) if e.is_io()), "{got:?}");
        assert_eq!(poller.state().status(), OperationStatus::Running);

        // The error did not poison the poller.
        let got = poller.poll().await;
        assert!(
            matches!(got, Some(Ok(OperationStatus::Succeeded))),
            "{got:?}"
        );
    }

    #[tokio::test]
    async fn cancel_unsupported() {
        let query = |id: String| {
            std::future::ready(Ok(TestOperation {
                id,
                status: OperationStatus::Running,
                error: None,
            }))
        };
        let initial = TestOperation::new(OperationStatus::Running);
        let mut poller = new_poller(query, initial, PollerOptions::default());
        let got = poller.cancel().await;
        assert!(matches!(got, Err(ref e) if e.is_unsupported()), "{got:?}");
        let message = got.unwrap_err().to_string();
        assert!(
            message.contains("Cancel operation is not supported."),
            "{message}"
        );
    }

    #[tokio::test]
    async fn cancel_supported() -> anyhow::Result<()> {
        let cancelled = Arc::new(Mutex::new(None::<String>));
        let requested = cancelled.clone();
        let query = |id: String| {
            std::future::ready(Ok(TestOperation {
                id,
                status: OperationStatus::Cancelled,
                error: None,
            }))
        };
        let cancel = move |id: String| {
            *requested.lock().unwrap() = Some(id);
            std::future::ready(Ok(()))
        };
        let initial = TestOperation::new(OperationStatus::Running);
        let mut poller = new_poller_with_cancel(query, cancel, initial, PollerOptions::default());
        poller.cancel().await?;
        assert_eq!(cancelled.lock().unwrap().as_deref(), Some("op-001"));

        // Cancellation is observed by polling.
        let got = poller.poll().await;
        assert!(
            matches!(got, Some(Ok(OperationStatus::Cancelled))),
            "{got:?}"
        );
        assert!(poller.state().is_cancelled());
        Ok(())
    }

    #[cfg(feature = "unstable-stream")]
    #[tokio::test]
    async fn stream_yields_each_snapshot() -> anyhow::Result<()> {
        use futures::StreamExt;
        let count = Arc::new(AtomicUsize::new(0));
        let query = scripted(
            &[OperationStatus::Running, OperationStatus::Succeeded],
            count.clone(),
        );
        let initial = TestOperation::new(OperationStatus::Pending);
        let mut stream = new_poller(query, initial, PollerOptions::default()).into_stream();

        let got = stream.next().await;
        assert!(
            matches!(got, Some(Ok(ref op)) if op.status() == OperationStatus::Running),
            "{got:?}"
        );
        let got = stream.next().await;
        assert!(
            matches!(got, Some(Ok(ref op)) if op.status() == OperationStatus::Succeeded),
            "{got:?}"
        );
        let got = stream.next().await;
        assert!(got.is_none(), "{got:?}");
        Ok(())
    }

    #[cfg(feature = "unstable-stream")]
    #[tokio::test]
    async fn stream_already_terminal() {
        use futures::StreamExt;
        let query = |_: String| {
            std::future::ready(Err::<TestOperation, _>(Error::other(
                "the stream should not query a terminal operation",
            )))
        };
        let initial = TestOperation::new(OperationStatus::Succeeded);
        let mut stream = new_poller(query, initial, PollerOptions::default()).into_stream();

        let got = stream.next().await;
        assert!(
            matches!(got, Some(Ok(ref op)) if op.status() == OperationStatus::Succeeded),
            "{got:?}"
        );
        let got = stream.next().await;
        assert!(got.is_none(), "{got:?}");
    }
}
