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

use crate::Result;
use crate::model::{Conversion, SessionProperties};
use lro::{Poller, PollerOptions};
use std::future::Future;
use std::sync::Arc;

/// The remote calls the Remote Rendering pollers depend on.
///
/// The service clients implement this trait. It is also the seam used to test
/// the pollers without a network.
pub trait RemoteRenderingOperations: Send + Sync + 'static {
    /// Fetches the current snapshot of an asset conversion.
    fn get_conversion(
        &self,
        account_id: &str,
        conversion_id: &str,
    ) -> impl Future<Output = Result<Conversion>> + Send;

    /// Fetches the current snapshot of a rendering session.
    fn get_session(
        &self,
        account_id: &str,
        session_id: &str,
    ) -> impl Future<Output = Result<SessionProperties>> + Send;

    /// Requests that a rendering session be stopped.
    fn stop_session(
        &self,
        account_id: &str,
        session_id: &str,
    ) -> impl Future<Output = Result<()>> + Send;
}

/// Creates a poller for an asset conversion.
///
/// Asset conversions have no server-side cancel endpoint, so the returned
/// poller rejects [cancel][lro::Poller::cancel] without contacting the
/// service.
///
/// # Parameters
/// * `client` - the client used to query the conversion.
/// * `account_id` - the Remote Rendering account the conversion belongs to.
/// * `initial` - the snapshot returned when the conversion was started or
///   looked up.
pub fn new_conversion_poller<C>(
    client: Arc<C>,
    account_id: impl Into<String>,
    initial: Conversion,
    options: PollerOptions,
) -> impl Poller<Conversion>
where
    C: RemoteRenderingOperations,
{
    let account_id = account_id.into();
    let query = move |id: String| {
        let client = client.clone();
        let account_id = account_id.clone();
        async move {
            tracing::debug!(%account_id, conversion_id = %id, "querying asset conversion");
            client.get_conversion(&account_id, &id).await
        }
    };
    lro::new_poller(query, initial, options)
}

/// Creates a poller for a rendering session.
///
/// A session is "done" when it leaves the `Starting` state: ready, stopped,
/// expired, and failed sessions all complete the poller. The returned
/// poller maps [cancel][lro::Poller::cancel] to the service's stop-session
/// call; a stopped session then reports itself as cancelled.
///
/// # Parameters
/// * `client` - the client used to query and stop the session.
/// * `account_id` - the Remote Rendering account the session belongs to.
/// * `initial` - the snapshot returned when the session was started or
///   looked up.
pub fn new_session_poller<C>(
    client: Arc<C>,
    account_id: impl Into<String>,
    initial: SessionProperties,
    options: PollerOptions,
) -> impl Poller<SessionProperties>
where
    C: RemoteRenderingOperations,
{
    let account_id = account_id.into();
    let query = {
        let client = client.clone();
        let account_id = account_id.clone();
        move |id: String| {
            let client = client.clone();
            let account_id = account_id.clone();
            async move {
                tracing::debug!(%account_id, session_id = %id, "querying rendering session");
                client.get_session(&account_id, &id).await
            }
        }
    };
    let cancel = move |id: String| {
        let client = client.clone();
        let account_id = account_id.clone();
        async move {
            tracing::debug!(%account_id, session_id = %id, "stopping rendering session");
            client.stop_session(&account_id, &id).await
        }
    };
    lro::new_poller_with_cancel(query, cancel, initial, options)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::model::{ConversionOutput, ConversionStatus, SessionStatus};
    use gax::error::Error;
    use lro::OperationStatus;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeOperations {
        conversions: Mutex<VecDeque<Conversion>>,
        sessions: Mutex<VecDeque<SessionProperties>>,
        stopped: Mutex<Vec<String>>,
    }

    impl FakeOperations {
        fn with_conversions<I: IntoIterator<Item = Conversion>>(v: I) -> Arc<Self> {
            Arc::new(Self {
                conversions: Mutex::new(v.into_iter().collect()),
                ..Self::default()
            })
        }

        fn with_sessions<I: IntoIterator<Item = SessionProperties>>(v: I) -> Arc<Self> {
            Arc::new(Self {
                sessions: Mutex::new(v.into_iter().collect()),
                ..Self::default()
            })
        }
    }

    impl RemoteRenderingOperations for FakeOperations {
        async fn get_conversion(
            &self,
            _account_id: &str,
            _conversion_id: &str,
        ) -> Result<Conversion> {
            self.conversions
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::other("no scripted conversion response"))
        }

        async fn get_session(
            &self,
            _account_id: &str,
            _session_id: &str,
        ) -> Result<SessionProperties> {
            self.sessions
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| Error::other("no scripted session response"))
        }

        async fn stop_session(&self, _account_id: &str, session_id: &str) -> Result<()> {
            self.stopped.lock().unwrap().push(session_id.to_string());
            Ok(())
        }
    }

    fn conversion(status: ConversionStatus) -> Conversion {
        Conversion::default().set_id("conv-42").set_status(status)
    }

    fn session(status: SessionStatus) -> SessionProperties {
        SessionProperties::default()
            .set_id("sess-7")
            .set_size("Standard")
            .set_status(status)
    }

    #[tokio::test(start_paused = true)]
    async fn conversion_poller_until_done() -> anyhow::Result<()> {
        let client = FakeOperations::with_conversions([
            conversion(ConversionStatus::Running),
            conversion(ConversionStatus::Succeeded)
                .set_output(ConversionOutput::default().set_output_asset_uri("container/out.bin")),
        ]);
        let initial = conversion(ConversionStatus::NotStarted);
        let done = new_conversion_poller(client, "account-1", initial, PollerOptions::default())
            .until_done()
            .await?;
        assert_eq!(done.status, ConversionStatus::Succeeded);
        assert_eq!(
            done.output.and_then(|o| o.output_asset_uri).as_deref(),
            Some("container/out.bin")
        );
        Ok(())
    }

    #[tokio::test]
    async fn conversion_poller_step_by_step() -> anyhow::Result<()> {
        let client = FakeOperations::with_conversions([
            conversion(ConversionStatus::Running),
            conversion(ConversionStatus::Succeeded),
        ]);
        let initial = conversion(ConversionStatus::NotStarted);
        let mut poller =
            new_conversion_poller(client, "account-1", initial, PollerOptions::default());
        assert!(!poller.state().is_completed());

        let got = poller.poll().await;
        assert!(matches!(got, Some(Ok(OperationStatus::Running))), "{got:?}");
        assert!(!poller.state().is_completed());
        assert!(!poller.state().is_cancelled());

        let got = poller.poll().await;
        assert!(
            matches!(got, Some(Ok(OperationStatus::Succeeded))),
            "{got:?}"
        );
        assert!(poller.state().is_completed());
        assert!(!poller.state().is_cancelled());
        Ok(())
    }

    #[tokio::test]
    async fn conversion_poller_rejects_cancel() {
        let client = FakeOperations::with_conversions([]);
        let initial = conversion(ConversionStatus::Running);
        let mut poller =
            new_conversion_poller(client, "account-1", initial, PollerOptions::default());
        let got = poller.cancel().await;
        assert!(matches!(got, Err(ref e) if e.is_unsupported()), "{got:?}");
        let message = got.unwrap_err().to_string();
        assert!(
            message.contains("Cancel operation is not supported."),
            "{message}"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn conversion_poller_failed_conversion_resolves() -> anyhow::Result<()> {
        let payload = gax::error::remote::RemoteError::default()
            .set_code("InvalidInput")
            .set_message("could not read the asset");
        let client = FakeOperations::with_conversions([
            conversion(ConversionStatus::Failed).set_error(payload.clone())
        ]);
        let initial = conversion(ConversionStatus::Running);
        let done = new_conversion_poller(client, "account-1", initial, PollerOptions::default())
            .until_done()
            .await?;
        assert_eq!(done.status, ConversionStatus::Failed);
        assert_eq!(done.error, Some(payload));
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn session_poller_until_ready() -> anyhow::Result<()> {
        let client = FakeOperations::with_sessions([
            session(SessionStatus::Starting),
            session(SessionStatus::Ready)
                .set_hostname("sess-7.example.com")
                .set_handshake_port(50001),
        ]);
        let initial = session(SessionStatus::Starting);
        let done = new_session_poller(client, "account-1", initial, PollerOptions::default())
            .until_done()
            .await?;
        assert_eq!(done.status, SessionStatus::Ready);
        assert_eq!(done.hostname.as_deref(), Some("sess-7.example.com"));
        assert_eq!(done.handshake_port, Some(50001));
        Ok(())
    }

    #[tokio::test]
    async fn session_poller_cancel_stops_the_session() -> anyhow::Result<()> {
        let client = FakeOperations::with_sessions([session(SessionStatus::Stopped)]);
        let stopped = client.clone();
        let initial = session(SessionStatus::Starting);
        let mut poller =
            new_session_poller(client, "account-1", initial, PollerOptions::default());

        poller.cancel().await?;
        assert_eq!(
            stopped.stopped.lock().unwrap().as_slice(),
            ["sess-7".to_string()]
        );

        // The stop is observed by the next poll, not locally.
        assert!(!poller.state().is_completed());
        let got = poller.poll().await;
        assert!(
            matches!(got, Some(Ok(OperationStatus::Cancelled))),
            "{got:?}"
        );
        assert!(poller.state().is_completed());
        assert!(poller.state().is_cancelled());
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn session_poller_expired_session_fails_without_payload() -> anyhow::Result<()> {
        let client = FakeOperations::with_sessions([session(SessionStatus::Expired)]);
        let initial = session(SessionStatus::Starting);
        let mut poller =
            new_session_poller(client, "account-1", initial, PollerOptions::default());
        let got = poller.poll().await;
        assert!(matches!(got, Some(Ok(OperationStatus::Failed))), "{got:?}");
        assert!(poller.state().is_completed());
        assert!(!poller.state().is_cancelled());
        assert_eq!(poller.state().error(), None);
        Ok(())
    }
}
