//! Store actor: auth probe, page loads with request correlation, and the
//! de-duplication that makes load dispatches idempotent.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::api::{ApiError, MailGateway};
use crate::constants::{AUTH_RETRY_DELAY_MS, MAX_AUTH_RETRIES, MAX_RETRY_DELAY_SECS};
use crate::model::{AuthState, ThreadId, ThreadPage};

use super::{StoreCommand, StoreEvent, StoreHandle};

/// Spawn the store actor and return the handle the app keeps.
pub fn spawn_store_actor<G: MailGateway>(gateway: G) -> StoreHandle {
    let (cmd_tx, cmd_rx) = mpsc::channel(128);
    let (event_tx, event_rx) = mpsc::channel(256);

    tokio::spawn(store_actor(gateway, cmd_rx, event_tx));

    StoreHandle { cmd_tx, event_rx }
}

/// Result of one spawned page load, tagged for correlation.
struct LoadOutcome {
    seq: u64,
    query: String,
    page_size: u32,
    result: Result<ThreadPage, ApiError>,
}

struct StoreActor<G> {
    gateway: G,
    event_tx: mpsc::Sender<StoreEvent>,
    result_tx: mpsc::Sender<LoadOutcome>,
    /// Sequence number handed to the most recently issued load. A completion
    /// carrying an older number lost the race and is discarded: the latest
    /// dispatched params are authoritative.
    newest_issued: u64,
    next_seq: u64,
    in_flight: Option<(String, u32)>,
    last_completed: Option<(String, u32)>,
    /// Threads already marked read since the last page arrived. Fresh pages
    /// clear this so server-side unread state can be acted on again.
    marked_read: HashSet<ThreadId>,
}

async fn store_actor<G: MailGateway>(
    gateway: G,
    mut cmd_rx: mpsc::Receiver<StoreCommand>,
    event_tx: mpsc::Sender<StoreEvent>,
) {
    let (result_tx, mut result_rx) = mpsc::channel(8);
    let mut actor = StoreActor {
        gateway,
        event_tx,
        result_tx,
        newest_issued: 0,
        next_seq: 0,
        in_flight: None,
        last_completed: None,
        marked_read: HashSet::new(),
    };

    // Commands dispatched in the meantime queue up in the channel.
    actor.probe_auth().await;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(StoreCommand::LoadThreads { query, page_size }) => {
                    actor.start_load(query, page_size, false).await;
                }
                Some(StoreCommand::Refresh { query, page_size }) => {
                    actor.start_load(query, page_size, true).await;
                }
                Some(StoreCommand::MarkAsRead(thread_id)) => {
                    actor.mark_read(thread_id).await;
                }
                Some(StoreCommand::LoadLabels) => {
                    actor.load_labels().await;
                }
                Some(StoreCommand::FetchBody(message_id)) => {
                    actor.fetch_body(message_id).await;
                }
                Some(StoreCommand::Shutdown) => {
                    tracing::info!("Store actor shutting down");
                    break;
                }
                None => {
                    tracing::info!("Command channel closed, shutting down");
                    break;
                }
            },
            Some(outcome) = result_rx.recv() => {
                actor.finish_load(outcome).await;
            }
        }
    }
}

impl<G: MailGateway> StoreActor<G> {
    async fn emit(&self, event: StoreEvent) {
        if let Err(e) = self.event_tx.send(event).await {
            tracing::debug!("Failed to send store event: {}", e);
        }
    }

    /// Verify the token against the profile endpoint before serving
    /// commands. Transient failures are retried with backoff; a rejected
    /// token is final.
    async fn probe_auth(&self) {
        let mut retry_delay_ms = AUTH_RETRY_DELAY_MS;

        for attempt in 1..=MAX_AUTH_RETRIES {
            match self.gateway.fetch_profile().await {
                Ok(profile) => {
                    tracing::info!("Authorized as {}", profile.email_address);
                    self.emit(StoreEvent::AuthStateChanged(AuthState::Authorized))
                        .await;
                    return;
                }
                Err(ApiError::Unauthorized) => {
                    tracing::warn!("API token rejected by the server");
                    self.emit(StoreEvent::AuthStateChanged(AuthState::Unauthorized))
                        .await;
                    return;
                }
                Err(e) => {
                    tracing::warn!(
                        "Auth probe attempt {}/{} failed: {}",
                        attempt,
                        MAX_AUTH_RETRIES,
                        e
                    );
                    if attempt == MAX_AUTH_RETRIES {
                        self.emit(StoreEvent::AuthStateChanged(AuthState::Unauthorized))
                            .await;
                        self.emit(StoreEvent::Error(format!(
                            "Could not reach the mail service: {}",
                            e
                        )))
                        .await;
                        return;
                    }
                    tokio::time::sleep(Duration::from_millis(retry_delay_ms)).await;
                    retry_delay_ms = (retry_delay_ms * 2).min(MAX_RETRY_DELAY_SECS * 1000);
                }
            }
        }
    }

    /// Issue a page load unless the same params already completed or are in
    /// flight. `force` forgets the completed params first (refresh).
    async fn start_load(&mut self, query: String, page_size: u32, force: bool) {
        let key = (query.clone(), page_size);
        if force {
            self.last_completed = None;
        } else if self.in_flight.as_ref() == Some(&key)
            || self.last_completed.as_ref() == Some(&key)
        {
            tracing::trace!(
                "Dropping duplicate load for query {:?} page_size {}",
                query,
                page_size
            );
            return;
        }

        self.next_seq += 1;
        self.newest_issued = self.next_seq;
        self.in_flight = Some(key);
        self.emit(StoreEvent::LoadStarted {
            query: query.clone(),
            page_size,
        })
        .await;

        let gateway = self.gateway.clone();
        let result_tx = self.result_tx.clone();
        let seq = self.next_seq;
        tokio::spawn(async move {
            let result = gateway.list_threads(&query, page_size).await;
            let outcome = LoadOutcome {
                seq,
                query,
                page_size,
                result,
            };
            if result_tx.send(outcome).await.is_err() {
                tracing::debug!("Store actor gone before load completed");
            }
        });
    }

    async fn finish_load(&mut self, outcome: LoadOutcome) {
        if outcome.seq != self.newest_issued {
            tracing::trace!(
                "Discarding stale result for query {:?} page_size {}",
                outcome.query,
                outcome.page_size
            );
            return;
        }
        self.in_flight = None;

        match outcome.result {
            Ok(page) => {
                tracing::debug!(
                    "Loaded {} threads for query {:?} (has_more={})",
                    page.threads.len(),
                    outcome.query,
                    page.has_more
                );
                self.last_completed = Some((outcome.query.clone(), outcome.page_size));
                self.marked_read.clear();
                self.emit(StoreEvent::ThreadsLoaded {
                    query: outcome.query,
                    threads: page.threads,
                    has_more: page.has_more,
                })
                .await;
            }
            Err(e) => {
                tracing::warn!("Load failed for query {:?}: {}", outcome.query, e);
                // Forget the failed params so revisiting them retries.
                if self.last_completed.as_ref()
                    == Some(&(outcome.query.clone(), outcome.page_size))
                {
                    self.last_completed = None;
                }
                self.emit(StoreEvent::LoadFailed(format!(
                    "Failed to load threads: {}",
                    e
                )))
                .await;
            }
        }
    }

    async fn mark_read(&mut self, thread_id: ThreadId) {
        if self.marked_read.contains(&thread_id) {
            tracing::trace!("Thread {} already marked read, skipping", thread_id);
            return;
        }
        match self.gateway.mark_thread_read(&thread_id).await {
            Ok(()) => {
                self.marked_read.insert(thread_id.clone());
                self.emit(StoreEvent::ThreadMarkedRead(thread_id)).await;
            }
            Err(e) => {
                tracing::warn!("Failed to mark thread {} read: {}", thread_id, e);
                self.emit(StoreEvent::Error(format!(
                    "Failed to mark thread read: {}",
                    e
                )))
                .await;
            }
        }
    }

    async fn load_labels(&mut self) {
        match self.gateway.list_labels().await {
            Ok(labels) => {
                tracing::debug!("Loaded {} labels", labels.len());
                self.emit(StoreEvent::LabelsLoaded(labels)).await;
            }
            Err(e) => {
                tracing::warn!("Failed to load labels: {}", e);
                self.emit(StoreEvent::Error(format!("Failed to load labels: {}", e)))
                    .await;
            }
        }
    }

    async fn fetch_body(&mut self, message_id: String) {
        match self.gateway.fetch_body(&message_id).await {
            Ok(body) => {
                self.emit(StoreEvent::BodyLoaded { message_id, body }).await;
            }
            Err(e) => {
                tracing::warn!("Failed to fetch body for message {}: {}", message_id, e);
                self.emit(StoreEvent::Error(format!(
                    "Failed to load message: {}",
                    e
                )))
                .await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Profile;
    use crate::model::{Label, Message, MessageBody, MessageFlags, Thread};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeState {
        list_calls: Vec<(String, u32)>,
        mark_calls: Vec<String>,
        fail_loads: bool,
        reject_auth: bool,
        load_delays_ms: HashMap<String, u64>,
    }

    #[derive(Clone, Default)]
    struct FakeGateway {
        state: Arc<Mutex<FakeState>>,
    }

    impl FakeGateway {
        fn list_calls(&self) -> Vec<(String, u32)> {
            self.state.lock().unwrap().list_calls.clone()
        }

        fn mark_calls(&self) -> Vec<String> {
            self.state.lock().unwrap().mark_calls.clone()
        }

        fn set_fail_loads(&self, fail: bool) {
            self.state.lock().unwrap().fail_loads = fail;
        }

        fn set_reject_auth(&self) {
            self.state.lock().unwrap().reject_auth = true;
        }

        fn set_delay(&self, query: &str, ms: u64) {
            self.state
                .lock()
                .unwrap()
                .load_delays_ms
                .insert(query.to_string(), ms);
        }
    }

    fn fake_thread(id: &str) -> Thread {
        Thread {
            id: id.to_string(),
            messages: vec![Message {
                id: format!("{}-m1", id),
                thread_id: id.to_string(),
                subject: "subject".to_string(),
                from: "from@example.com".to_string(),
                snippet: String::new(),
                date: 1,
                flags: MessageFlags::UNREAD,
            }],
        }
    }

    impl MailGateway for FakeGateway {
        async fn fetch_profile(&self) -> Result<Profile, ApiError> {
            if self.state.lock().unwrap().reject_auth {
                return Err(ApiError::Unauthorized);
            }
            Ok(Profile {
                email_address: "fake@example.com".to_string(),
            })
        }

        async fn list_threads(&self, query: &str, max_results: u32) -> Result<ThreadPage, ApiError> {
            let delay = {
                let mut state = self.state.lock().unwrap();
                state.list_calls.push((query.to_string(), max_results));
                state.load_delays_ms.get(query).copied().unwrap_or(0)
            };
            if delay > 0 {
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }
            if self.state.lock().unwrap().fail_loads {
                return Err(ApiError::Decode("boom".to_string()));
            }
            Ok(ThreadPage {
                threads: vec![fake_thread("t1")],
                has_more: true,
            })
        }

        async fn mark_thread_read(&self, thread_id: &str) -> Result<(), ApiError> {
            self.state
                .lock()
                .unwrap()
                .mark_calls
                .push(thread_id.to_string());
            Ok(())
        }

        async fn list_labels(&self) -> Result<Vec<Label>, ApiError> {
            Ok(vec![Label {
                name: "Inbox".to_string(),
                unread_threads: 3,
            }])
        }

        async fn fetch_body(&self, _message_id: &str) -> Result<MessageBody, ApiError> {
            Ok(MessageBody {
                text: Some("body".to_string()),
                html: None,
            })
        }
    }

    async fn recv_event(handle: &mut StoreHandle) -> StoreEvent {
        tokio::time::timeout(Duration::from_secs(1), handle.event_rx.recv())
            .await
            .expect("timed out waiting for store event")
            .expect("event channel closed")
    }

    async fn assert_no_event(handle: &mut StoreHandle) {
        let result = tokio::time::timeout(Duration::from_millis(200), handle.event_rx.recv()).await;
        assert!(result.is_err(), "unexpected event: {:?}", result);
    }

    async fn spawn_authorized(gateway: FakeGateway) -> StoreHandle {
        let mut handle = spawn_store_actor(gateway);
        assert_eq!(
            recv_event(&mut handle).await,
            StoreEvent::AuthStateChanged(AuthState::Authorized)
        );
        handle
    }

    fn load_cmd(query: &str, page_size: u32) -> StoreCommand {
        StoreCommand::LoadThreads {
            query: query.to_string(),
            page_size,
        }
    }

    #[tokio::test]
    async fn test_rejected_token_reports_unauthorized() {
        let gateway = FakeGateway::default();
        gateway.set_reject_auth();

        let mut handle = spawn_store_actor(gateway);
        assert_eq!(
            recv_event(&mut handle).await,
            StoreEvent::AuthStateChanged(AuthState::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_duplicate_load_params_are_dropped() {
        let gateway = FakeGateway::default();
        let mut handle = spawn_authorized(gateway.clone()).await;

        handle.cmd_tx.send(load_cmd("", 20)).await.unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));

        // Same params again: dropped without any event.
        handle.cmd_tx.send(load_cmd("", 20)).await.unwrap();
        assert_no_event(&mut handle).await;

        // Changed params go through.
        handle.cmd_tx.send(load_cmd("", 40)).await.unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { page_size: 40, .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));

        assert_eq!(
            gateway.list_calls(),
            vec![(String::new(), 20), (String::new(), 40)]
        );
    }

    #[tokio::test]
    async fn test_in_flight_load_suppresses_duplicates() {
        let gateway = FakeGateway::default();
        gateway.set_delay("inbox", 50);
        let mut handle = spawn_authorized(gateway.clone()).await;

        handle.cmd_tx.send(load_cmd("inbox", 20)).await.unwrap();
        handle.cmd_tx.send(load_cmd("inbox", 20)).await.unwrap();

        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));
        assert_no_event(&mut handle).await;

        assert_eq!(gateway.list_calls(), vec![("inbox".to_string(), 20)]);
    }

    #[tokio::test]
    async fn test_refresh_reloads_completed_params() {
        let gateway = FakeGateway::default();
        let mut handle = spawn_authorized(gateway.clone()).await;

        handle.cmd_tx.send(load_cmd("", 20)).await.unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));

        handle
            .cmd_tx
            .send(StoreCommand::Refresh {
                query: String::new(),
                page_size: 20,
            })
            .await
            .unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));

        assert_eq!(gateway.list_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_load_can_be_retried() {
        let gateway = FakeGateway::default();
        gateway.set_fail_loads(true);
        let mut handle = spawn_authorized(gateway.clone()).await;

        handle.cmd_tx.send(load_cmd("inbox", 20)).await.unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadFailed(_)
        ));

        // The failure cleared the de-dup memory; the same params load again.
        gateway.set_fail_loads(false);
        handle.cmd_tx.send(load_cmd("inbox", 20)).await.unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));

        assert_eq!(gateway.list_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_stale_completion_is_discarded() {
        let gateway = FakeGateway::default();
        gateway.set_delay("slow", 100);
        let mut handle = spawn_authorized(gateway.clone()).await;

        handle.cmd_tx.send(load_cmd("slow", 20)).await.unwrap();
        handle.cmd_tx.send(load_cmd("fast", 20)).await.unwrap();

        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));

        // Only the newest load surfaces; the slow one finishes later and
        // is dropped.
        match recv_event(&mut handle).await {
            StoreEvent::ThreadsLoaded { query, .. } => assert_eq!(query, "fast"),
            other => panic!("unexpected event: {:?}", other),
        }
        assert_no_event(&mut handle).await;
    }

    #[tokio::test]
    async fn test_mark_as_read_is_idempotent_until_reload() {
        let gateway = FakeGateway::default();
        let mut handle = spawn_authorized(gateway.clone()).await;

        handle
            .cmd_tx
            .send(StoreCommand::MarkAsRead("t1".to_string()))
            .await
            .unwrap();
        assert_eq!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadMarkedRead("t1".to_string())
        );

        // Repeat selection of the same thread is a no-op.
        handle
            .cmd_tx
            .send(StoreCommand::MarkAsRead("t1".to_string()))
            .await
            .unwrap();
        assert_no_event(&mut handle).await;
        assert_eq!(gateway.mark_calls(), vec!["t1".to_string()]);

        // A fresh page resets the memory.
        handle.cmd_tx.send(load_cmd("", 20)).await.unwrap();
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::LoadStarted { .. }
        ));
        assert!(matches!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadsLoaded { .. }
        ));

        handle
            .cmd_tx
            .send(StoreCommand::MarkAsRead("t1".to_string()))
            .await
            .unwrap();
        assert_eq!(
            recv_event(&mut handle).await,
            StoreEvent::ThreadMarkedRead("t1".to_string())
        );
        assert_eq!(gateway.mark_calls().len(), 2);
    }

    #[tokio::test]
    async fn test_labels_and_body_round_trip() {
        let gateway = FakeGateway::default();
        let mut handle = spawn_authorized(gateway).await;

        handle.cmd_tx.send(StoreCommand::LoadLabels).await.unwrap();
        match recv_event(&mut handle).await {
            StoreEvent::LabelsLoaded(labels) => {
                assert_eq!(labels.len(), 1);
                assert_eq!(labels[0].name, "Inbox");
            }
            other => panic!("unexpected event: {:?}", other),
        }

        handle
            .cmd_tx
            .send(StoreCommand::FetchBody("m1".to_string()))
            .await
            .unwrap();
        match recv_event(&mut handle).await {
            StoreEvent::BodyLoaded { message_id, body } => {
                assert_eq!(message_id, "m1");
                assert_eq!(body.text.as_deref(), Some("body"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
