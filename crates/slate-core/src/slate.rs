// ── Slate data layer ──
//
// Entry point for consumers. Owns the API client and the query cache,
// runs the command processor (serialized mutations with invalidation
// before reply) and the periodic cache GC.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use uuid::Uuid;

use slate_api::{ApiClient, TokenProvider};

use crate::cache::{InvalidationSink, QueryCache};
use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::SlateConfig;
use crate::error::CoreError;
use crate::mutation::Mutation;

const COMMAND_CHANNEL_SIZE: usize = 64;

/// Background machinery present between `start` and `shutdown`.
struct Running {
    command_tx: mpsc::Sender<CommandEnvelope>,
    cancel: CancellationToken,
    handles: Vec<JoinHandle<()>>,
}

/// The data layer for one backend.
///
/// Cheaply cloneable via `Arc<SlateInner>`. Queries work as soon as it
/// is built; mutations need [`start()`](Self::start).
#[derive(Clone)]
pub struct Slate {
    inner: Arc<SlateInner>,
}

struct SlateInner {
    config: SlateConfig,
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    running: Mutex<Option<Running>>,
}

impl Slate {
    /// Build the HTTP client and an empty cache. Does NOT start
    /// background tasks.
    pub fn new(config: SlateConfig, tokens: Arc<dyn TokenProvider>) -> Result<Self, CoreError> {
        let api = ApiClient::new(config.api_url.as_str(), tokens, &config.transport())?;
        Ok(Self::with_api(config, api))
    }

    /// Use an already-built API client.
    pub fn with_api(config: SlateConfig, api: ApiClient) -> Self {
        let cache = Arc::new(QueryCache::new(config.cache.clone()));
        Self {
            inner: Arc::new(SlateInner {
                config,
                api: Arc::new(api),
                cache,
                running: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> &SlateConfig {
        &self.inner.config
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.inner.api
    }

    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.inner.cache
    }

    /// Default organization from configuration, if any.
    pub fn organization_id(&self) -> Option<Uuid> {
        self.inner.config.organization_id
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Spawn the command processor and the cache GC. Idempotent.
    pub async fn start(&self) {
        let mut running = self.inner.running.lock().await;
        if running.is_some() {
            return;
        }

        let cancel = CancellationToken::new();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);
        let mut handles = Vec::new();

        handles.push(tokio::spawn(command_processor_task(
            Arc::clone(&self.inner.api),
            Arc::clone(&self.inner.cache),
            command_rx,
            cancel.clone(),
        )));

        let gc_interval = self.inner.config.cache.gc_interval;
        if !gc_interval.is_zero() {
            handles.push(tokio::spawn(gc_task(
                Arc::clone(&self.inner.cache),
                gc_interval,
                cancel.clone(),
            )));
        }

        *running = Some(Running {
            command_tx,
            cancel,
            handles,
        });
        info!("data layer started");
    }

    /// Stop background tasks. Mutations fail with
    /// [`CoreError::Disconnected`] until started again; cached data stays.
    pub async fn shutdown(&self) {
        let Some(running) = self.inner.running.lock().await.take() else {
            return;
        };
        running.cancel.cancel();
        drop(running.command_tx);
        for handle in running.handles {
            let _ = handle.await;
        }
        debug!("data layer stopped");
    }

    pub async fn is_running(&self) -> bool {
        self.inner.running.lock().await.is_some()
    }

    // ── Command execution ────────────────────────────────────────────

    /// Execute a command through the command processor.
    ///
    /// On success every key the command affects has been invalidated
    /// before this returns. On failure the cache is untouched.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        let command_tx = self
            .inner
            .running
            .lock()
            .await
            .as_ref()
            .map(|r| r.command_tx.clone())
            .ok_or(CoreError::Disconnected)?;

        let (tx, rx) = tokio::sync::oneshot::channel();

        command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    /// A mutation handle with its own pending flag.
    pub fn mutation(&self) -> Mutation {
        Mutation::new(self.clone())
    }

    // ── One-shot convenience ─────────────────────────────────────────

    /// Build, start, run the closure, shut down.
    pub async fn oneshot<F, Fut, T>(
        config: SlateConfig,
        tokens: Arc<dyn TokenProvider>,
        f: F,
    ) -> Result<T, CoreError>
    where
        F: FnOnce(Slate) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let slate = Slate::new(config, tokens)?;
        slate.start().await;
        let result = f(slate.clone()).await;
        slate.shutdown().await;
        result
    }
}

// ── Background tasks ─────────────────────────────────────────────────

/// Evict unobserved cache entries on a fixed interval.
async fn gc_task(cache: Arc<QueryCache>, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await; // consume the immediate first tick

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let evicted = cache.collect_garbage();
                if evicted > 0 {
                    debug!(evicted, remaining = cache.len(), "cache gc");
                }
            }
        }
    }
}

/// Process commands one at a time, in arrival order.
async fn command_processor_task(
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    mut rx: mpsc::Receiver<CommandEnvelope>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let result = route_command(&api, cache.as_ref(), envelope.command).await;
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────────

/// Send one command and apply its invalidations.
async fn route_command(
    api: &ApiClient,
    sink: &dyn InvalidationSink,
    cmd: Command,
) -> Result<CommandResult, CoreError> {
    let descriptor = cmd.descriptor()?;
    debug!(
        command = cmd.name(),
        method = %descriptor.method,
        endpoint = %descriptor.endpoint,
        "executing command"
    );

    let body = api
        .send_json(
            descriptor.method.clone(),
            &descriptor.endpoint,
            descriptor.payload.as_ref(),
        )
        .await?;

    // The backend has applied the change; whatever the body holds, the
    // affected entries are now out of date.
    let touched = sink.invalidate_keys(&descriptor.affected);
    debug!(command = cmd.name(), touched, "invalidated affected queries");

    let result = cmd.decode(body)?;
    if let Some((key, data)) = result.detail_seed() {
        sink.seed(key, data);
    }
    Ok(result)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex as StdMutex;

    use secrecy::SecretString;
    use serde_json::json;
    use slate_api::StaticToken;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::cache::QueryData;
    use crate::key::ResourceKey;

    #[derive(Default)]
    struct RecordingSink {
        invalidated: StdMutex<Vec<ResourceKey>>,
        seeded: StdMutex<Vec<ResourceKey>>,
    }

    impl InvalidationSink for RecordingSink {
        fn invalidate_keys(&self, targets: &[ResourceKey]) -> usize {
            self.invalidated.lock().unwrap().extend_from_slice(targets);
            targets.len()
        }

        fn seed(&self, key: ResourceKey, _data: QueryData) {
            self.seeded.lock().unwrap().push(key);
        }
    }

    fn api(server: &MockServer) -> ApiClient {
        let token = Arc::new(StaticToken::new(SecretString::from("t".to_string())));
        ApiClient::new(&server.uri(), token, &slate_api::TransportConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn failed_command_leaves_sink_untouched() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("DELETE"))
            .and(path(format!("/invoices/{id}")))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let sink = RecordingSink::default();
        let err = route_command(&api(&server), &sink, Command::DeleteInvoice { id })
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert!(sink.invalidated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_invalidates_then_seeds_detail() {
        let server = MockServer::start().await;
        let id = Uuid::new_v4();
        Mock::given(method("PATCH"))
            .and(path(format!("/projects/{id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": id,
                "organization_id": Uuid::new_v4(),
                "name": "Night Shift",
                "status": "production"
            })))
            .mount(&server)
            .await;

        let sink = RecordingSink::default();
        let result = route_command(
            &api(&server),
            &sink,
            Command::UpdateProject {
                id,
                update: slate_api::UpdateProjectRequest {
                    name: Some("Night Shift".into()),
                    ..Default::default()
                },
            },
        )
        .await
        .unwrap();

        assert!(matches!(result, CommandResult::Project(ref p) if p.name == "Night Shift"));
        assert_eq!(
            *sink.invalidated.lock().unwrap(),
            vec![ResourceKey::new(crate::resources::PROJECTS)]
        );
        assert_eq!(
            *sink.seeded.lock().unwrap(),
            vec![crate::resources::detail(crate::resources::PROJECTS, id)]
        );
    }

    #[tokio::test]
    async fn execute_requires_start() {
        let server = MockServer::start().await;
        let config = SlateConfig::new(server.uri().parse().unwrap());
        let slate = Slate::with_api(config, api(&server));

        let err = slate
            .execute(Command::RevokeInvite { id: Uuid::new_v4() })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Disconnected));

        slate.start().await;
        assert!(slate.is_running().await);
        slate.shutdown().await;
        assert!(!slate.is_running().await);
    }
}
