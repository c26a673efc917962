use async_trait::async_trait;
use diagnostics::{log_debug, log_info, log_warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Health status of one backend endpoint URL. Two provider instances
/// pointing at the same URL share one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderStatus {
    Up,
    Down,
    Unknown,
    Checking,
}

/// Seam for the health transport so tests can script probe outcomes
#[async_trait]
pub trait HealthProbe: Send + Sync {
    /// True iff the endpoint's health contract reported UP. Transport
    /// errors, non-2xx responses and malformed bodies are all "not UP".
    async fn probe(&self, base_url: &str) -> bool;
}

#[derive(Deserialize)]
struct HealthBody {
    status: String,
}

/// `GET {base}/health` expecting `{"status":"UP"}`
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HealthProbe for HttpProbe {
    async fn probe(&self, base_url: &str) -> bool {
        let health_url = match url::Url::parse(&format!("{}/", base_url.trim_end_matches('/')))
            .and_then(|base| base.join("health"))
        {
            Ok(u) => u,
            Err(err) => {
                log_warn!(
                    "Unparseable endpoint URL {base_url}: {err}",
                    err: err.to_string().as_str()
                );
                return false;
            }
        };
        match self.client.get(health_url).send().await {
            Ok(response) if response.status().is_success() => {
                match response.json::<HealthBody>().await {
                    Ok(body) => body.status == "UP",
                    Err(err) => {
                        log_debug!(
                            "Malformed health body from {base_url}: {err}",
                            err: err.to_string().as_str()
                        );
                        false
                    }
                }
            }
            Ok(response) => {
                log_debug!(
                    "Health check {base_url} returned {status}",
                    status: response.status().as_u16()
                );
                false
            }
            Err(err) => {
                log_debug!(
                    "Health check {base_url} failed: {err}",
                    err: err.to_string().as_str()
                );
                false
            }
        }
    }
}

struct Endpoint {
    status: ProviderStatus,
    delay: Duration,
    retry: Option<JoinHandle<()>>,
}

/// Per-endpoint UP/DOWN/CHECKING tracker driving fallback decisions.
///
/// State machine per URL: Unknown -> Checking -> {Up, Down}, with Down
/// re-entering Checking after the endpoint's retry delay. An Up endpoint
/// has its retry timer cancelled and is never re-verified automatically;
/// it can only leave Up if monitoring is torn down and restarted. Probe
/// failures never surface to callers, they only update this map.
#[derive(Clone)]
pub struct AvailabilityGate {
    endpoints: Arc<Mutex<HashMap<String, Endpoint>>>,
    probe: Arc<dyn HealthProbe>,
    default_delay: Duration,
}

impl AvailabilityGate {
    pub fn new(probe: Arc<dyn HealthProbe>, default_delay: Duration) -> Self {
        Self {
            endpoints: Arc::new(Mutex::new(HashMap::new())),
            probe,
            default_delay,
        }
    }

    pub fn with_http_probe(default_delay: Duration) -> Self {
        Self::new(Arc::new(HttpProbe::new()), default_delay)
    }

    /// Start tracking an endpoint. No-op if already tracked; otherwise the
    /// endpoint enters Checking and one probe is issued before this
    /// returns.
    pub async fn monitor(&self, url: &str, delay: Option<Duration>) {
        {
            let mut endpoints = self.endpoints.lock().await;
            if endpoints.contains_key(url) {
                return;
            }
            endpoints.insert(
                url.to_string(),
                Endpoint {
                    status: ProviderStatus::Checking,
                    delay: delay.unwrap_or(self.default_delay),
                    retry: None,
                },
            );
        }
        log_info!("Monitoring endpoint {url}");
        self.run_probe(url).await;
    }

    /// Stop tracking an endpoint: abort its retry timer and drop its entry.
    /// Its status reverts to Unknown.
    pub async fn unmonitor(&self, url: &str) {
        let mut endpoints = self.endpoints.lock().await;
        if let Some(endpoint) = endpoints.remove(url)
            && let Some(handle) = endpoint.retry
        {
            handle.abort();
        }
    }

    pub async fn status(&self, url: &str) -> ProviderStatus {
        let endpoints = self.endpoints.lock().await;
        endpoints
            .get(url)
            .map(|e| e.status)
            .unwrap_or(ProviderStatus::Unknown)
    }

    /// Whether a retry timer is currently scheduled for this endpoint
    pub async fn retry_pending(&self, url: &str) -> bool {
        let endpoints = self.endpoints.lock().await;
        endpoints
            .get(url)
            .is_some_and(|e| e.retry.as_ref().is_some_and(|h| !h.is_finished()))
    }

    /// The gate only excludes on confirmed failure; Unknown and Checking
    /// are optimistically usable.
    pub async fn usable(&self, url: &str) -> bool {
        self.status(url).await != ProviderStatus::Down
    }

    /// First candidate endpoint not confirmed Down
    pub async fn pick_endpoint<'a>(&self, candidates: &[&'a str]) -> Option<&'a str> {
        for candidate in candidates {
            if self.usable(candidate).await {
                return Some(candidate);
            }
        }
        None
    }

    /// Re-enter Checking and probe again. This is the retry-timer path; it
    /// is public so callers (and tests) can force a recheck without waiting.
    pub async fn recheck(&self, url: &str) {
        {
            let mut endpoints = self.endpoints.lock().await;
            let Some(endpoint) = endpoints.get_mut(url) else {
                return;
            };
            endpoint.status = ProviderStatus::Checking;
        }
        self.run_probe(url).await;
    }

    async fn run_probe(&self, url: &str) {
        let up = self.probe.probe(url).await;
        let mut endpoints = self.endpoints.lock().await;
        // Unmonitored while the probe was in flight
        let Some(endpoint) = endpoints.get_mut(url) else {
            return;
        };
        if up {
            endpoint.status = ProviderStatus::Up;
            if let Some(handle) = endpoint.retry.take() {
                handle.abort();
            }
            log_info!("Endpoint {url} is UP");
        } else {
            endpoint.status = ProviderStatus::Down;
            log_warn!(
                "Endpoint {url} is DOWN, retrying in {secs}s",
                secs: endpoint.delay.as_secs()
            );
            // A manual recheck may race an armed timer; one pending retry
            // per endpoint is the invariant.
            if let Some(stale) = endpoint.retry.take() {
                stale.abort();
            }
            let delay = endpoint.delay;
            let retry = self.retry_future(url.to_string());
            endpoint.retry = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                retry.await;
            }));
        }
    }

    // Boxed to break the run_probe -> timer task -> recheck -> run_probe
    // type cycle.
    fn retry_future(&self, url: String) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        let gate = self.clone();
        Box::pin(async move { gate.recheck(&url).await })
    }
}
