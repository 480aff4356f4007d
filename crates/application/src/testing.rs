//! In-process doubles for the ports, shared by the unit tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use taskboard_domain::{ApiRequest, ApiResponse, Endpoints, Headers, Route};

use crate::ports::{Clock, HttpClient, HttpClientError, Navigator};

pub const BASE_URL: &str = "http://backend.test";

pub fn endpoints() -> Endpoints {
    Endpoints::new(BASE_URL).unwrap()
}

/// Builds an unsigned token whose payload carries `sub` and `exp`.
pub fn mint_token(sub: &str, exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}","exp":{exp}}}"#));
    format!("{header}.{payload}.c2ln")
}

/// Token for `sub` valid for an hour from the real clock.
pub fn fresh_token(sub: &str) -> String {
    mint_token(sub, Utc::now().timestamp() + 3600)
}

pub fn json_response(status: u16, body: &str) -> ApiResponse {
    let mut headers = Headers::new();
    headers.set("Content-Type", "application/json");
    ApiResponse::new(status, headers, body)
}

pub fn text_response(status: u16, body: &str) -> ApiResponse {
    let mut headers = Headers::new();
    headers.set("Content-Type", "text/plain; charset=utf-8");
    ApiResponse::new(status, headers, body)
}

pub fn bare_response(status: u16) -> ApiResponse {
    ApiResponse::new(status, Headers::new(), "")
}

/// Successful refresh reply carrying `access_token`.
pub fn refreshed(access_token: &str) -> ApiResponse {
    json_response(200, &format!(r#"{{"accessToken":"{access_token}"}}"#))
}

type Scripted = Result<ApiResponse, HttpClientError>;

/// HTTP client answering from per-URL queues and recording every request.
#[derive(Default)]
pub struct ScriptedHttpClient {
    routes: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<ApiRequest>>,
    delay: Option<Duration>,
}

impl ScriptedHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn respond(&self, url: &str, response: ApiResponse) -> &Self {
        self.push(url, Ok(response))
    }

    pub fn fail(&self, url: &str, error: HttpClientError) -> &Self {
        self.push(url, Err(error))
    }

    fn push(&self, url: &str, scripted: Scripted) -> &Self {
        self.routes
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(scripted);
        self
    }

    pub fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.url == url)
            .count()
    }
}

#[async_trait]
impl HttpClient for ScriptedHttpClient {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, HttpClientError> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.routes
            .lock()
            .unwrap()
            .get_mut(&request.url)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(HttpClientError::Other(format!("unscripted {}", request.url))))
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Fully wired session core over in-process doubles.
pub struct Harness {
    pub store: crate::session::InMemoryTokenStore,
    pub http: Arc<ScriptedHttpClient>,
    pub navigator: Arc<RecordingNavigator>,
    pub coordinator: Arc<crate::session::RefreshCoordinator>,
    pub gateway: Arc<crate::gateway::ApiGateway>,
}

impl Harness {
    pub fn new(store: crate::session::InMemoryTokenStore) -> Self {
        let http = Arc::new(ScriptedHttpClient::new());
        let navigator = RecordingNavigator::new();
        let coordinator = Arc::new(crate::session::RefreshCoordinator::new(
            Arc::new(store.clone()),
            http.clone(),
            endpoints().refresh(),
        ));
        let gateway = Arc::new(crate::gateway::ApiGateway::new(
            Arc::new(store.clone()),
            http.clone(),
            coordinator.clone(),
            navigator.clone(),
        ));
        Self {
            store,
            http,
            navigator,
            coordinator,
            gateway,
        }
    }

    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::new(FixedClock(Utc::now()))
    }
}
