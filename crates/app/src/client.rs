//! Object graph of the session core.

use std::sync::Arc;

use taskboard_application::ports::{Clock, HttpClient, HttpClientError, TokenStore};
use taskboard_application::{
    ApiGateway, BoardApi, EnterHome, LoadProfile, Logout, RefreshCoordinator, SessionGuard,
    SessionKeeper, SignIn, SignUp, UserApi,
};
use taskboard_domain::{Endpoints, Route};
use taskboard_infrastructure::{
    ClientConfig, FileTokenStore, ReqwestHttpClient, RouteChannel, SystemClock,
};

/// Shared session services, wired once per process.
pub struct Client {
    endpoints: Endpoints,
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    navigator: Arc<RouteChannel>,
    coordinator: Arc<RefreshCoordinator>,
    gateway: Arc<ApiGateway>,
}

impl Client {
    /// Wires the core over the given adapters.
    #[must_use]
    pub fn new(
        endpoints: Endpoints,
        store: Arc<dyn TokenStore>,
        http: Arc<dyn HttpClient>,
        clock: Arc<dyn Clock>,
        refresh_statuses: Vec<u16>,
    ) -> Self {
        let navigator = Arc::new(RouteChannel::default());
        let coordinator = Arc::new(RefreshCoordinator::new(
            Arc::clone(&store),
            Arc::clone(&http),
            endpoints.refresh(),
        ));
        let gateway = Arc::new(
            ApiGateway::new(
                Arc::clone(&store),
                http,
                Arc::clone(&coordinator),
                navigator.clone(),
            )
            .with_refresh_statuses(refresh_statuses),
        );

        Self {
            endpoints,
            store,
            clock,
            navigator,
            coordinator,
            gateway,
        }
    }

    /// Wires the production adapters described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn from_config(config: &ClientConfig) -> Result<Self, HttpClientError> {
        let http = ReqwestHttpClient::new(config.timeout)?;
        Ok(Self::new(
            config.endpoints.clone(),
            Arc::new(FileTokenStore::new(&config.session_file)),
            Arc::new(http),
            Arc::new(SystemClock::with_leeway(config.expiry_leeway)),
            config.refresh_statuses.clone(),
        ))
    }

    /// Backend endpoints.
    #[must_use]
    pub const fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Navigator shared by every use case.
    #[must_use]
    pub fn navigator(&self) -> Arc<RouteChannel> {
        Arc::clone(&self.navigator)
    }

    /// Route most recently requested by the core.
    #[must_use]
    pub fn route(&self) -> Route {
        self.navigator.current()
    }

    /// Request gateway.
    #[must_use]
    pub fn gateway(&self) -> Arc<ApiGateway> {
        Arc::clone(&self.gateway)
    }

    /// Refresh coordinator.
    #[must_use]
    pub fn coordinator(&self) -> Arc<RefreshCoordinator> {
        Arc::clone(&self.coordinator)
    }

    /// Token store.
    #[must_use]
    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }

    /// Session guard.
    #[must_use]
    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.store(), Arc::clone(&self.clock))
    }

    /// User endpoints.
    #[must_use]
    pub fn users(&self) -> UserApi {
        UserApi::new(self.gateway(), self.endpoints.clone())
    }

    /// Board endpoints.
    #[must_use]
    pub fn boards(&self) -> BoardApi {
        BoardApi::new(self.gateway(), self.endpoints.clone())
    }

    /// Sign-in use case.
    #[must_use]
    pub fn sign_in(&self) -> SignIn {
        SignIn::new(
            self.gateway(),
            self.store(),
            self.navigator.clone(),
            self.endpoints.clone(),
        )
    }

    /// Sign-up use case.
    #[must_use]
    pub fn sign_up(&self) -> SignUp {
        SignUp::new(
            self.gateway(),
            self.store(),
            self.navigator.clone(),
            self.endpoints.clone(),
        )
    }

    /// Logout use case.
    #[must_use]
    pub fn logout(&self) -> Logout {
        Logout::new(self.store(), self.navigator.clone())
    }

    /// Profile lookup use case.
    #[must_use]
    pub fn load_profile(&self) -> LoadProfile {
        LoadProfile::new(self.store(), self.users())
    }

    /// Home gate use case.
    #[must_use]
    pub fn enter_home(&self) -> EnterHome {
        EnterHome::new(
            self.guard(),
            SessionKeeper::new(self.coordinator(), self.store(), self.navigator.clone()),
            self.load_profile(),
            self.boards(),
            self.navigator.clone(),
        )
    }
}
