//! Shared test fixtures.
//!
//! [`TestBridge`] wires the real service and dispatcher to the in-memory
//! adapters and keeps handles on every adapter so tests can seed state and
//! count calls.

use serde_json::Value;
use std::sync::{Arc, Once};

use bridge_telemetry::{init_logging, TelemetryConfig};

use web_api_bridge::adapters::{
    InMemoryApplicationRegistry, InMemoryContentStore, InMemoryPermissionStore,
    InMemorySessionResolver, ScriptedModalPresenter, StaticNameResolver,
};
use web_api_bridge::{
    Action, BridgeConfig, CallerContext, CapabilityGrant, Collaborators, RpcDispatcher, RpcError,
    SenderId, Session, WebApiService, STATUSES_CAPABILITY,
};

pub const APP_ORIGIN: &str = "dat://app.example";
pub const APP_KEY: &str = "ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9ap9a";
pub const ALICE_KEY: &str = "a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1a1";
pub const BOB_KEY: &str = "b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0";

static LOGGING: Once = Once::new();

/// Install a quiet subscriber once per test binary; `BRIDGE_LOG_LEVEL`
/// raises it when a flow needs debugging.
pub fn init_test_logging() {
    LOGGING.call_once(|| {
        let mut config = TelemetryConfig::from_env();
        if std::env::var("BRIDGE_LOG_LEVEL").is_err() {
            config.log_level = "warn".to_string();
        }
        // Another harness may already own the global subscriber.
        let _ = init_logging(&config);
    });
}

/// A bridge over in-memory collaborators
pub struct TestBridge {
    pub rpc: RpcDispatcher<WebApiService>,
    pub names: Arc<StaticNameResolver>,
    pub permissions: Arc<InMemoryPermissionStore>,
    pub sessions: Arc<InMemorySessionResolver>,
    pub content: Arc<InMemoryContentStore>,
    pub applications: Arc<InMemoryApplicationRegistry>,
    pub modals: Arc<ScriptedModalPresenter>,
    pub caller: CallerContext,
}

impl TestBridge {
    pub fn new() -> Self {
        Self::with_config(BridgeConfig::default())
    }

    pub fn with_config(config: BridgeConfig) -> Self {
        init_test_logging();
        let names = Arc::new(
            StaticNameResolver::new()
                .with_alias("alice.example", ALICE_KEY)
                .with_alias("bob.example", BOB_KEY)
                .with_alias("app.example", APP_KEY),
        );
        let permissions = Arc::new(InMemoryPermissionStore::new());
        let sessions = Arc::new(InMemorySessionResolver::new());
        let content = Arc::new(InMemoryContentStore::new());
        let applications = Arc::new(InMemoryApplicationRegistry::new());
        let modals = Arc::new(ScriptedModalPresenter::new());

        let service = WebApiService::new(
            config,
            Collaborators {
                names: names.clone(),
                permissions: permissions.clone(),
                sessions: sessions.clone(),
                content: content.clone(),
                applications: applications.clone(),
                modals: modals.clone(),
            },
        );

        Self {
            rpc: RpcDispatcher::new(Arc::new(service)),
            names,
            permissions,
            sessions,
            content,
            applications,
            modals,
            caller: CallerContext::new(format!("{}/index.html", APP_ORIGIN), SenderId::new()),
        }
    }

    /// Bind Alice's session (user 1, archive `dat://ALICE_KEY`) to the caller
    pub fn login_alice(&self) -> &Self {
        self.sessions.login(
            self.caller.sender(),
            Session {
                user_id: 1,
                primary_resource_url: format!("dat://{}", ALICE_KEY),
            },
        );
        self
    }

    /// Grant the app `actions` on the statuses capability
    pub fn grant_statuses(&self, actions: &[Action]) -> &Self {
        self.permissions.grant(CapabilityGrant::new(
            APP_ORIGIN,
            STATUSES_CAPABILITY,
            actions.iter().copied(),
        ));
        self
    }

    pub async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value, RpcError> {
        self.rpc.call(&self.caller, method, params).await
    }

    /// Path part of a record url inside Alice's archive
    pub fn alice_path(url: &str) -> String {
        url.trim_start_matches(&format!("dat://{}", ALICE_KEY))
            .to_string()
    }
}

impl Default for TestBridge {
    fn default() -> Self {
        Self::new()
    }
}
