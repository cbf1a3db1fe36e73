//! Authorization gate for capability-gated operations.
//!
//! A pure check against the permission store: it reads one grant and either
//! lets the call through or fails it. Grants are never written here.

use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::domain::error::{BridgeError, BridgeResult};
use crate::domain::types::{Action, CallerContext};
use crate::ports::outbound::PermissionStore;

/// Origin a caller's grants are keyed by: `scheme://host[:port]`.
///
/// Callers whose reported origin does not parse as a URL with a host are
/// keyed by the raw string.
pub fn origin_of(caller: &CallerContext) -> String {
    let raw = caller.origin();
    let parsed = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return raw.to_string(),
    };
    match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{}://{}:{}", parsed.scheme(), host, port),
        (Some(host), None) => format!("{}://{}", parsed.scheme(), host),
        (None, _) => raw.to_string(),
    }
}

/// Checks capability grants before any read or mutation
#[derive(Clone)]
pub struct AuthorizationGate {
    permissions: Arc<dyn PermissionStore>,
}

impl AuthorizationGate {
    pub fn new(permissions: Arc<dyn PermissionStore>) -> Self {
        Self { permissions }
    }

    /// Succeed only if the caller's origin holds `action` under `capability_id`
    pub async fn assert_can(
        &self,
        caller: &CallerContext,
        capability_id: &str,
        action: Action,
    ) -> BridgeResult<()> {
        let origin = origin_of(caller);
        let grant = self.permissions.get_grant(&origin, capability_id).await?;

        match grant {
            Some(grant) if grant.allows(action) => {
                debug!(origin = %origin, capability = capability_id, action = %action, "Capability granted");
                Ok(())
            }
            _ => {
                warn!(origin = %origin, capability = capability_id, action = %action, "Capability denied");
                Err(BridgeError::PermissionDenied {
                    origin,
                    capability: capability_id.to_string(),
                    action,
                })
            }
        }
    }
}
