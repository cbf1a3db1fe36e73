//! Ownership verification for caller-named mutation targets.
//!
//! Resolve-then-compare: both the target's hostname and the session's own
//! archive hostname go through the name resolver, and only the canonical keys
//! are compared. Two hostnames that render alike but resolve differently are
//! different owners.
//!
//! Bare paths (anything that does not parse as an absolute URL) are returned
//! unverified. The caller contract scopes them to the session's own archive.

use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

use crate::domain::error::{BridgeError, BridgeResult};
use crate::domain::types::Session;
use crate::ports::outbound::NameResolver;

/// A caller-supplied reference to a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceReference {
    /// Parsed absolute URL naming an owner by hostname
    Absolute(Url),
    /// Path with no owner claim
    Bare(String),
}

impl ResourceReference {
    pub fn parse(raw: &str) -> Self {
        match Url::parse(raw) {
            Ok(url) => ResourceReference::Absolute(url),
            Err(_) => ResourceReference::Bare(raw.to_string()),
        }
    }
}

fn host_of(url: &Url, what: &str) -> BridgeResult<String> {
    url.host_str()
        .map(str::to_string)
        .ok_or_else(|| BridgeError::InvalidReference(format!("{} has no hostname: {}", what, url)))
}

/// Confirms mutation targets resolve into the session's own namespace
#[derive(Clone)]
pub struct OwnershipVerifier {
    resolver: Arc<dyn NameResolver>,
}

impl OwnershipVerifier {
    pub fn new(resolver: Arc<dyn NameResolver>) -> Self {
        Self { resolver }
    }

    /// Path inside the session's archive that `reference` points at.
    ///
    /// Fails with `ForbiddenCrossOrigin` when the reference resolves to any
    /// other owner, whatever the path looks like.
    pub async fn verify_owned(&self, reference: &str, session: &Session) -> BridgeResult<String> {
        let url = match ResourceReference::parse(reference) {
            ResourceReference::Bare(path) => {
                debug!(path = %path, "Bare path accepted without owner check");
                return Ok(path);
            }
            ResourceReference::Absolute(url) => url,
        };

        let hostname = host_of(&url, "resource reference")?;
        let pathname = url.path().to_string();

        let resolved_key = self.resolver.resolve_name(&hostname).await?;
        let session_key = self.session_key(session).await?;

        if resolved_key != session_key {
            warn!(
                target_host = %hostname,
                session_archive = %session.primary_resource_url,
                "Refusing mutation outside the session's namespace"
            );
            return Err(BridgeError::ForbiddenCrossOrigin);
        }

        debug!(key = %session_key, path = %pathname, "Ownership verified");
        Ok(pathname)
    }

    /// Canonical key of the session's own archive
    async fn session_key(&self, session: &Session) -> BridgeResult<String> {
        let own = Url::parse(&session.primary_resource_url).map_err(|e| {
            BridgeError::InvalidReference(format!(
                "session archive url {}: {}",
                session.primary_resource_url, e
            ))
        })?;
        let host = host_of(&own, "session archive url")?;
        Ok(self.resolver.resolve_name(&host).await?)
    }

    /// `scheme://key` for a URL whose hostname may be an alias
    pub async fn canonical_origin(&self, raw: &str) -> BridgeResult<String> {
        let url = Url::parse(raw)
            .map_err(|e| BridgeError::InvalidReference(format!("{}: {}", raw, e)))?;
        let host = host_of(&url, "origin")?;
        let key = self.resolver.resolve_name(&host).await?;
        Ok(format!("{}://{}", url.scheme(), key))
    }
}
