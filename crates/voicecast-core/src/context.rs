use serde::Serialize;

/// Runtime context for a single API request
///
/// Built by the server middleware once authentication has run, and consumed
/// by the podcast and credit handlers
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// HTTP request parts (method, URI, headers, extensions)
    pub parts: http::request::Parts,
    /// Caller identity, if one was attached by the auth layer
    pub identity: Option<Identity>,
}

impl RequestContext {
    /// Create a minimal context for non-HTTP use (tests, embedding)
    ///
    /// Contains empty headers and no identity
    pub fn empty() -> Self {
        let (parts, ()) = http::Request::new(()).into_parts();

        Self { parts, identity: None }
    }

    /// Create a context carrying the given identity
    pub fn with_identity(identity: Identity) -> Self {
        Self {
            identity: Some(identity),
            ..Self::empty()
        }
    }

    /// Access request headers
    pub const fn headers(&self) -> &http::HeaderMap {
        &self.parts.headers
    }

    /// Caller identity, if authenticated
    pub const fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }
}

/// Authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    /// Opaque user reference used to look up the credit account
    pub user_id: String,
    /// How the identity was established
    pub source: IdentitySource,
}

impl Identity {
    pub fn new(user_id: impl Into<String>, source: IdentitySource) -> Self {
        Self {
            user_id: user_id.into(),
            source,
        }
    }
}

/// Mechanism that produced an [`Identity`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentitySource {
    /// API key listed in the local configuration
    StaticKey,
    /// API key resolved by the remote key service
    RemoteKey,
    /// User id forwarded by a trusted upstream proxy
    TrustedHeader,
}
