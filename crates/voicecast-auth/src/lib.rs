#![allow(clippy::missing_errors_doc)]

mod error;
mod identity;
mod remote;
mod static_keys;

pub use error::AuthError;
pub use identity::IdentityResolver;
pub use remote::{ApiKeyResolver, ResolvedKey};
pub use static_keys::StaticKeys;

use sha2::{Digest, Sha256};

/// SHA-256 hex digest, used so raw keys are never held as map keys
pub(crate) fn sha256_hex(input: &str) -> String {
    format!("{:x}", Sha256::digest(input.as_bytes()))
}
