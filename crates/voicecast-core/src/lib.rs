#![allow(clippy::must_use_candidate)]

mod context;
mod error;

pub use context::{Identity, IdentitySource, RequestContext};
pub use error::{ErrorBody, ErrorDetails, HttpError};
