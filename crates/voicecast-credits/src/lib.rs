#![allow(clippy::missing_errors_doc, clippy::must_use_candidate)]

pub mod aether;
pub mod error;
pub mod guard;
pub mod memory;
pub mod store;
pub mod types;

pub use aether::AetherStore;
pub use error::CreditError;
pub use guard::CreditGuard;
pub use memory::MemoryStore;
pub use store::AccountStore;
pub use types::{CreditAccount, DecrementOutcome};
