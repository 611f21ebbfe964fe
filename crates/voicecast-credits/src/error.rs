/// Errors returned by credit stores and the credit guard
#[derive(Debug, thiserror::Error)]
pub enum CreditError {
    /// No account exists for the identity or account id
    #[error("no credit account for '{0}'")]
    AccountNotFound(String),

    /// Balance is below the cost of the operation
    #[error("insufficient credits: balance {balance}, cost {cost}")]
    InsufficientCredits {
        /// Balance at the time of the check
        balance: u64,
        /// Cost that was required
        cost: u64,
    },

    /// Conditional decrement was refused, typically a lost race
    #[error("credit decrement refused for account '{account_id}'")]
    SettlementRefused {
        /// Account the charge was attempted against
        account_id: String,
    },

    /// HTTP transport or connection error talking to the billing service
    #[error("billing request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Billing service returned a non-success status
    #[error("billing API error ({status}): {message}")]
    Api {
        /// HTTP status from the billing service
        status: u16,
        /// Error message from the response body
        message: String,
    },
}

impl CreditError {
    /// Whether the error comes from the backing store being unreachable or
    /// misbehaving, rather than from the account state
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Api { .. })
    }
}
