use serde::{Deserialize, Serialize};

/// A credit balance owned by one identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreditAccount {
    /// Store-specific account id, passed back to `decrement`
    pub id: String,
    /// User reference the account belongs to
    pub identity: String,
    /// Remaining credits
    pub balance: u64,
}

/// Result of a conditional decrement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Cost was subtracted; carries the new balance
    Applied { balance: u64 },
    /// Balance was below the cost, nothing changed
    Refused,
}

/// Balance lookup response from Aether
#[derive(Debug, Clone, Deserialize)]
pub struct CreditBalanceResponse {
    /// Billing account backing the entity
    #[serde(default, alias = "billingAccountId")]
    pub billing_account_id: Option<String>,
    /// Current credit balance
    #[serde(default)]
    pub balance: f64,
}

/// Request to deduct credits
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditDeductRequest {
    /// Amount to deduct
    pub amount: f64,
    /// Description of the charge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Unique key for idempotent deduction
    pub idempotency_key: String,
    /// Reference type (e.g. "podcast")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_type: Option<String>,
}

/// Response from deducting credits
#[derive(Debug, Clone, Deserialize)]
pub struct CreditDeductResponse {
    /// Whether the deduction was applied
    pub success: bool,
    /// Balance after deduction
    #[serde(default, alias = "balance", alias = "balanceAfter")]
    pub balance_after: f64,
}
