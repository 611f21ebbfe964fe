use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

use crate::types::{CreditBalanceResponse, CreditDeductRequest, CreditDeductResponse};
use crate::{AccountStore, CreditAccount, CreditError, DecrementOutcome};

/// Account store backed by the Aether billing API
///
/// Accounts are keyed by entity id, which is the caller identity. Aether's
/// deduct endpoint is itself conditional, so `decrement` is a single call.
#[derive(Clone)]
pub struct AetherStore {
    http: reqwest::Client,
    base_url: Url,
    app_id: String,
    entity_type: String,
    service_api_key: SecretString,
}

impl AetherStore {
    /// Create a new Aether store
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(
        base_url: Url,
        app_id: String,
        entity_type: String,
        service_api_key: SecretString,
    ) -> Result<Self, CreditError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(CreditError::Request)?;

        Ok(Self {
            http,
            base_url,
            app_id,
            entity_type,
            service_api_key,
        })
    }

    /// `{base}/credits/:appId/:entityType/:entityId[/deduct]`
    ///
    /// The entity id is pushed as a single escaped segment. Dot segments
    /// would be dropped by the URL parser, so they never name an account.
    fn credits_url(&self, entity_id: &str, deduct: bool) -> Result<Url, CreditError> {
        if matches!(entity_id, "" | "." | "..") {
            return Err(CreditError::AccountNotFound(entity_id.to_owned()));
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| CreditError::Api {
                status: 0,
                message: format!("invalid base URL: {}", self.base_url),
            })?
            .pop_if_empty()
            .extend(["credits", self.app_id.as_str(), self.entity_type.as_str(), entity_id])
            .extend(deduct.then_some("deduct"));

        Ok(url)
    }
}

#[async_trait]
impl AccountStore for AetherStore {
    /// GET `/credits/:appId/:entityType/:entityId`
    async fn find_by_identity(&self, identity: &str) -> Result<Option<CreditAccount>, CreditError> {
        let url = self.credits_url(identity, false)?;

        let response = self
            .http
            .get(url)
            .header("x-service-api-key", self.service_api_key.expose_secret())
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: CreditBalanceResponse = response.json().await?;

        tracing::debug!(
            identity,
            billing_account = body.billing_account_id.as_deref().unwrap_or("-"),
            balance = body.balance,
            "fetched credit balance from Aether"
        );

        Ok(Some(CreditAccount {
            id: identity.to_owned(),
            identity: identity.to_owned(),
            balance: whole_credits(body.balance),
        }))
    }

    /// POST `/credits/:appId/:entityType/:entityId/deduct`
    async fn decrement(&self, account_id: &str, cost: u64) -> Result<DecrementOutcome, CreditError> {
        let url = self.credits_url(account_id, true)?;

        #[allow(clippy::cast_precision_loss)]
        let request = CreditDeductRequest {
            amount: cost as f64,
            description: Some("podcast synthesis".to_owned()),
            idempotency_key: uuid::Uuid::new_v4().to_string(),
            reference_type: Some("podcast".to_owned()),
        };

        let response = self
            .http
            .post(url)
            .header("x-service-api-key", self.service_api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        match response.status().as_u16() {
            404 => return Err(CreditError::AccountNotFound(account_id.to_owned())),
            402 | 409 => return Ok(DecrementOutcome::Refused),
            _ if !response.status().is_success() => return Err(api_error(response).await),
            _ => {}
        }

        let body: CreditDeductResponse = response.json().await?;

        if body.success {
            Ok(DecrementOutcome::Applied {
                balance: whole_credits(body.balance_after),
            })
        } else {
            Ok(DecrementOutcome::Refused)
        }
    }

    /// GET `/health`
    async fn health(&self) -> Result<(), CreditError> {
        let url = self.base_url.join("health").map_err(|e| CreditError::Api {
            status: 0,
            message: format!("invalid URL: {e}"),
        })?;

        let response = self
            .http
            .get(url)
            .header("x-service-api-key", self.service_api_key.expose_secret())
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(api_error(response).await)
        }
    }

    fn name(&self) -> &str {
        "aether"
    }
}

impl std::fmt::Debug for AetherStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AetherStore")
            .field("base_url", &self.base_url)
            .field("app_id", &self.app_id)
            .field("entity_type", &self.entity_type)
            .finish_non_exhaustive()
    }
}

async fn api_error(response: reqwest::Response) -> CreditError {
    let status = response.status().as_u16();
    let message = response.text().await.unwrap_or_default();
    CreditError::Api { status, message }
}

/// Aether reports balances as floats; partial credits are not spendable
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_credits(balance: f64) -> u64 {
    if balance.is_finite() && balance > 0.0 {
        balance.floor() as u64
    } else {
        0
    }
}
