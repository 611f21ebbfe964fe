use std::time::Duration;

use reqwest::{
    Client,
    header::{CONNECTION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::TtsError;

/// Transport-level ceiling; the podcast workflow applies its own, shorter bound
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Build a keep-alive HTTP client for one provider
pub(crate) fn http_client(user_agent: Option<&str>) -> crate::Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));

    if let Some(user_agent) = user_agent {
        let value = HeaderValue::from_str(user_agent)
            .map_err(|e| TtsError::ConfigError(format!("invalid user_agent '{user_agent}': {e}")))?;
        headers.insert(USER_AGENT, value);
    }

    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .pool_idle_timeout(Some(Duration::from_secs(5)))
        .tcp_nodelay(true)
        .tcp_keepalive(Some(Duration::from_secs(60)))
        .default_headers(headers)
        .build()
        .map_err(|e| TtsError::ConfigError(format!("failed to build HTTP client: {e}")))
}
