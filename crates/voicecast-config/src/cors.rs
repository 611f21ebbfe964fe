use std::time::Duration;

use serde::Deserialize;

/// CORS configuration for browser clients calling the API directly
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins (`"*"` or explicit list)
    #[serde(default)]
    pub origins: AllowList,
    /// Allowed HTTP methods (`"*"` or explicit list)
    #[serde(default = "default_methods")]
    pub methods: AllowList,
    /// Allowed request headers (`"*"` or explicit list)
    #[serde(default)]
    pub headers: AllowList,
    /// Allow credentials
    #[serde(default)]
    pub credentials: bool,
    /// Max age for preflight cache in seconds
    #[serde(default)]
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origins: AllowList::Any,
            methods: default_methods(),
            headers: AllowList::Any,
            credentials: false,
            max_age: None,
        }
    }
}

impl CorsConfig {
    /// Get max age as Duration
    pub fn max_age_duration(&self) -> Option<Duration> {
        self.max_age.map(Duration::from_secs)
    }
}

/// Either a wildcard or an explicit list of values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowList {
    /// Match any value
    #[default]
    Any,
    /// Only the listed values
    Only(Vec<String>),
}

impl<'de> Deserialize<'de> for AllowList {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            One(String),
            Many(Vec<String>),
        }

        let values = match Raw::deserialize(deserializer)? {
            Raw::One(value) => vec![value],
            Raw::Many(values) => values,
        };

        if values.iter().any(|v| v == "*") {
            Ok(Self::Any)
        } else {
            Ok(Self::Only(values))
        }
    }
}

fn default_methods() -> AllowList {
    AllowList::Only(vec!["GET".to_owned(), "POST".to_owned()])
}
