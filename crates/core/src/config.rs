//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into the resolver and store. The intent is to avoid reading process-wide environment
//! variables during request handling, which can lead to inconsistent behaviour in
//! multi-threaded runtimes and test harnesses.

use crate::constants::DEFAULT_DRAFT_LIMIT;
use crate::store::DraftQuery;
use crate::{DraftError, DraftResult};
use std::num::NonZeroU32;

/// Payload encryption secrets forwarded to the draft store.
///
/// `None` means the store applies no special handling to payloads.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum EncryptionSecrets {
    #[default]
    None,
    Secrets {
        primary: String,
        secondary: Option<String>,
    },
}

impl EncryptionSecrets {
    /// Renders the `Secret` header value (`primary[,secondary]`), if any.
    pub fn header_value(&self) -> Option<String> {
        match self {
            EncryptionSecrets::None => None,
            EncryptionSecrets::Secrets {
                primary,
                secondary: Some(secondary),
            } => Some(format!("{primary},{secondary}")),
            EncryptionSecrets::Secrets {
                primary,
                secondary: None,
            } => Some(primary.clone()),
        }
    }

    /// Builds secrets from optional string values.
    ///
    /// Blank values count as absent. A secondary secret without a primary one is rejected.
    pub fn from_env_values(
        primary: Option<String>,
        secondary: Option<String>,
    ) -> DraftResult<Self> {
        match (non_blank(primary), non_blank(secondary)) {
            (None, None) => Ok(EncryptionSecrets::None),
            (None, Some(_)) => Err(DraftError::InvalidInput(
                "secondary draft store secret requires a primary secret".into(),
            )),
            (Some(primary), secondary) => Ok(EncryptionSecrets::Secrets { primary, secondary }),
        }
    }
}

/// Per draft type resolver configuration.
#[derive(Clone, Debug)]
pub struct ResolverConfig {
    draft_type: String,
    limit: NonZeroU32,
    secrets: EncryptionSecrets,
}

impl ResolverConfig {
    /// Create a new `ResolverConfig` with no encryption secrets.
    ///
    /// # Errors
    /// Returns [`DraftError::InvalidInput`] if `draft_type` is blank or `limit` is zero.
    pub fn new(draft_type: impl Into<String>, limit: u32) -> DraftResult<Self> {
        let draft_type = draft_type.into();
        if draft_type.trim().is_empty() {
            return Err(DraftError::InvalidInput(
                "draft_type cannot be empty".into(),
            ));
        }
        let limit = NonZeroU32::new(limit)
            .ok_or_else(|| DraftError::InvalidInput("draft limit must be positive".into()))?;

        Ok(Self {
            draft_type,
            limit,
            secrets: EncryptionSecrets::None,
        })
    }

    pub fn with_secrets(mut self, secrets: EncryptionSecrets) -> Self {
        self.secrets = secrets;
        self
    }

    pub fn draft_type(&self) -> &str {
        &self.draft_type
    }

    pub fn limit(&self) -> u32 {
        self.limit.get()
    }

    pub fn secrets(&self) -> &EncryptionSecrets {
        &self.secrets
    }

    /// The store query this configuration issues on every resolution.
    pub fn query(&self) -> DraftQuery {
        DraftQuery {
            draft_type: self.draft_type.clone(),
            limit: self.limit,
            secrets: self.secrets.clone(),
        }
    }
}

/// Remote draft store settings resolved at startup.
#[derive(Clone, Debug, Default)]
pub struct StoreConfig {
    /// Base URL of the draft store; `None` selects the in-memory store.
    pub url: Option<String>,
    pub secrets: EncryptionSecrets,
    pub service_token: Option<String>,
}

impl StoreConfig {
    /// Build store settings from optional string values (typically environment variables).
    ///
    /// # Errors
    /// Returns [`DraftError::InvalidInput`] if the URL is not `http(s)` or the secrets are
    /// inconsistent.
    pub fn from_env_values(
        url: Option<String>,
        secret_primary: Option<String>,
        secret_secondary: Option<String>,
        service_token: Option<String>,
    ) -> DraftResult<Self> {
        let url = non_blank(url);
        if let Some(url) = &url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(DraftError::InvalidInput(format!(
                    "draft store URL must use http or https, got: '{url}'"
                )));
            }
        }

        Ok(Self {
            url,
            secrets: EncryptionSecrets::from_env_values(secret_primary, secret_secondary)?,
            service_token: non_blank(service_token),
        })
    }
}

/// Parse the draft limit from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_DRAFT_LIMIT`].
pub fn draft_limit_from_env_value(value: Option<String>) -> DraftResult<u32> {
    let Some(value) = non_blank(value) else {
        return Ok(DEFAULT_DRAFT_LIMIT);
    };

    match value.parse::<u32>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(DraftError::InvalidInput(format!(
            "draft limit must be a positive integer, got: '{value}'"
        ))),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolver_config_rejects_blank_type() {
        let result = ResolverConfig::new("  ", 10);

        assert!(matches!(result, Err(DraftError::InvalidInput(_))));
    }

    #[test]
    fn resolver_config_rejects_zero_limit() {
        let result = ResolverConfig::new("claim", 0);

        assert!(matches!(result, Err(DraftError::InvalidInput(_))));
    }

    #[test]
    fn resolver_config_defaults_to_no_secrets() {
        let config = ResolverConfig::new("claim", 100).unwrap();

        assert_eq!(config.draft_type(), "claim");
        assert_eq!(config.limit(), 100);
        assert_eq!(config.secrets(), &EncryptionSecrets::None);
    }

    #[test]
    fn query_carries_type_limit_and_secrets() {
        let secrets = EncryptionSecrets::Secrets {
            primary: "p".into(),
            secondary: None,
        };
        let query = ResolverConfig::new("response", 5)
            .unwrap()
            .with_secrets(secrets.clone())
            .query();

        assert_eq!(query.draft_type, "response");
        assert_eq!(query.limit_param(), "5");
        assert_eq!(query.secrets, secrets);
    }

    #[test]
    fn secrets_header_value() {
        assert_eq!(EncryptionSecrets::None.header_value(), None);

        let primary_only = EncryptionSecrets::Secrets {
            primary: "one".into(),
            secondary: None,
        };
        assert_eq!(primary_only.header_value().as_deref(), Some("one"));

        let both = EncryptionSecrets::Secrets {
            primary: "one".into(),
            secondary: Some("two".into()),
        };
        assert_eq!(both.header_value().as_deref(), Some("one,two"));
    }

    #[test]
    fn secrets_from_env_values() {
        assert_eq!(
            EncryptionSecrets::from_env_values(None, Some(" ".into())).unwrap(),
            EncryptionSecrets::None
        );
        assert!(EncryptionSecrets::from_env_values(None, Some("two".into())).is_err());
        assert_eq!(
            EncryptionSecrets::from_env_values(Some("one".into()), None).unwrap(),
            EncryptionSecrets::Secrets {
                primary: "one".into(),
                secondary: None
            }
        );
    }

    #[test]
    fn store_config_rejects_non_http_url() {
        let result = StoreConfig::from_env_values(Some("ftp://store".into()), None, None, None);

        assert!(matches!(result, Err(DraftError::InvalidInput(_))));
    }

    #[test]
    fn store_config_blank_url_selects_memory_store() {
        let config = StoreConfig::from_env_values(Some("".into()), None, None, None).unwrap();

        assert!(config.url.is_none());
        assert!(config.service_token.is_none());
    }

    #[test]
    fn draft_limit_parsing() {
        assert_eq!(draft_limit_from_env_value(None).unwrap(), DEFAULT_DRAFT_LIMIT);
        assert_eq!(draft_limit_from_env_value(Some(" ".into())).unwrap(), DEFAULT_DRAFT_LIMIT);
        assert_eq!(draft_limit_from_env_value(Some("25".into())).unwrap(), 25);
        assert!(draft_limit_from_env_value(Some("0".into())).is_err());
        assert!(draft_limit_from_env_value(Some("many".into())).is_err());
    }
}
