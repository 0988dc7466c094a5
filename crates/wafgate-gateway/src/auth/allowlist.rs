//! Static shared-secret allowlist.
//!
//! Tokens are read from the configured header (`token` by default) or from
//! `Authorization: Bearer <token>`.

use std::collections::HashSet;

use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, HeaderName};

use wafgate_core::error::{Result, WafGateError};

use crate::config::AuthSection;

#[derive(Debug, Clone)]
pub struct TokenAllowlist {
    header: HeaderName,
    tokens: HashSet<String>,
}

impl TokenAllowlist {
    pub fn new(header: HeaderName, tokens: impl IntoIterator<Item = String>) -> Self {
        let tokens = tokens
            .into_iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
        Self { header, tokens }
    }

    pub fn from_config(cfg: &AuthSection) -> Result<Self> {
        let header = HeaderName::from_bytes(cfg.header.as_bytes())
            .map_err(|_| WafGateError::Config(format!("invalid auth.header: {}", cfg.header)))?;
        Ok(Self::new(header, cfg.tokens.iter().cloned()))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn is_allowed(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// Pull the presented token out of the request headers.
    pub fn presented<'a>(&self, headers: &'a HeaderMap) -> Option<&'a str> {
        if let Some(v) = headers.get(&self.header).and_then(|v| v.to_str().ok()) {
            return Some(v.trim());
        }
        headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
    }

    pub fn verify(&self, headers: &HeaderMap) -> Result<()> {
        match self.presented(headers) {
            Some(t) if self.is_allowed(t) => {
                tracing::debug!("valid token used for API access");
                Ok(())
            }
            Some(_) => {
                tracing::warn!("invalid token attempt");
                Err(WafGateError::AuthFailed)
            }
            None => {
                tracing::warn!("request without token");
                Err(WafGateError::AuthFailed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn allowlist() -> TokenAllowlist {
        TokenAllowlist::new(
            HeaderName::from_static("token"),
            vec!["alpha".to_string(), " ".to_string(), "beta".to_string(), "beta".to_string()],
        )
    }

    #[test]
    fn blank_and_duplicate_tokens_collapse() {
        assert_eq!(allowlist().len(), 2);
    }

    #[test]
    fn custom_header_and_bearer_are_accepted() {
        let list = allowlist();

        let mut h = HeaderMap::new();
        h.insert("token", HeaderValue::from_static("alpha"));
        assert!(list.verify(&h).is_ok());

        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_static("Bearer beta"));
        assert!(list.verify(&h).is_ok());
    }

    #[test]
    fn missing_or_unknown_token_fails() {
        let list = allowlist();
        assert!(matches!(list.verify(&HeaderMap::new()), Err(WafGateError::AuthFailed)));

        let mut h = HeaderMap::new();
        h.insert("token", HeaderValue::from_static("gamma"));
        assert!(matches!(list.verify(&h), Err(WafGateError::AuthFailed)));

        let mut h = HeaderMap::new();
        h.insert(AUTHORIZATION, HeaderValue::from_static("Basic alpha"));
        assert!(matches!(list.verify(&h), Err(WafGateError::AuthFailed)));
    }
}
