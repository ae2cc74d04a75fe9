//! Credentials and identity of whoever is editing, passed explicitly to the
//! API client instead of being read from ambient storage.

use serde::{Deserialize, Serialize};

use crate::api::ApiError;
use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: None,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        let token = config
            .api_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(ApiError::NotConfigured("API token"))?;
        Ok(Self::new(token))
    }

    pub fn with_user(mut self, user: UserProfile) -> Self {
        self.user = Some(user);
        self
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.user.as_ref()?.name.as_deref()
    }
}

// Keep the token out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("user", &self.user)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_comes_from_config() {
        let config = Config {
            api_token: Some(" abc ".to_string()),
            ..Config::default()
        };
        let session = Session::from_config(&config).unwrap();
        assert_eq!(session.bearer(), "Bearer abc");
        assert!(!format!("{:?}", session).contains("abc"));
    }

    #[test]
    fn missing_token_is_not_configured() {
        let err = Session::from_config(&Config::default()).unwrap_err();
        assert!(matches!(err, ApiError::NotConfigured(_)));
    }
}
