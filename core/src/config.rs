// vitrina/src/config.rs

//! Backend connection and admin session configuration.
//!
//! Credentials come from the embedding application. A config that still
//! carries placeholder values must degrade to a visible "not configured"
//! state (`CatalogError::NotConfigured`) rather than crash or silently fail.

use crate::error::{CatalogError, CatalogResult};

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";
const PLACEHOLDER_PROJECT_ID: &str = "your-project-id";
const PLACEHOLDER_STORAGE_BUCKET: &str = "your-project.appspot.com";

/// Connection settings for the remote document database and blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
  pub api_key: String,
  pub project_id: String,
  pub storage_bucket: String,
}

impl BackendConfig {
  pub fn new(
    api_key: impl Into<String>,
    project_id: impl Into<String>,
    storage_bucket: impl Into<String>,
  ) -> Self {
    Self {
      api_key: api_key.into(),
      project_id: project_id.into(),
      storage_bucket: storage_bucket.into(),
    }
  }

  /// The shipped defaults before anyone fills in real credentials.
  pub fn placeholder() -> Self {
    Self::new(
      PLACEHOLDER_API_KEY,
      PLACEHOLDER_PROJECT_ID,
      PLACEHOLDER_STORAGE_BUCKET,
    )
  }

  /// True once every field has been replaced with a real, non-empty value.
  pub fn is_configured(&self) -> bool {
    !self.api_key.is_empty()
      && !self.project_id.is_empty()
      && !self.storage_bucket.is_empty()
      && self.api_key != PLACEHOLDER_API_KEY
      && self.project_id != PLACEHOLDER_PROJECT_ID
      && self.storage_bucket != PLACEHOLDER_STORAGE_BUCKET
  }

  pub fn ensure_configured(&self) -> CatalogResult<()> {
    if self.is_configured() {
      Ok(())
    } else {
      tracing::warn!("backend config still has placeholder values");
      Err(CatalogError::NotConfigured {
        message: "backend credentials are missing or still hold placeholder values".to_string(),
      })
    }
  }
}

/// The admin gate secret. Held by the session object, never persisted.
#[derive(Debug, Clone)]
pub struct AdminConfig {
  pub password: String,
}

impl AdminConfig {
  pub fn new(password: impl Into<String>) -> Self {
    Self {
      password: password.into(),
    }
  }
}
