// vitrina/src/error.rs
use std::fmt;

use anyhow::Error as AnyhowError;
use thiserror::Error;

/// The product fields checked during input validation, in the order the
/// checks run: name, price, description, image. The first failing field is
/// the one reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductField {
  Name,
  Price,
  Description,
  Image,
}

impl fmt::Display for ProductField {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let label = match self {
      ProductField::Name => "name",
      ProductField::Price => "price",
      ProductField::Description => "description",
      ProductField::Image => "image",
    };
    f.write_str(label)
  }
}

#[derive(Debug, Error)]
pub enum CatalogError {
  /// Bad user input. Raised before any backend call; no blob or document is
  /// ever created for a rejected input.
  #[error("Invalid {field}: {message}")]
  Validation { field: ProductField, message: String },

  /// A mutating action was attempted without an authenticated session.
  #[error("Not logged in: {message}")]
  Auth { message: String },

  /// Point read or update of a document id the backend does not know.
  #[error("Product not found: {id}")]
  NotFound { id: String },

  /// Backend credentials are missing or still hold placeholder values.
  /// Blocks all data operations until the configuration is fixed.
  #[error("Backend not configured: {message}")]
  NotConfigured { message: String },

  /// Network or service failure reported by the backend. The operation is
  /// aborted; nothing is retried automatically.
  #[error("Backend operation failed. Source: {source}")]
  Backend {
    #[source]
    source: AnyhowError,
  },
}

impl CatalogError {
  pub fn validation(field: ProductField, message: impl Into<String>) -> Self {
    CatalogError::Validation {
      field,
      message: message.into(),
    }
  }

  pub fn auth(message: impl Into<String>) -> Self {
    CatalogError::Auth {
      message: message.into(),
    }
  }

  pub fn backend(message: impl Into<String>) -> Self {
    CatalogError::Backend {
      source: AnyhowError::msg(message.into()),
    }
  }
}

// External SDK errors arrive as anyhow::Error and become Backend failures.
impl From<AnyhowError> for CatalogError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow::Error already wrapping a CatalogError keeps its original
    // variant instead of being downgraded to Backend.
    match err.downcast::<CatalogError>() {
      Ok(catalog_err) => catalog_err,
      Err(other) => CatalogError::Backend { source: other },
    }
  }
}

pub type CatalogResult<T, E = CatalogError> = std::result::Result<T, E>;
