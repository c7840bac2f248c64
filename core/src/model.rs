// vitrina/src/model.rs

//! The product document and the input payloads that flow through the
//! repository and gateway layers.
//!
//! Field names follow the backend's document schema (camelCase for
//! `imageUrl` / `createdAt` / `updatedAt`), so a serialized `Product` is
//! byte-compatible with the stored document and with the JSON export.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A product document as stored in the `products` collection.
///
/// Invariants: `price >= 0`; `image_url` is non-empty once the document
/// exists; `id` is backend-assigned, unique, and never reused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id: String,
  pub name: String,
  pub price: f64,
  pub description: String,
  #[serde(rename = "imageUrl")]
  pub image_url: String,
  #[serde(rename = "createdAt")]
  pub created_at: String,
  #[serde(rename = "updatedAt")]
  pub updated_at: String,
}

/// Full field set for a document insert. The id is assigned by the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
  pub name: String,
  pub price: f64,
  pub description: String,
  pub image_url: String,
  pub created_at: String,
  pub updated_at: String,
}

/// Partial update for an existing document. `image_url` is only touched when
/// a replacement image was uploaded.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPatch {
  pub name: String,
  pub price: f64,
  pub description: String,
  pub image_url: Option<String>,
  pub updated_at: String,
}

/// The image content types the blob store accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageContentType {
  Jpeg,
  Png,
  WebP,
}

impl ImageContentType {
  /// Parses a MIME string; anything outside {JPEG, PNG, WebP} is rejected.
  pub fn from_mime(mime: &str) -> Option<Self> {
    match mime {
      "image/jpeg" => Some(ImageContentType::Jpeg),
      "image/png" => Some(ImageContentType::Png),
      "image/webp" => Some(ImageContentType::WebP),
      _ => None,
    }
  }

  pub fn mime(&self) -> &'static str {
    match self {
      ImageContentType::Jpeg => "image/jpeg",
      ImageContentType::Png => "image/png",
      ImageContentType::WebP => "image/webp",
    }
  }
}

/// An image file handed to the gateway for upload. The content type is kept
/// as the raw MIME string so the gateway can reject unsupported types the
/// same way the remote store would.
#[derive(Debug, Clone, PartialEq)]
pub struct BlobUpload {
  pub filename: String,
  pub content_type: String,
  pub bytes: Vec<u8>,
}

impl BlobUpload {
  pub fn new(filename: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
    Self {
      filename: filename.into(),
      content_type: content_type.into(),
      bytes,
    }
  }
}

/// Repository input for the add path. The image is required; it is an
/// `Option` only so the missing-image case reaches validation and is
/// reported as a field error instead of a construction error.
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name: String,
  pub price: f64,
  pub description: String,
  pub image: Option<BlobUpload>,
}

/// Repository input for the edit path. A `None` image keeps the current one.
#[derive(Debug, Clone)]
pub struct ProductUpdate {
  pub name: String,
  pub price: f64,
  pub description: String,
  pub image: Option<BlobUpload>,
}

/// Aggregate figures over the whole collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
  pub total_products: usize,
  pub total_inventory_value: f64,
  pub average_price: f64,
}

/// A serialized collection export ready to be written to disk or offered as
/// a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
  pub name: String,
  pub contents: String,
}

/// Current time as an ISO-8601 string with millisecond precision, matching
/// the timestamp format stored on product documents.
pub fn now_iso() -> String {
  Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
