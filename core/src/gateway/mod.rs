// vitrina/src/gateway/mod.rs

//! The backend gateway boundary: a thin async trait over a remote document
//! database and blob store.
//!
//! Everything above this module (repository, listing service, admin
//! workflows) talks to the backend exclusively through `ProductGateway`, so
//! any store with document-CRUD, object-storage, and live-snapshot
//! primitives can sit behind it. `MemoryGateway` is the in-process
//! implementation used by tests and backendless embedders.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::CatalogResult;
use crate::model::{BlobUpload, Product, ProductFields, ProductPatch};

pub use memory::MemoryGateway;

/// The collection every product document lives in.
pub const PRODUCTS_COLLECTION: &str = "products";

/// The blob-store folder product images are uploaded to.
pub const PRODUCTS_FOLDER: &str = "products";

/// Upload size cap enforced by the blob store (5 MB).
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// One delivery from a live collection listener.
#[derive(Debug, Clone)]
pub enum SnapshotEvent {
  /// The full ordered snapshot (`createdAt` descending), delivered
  /// immediately on subscription and again after every collection change.
  Update(Vec<Product>),
  /// Unrecoverable listener failure. Delivered at most once; no further
  /// events follow.
  Terminated(String),
}

/// Callback invoked with every snapshot delivery.
pub type SnapshotListener = Arc<dyn Fn(SnapshotEvent) + Send + Sync>;

/// Handle to a live subscription. Cancelling (or dropping) the handle stops
/// delivery and releases the backend connection.
pub struct SubscriptionHandle {
  cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl SubscriptionHandle {
  pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
    Self {
      cancel: Some(Box::new(cancel)),
    }
  }

  /// Stops delivery. Idempotent; dropping the handle has the same effect.
  pub fn cancel(mut self) {
    if let Some(cancel) = self.cancel.take() {
      cancel();
    }
  }
}

impl Drop for SubscriptionHandle {
  fn drop(&mut self) {
    if let Some(cancel) = self.cancel.take() {
      cancel();
    }
  }
}

impl std::fmt::Debug for SubscriptionHandle {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("SubscriptionHandle")
      .field("active", &self.cancel.is_some())
      .finish()
  }
}

/// CRUD on product documents, image blob storage, and live collection
/// snapshots. One round trip per call; no caching at this layer.
#[async_trait]
pub trait ProductGateway: Send + Sync {
  /// Writes a new document and returns the server-assigned id.
  async fn insert_product(&self, fields: ProductFields) -> CatalogResult<String>;

  /// Partial update. Fails with `NotFound` when the id is absent.
  async fn update_product(&self, id: &str, patch: ProductPatch) -> CatalogResult<()>;

  async fn delete_product(&self, id: &str) -> CatalogResult<()>;

  /// Deletes every document in the collection as one atomic batch: either
  /// the whole set disappears or none of it does.
  async fn delete_all_products(&self) -> CatalogResult<()>;

  async fn get_product(&self, id: &str) -> CatalogResult<Product>;

  /// One-shot read of the full collection, ordered `createdAt` descending.
  async fn list_products(&self) -> CatalogResult<Vec<Product>>;

  /// Registers a live listener. The listener receives the current snapshot
  /// immediately and a fresh one after every collection change, until the
  /// returned handle is cancelled or a `Terminated` event ends the stream.
  fn subscribe(&self, listener: SnapshotListener) -> CatalogResult<SubscriptionHandle>;

  /// Stores a blob under `<folder>/<unix-millis>_<sanitized-filename>` and
  /// returns a durable retrieval URL. Rejects uploads over
  /// `MAX_IMAGE_BYTES` or with a content type outside {JPEG, PNG, WebP}
  /// with a `Validation` error, before anything is stored.
  async fn upload_blob(&self, blob: BlobUpload, folder: &str) -> CatalogResult<String>;

  /// Best-effort blob removal. A URL that does not resolve to a storage
  /// path is a silent no-op; backend failures are logged and swallowed. A
  /// stray unreferenced blob is a cleanup-later condition, not a
  /// data-integrity problem.
  async fn delete_blob(&self, url: &str);
}

/// Builds the object path for an uploaded blob: whitespace runs in the
/// filename collapse to `_`, prefixed with the upload timestamp.
pub fn blob_object_path(folder: &str, filename: &str, unix_millis: i64) -> String {
  let sanitized: String = filename
    .split_whitespace()
    .collect::<Vec<_>>()
    .join("_");
  format!("{}/{}_{}", folder, unix_millis, sanitized)
}

/// Recovers the object path from a retrieval URL: the segment between `/o/`
/// and the query string, with `%2F` folded back to `/`. Returns `None` when
/// either marker is missing.
pub fn blob_path_from_url(url: &str) -> Option<String> {
  let start = url.find("/o/")? + "/o/".len();
  let rest = &url[start..];
  let end = rest.find('?')?;
  Some(rest[..end].replace("%2F", "/"))
}
