// vitrina/src/gateway/memory.rs

//! In-process `ProductGateway` backed by `parking_lot`-guarded tables.
//!
//! Behaves like the remote backend from the caller's side: server-assigned
//! ids, snapshots ordered `createdAt` descending, synchronous listener
//! delivery on every successful document mutation, and the same blob-store
//! validation rules. Tests drive their fixtures through it, and the failure
//! hooks (`fail_next_operation`, `fail_listeners`) stand in for network and
//! listener outages.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::{event, Level};
use uuid::Uuid;

use crate::config::BackendConfig;
use crate::error::{CatalogError, CatalogResult, ProductField};
use crate::gateway::{
  blob_object_path, blob_path_from_url, ProductGateway, SnapshotEvent, SnapshotListener,
  SubscriptionHandle, MAX_IMAGE_BYTES,
};
use crate::model::{BlobUpload, ImageContentType, Product, ProductFields, ProductPatch};

struct StoredDoc {
  // Insertion sequence, used only to break createdAt ties deterministically
  // (newest insert first), matching how the backend orders same-millisecond
  // writes within one client.
  seq: u64,
  product: Product,
}

struct StoredBlob {
  content_type: String,
  bytes: Vec<u8>,
}

struct MemoryState {
  documents: HashMap<String, StoredDoc>,
  next_seq: u64,
  blobs: HashMap<String, StoredBlob>,
  last_blob_millis: i64,
  listeners: Vec<(u64, SnapshotListener)>,
  next_listener_id: u64,
  fail_next_op: Option<String>,
}

impl MemoryState {
  fn snapshot(&self) -> Vec<Product> {
    let mut docs: Vec<&StoredDoc> = self.documents.values().collect();
    docs.sort_by(|a, b| {
      b.product
        .created_at
        .cmp(&a.product.created_at)
        .then(b.seq.cmp(&a.seq))
    });
    docs.iter().map(|doc| doc.product.clone()).collect()
  }
}

pub struct MemoryGateway {
  state: Arc<RwLock<MemoryState>>,
  bucket: String,
}

impl MemoryGateway {
  pub fn new() -> Self {
    Self::with_bucket("vitrina.appspot.local")
  }

  pub fn with_bucket(bucket: impl Into<String>) -> Self {
    Self {
      state: Arc::new(RwLock::new(MemoryState {
        documents: HashMap::new(),
        next_seq: 0,
        blobs: HashMap::new(),
        last_blob_millis: 0,
        listeners: Vec::new(),
        next_listener_id: 0,
        fail_next_op: None,
      })),
      bucket: bucket.into(),
    }
  }

  /// Builds a gateway from connection settings, degrading to
  /// `NotConfigured` while the config still holds placeholder values.
  pub fn from_config(config: &BackendConfig) -> CatalogResult<Self> {
    config.ensure_configured()?;
    Ok(Self::with_bucket(config.storage_bucket.clone()))
  }

  /// Makes the next document or upload operation fail with a `Backend`
  /// error carrying `message`.
  pub fn fail_next_operation(&self, message: impl Into<String>) {
    self.state.write().fail_next_op = Some(message.into());
  }

  /// Delivers a terminal error to every registered listener and drops them.
  /// No further snapshots are delivered to those listeners.
  pub fn fail_listeners(&self, message: &str) {
    let listeners: Vec<(u64, SnapshotListener)> = {
      let mut state = self.state.write();
      std::mem::take(&mut state.listeners)
    };
    event!(
      Level::WARN,
      listener_count = listeners.len(),
      "terminating live listeners: {}",
      message
    );
    for (_, listener) in &listeners {
      listener(SnapshotEvent::Terminated(message.to_string()));
    }
  }

  pub fn document_count(&self) -> usize {
    self.state.read().documents.len()
  }

  pub fn blob_count(&self) -> usize {
    self.state.read().blobs.len()
  }

  /// Whether the blob behind a retrieval URL is still stored.
  pub fn blob_exists(&self, url: &str) -> bool {
    match blob_path_from_url(url) {
      Some(path) => self.state.read().blobs.contains_key(&path),
      None => false,
    }
  }

  pub fn listener_count(&self) -> usize {
    self.state.read().listeners.len()
  }

  fn take_injected_failure(&self) -> Option<CatalogError> {
    self
      .state
      .write()
      .fail_next_op
      .take()
      .map(CatalogError::backend)
  }

  // Snapshot delivery happens outside the lock; a listener is free to
  // re-enter the gateway (e.g. to cancel its own subscription).
  fn notify_listeners(&self) {
    let (snapshot, listeners) = {
      let state = self.state.read();
      let listeners: Vec<SnapshotListener> = state
        .listeners
        .iter()
        .map(|(_, listener)| Arc::clone(listener))
        .collect();
      (state.snapshot(), listeners)
    };
    event!(
      Level::TRACE,
      products = snapshot.len(),
      listeners = listeners.len(),
      "delivering collection snapshot"
    );
    for listener in &listeners {
      listener(SnapshotEvent::Update(snapshot.clone()));
    }
  }
}

impl Default for MemoryGateway {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ProductGateway for MemoryGateway {
  async fn insert_product(&self, fields: ProductFields) -> CatalogResult<String> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    let id = Uuid::new_v4().simple().to_string();
    {
      let mut state = self.state.write();
      let seq = state.next_seq;
      state.next_seq += 1;
      state.documents.insert(
        id.clone(),
        StoredDoc {
          seq,
          product: Product {
            id: id.clone(),
            name: fields.name,
            price: fields.price,
            description: fields.description,
            image_url: fields.image_url,
            created_at: fields.created_at,
            updated_at: fields.updated_at,
          },
        },
      );
    }
    event!(Level::DEBUG, %id, "product document inserted");
    self.notify_listeners();
    Ok(id)
  }

  async fn update_product(&self, id: &str, patch: ProductPatch) -> CatalogResult<()> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    {
      let mut state = self.state.write();
      let doc = state
        .documents
        .get_mut(id)
        .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })?;
      doc.product.name = patch.name;
      doc.product.price = patch.price;
      doc.product.description = patch.description;
      if let Some(image_url) = patch.image_url {
        doc.product.image_url = image_url;
      }
      doc.product.updated_at = patch.updated_at;
    }
    event!(Level::DEBUG, %id, "product document updated");
    self.notify_listeners();
    Ok(())
  }

  async fn delete_product(&self, id: &str) -> CatalogResult<()> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    // Deleting an absent id succeeds; the operation is idempotent from the
    // caller's perspective.
    self.state.write().documents.remove(id);
    event!(Level::DEBUG, %id, "product document deleted");
    self.notify_listeners();
    Ok(())
  }

  async fn delete_all_products(&self) -> CatalogResult<()> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    let removed = {
      let mut state = self.state.write();
      let removed = state.documents.len();
      state.documents.clear();
      removed
    };
    event!(Level::INFO, removed, "product collection batch-deleted");
    self.notify_listeners();
    Ok(())
  }

  async fn get_product(&self, id: &str) -> CatalogResult<Product> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    self
      .state
      .read()
      .documents
      .get(id)
      .map(|doc| doc.product.clone())
      .ok_or_else(|| CatalogError::NotFound { id: id.to_string() })
  }

  async fn list_products(&self) -> CatalogResult<Vec<Product>> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    Ok(self.state.read().snapshot())
  }

  fn subscribe(&self, listener: SnapshotListener) -> CatalogResult<SubscriptionHandle> {
    let (listener_id, initial) = {
      let mut state = self.state.write();
      let listener_id = state.next_listener_id;
      state.next_listener_id += 1;
      state.listeners.push((listener_id, Arc::clone(&listener)));
      (listener_id, state.snapshot())
    };
    event!(Level::DEBUG, listener_id, "live listener registered");

    // Initial delivery with the current state, outside the lock.
    listener(SnapshotEvent::Update(initial));

    let state = Arc::clone(&self.state);
    Ok(SubscriptionHandle::new(move || {
      let mut guard = state.write();
      guard.listeners.retain(|(id, _)| *id != listener_id);
      event!(Level::DEBUG, listener_id, "live listener released");
    }))
  }

  async fn upload_blob(&self, blob: BlobUpload, folder: &str) -> CatalogResult<String> {
    if let Some(err) = self.take_injected_failure() {
      return Err(err);
    }
    if blob.bytes.len() > MAX_IMAGE_BYTES {
      return Err(CatalogError::validation(
        ProductField::Image,
        "file size exceeds 5MB limit",
      ));
    }
    if ImageContentType::from_mime(&blob.content_type).is_none() {
      return Err(CatalogError::validation(
        ProductField::Image,
        "invalid file type, use JPG, PNG, or WebP",
      ));
    }

    let path = {
      let mut state = self.state.write();
      // Object paths embed the upload timestamp; keep it strictly
      // increasing so back-to-back uploads of the same filename never
      // collide.
      let mut millis = Utc::now().timestamp_millis();
      if millis <= state.last_blob_millis {
        millis = state.last_blob_millis + 1;
      }
      state.last_blob_millis = millis;
      let path = blob_object_path(folder, &blob.filename, millis);
      state.blobs.insert(
        path.clone(),
        StoredBlob {
          content_type: blob.content_type,
          bytes: blob.bytes,
        },
      );
      path
    };

    let url = format!(
      "https://storage.local/v0/b/{}/o/{}?alt=media",
      self.bucket,
      path.replace('/', "%2F")
    );
    event!(Level::DEBUG, %path, "blob stored");
    Ok(url)
  }

  async fn delete_blob(&self, url: &str) {
    let Some(path) = blob_path_from_url(url) else {
      // Not one of ours; blob cleanup is best-effort, so this is a no-op.
      event!(Level::TRACE, %url, "blob URL has no storage path, skipping");
      return;
    };
    if let Some(message) = self.state.write().fail_next_op.take() {
      event!(Level::WARN, %path, "blob deletion failed, leaving blob behind: {}", message);
      return;
    }
    if self.state.write().blobs.remove(&path).is_some() {
      event!(Level::DEBUG, %path, "blob deleted");
    } else {
      event!(Level::DEBUG, %path, "blob already gone");
    }
  }
}
