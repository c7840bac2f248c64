// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::Level;

use vitrina::{
  BlobUpload, CatalogResult, ListingObserver, ListingUpdate, MemoryGateway, NewProduct, Product,
  ProductFields, ProductGateway, ProductPatch, ProductUpdate, ProgressObserver, ProgressStage,
  SnapshotListener, SubscriptionHandle,
};

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Fixture builders ---

pub fn gateway() -> Arc<MemoryGateway> {
  Arc::new(MemoryGateway::new())
}

/// A small, valid PNG upload.
pub fn sample_image(filename: &str) -> BlobUpload {
  BlobUpload::new(filename, "image/png", vec![0x89, b'P', b'N', b'G', 0, 0])
}

pub fn new_product(name: &str, price: f64, description: &str) -> NewProduct {
  NewProduct {
    name: name.to_string(),
    price,
    description: description.to_string(),
    image: Some(sample_image("product.png")),
  }
}

pub fn product_update(name: &str, price: f64, description: &str) -> ProductUpdate {
  ProductUpdate {
    name: name.to_string(),
    price,
    description: description.to_string(),
    image: None,
  }
}

pub fn product(id: &str, name: &str, price: f64, created_at: &str) -> Product {
  Product {
    id: id.to_string(),
    name: name.to_string(),
    price,
    description: format!("{} description", name),
    image_url: "https://storage.local/v0/b/bucket/o/products%2F1_x.png?alt=media".to_string(),
    created_at: created_at.to_string(),
    updated_at: created_at.to_string(),
  }
}

/// Inserts a document directly through the gateway with an explicit
/// `createdAt`, for tests that assert snapshot ordering.
pub async fn insert_raw(
  gateway: &dyn ProductGateway,
  name: &str,
  price: f64,
  created_at: &str,
) -> String {
  gateway
    .insert_product(ProductFields {
      name: name.to_string(),
      price,
      description: format!("{} description", name),
      image_url: "https://storage.local/v0/b/bucket/o/products%2F1_x.png?alt=media".to_string(),
      created_at: created_at.to_string(),
      updated_at: created_at.to_string(),
    })
    .await
    .expect("raw insert should succeed")
}

// --- Progress recording ---

#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
  Status(ProgressStage),
  Error(String),
  Idle,
}

#[derive(Default)]
pub struct RecordingProgress {
  events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingProgress {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn events(&self) -> Vec<ProgressEvent> {
    self.events.lock().clone()
  }

  pub fn idle_count(&self) -> usize {
    self
      .events
      .lock()
      .iter()
      .filter(|e| matches!(e, ProgressEvent::Idle))
      .count()
  }

  pub fn last_error(&self) -> Option<String> {
    self
      .events
      .lock()
      .iter()
      .rev()
      .find_map(|e| match e {
        ProgressEvent::Error(message) => Some(message.clone()),
        _ => None,
      })
  }
}

impl ProgressObserver for RecordingProgress {
  fn on_status(&self, stage: ProgressStage) {
    self.events.lock().push(ProgressEvent::Status(stage));
  }

  fn on_error(&self, message: &str) {
    self.events.lock().push(ProgressEvent::Error(message.to_string()));
  }

  fn on_idle(&self) {
    self.events.lock().push(ProgressEvent::Idle);
  }
}

// --- Listing observation ---

/// Returns an observer plus the shared buffer it appends every update to.
pub fn collecting_observer() -> (ListingObserver, Arc<Mutex<Vec<ListingUpdate>>>) {
  let updates: Arc<Mutex<Vec<ListingUpdate>>> = Arc::new(Mutex::new(Vec::new()));
  let sink = Arc::clone(&updates);
  let observer: ListingObserver = Arc::new(move |update: &ListingUpdate| {
    sink.lock().push(update.clone());
  });
  (observer, updates)
}

// --- Backend-call counting ---

/// Gateway wrapper counting every backend round trip, for asserting that
/// rejected inputs and unauthenticated actions trigger zero backend calls.
pub struct CountingGateway {
  inner: MemoryGateway,
  calls: AtomicUsize,
}

impl CountingGateway {
  pub fn new() -> Self {
    Self {
      inner: MemoryGateway::new(),
      calls: AtomicUsize::new(0),
    }
  }

  pub fn call_count(&self) -> usize {
    self.calls.load(Ordering::SeqCst)
  }

  pub fn inner(&self) -> &MemoryGateway {
    &self.inner
  }

  fn bump(&self) {
    self.calls.fetch_add(1, Ordering::SeqCst);
  }
}

#[async_trait]
impl ProductGateway for CountingGateway {
  async fn insert_product(&self, fields: ProductFields) -> CatalogResult<String> {
    self.bump();
    self.inner.insert_product(fields).await
  }

  async fn update_product(&self, id: &str, patch: ProductPatch) -> CatalogResult<()> {
    self.bump();
    self.inner.update_product(id, patch).await
  }

  async fn delete_product(&self, id: &str) -> CatalogResult<()> {
    self.bump();
    self.inner.delete_product(id).await
  }

  async fn delete_all_products(&self) -> CatalogResult<()> {
    self.bump();
    self.inner.delete_all_products().await
  }

  async fn get_product(&self, id: &str) -> CatalogResult<Product> {
    self.bump();
    self.inner.get_product(id).await
  }

  async fn list_products(&self) -> CatalogResult<Vec<Product>> {
    self.bump();
    self.inner.list_products().await
  }

  fn subscribe(&self, listener: SnapshotListener) -> CatalogResult<SubscriptionHandle> {
    self.bump();
    self.inner.subscribe(listener)
  }

  async fn upload_blob(&self, blob: BlobUpload, folder: &str) -> CatalogResult<String> {
    self.bump();
    self.inner.upload_blob(blob, folder).await
  }

  async fn delete_blob(&self, url: &str) {
    self.bump();
    self.inner.delete_blob(url).await
  }
}
