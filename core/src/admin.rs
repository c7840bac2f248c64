// vitrina/src/admin.rs

//! The session-gated admin workflow.
//!
//! One `AdminSession` per admin page lifetime: it owns the authenticated
//! flag, the repository, and the live listing subscription, and is torn
//! down with `logout` or `close` (spec'd teardown instead of ambient
//! globals). Every mutating operation checks the flag before touching the
//! backend and, win or lose, finishes by delivering `on_idle` to the
//! progress observer so the UI always gets its interactive state back.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{event, Level};

use crate::config::AdminConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::gateway::ProductGateway;
use crate::listing::LiveListingService;
use crate::model::{CatalogStats, ExportFile, NewProduct, ProductUpdate};
use crate::progress::ProgressObserver;
use crate::repository::ProductRepository;

pub struct AdminSession {
  repository: ProductRepository,
  listing: LiveListingService,
  password: String,
  authenticated: AtomicBool,
}

impl AdminSession {
  pub fn new(gateway: Arc<dyn ProductGateway>, config: AdminConfig) -> Self {
    Self {
      repository: ProductRepository::new(Arc::clone(&gateway)),
      listing: LiveListingService::new(gateway),
      password: config.password,
      authenticated: AtomicBool::new(false),
    }
  }

  pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.repository = self.repository.with_export_prefix(prefix);
    self
  }

  /// The session's live listing service, for registering admin-page
  /// observers. The subscription itself starts on successful login.
  pub fn listing(&self) -> &LiveListingService {
    &self.listing
  }

  pub fn is_authenticated(&self) -> bool {
    self.authenticated.load(Ordering::SeqCst)
  }

  /// Compares the password against the configured secret. Success sets the
  /// authenticated flag and starts the live product listing.
  pub fn login(&self, password: &str) -> CatalogResult<()> {
    if password != self.password {
      event!(Level::WARN, "admin login rejected");
      return Err(CatalogError::auth("incorrect password, please try again"));
    }
    self.authenticated.store(true, Ordering::SeqCst);
    event!(Level::INFO, "admin session opened");
    self.listing.start()
  }

  /// Clears the authenticated flag and releases the live subscription.
  pub fn logout(&self) {
    self.authenticated.store(false, Ordering::SeqCst);
    self.listing.stop();
    event!(Level::INFO, "admin session closed");
  }

  /// Page-teardown cleanup: releases the subscription without touching the
  /// authenticated flag (the session storage outlives a reload).
  pub fn close(&self) {
    self.listing.stop();
  }

  fn require_login(&self) -> CatalogResult<()> {
    if self.is_authenticated() {
      Ok(())
    } else {
      Err(CatalogError::auth("please login first"))
    }
  }

  // The guaranteed-cleanup step: surface the error message, then always
  // hand the UI back its interactive state.
  fn finish<T>(
    &self,
    result: CatalogResult<T>,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<T> {
    if let Err(err) = &result {
      progress.on_error(&err.to_string());
    }
    progress.on_idle();
    result
  }

  pub async fn add_product(
    &self,
    input: NewProduct,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<String> {
    let result = match self.require_login() {
      Ok(()) => self.repository.add_product(input, progress).await,
      Err(err) => Err(err),
    };
    self.finish(result, progress)
  }

  pub async fn edit_product(
    &self,
    id: &str,
    update: ProductUpdate,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<()> {
    let result = match self.require_login() {
      Ok(()) => self.repository.edit_product(id, update, progress).await,
      Err(err) => Err(err),
    };
    self.finish(result, progress)
  }

  pub async fn delete_product(
    &self,
    id: &str,
    image_url: &str,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<()> {
    let result = match self.require_login() {
      Ok(()) => self.repository.remove_product(id, image_url, progress).await,
      Err(err) => Err(err),
    };
    self.finish(result, progress)
  }

  pub async fn bulk_delete(&self, progress: &dyn ProgressObserver) -> CatalogResult<()> {
    let result = match self.require_login() {
      Ok(()) => self.repository.bulk_remove_all(progress).await,
      Err(err) => Err(err),
    };
    self.finish(result, progress)
  }

  pub async fn export(&self, progress: &dyn ProgressObserver) -> CatalogResult<ExportFile> {
    let result = match self.require_login() {
      Ok(()) => self.repository.export_json(progress).await,
      Err(err) => Err(err),
    };
    self.finish(result, progress)
  }

  pub async fn stats(&self) -> CatalogResult<CatalogStats> {
    self.require_login()?;
    self.repository.stats().await
  }
}
