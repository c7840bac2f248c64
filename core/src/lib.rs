// src/lib.rs

//! Vitrina: the core of a small product-catalog storefront.
//!
//! All persistence lives behind the `ProductGateway` boundary (a remote
//! document database plus blob store); this crate layers on top of it:
//!  - Validated CRUD with the image-before-document write ordering
//!    (`ProductRepository`).
//!  - A live listing service that fans collection snapshots out to
//!    observers, including the initial one (`LiveListingService`).
//!  - A session-gated admin workflow with progressive status reporting and
//!    guaranteed UI-state cleanup (`AdminSession`).
//!  - A catalog view with pure client-side search/filter/sort over the
//!    rendered cards (`CatalogView`).
//!
//! `MemoryGateway` implements the full gateway in-process for tests and
//! backendless embedding.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod error;
pub mod format;
pub mod gateway;
pub mod listing;
pub mod model;
pub mod progress;
pub mod repository;

// --- Re-exports for the Public API ---

pub use crate::admin::AdminSession;
pub use crate::catalog::{CatalogView, ProductCard, SortKey};
pub use crate::config::{AdminConfig, BackendConfig};
pub use crate::error::{CatalogError, CatalogResult, ProductField};
pub use crate::gateway::{
  MemoryGateway, ProductGateway, SnapshotEvent, SnapshotListener, SubscriptionHandle,
  MAX_IMAGE_BYTES, PRODUCTS_COLLECTION, PRODUCTS_FOLDER,
};
pub use crate::listing::{ListingObserver, ListingUpdate, LiveListingService, ObserverId};
pub use crate::model::{
  BlobUpload, CatalogStats, ExportFile, ImageContentType, NewProduct, Product, ProductFields,
  ProductPatch, ProductUpdate,
};
pub use crate::progress::{NoProgress, ProgressObserver, ProgressStage};
pub use crate::repository::ProductRepository;
