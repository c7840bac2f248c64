// vitrina/src/repository.rs

//! Domain operations on the product collection, built directly on the
//! gateway: validation-first writes, timestamp management, and the
//! image-then-document orderings the storefront depends on.
//!
//! Validation runs before any backend call and checks fields in a fixed
//! order (name, price, description, image); the first failure is the one
//! reported. On edit, the old image blob is deleted only after the document
//! update has been written, so a failed upload can never leave the product
//! imageless.

use std::sync::Arc;

use tracing::{event, instrument, Level};

use crate::error::{CatalogError, CatalogResult, ProductField};
use crate::gateway::{ProductGateway, PRODUCTS_FOLDER};
use crate::model::{
  now_iso, CatalogStats, ExportFile, NewProduct, ProductFields, ProductPatch, ProductUpdate,
};
use crate::progress::{ProgressObserver, ProgressStage};

const DEFAULT_EXPORT_PREFIX: &str = "vitrina";

pub struct ProductRepository {
  gateway: Arc<dyn ProductGateway>,
  export_prefix: String,
}

impl ProductRepository {
  pub fn new(gateway: Arc<dyn ProductGateway>) -> Self {
    Self {
      gateway,
      export_prefix: DEFAULT_EXPORT_PREFIX.to_string(),
    }
  }

  /// Overrides the `<prefix>-products-<date>.json` export file prefix.
  pub fn with_export_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.export_prefix = prefix.into();
    self
  }

  // Ordered checks shared by add and edit. Which message surfaces first is
  // part of the contract, so the order here is load-bearing.
  fn validate_common(name: &str, price: f64, description: &str) -> CatalogResult<()> {
    if name.trim().is_empty() {
      return Err(CatalogError::validation(
        ProductField::Name,
        "product name is required",
      ));
    }
    if !price.is_finite() {
      return Err(CatalogError::validation(
        ProductField::Price,
        "a valid price is required",
      ));
    }
    if price < 0.0 {
      return Err(CatalogError::validation(
        ProductField::Price,
        "price cannot be negative",
      ));
    }
    if description.trim().is_empty() {
      return Err(CatalogError::validation(
        ProductField::Description,
        "product description is required",
      ));
    }
    Ok(())
  }

  /// Creates a product: validate, upload the image, then insert the
  /// document with `createdAt == updatedAt`. Returns the new document id.
  #[instrument(name = "ProductRepository::add_product", skip_all, fields(name = %input.name), err(Display))]
  pub async fn add_product(
    &self,
    input: NewProduct,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<String> {
    Self::validate_common(&input.name, input.price, &input.description)?;
    let image = input.image.ok_or_else(|| {
      CatalogError::validation(ProductField::Image, "product image is required")
    })?;

    progress.on_status(ProgressStage::Uploading);
    let image_url = self.gateway.upload_blob(image, PRODUCTS_FOLDER).await?;
    event!(Level::DEBUG, %image_url, "product image uploaded");

    progress.on_status(ProgressStage::Saving);
    let now = now_iso();
    let id = self
      .gateway
      .insert_product(ProductFields {
        name: input.name.trim().to_string(),
        price: input.price,
        description: input.description.trim().to_string(),
        image_url,
        created_at: now.clone(),
        updated_at: now,
      })
      .await?;
    event!(Level::INFO, %id, "product added");
    Ok(id)
  }

  /// Updates a product. With a replacement image: read the current
  /// document, upload the new blob, write the update, and only then delete
  /// the old blob (best-effort). Without one, the document is updated and
  /// `imageUrl` is left untouched.
  #[instrument(name = "ProductRepository::edit_product", skip_all, fields(%id), err(Display))]
  pub async fn edit_product(
    &self,
    id: &str,
    update: ProductUpdate,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<()> {
    Self::validate_common(&update.name, update.price, &update.description)?;

    let mut new_image_url = None;
    let mut old_image_url = None;
    if let Some(image) = update.image {
      let current = self.gateway.get_product(id).await?;
      old_image_url = Some(current.image_url);

      progress.on_status(ProgressStage::Uploading);
      new_image_url = Some(self.gateway.upload_blob(image, PRODUCTS_FOLDER).await?);
    }

    progress.on_status(ProgressStage::Saving);
    self
      .gateway
      .update_product(
        id,
        ProductPatch {
          name: update.name.trim().to_string(),
          price: update.price,
          description: update.description.trim().to_string(),
          image_url: new_image_url,
          updated_at: now_iso(),
        },
      )
      .await?;

    // Old blob goes away only after the document points at the new one.
    if let Some(old_url) = old_image_url {
      self.gateway.delete_blob(&old_url).await;
    }
    event!(Level::INFO, %id, "product updated");
    Ok(())
  }

  /// Deletes a product: best-effort image removal, then the document.
  #[instrument(name = "ProductRepository::remove_product", skip_all, fields(%id), err(Display))]
  pub async fn remove_product(
    &self,
    id: &str,
    image_url: &str,
    progress: &dyn ProgressObserver,
  ) -> CatalogResult<()> {
    progress.on_status(ProgressStage::Deleting);
    if !image_url.is_empty() {
      self.gateway.delete_blob(image_url).await;
    }
    self.gateway.delete_product(id).await?;
    event!(Level::INFO, %id, "product removed");
    Ok(())
  }

  /// Empties the collection: best-effort deletion of every image blob, then
  /// one atomic batch delete of all documents. The document set disappears
  /// consistently even when blob deletions fail.
  #[instrument(name = "ProductRepository::bulk_remove_all", skip_all, err(Display))]
  pub async fn bulk_remove_all(&self, progress: &dyn ProgressObserver) -> CatalogResult<()> {
    progress.on_status(ProgressStage::Deleting);
    let products = self.gateway.list_products().await?;
    for product in &products {
      if !product.image_url.is_empty() {
        self.gateway.delete_blob(&product.image_url).await;
      }
    }
    self.gateway.delete_all_products().await?;
    event!(Level::INFO, removed = products.len(), "all products removed");
    Ok(())
  }

  /// Serializes the full ordered collection to a pretty-printed JSON
  /// download named `<prefix>-products-<YYYY-MM-DD>.json`.
  #[instrument(name = "ProductRepository::export_json", skip_all, err(Display))]
  pub async fn export_json(&self, progress: &dyn ProgressObserver) -> CatalogResult<ExportFile> {
    progress.on_status(ProgressStage::Exporting);
    let products = self.gateway.list_products().await?;
    let contents = serde_json::to_string_pretty(&products)
      .map_err(|err| CatalogError::Backend { source: err.into() })?;
    let name = format!(
      "{}-products-{}.json",
      self.export_prefix,
      chrono::Utc::now().format("%Y-%m-%d")
    );
    event!(Level::INFO, %name, products = products.len(), "collection exported");
    Ok(ExportFile { name, contents })
  }

  /// Aggregate counts and values over the whole collection.
  pub async fn stats(&self) -> CatalogResult<CatalogStats> {
    let products = self.gateway.list_products().await?;
    let total_inventory_value: f64 = products.iter().map(|p| p.price).sum();
    let average_price = if products.is_empty() {
      0.0
    } else {
      total_inventory_value / products.len() as f64
    };
    Ok(CatalogStats {
      total_products: products.len(),
      total_inventory_value,
      average_price,
    })
  }
}
