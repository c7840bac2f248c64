// vitrina/src/catalog.rs

//! The public catalog view: a snapshot rendered into display cards, with
//! pure client-side search, price filtering, and sorting over the rendered
//! projection.
//!
//! The transformations touch only the projection (visibility flags and card
//! order), never the snapshot itself, and all of their state is discarded
//! the next time `render` replaces the cards with a fresh listener
//! delivery.

use std::str::FromStr;

use crate::format::{format_date, format_price};
use crate::model::Product;

/// Card ordering choices. `Newest` is a no-op: snapshots arrive already
/// sorted `createdAt` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
  Name,
  PriceLow,
  PriceHigh,
  Newest,
}

impl FromStr for SortKey {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s {
      "name" => Ok(SortKey::Name),
      "price-low" => Ok(SortKey::PriceLow),
      "price-high" => Ok(SortKey::PriceHigh),
      "newest" => Ok(SortKey::Newest),
      other => Err(format!("unknown sort key: {}", other)),
    }
  }
}

/// One rendered product card.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductCard {
  pub id: String,
  pub name: String,
  pub price: f64,
  pub description: String,
  pub image_url: String,
  /// Price formatted for display, e.g. `$1,234.50`.
  pub price_label: String,
  /// Creation date formatted for display, e.g. `Jan 5, 2026`.
  pub added_label: String,
  visible: bool,
}

impl ProductCard {
  fn from_product(product: &Product) -> Self {
    Self {
      id: product.id.clone(),
      name: product.name.clone(),
      price: product.price,
      description: product.description.clone(),
      image_url: product.image_url.clone(),
      price_label: format_price(product.price),
      added_label: format_date(&product.created_at),
      visible: true,
    }
  }

  pub fn is_visible(&self) -> bool {
    self.visible
  }
}

#[derive(Debug, Default)]
pub struct CatalogView {
  cards: Vec<ProductCard>,
}

impl CatalogView {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replaces the whole projection with a fresh snapshot. Any search,
  /// filter, or sort state from the previous render is lost.
  pub fn render(&mut self, snapshot: &[Product]) {
    self.cards = snapshot.iter().map(ProductCard::from_product).collect();
  }

  /// Case-insensitive substring search over name and description. Every
  /// card is re-evaluated, so consecutive searches do not intersect.
  pub fn search(&mut self, query: &str) {
    let needle = query.to_lowercase();
    for card in &mut self.cards {
      card.visible = card.name.to_lowercase().contains(&needle)
        || card.description.to_lowercase().contains(&needle);
    }
  }

  /// Shows only cards whose price falls inside `[min, max]`.
  pub fn filter_by_price(&mut self, min: f64, max: f64) {
    for card in &mut self.cards {
      card.visible = card.price >= min && card.price <= max;
    }
  }

  /// Reorders the projection. Visibility is untouched.
  pub fn sort(&mut self, key: SortKey) {
    match key {
      SortKey::Name => self
        .cards
        .sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase())),
      SortKey::PriceLow => self.cards.sort_by(|a, b| a.price.total_cmp(&b.price)),
      SortKey::PriceHigh => self.cards.sort_by(|a, b| b.price.total_cmp(&a.price)),
      SortKey::Newest => {}
    }
  }

  /// All cards in projection order, hidden ones included.
  pub fn cards(&self) -> &[ProductCard] {
    &self.cards
  }

  /// The currently visible cards, in projection order.
  pub fn visible_cards(&self) -> Vec<&ProductCard> {
    self.cards.iter().filter(|card| card.visible).collect()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }
}
