// tests/catalog_tests.rs
mod common;

use common::*;
use vitrina::{CatalogView, Product, SortKey};

fn snapshot() -> Vec<Product> {
  vec![
    product("p1", "Red Chair", 30.0, "2026-03-01T00:00:00.000Z"),
    product("p2", "Blue Lamp", 10.0, "2026-02-01T00:00:00.000Z"),
    product("p3", "Oak Table", 20.0, "2026-01-01T00:00:00.000Z"),
  ]
}

fn visible_names(view: &CatalogView) -> Vec<String> {
  view
    .visible_cards()
    .iter()
    .map(|card| card.name.clone())
    .collect()
}

#[test]
fn render_projects_every_product_into_a_visible_card() {
  setup_tracing();
  let mut view = CatalogView::new();
  view.render(&snapshot());

  assert_eq!(view.len(), 3);
  assert_eq!(visible_names(&view), vec!["Red Chair", "Blue Lamp", "Oak Table"]);

  let card = &view.cards()[0];
  assert_eq!(card.price_label, "$30.00");
  assert_eq!(card.added_label, "Mar 1, 2026");
}

#[test]
fn search_is_a_case_insensitive_substring_over_name_and_description() {
  setup_tracing();
  let mut view = CatalogView::new();
  view.render(&snapshot());

  view.search("lamp");
  assert_eq!(visible_names(&view), vec!["Blue Lamp"]);

  // Description text matches too ("Oak Table description").
  view.search("OAK");
  assert_eq!(visible_names(&view), vec!["Oak Table"]);

  view.search("no such thing");
  assert!(view.visible_cards().is_empty());

  // Each search re-evaluates every card; earlier searches do not narrow
  // later ones.
  view.search("");
  assert_eq!(view.visible_cards().len(), 3);
}

#[test]
fn price_filter_is_inclusive_on_both_bounds() {
  setup_tracing();
  let mut view = CatalogView::new();
  view.render(&snapshot());

  view.filter_by_price(10.0, 20.0);
  assert_eq!(visible_names(&view), vec!["Blue Lamp", "Oak Table"]);

  view.filter_by_price(30.0, 30.0);
  assert_eq!(visible_names(&view), vec!["Red Chair"]);
}

#[test]
fn sort_orders_the_projection() {
  setup_tracing();
  let mut view = CatalogView::new();
  view.render(&snapshot());

  view.sort(SortKey::PriceLow);
  let prices: Vec<f64> = view.visible_cards().iter().map(|c| c.price).collect();
  assert_eq!(prices, vec![10.0, 20.0, 30.0]);

  view.sort(SortKey::PriceHigh);
  let prices: Vec<f64> = view.visible_cards().iter().map(|c| c.price).collect();
  assert_eq!(prices, vec![30.0, 20.0, 10.0]);

  view.sort(SortKey::Name);
  assert_eq!(visible_names(&view), vec!["Blue Lamp", "Oak Table", "Red Chair"]);
}

#[test]
fn newest_sort_keeps_the_snapshot_order() {
  setup_tracing();
  let mut view = CatalogView::new();
  view.render(&snapshot());

  view.sort(SortKey::Name);
  view.render(&snapshot());
  view.sort(SortKey::Newest);

  // Snapshots arrive pre-sorted createdAt descending; Newest is a no-op.
  assert_eq!(visible_names(&view), vec!["Red Chair", "Blue Lamp", "Oak Table"]);
}

#[test]
fn render_discards_previous_search_filter_and_sort_state() {
  setup_tracing();
  let mut view = CatalogView::new();
  view.render(&snapshot());
  view.search("lamp");
  view.sort(SortKey::PriceLow);

  view.render(&snapshot());

  assert_eq!(visible_names(&view), vec!["Red Chair", "Blue Lamp", "Oak Table"]);
}

#[test]
fn sort_keys_parse_from_their_ui_values() {
  setup_tracing();
  assert_eq!("name".parse::<SortKey>().unwrap(), SortKey::Name);
  assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceLow);
  assert_eq!("price-high".parse::<SortKey>().unwrap(), SortKey::PriceHigh);
  assert_eq!("newest".parse::<SortKey>().unwrap(), SortKey::Newest);
  assert!("oldest".parse::<SortKey>().is_err());
}
