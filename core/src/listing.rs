// vitrina/src/listing.rs

//! The live listing service: owns the single gateway subscription and fans
//! every delivered snapshot out to registered observers.
//!
//! Two states, `Unsubscribed` and `Subscribed` (represented by the presence
//! of the gateway handle). `start` subscribes, `stop` releases; both are
//! no-ops when already in the target state. A terminal listener error drops
//! the service back to `Unsubscribed` and pushes one empty update with the
//! `failed` flag set; there is no automatic retry.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{event, Level};

use crate::error::CatalogResult;
use crate::gateway::{ProductGateway, SnapshotEvent, SnapshotListener, SubscriptionHandle};
use crate::model::Product;

/// One delivery to listing observers. Consumers must treat `products` as
/// authoritative and fully replace whatever they rendered before.
#[derive(Debug, Clone)]
pub struct ListingUpdate {
  pub products: Vec<Product>,
  /// Set on the single update pushed after a terminal listener error;
  /// `products` is empty in that case.
  pub failed: bool,
}

/// Callback registered with the listing service.
pub type ListingObserver = Arc<dyn Fn(&ListingUpdate) + Send + Sync>;

/// Token returned by `register`, used to unregister the observer later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

struct ListingInner {
  observers: Vec<(u64, ListingObserver)>,
  next_observer_id: u64,
  handle: Option<SubscriptionHandle>,
}

pub struct LiveListingService {
  gateway: Arc<dyn ProductGateway>,
  inner: Arc<Mutex<ListingInner>>,
}

impl LiveListingService {
  pub fn new(gateway: Arc<dyn ProductGateway>) -> Self {
    Self {
      gateway,
      inner: Arc::new(Mutex::new(ListingInner {
        observers: Vec::new(),
        next_observer_id: 0,
        handle: None,
      })),
    }
  }

  /// Registers an observer. Observers registered before `start` receive the
  /// initial snapshot; ones registered after receive deliveries from the
  /// next collection change onward.
  pub fn register(&self, observer: ListingObserver) -> ObserverId {
    let mut inner = self.inner.lock();
    let id = inner.next_observer_id;
    inner.next_observer_id += 1;
    inner.observers.push((id, observer));
    ObserverId(id)
  }

  pub fn unregister(&self, id: ObserverId) {
    self.inner.lock().observers.retain(|(oid, _)| *oid != id.0);
  }

  pub fn is_subscribed(&self) -> bool {
    self.inner.lock().handle.is_some()
  }

  /// Subscribes to the gateway. Starting while already subscribed is a
  /// no-op; the page holds at most one live subscription at a time.
  pub fn start(&self) -> CatalogResult<()> {
    if self.inner.lock().handle.is_some() {
      event!(Level::DEBUG, "listing already subscribed");
      return Ok(());
    }

    let inner = Arc::clone(&self.inner);
    let listener: SnapshotListener = Arc::new(move |snapshot_event| match snapshot_event {
      SnapshotEvent::Update(products) => {
        let observers = inner.lock().observers.clone();
        let update = ListingUpdate {
          products,
          failed: false,
        };
        event!(
          Level::TRACE,
          products = update.products.len(),
          observers = observers.len(),
          "forwarding listing snapshot"
        );
        for (_, observer) in &observers {
          observer(&update);
        }
      }
      SnapshotEvent::Terminated(message) => {
        event!(Level::ERROR, "live listener terminated: {}", message);
        // Back to Unsubscribed; the handle must drop outside the lock
        // since cancelling it re-enters the gateway.
        let (handle, observers) = {
          let mut guard = inner.lock();
          (guard.handle.take(), guard.observers.clone())
        };
        drop(handle);
        let update = ListingUpdate {
          products: Vec::new(),
          failed: true,
        };
        for (_, observer) in &observers {
          observer(&update);
        }
      }
    });

    // The initial snapshot is delivered synchronously inside subscribe, so
    // the inner lock must not be held across this call.
    let handle = self.gateway.subscribe(listener)?;
    self.inner.lock().handle = Some(handle);
    event!(Level::DEBUG, "listing subscribed");
    Ok(())
  }

  /// Releases the gateway subscription. No-op while unsubscribed.
  pub fn stop(&self) {
    let handle = self.inner.lock().handle.take();
    if let Some(handle) = handle {
      handle.cancel();
      event!(Level::DEBUG, "listing unsubscribed");
    }
  }
}

impl Drop for LiveListingService {
  fn drop(&mut self) {
    self.stop();
  }
}
