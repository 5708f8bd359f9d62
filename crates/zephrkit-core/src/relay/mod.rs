//! # Relay Module
//!
//! The publish/subscribe bridge between the background service and its
//! observers. One [`RelayBus`] instance carries one event kind; the service
//! owns one for GNSS fixes and one for pose samples.
//!
//! ## Overview
//!
//! - Publishers emit events without knowing the subscribers
//! - Subscribers register synchronous handlers and receive events in
//!   publish order
//! - A new subscriber immediately receives the most recent event (replay of
//!   latest, not history)
//! - [`LatestObserver`] adapts the push model to polling consumers
//!
//! ## Usage
//!
//! ```rust
//! use zephrkit_core::relay::RelayBus;
//! use zephrkit_core::events::GnssEvent;
//!
//! let bus: RelayBus<GnssEvent> = RelayBus::new();
//! let subscription = bus.subscribe(|event| {
//!     println!("fix: {:?}", event.location);
//! });
//!
//! bus.publish(GnssEvent::fix(52.52, 13.40, 34.0));
//!
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod observer;

pub use bus::{RelayBus, RelayBusConfig, SubscriptionId};
pub use observer::LatestObserver;
