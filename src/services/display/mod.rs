//! Display connection: responsibility and boundaries
//!
//! This module owns the single session with the X server: interned atoms for the
//! watched properties, property reads, event-mask subscriptions, blocking waits for
//! notifications and XTEST key injection. It knows nothing about which window or
//! title matters; tracking state lives in WindowTracker, decisions in LoginDispatcher.

#[cfg(test)]
pub mod mock;
mod r#trait;
mod x11;

pub use self::r#trait::{
    create_display, DisplayConnection, Notification, PropertyType, PropertyValue,
};
