//! Host framework bindings.
//!
//! Each host turns its native request into a [`HostEvent`] and its
//! finished [`NativeResponse`] back into a native response.
//!
//! [`HostEvent`]: crate::adapter::HostEvent
//! [`NativeResponse`]: crate::adapter::NativeResponse

pub mod axum;

pub use self::axum::{AdapterState, AxumEvent};
