//! Vulkan instance bring-up for the Lumite engine.
//!
//! This crate provides:
//! - Instance creation with extension/validation-layer negotiation
//! - Physical device enumeration and preferred-GPU selection
//! - Debug-utils message routing into `tracing`
//!
//! Device and queue creation live downstream; this crate stops at the
//! instance boundary.

pub mod error;
pub mod instance;

pub use error::{GpuError, Result};
pub use instance::{Instance, InstanceConfig};
