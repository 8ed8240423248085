//! GPU error types.

use ash::vk;
use thiserror::Error;

/// Errors fatal to instance bring-up. None are retried.
#[derive(Error, Debug)]
pub enum GpuError {
    /// The Vulkan driver/loader could not be bound.
    #[error("Failed to load Vulkan driver: {0}")]
    DriverLoad(String),

    /// A required instance extension is not offered by the driver.
    #[error("Required instance extension is missing: {0}")]
    MissingExtension(String),

    /// A requested instance layer is not offered by the driver.
    #[error("Requested instance layer is missing: {0}")]
    MissingLayer(String),

    /// The driver refused to create the instance or debug messenger.
    #[error("Instance creation failed: {0}")]
    InstanceCreation(vk::Result),

    /// An adopted instance handle was null.
    #[error("Adopted instance handle is null")]
    InvalidHandle,

    /// No Vulkan-capable physical device was enumerated.
    #[error("No suitable GPU found")]
    NoSuitableDevice,

    /// Vulkan error from an enumeration call.
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::Result),
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, GpuError>;
