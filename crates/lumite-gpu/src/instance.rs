//! Vulkan instance creation and capability negotiation.

use crate::error::{GpuError, Result};
use ash::ext::debug_utils;
use ash::vk;
use std::ffi::{c_char, c_void, CStr, CString};

/// Validation layer sets to try, in priority order.
///
/// The unified Khronos layer is preferred; older loaders only offer the
/// LunarG meta layer, its five component layers, or core validation alone.
const VALIDATION_LAYER_PRIORITY_LIST: &[&[&str]] = &[
    &["VK_LAYER_KHRONOS_validation"],
    &["VK_LAYER_LUNARG_standard_validation"],
    &[
        "VK_LAYER_GOOGLE_threading",
        "VK_LAYER_LUNARG_parameter_validation",
        "VK_LAYER_LUNARG_object_tracker",
        "VK_LAYER_LUNARG_core_validation",
        "VK_LAYER_GOOGLE_unique_objects",
    ],
    &["VK_LAYER_LUNARG_core_validation"],
];

/// Check that every required extension is offered by the driver.
///
/// Exact, case-sensitive string match. The error names the first missing
/// extension.
pub fn validate_extensions(required: &[String], available: &[String]) -> Result<()> {
    for name in required {
        if !available.iter().any(|a| a == name) {
            tracing::error!(extension = %name, "required instance extension not found");
            return Err(GpuError::MissingExtension(name.clone()));
        }
    }
    Ok(())
}

/// Check that every requested layer is offered by the driver.
pub fn validate_layers(required: &[String], available: &[String]) -> Result<()> {
    for name in required {
        if !available.iter().any(|a| a == name) {
            tracing::error!(layer = %name, "requested instance layer not found");
            return Err(GpuError::MissingLayer(name.clone()));
        }
    }
    Ok(())
}

/// Pick the best fully-available validation layer set.
///
/// Walks [`VALIDATION_LAYER_PRIORITY_LIST`] and returns the first candidate
/// whose layers are all available, or an empty set when none is.
#[must_use]
pub fn optimal_validation_layers(available: &[String]) -> Vec<String> {
    for candidate in VALIDATION_LAYER_PRIORITY_LIST {
        if candidate.iter().all(|l| available.iter().any(|a| a == l)) {
            return candidate.iter().map(|l| (*l).to_string()).collect();
        }
        tracing::warn!(
            candidate = ?candidate,
            "validation layer set not fully available, falling back"
        );
    }
    Vec::new()
}

/// Runtime configuration for instance bring-up.
#[derive(Debug, Clone)]
pub struct InstanceConfig {
    /// Application name reported to the driver.
    pub app_name: String,
    /// Extensions the application cannot run without.
    pub required_extensions: Vec<String>,
    /// Layers the application cannot run without.
    pub required_layers: Vec<String>,
    /// Skip the windowing-surface extension and opportunistically probe
    /// for headless surfaces instead.
    pub headless: bool,
    /// Auto-select a validation layer set from the priority list.
    pub enable_validation: bool,
    /// Enable the debug-utils extension and message callback.
    pub enable_debug_reporting: bool,
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            app_name: "Lumite".to_string(),
            required_extensions: Vec::new(),
            required_layers: Vec::new(),
            headless: false,
            enable_validation: cfg!(debug_assertions),
            enable_debug_reporting: cfg!(debug_assertions),
        }
    }
}

impl InstanceConfig {
    /// Create a config with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the application name.
    #[must_use]
    pub fn app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = name.into();
        self
    }

    /// Add a required instance extension.
    #[must_use]
    pub fn require_extension(mut self, name: impl Into<String>) -> Self {
        self.required_extensions.push(name.into());
        self
    }

    /// Add a required instance layer.
    #[must_use]
    pub fn require_layer(mut self, name: impl Into<String>) -> Self {
        self.required_layers.push(name.into());
        self
    }

    /// Run without a windowing surface.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Enable or disable validation layer auto-selection.
    #[must_use]
    pub fn validation(mut self, enable: bool) -> Self {
        self.enable_validation = enable;
        self
    }

    /// Enable or disable debug-utils reporting.
    #[must_use]
    pub fn debug_reporting(mut self, enable: bool) -> Self {
        self.enable_debug_reporting = enable;
        self
    }
}

/// Owns the Vulkan instance handle, the enabled extension list, and the
/// enumerated physical devices.
///
/// Extension and device lists are immutable after construction and safe to
/// read from any thread.
pub struct Instance {
    // Entry must be kept alive for the lifetime of the instance
    #[allow(dead_code)]
    entry: ash::Entry,
    raw: ash::Instance,
    debug_messenger: Option<(debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    extensions: Vec<String>,
    gpus: Vec<vk::PhysicalDevice>,
}

impl Instance {
    /// Create an instance, negotiating extensions and layers against what
    /// the driver reports.
    pub fn new(config: &InstanceConfig) -> Result<Self> {
        let entry =
            unsafe { ash::Entry::load() }.map_err(|e| GpuError::DriverLoad(e.to_string()))?;

        let available_extensions: Vec<String> =
            unsafe { entry.enumerate_instance_extension_properties(None) }?
                .iter()
                .map(|props| cstr_field_to_string(&props.extension_name))
                .collect();

        let mut extensions = config.required_extensions.clone();
        if config.enable_debug_reporting {
            extensions.push(name_to_string(debug_utils::NAME));
        }
        if config.headless {
            let headless_name = name_to_string(ash::ext::headless_surface::NAME);
            if available_extensions.contains(&headless_name) {
                tracing::info!(extension = %headless_name, "headless surface available, enabling it");
                extensions.push(headless_name);
            } else {
                tracing::warn!(
                    extension = %headless_name,
                    "headless surface not available, disabling swapchain creation"
                );
            }
        } else {
            extensions.push(name_to_string(ash::khr::surface::NAME));
        }
        validate_extensions(&extensions, &available_extensions)?;

        let available_layers: Vec<String> =
            unsafe { entry.enumerate_instance_layer_properties() }?
                .iter()
                .map(|props| cstr_field_to_string(&props.layer_name))
                .collect();

        let mut layers = config.required_layers.clone();
        if config.enable_validation {
            layers.extend(optimal_validation_layers(&available_layers));
        }
        validate_layers(&layers, &available_layers)?;
        if !layers.is_empty() {
            tracing::info!(layers = ?layers, "enabled instance layers");
        }

        let app_name = CString::new(config.app_name.as_str()).unwrap_or_default();
        let engine_name = c"Lumite";
        let app_info = vk::ApplicationInfo::default()
            .application_name(&app_name)
            .application_version(vk::make_api_version(0, 0, 1, 0))
            .engine_name(engine_name)
            .engine_version(vk::make_api_version(0, 0, 1, 0))
            .api_version(vk::API_VERSION_1_0);

        // Validated against the driver's lists above, so no interior nuls
        let extension_cstrings = to_cstrings(&extensions);
        let layer_cstrings = to_cstrings(&layers);
        let extension_ptrs: Vec<*const c_char> =
            extension_cstrings.iter().map(|s| s.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = layer_cstrings.iter().map(|s| s.as_ptr()).collect();

        let mut debug_info = debug_messenger_create_info();
        let mut create_info = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);
        if config.enable_debug_reporting {
            // Covers messages emitted during instance creation itself
            create_info = create_info.push_next(&mut debug_info);
        }

        let raw = unsafe { entry.create_instance(&create_info, None) }
            .map_err(GpuError::InstanceCreation)?;

        let debug_messenger = if config.enable_debug_reporting {
            let loader = debug_utils::Instance::new(&entry, &raw);
            match unsafe { loader.create_debug_utils_messenger(&debug_info, None) } {
                Ok(messenger) => Some((loader, messenger)),
                Err(result) => {
                    unsafe { raw.destroy_instance(None) };
                    return Err(GpuError::InstanceCreation(result));
                }
            }
        } else {
            None
        };

        // Instance assembled before device enumeration so Drop cleans up
        // on failure
        let mut instance = Self {
            entry,
            raw,
            debug_messenger,
            extensions,
            gpus: Vec::new(),
        };
        instance.query_gpus()?;
        Ok(instance)
    }

    /// Adopt an externally created instance handle.
    ///
    /// Ownership transfers: the handle is destroyed when this object
    /// drops. No extensions are recorded for adopted handles.
    ///
    /// # Safety
    /// `raw` must be a valid instance created from `entry`, or null.
    pub unsafe fn from_handle(entry: ash::Entry, raw: vk::Instance) -> Result<Self> {
        if raw == vk::Instance::null() {
            return Err(GpuError::InvalidHandle);
        }
        let raw = unsafe { ash::Instance::load(entry.static_fn(), raw) };
        let mut instance = Self {
            entry,
            raw,
            debug_messenger: None,
            extensions: Vec::new(),
            gpus: Vec::new(),
        };
        instance.query_gpus()?;
        Ok(instance)
    }

    fn query_gpus(&mut self) -> Result<()> {
        let gpus = unsafe { self.raw.enumerate_physical_devices() }?;
        if gpus.is_empty() {
            return Err(GpuError::NoSuitableDevice);
        }
        tracing::info!(count = gpus.len(), "enumerated physical devices");
        self.gpus = gpus;
        Ok(())
    }

    /// First discrete GPU, or the first enumerated device when none is
    /// discrete.
    #[must_use]
    pub fn select_preferred_gpu(&self) -> vk::PhysicalDevice {
        for &gpu in &self.gpus {
            let properties = unsafe { self.raw.get_physical_device_properties(gpu) };
            if properties.device_type == vk::PhysicalDeviceType::DISCRETE_GPU {
                return gpu;
            }
        }
        tracing::warn!("couldn't find a discrete physical device, using the first enumerated one");
        // Construction guarantees at least one device
        self.gpus[0]
    }

    /// Exact-match membership test against the enabled extension list.
    #[must_use]
    pub fn is_extension_enabled(&self, name: &str) -> bool {
        self.extensions.iter().any(|e| e == name)
    }

    /// The raw instance handle.
    #[must_use]
    pub fn handle(&self) -> vk::Instance {
        self.raw.handle()
    }

    /// The loaded instance function table, for downstream device creation.
    #[must_use]
    pub fn raw(&self) -> &ash::Instance {
        &self.raw
    }

    /// The Vulkan entry point the instance was created from.
    #[must_use]
    pub fn entry(&self) -> &ash::Entry {
        &self.entry
    }

    /// Extensions enabled at creation.
    #[must_use]
    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Enumerated physical devices. Never empty after construction.
    #[must_use]
    pub fn gpus(&self) -> &[vk::PhysicalDevice] {
        &self.gpus
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        unsafe {
            if let Some((loader, messenger)) = self.debug_messenger.take() {
                if messenger != vk::DebugUtilsMessengerEXT::null() {
                    loader.destroy_debug_utils_messenger(messenger, None);
                }
            }
            if self.raw.handle() != vk::Instance::null() {
                self.raw.destroy_instance(None);
            }
        }
    }
}

fn debug_messenger_create_info() -> vk::DebugUtilsMessengerCreateInfoEXT<'static> {
    vk::DebugUtilsMessengerCreateInfoEXT::default()
        .message_severity(
            vk::DebugUtilsMessageSeverityFlagsEXT::ERROR
                | vk::DebugUtilsMessageSeverityFlagsEXT::WARNING,
        )
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .pfn_user_callback(Some(debug_utils_callback))
}

/// Route driver diagnostics into `tracing` by severity.
unsafe extern "system" fn debug_utils_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    _types: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut c_void,
) -> vk::Bool32 {
    if data.is_null() {
        return vk::FALSE;
    }
    let message = unsafe {
        let p_message = (*data).p_message;
        if p_message.is_null() {
            String::new()
        } else {
            CStr::from_ptr(p_message).to_string_lossy().into_owned()
        }
    };
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        tracing::error!("{message}");
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::WARNING) {
        tracing::warn!("{message}");
    } else if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::INFO) {
        tracing::info!("{message}");
    } else {
        tracing::debug!("{message}");
    }
    vk::FALSE
}

fn name_to_string(name: &CStr) -> String {
    name.to_string_lossy().into_owned()
}

fn cstr_field_to_string(field: &[c_char]) -> String {
    // Driver-reported names are nul-terminated within their fixed array
    unsafe { CStr::from_ptr(field.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

fn to_cstrings(names: &[String]) -> Vec<CString> {
    names
        .iter()
        .filter_map(|n| CString::new(n.as_str()).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| (*n).to_string()).collect()
    }

    #[test]
    fn missing_extension_names_the_absentee() {
        let required = strings(&["VK_KHR_surface", "VK_KHR_xcb_surface"]);
        let available = strings(&["VK_KHR_surface"]);
        let err = validate_extensions(&required, &available).unwrap_err();
        match err {
            GpuError::MissingExtension(name) => assert_eq!(name, "VK_KHR_xcb_surface"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extension_match_is_case_sensitive() {
        let required = strings(&["VK_KHR_surface"]);
        let available = strings(&["vk_khr_surface"]);
        assert!(validate_extensions(&required, &available).is_err());
    }

    #[test]
    fn empty_required_set_always_validates() {
        assert!(validate_extensions(&[], &[]).is_ok());
        assert!(validate_layers(&[], &strings(&["VK_LAYER_KHRONOS_validation"])).is_ok());
    }

    #[test]
    fn missing_layer_reported() {
        let required = strings(&["VK_LAYER_KHRONOS_validation"]);
        let err = validate_layers(&required, &[]).unwrap_err();
        assert!(matches!(err, GpuError::MissingLayer(_)));
    }

    #[test]
    fn prefers_unified_validation_layer() {
        let available = strings(&[
            "VK_LAYER_LUNARG_core_validation",
            "VK_LAYER_KHRONOS_validation",
        ]);
        assert_eq!(
            optimal_validation_layers(&available),
            strings(&["VK_LAYER_KHRONOS_validation"])
        );
    }

    #[test]
    fn falls_back_to_meta_layer() {
        let available = strings(&["VK_LAYER_LUNARG_standard_validation"]);
        assert_eq!(
            optimal_validation_layers(&available),
            strings(&["VK_LAYER_LUNARG_standard_validation"])
        );
    }

    #[test]
    fn falls_back_to_component_layers_only_when_all_present() {
        let complete = strings(&[
            "VK_LAYER_GOOGLE_threading",
            "VK_LAYER_LUNARG_parameter_validation",
            "VK_LAYER_LUNARG_object_tracker",
            "VK_LAYER_LUNARG_core_validation",
            "VK_LAYER_GOOGLE_unique_objects",
        ]);
        assert_eq!(optimal_validation_layers(&complete).len(), 5);

        // One component missing: skip to the core-validation fallback
        let partial = strings(&[
            "VK_LAYER_GOOGLE_threading",
            "VK_LAYER_LUNARG_core_validation",
        ]);
        assert_eq!(
            optimal_validation_layers(&partial),
            strings(&["VK_LAYER_LUNARG_core_validation"])
        );
    }

    #[test]
    fn no_usable_layers_returns_empty_set() {
        assert!(optimal_validation_layers(&[]).is_empty());
    }

    #[test]
    fn config_builder_accumulates() {
        let config = InstanceConfig::new()
            .app_name("demo")
            .require_extension("VK_KHR_get_physical_device_properties2")
            .require_layer("VK_LAYER_KHRONOS_validation")
            .headless(true)
            .validation(false)
            .debug_reporting(false);
        assert_eq!(config.app_name, "demo");
        assert_eq!(config.required_extensions.len(), 1);
        assert_eq!(config.required_layers.len(), 1);
        assert!(config.headless);
        assert!(!config.enable_validation);
        assert!(!config.enable_debug_reporting);
    }
}
