//! Instance creation and ownership

use ash::vk;
use std::rc::Rc;

use super::ash_driver::debug_utils_extension_name;
use super::driver::{InstanceRequest, VulkanDriver};
use crate::constants::{VALIDATION_LAYERS, VULKAN_API_VERSION_PINNED};
use crate::result::{Outcome, ResultCode};

/// Application metadata reported to the driver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceInfo {
    /// Application name
    pub app_name: String,
    /// Packed application version (see `vk::make_api_version`)
    pub app_version: u32,
    /// Engine name
    pub engine_name: String,
    /// Packed engine version
    pub engine_version: u32,
}

/// Names from `required` that are missing from `available`
///
/// Matching is exact and case-sensitive.
pub fn missing_layers<'a>(required: &[&'a str], available: &[String]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|name| !available.iter().any(|layer| layer == name))
        .collect()
}

/// Create an instance
///
/// `required_extensions` comes from the windowing library. With validation
/// enabled the debug utils extension and the validation layers are added,
/// and a missing layer fails the call before the driver is asked for an
/// instance.
pub fn create_instance<D: VulkanDriver + ?Sized>(
    driver: &D,
    info: InstanceInfo,
    required_extensions: &[String],
    enable_validation: bool,
) -> Outcome<vk::Instance> {
    let mut extensions = required_extensions.to_vec();
    let mut layers = Vec::new();

    if enable_validation {
        extensions.push(debug_utils_extension_name());

        let available = match driver.available_layers() {
            Ok(available) => available,
            Err(e) => {
                log::error!("Failed to enumerate instance layers: {:?}", e);
                return Outcome::failure(ResultCode::Unknown);
            }
        };

        let missing = missing_layers(VALIDATION_LAYERS, &available);
        if !missing.is_empty() {
            log::error!("Validation layers not present: {}", missing.join(", "));
            return Outcome::failure(ResultCode::ValidationLayerNotPresent);
        }

        log::debug!("{} extensions required by GLFW", required_extensions.len());
        for extension in required_extensions {
            log::debug!("\t{}", extension);
        }
        layers.extend(VALIDATION_LAYERS.iter().map(|name| (*name).to_string()));
    }

    let request = InstanceRequest {
        app_name: info.app_name,
        app_version: info.app_version,
        engine_name: info.engine_name,
        engine_version: info.engine_version,
        api_version: VULKAN_API_VERSION_PINNED,
        extensions,
        layers,
    };

    match driver.create_instance(&request) {
        Ok(instance) => Outcome::success(instance),
        Err(e) => {
            log::error!("vkCreateInstance failed: {:?}", e);
            Outcome::failure(ResultCode::Unknown)
        }
    }
}

/// Create the diagnostics messenger for `instance`
pub fn create_debug_messenger<D: VulkanDriver + ?Sized>(
    driver: &D,
    instance: vk::Instance,
) -> Outcome<vk::DebugUtilsMessengerEXT> {
    match driver.create_debug_messenger(instance) {
        Ok(messenger) => Outcome::success(messenger),
        Err(e) => {
            log::error!("Failed to create debug messenger: {:?}", e);
            Outcome::failure(ResultCode::Unknown)
        }
    }
}

/// Exclusive owner of the instance and its diagnostics messenger
///
/// Dropping releases the messenger first, then the instance.
pub struct Context<D: VulkanDriver> {
    driver: Rc<D>,
    instance: vk::Instance,
    debug_messenger: Option<vk::DebugUtilsMessengerEXT>,
}

impl<D: VulkanDriver> Context<D> {
    /// Create the instance and, when validating, its messenger
    pub fn create(
        driver: Rc<D>,
        info: InstanceInfo,
        required_extensions: &[String],
        enable_validation: bool,
    ) -> Outcome<Self> {
        let created = create_instance(&*driver, info, required_extensions, enable_validation);
        if !created.has_value() {
            return Outcome::failure(created.code());
        }
        let mut context = Self {
            driver,
            instance: created.into_value(),
            debug_messenger: None,
        };
        log::debug!("Instance Created.");

        if enable_validation {
            let messenger = create_debug_messenger(&*context.driver, context.instance);
            if !messenger.has_value() {
                return Outcome::failure(messenger.code());
            }
            context.debug_messenger = Some(messenger.into_value());
            log::debug!("Debug Messenger Created.");
        }

        Outcome::success(context)
    }

    /// The instance handle
    pub const fn instance(&self) -> vk::Instance {
        self.instance
    }

    /// The diagnostics messenger, if validation is enabled
    pub const fn debug_messenger(&self) -> Option<vk::DebugUtilsMessengerEXT> {
        self.debug_messenger
    }
}

impl<D: VulkanDriver> Drop for Context<D> {
    fn drop(&mut self) {
        if let Some(messenger) = self.debug_messenger.take() {
            self.driver.destroy_debug_messenger(self.instance, messenger);
        }
        self.driver.destroy_instance(self.instance);
    }
}
