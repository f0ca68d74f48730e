//! Vulkan driver backed by `ash`
//!
//! Keeps the loaded function tables for the instance, its extension
//! loaders and the logical devices it created, so raw handles coming back
//! through [`VulkanDriver`] can be resolved to callable objects.

use ash::extensions::ext::DebugUtils;
use ash::extensions::khr;
use ash::prelude::VkResult;
use ash::vk;
use ash::{Device, Entry, Instance};
use std::cell::RefCell;
use std::ffi::{c_char, CStr, CString};

use super::driver::{DeviceProperties, InstanceRequest, VulkanDriver};

/// Name of the debug utils instance extension
pub fn debug_utils_extension_name() -> String {
    DebugUtils::name().to_string_lossy().into_owned()
}

/// Production driver: the system Vulkan loader
pub struct AshDriver {
    entry: Entry,
    instance: RefCell<Option<Instance>>,
    debug_utils: RefCell<Option<DebugUtils>>,
    surface_loader: RefCell<Option<khr::Surface>>,
    devices: RefCell<Vec<Device>>,
}

impl AshDriver {
    /// Load the system Vulkan library
    pub fn load() -> Result<Self, ash::LoadingError> {
        let entry = unsafe { Entry::load() }?;
        Ok(Self {
            entry,
            instance: RefCell::new(None),
            debug_utils: RefCell::new(None),
            surface_loader: RefCell::new(None),
            devices: RefCell::new(Vec::new()),
        })
    }

    fn loaded_instance(&self, handle: vk::Instance) -> VkResult<Instance> {
        self.instance
            .borrow()
            .as_ref()
            .filter(|instance| instance.handle() == handle)
            .cloned()
            .ok_or(vk::Result::ERROR_INITIALIZATION_FAILED)
    }
}

/// Fails when `slot` already holds a loaded table
fn ensure_vacant<T>(slot: Option<&T>) -> VkResult<()> {
    if slot.is_some() {
        log::error!("An instance is already loaded; destroy it before creating another");
        return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
    }
    Ok(())
}

fn to_cstring(value: &str) -> VkResult<CString> {
    CString::new(value).map_err(|_| vk::Result::ERROR_INITIALIZATION_FAILED)
}

fn fixed_str(raw: &[c_char]) -> String {
    unsafe { CStr::from_ptr(raw.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

impl VulkanDriver for AshDriver {
    fn available_layers(&self) -> VkResult<Vec<String>> {
        let layers = self.entry.enumerate_instance_layer_properties()?;
        Ok(layers.iter().map(|layer| fixed_str(&layer.layer_name)).collect())
    }

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<vk::Instance> {
        ensure_vacant(self.instance.borrow().as_ref())?;

        let app_name = to_cstring(&request.app_name)?;
        let engine_name = to_cstring(&request.engine_name)?;
        let extensions = request
            .extensions
            .iter()
            .map(|name| to_cstring(name))
            .collect::<VkResult<Vec<_>>>()?;
        let layers = request
            .layers
            .iter()
            .map(|name| to_cstring(name))
            .collect::<VkResult<Vec<_>>>()?;

        let extension_ptrs: Vec<*const c_char> = extensions.iter().map(|ext| ext.as_ptr()).collect();
        let layer_ptrs: Vec<*const c_char> = layers.iter().map(|layer| layer.as_ptr()).collect();

        let app_info = vk::ApplicationInfo::builder()
            .application_name(&app_name)
            .application_version(request.app_version)
            .engine_name(&engine_name)
            .engine_version(request.engine_version)
            .api_version(request.api_version);

        let create_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_extension_names(&extension_ptrs)
            .enabled_layer_names(&layer_ptrs);

        let instance = unsafe { self.entry.create_instance(&create_info, None)? };
        let handle = instance.handle();

        *self.surface_loader.borrow_mut() = Some(khr::Surface::new(&self.entry, &instance));
        *self.instance.borrow_mut() = Some(instance);
        Ok(handle)
    }

    fn destroy_instance(&self, instance: vk::Instance) {
        let Ok(loaded) = self.loaded_instance(instance) else {
            log::warn!("Ignoring destroy of unknown instance {:?}", instance);
            return;
        };

        self.debug_utils.borrow_mut().take();
        self.surface_loader.borrow_mut().take();
        self.instance.borrow_mut().take();
        unsafe { loaded.destroy_instance(None) };
    }

    fn create_debug_messenger(&self, instance: vk::Instance) -> VkResult<vk::DebugUtilsMessengerEXT> {
        let loaded = self.loaded_instance(instance)?;
        let debug_utils = DebugUtils::new(&self.entry, &loaded);

        let create_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
            .message_severity(
                vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                    | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            )
            .message_type(
                vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                    | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                    | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
            )
            .pfn_user_callback(Some(debug_callback));

        let messenger = unsafe { debug_utils.create_debug_utils_messenger(&create_info, None)? };
        *self.debug_utils.borrow_mut() = Some(debug_utils);
        Ok(messenger)
    }

    fn destroy_debug_messenger(&self, _instance: vk::Instance, messenger: vk::DebugUtilsMessengerEXT) {
        if let Some(debug_utils) = self.debug_utils.borrow().as_ref() {
            unsafe { debug_utils.destroy_debug_utils_messenger(messenger, None) };
        }
    }

    fn enumerate_physical_devices(&self, instance: vk::Instance) -> VkResult<Vec<vk::PhysicalDevice>> {
        let loaded = self.loaded_instance(instance)?;
        unsafe { loaded.enumerate_physical_devices() }
    }

    fn physical_device_properties(
        &self,
        instance: vk::Instance,
        device: vk::PhysicalDevice,
    ) -> VkResult<DeviceProperties> {
        let loaded = self.loaded_instance(instance)?;
        let properties = unsafe { loaded.get_physical_device_properties(device) };
        let features = unsafe { loaded.get_physical_device_features(device) };

        Ok(DeviceProperties {
            name: fixed_str(&properties.device_name),
            device_type: properties.device_type,
            geometry_shader: features.geometry_shader == vk::TRUE,
        })
    }

    fn queue_family_properties(
        &self,
        instance: vk::Instance,
        device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>> {
        let loaded = self.loaded_instance(instance)?;
        Ok(unsafe { loaded.get_physical_device_queue_family_properties(device) })
    }

    fn create_device(
        &self,
        instance: vk::Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> VkResult<vk::Device> {
        let loaded = self.loaded_instance(instance)?;

        let priorities = [1.0_f32];
        let queue_infos = [vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(queue_family_index)
            .queue_priorities(&priorities)
            .build()];
        let features = vk::PhysicalDeviceFeatures::default();

        let create_info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(&queue_infos)
            .enabled_features(&features);

        let device = unsafe { loaded.create_device(physical_device, &create_info, None)? };
        let handle = device.handle();
        self.devices.borrow_mut().push(device);
        Ok(handle)
    }

    fn destroy_device(&self, device: vk::Device) {
        let mut devices = self.devices.borrow_mut();
        let Some(position) = devices.iter().position(|d| d.handle() == device) else {
            log::warn!("Ignoring destroy of unknown device {:?}", device);
            return;
        };

        let device = devices.swap_remove(position);
        unsafe {
            if let Err(e) = device.device_wait_idle() {
                log::warn!("Failed to wait for device idle before destroy: {:?}", e);
            }
            device.destroy_device(None);
        }
    }

    fn destroy_surface(&self, _instance: vk::Instance, surface: vk::SurfaceKHR) {
        if let Some(loader) = self.surface_loader.borrow().as_ref() {
            unsafe { loader.destroy_surface(surface, None) };
        }
    }
}

/// Forwards validation layer output to the log
unsafe extern "system" fn debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::ffi::c_void,
) -> vk::Bool32 {
    if callback_data.is_null() || (*callback_data).p_message.is_null() {
        return vk::FALSE;
    }
    let message = CStr::from_ptr((*callback_data).p_message).to_string_lossy();

    if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        log::error!("VK VALIDATION LAYER: {:?} - {}", message_type, message);
    } else if message_severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        log::warn!("VK VALIDATION LAYER: {:?} - {}", message_type, message);
    } else {
        log::debug!("VK VALIDATION LAYER: {:?} - {}", message_type, message);
    }

    vk::FALSE
}
