//! Graphics driver seam
//!
//! The bootstrap talks to Vulkan only through [`VulkanDriver`]. The
//! production implementation is [`super::AshDriver`]; tests plug in an
//! in-memory driver.

use ash::prelude::VkResult;
use ash::vk;

/// Everything needed to build an instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceRequest {
    /// Application name
    pub app_name: String,
    /// Packed application version
    pub app_version: u32,
    /// Engine name
    pub engine_name: String,
    /// Packed engine version
    pub engine_version: u32,
    /// Requested API version
    pub api_version: u32,
    /// Instance extensions to enable
    pub extensions: Vec<String>,
    /// Instance layers to enable
    pub layers: Vec<String>,
}

/// Physical device properties relevant to selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Driver-reported device name
    pub name: String,
    /// Device type (discrete, integrated, ...)
    pub device_type: vk::PhysicalDeviceType,
    /// Whether the geometry shader feature is supported
    pub geometry_shader: bool,
}

/// Vulkan operations used by the bootstrap sequence
///
/// Methods take `&self`; the driver is shared by the RAII owners that
/// release what it created.
pub trait VulkanDriver {
    /// Names of the instance layers installed on this system
    fn available_layers(&self) -> VkResult<Vec<String>>;

    /// Create an instance
    fn create_instance(&self, request: &InstanceRequest) -> VkResult<vk::Instance>;

    /// Destroy an instance created by this driver
    fn destroy_instance(&self, instance: vk::Instance);

    /// Create a diagnostics messenger forwarding validation output to the log
    fn create_debug_messenger(&self, instance: vk::Instance) -> VkResult<vk::DebugUtilsMessengerEXT>;

    /// Destroy a diagnostics messenger
    fn destroy_debug_messenger(&self, instance: vk::Instance, messenger: vk::DebugUtilsMessengerEXT);

    /// Physical devices in enumeration order
    fn enumerate_physical_devices(&self, instance: vk::Instance) -> VkResult<Vec<vk::PhysicalDevice>>;

    /// Properties and features of a physical device
    fn physical_device_properties(
        &self,
        instance: vk::Instance,
        device: vk::PhysicalDevice,
    ) -> VkResult<DeviceProperties>;

    /// Queue families of a physical device, indexed by family
    fn queue_family_properties(
        &self,
        instance: vk::Instance,
        device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>>;

    /// Create a logical device with one queue from `queue_family_index`
    fn create_device(
        &self,
        instance: vk::Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> VkResult<vk::Device>;

    /// Destroy a logical device
    fn destroy_device(&self, device: vk::Device);

    /// Destroy a window surface
    fn destroy_surface(&self, instance: vk::Instance, surface: vk::SurfaceKHR);
}
