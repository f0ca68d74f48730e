//! In-memory driver and windowing library for tests

use ash::prelude::VkResult;
use ash::vk::{self, Handle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::WindowConfig;
use crate::render::{DeviceProperties, InstanceRequest, VulkanDriver};
use crate::window::{WindowBackend, WindowError, WindowResult, WindowSystem};

/// Driver calls, in the order they were made
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    AvailableLayers,
    CreateInstance,
    DestroyInstance(vk::Instance),
    CreateDebugMessenger,
    DestroyDebugMessenger,
    EnumeratePhysicalDevices,
    PhysicalDeviceProperties(vk::PhysicalDevice),
    QueueFamilyProperties(vk::PhysicalDevice),
    CreateDevice {
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    },
    DestroyDevice(vk::Device),
    DestroySurface(vk::SurfaceKHR),
}

/// A fake physical device
#[derive(Debug, Clone)]
pub struct MockDevice {
    name: String,
    device_type: vk::PhysicalDeviceType,
    geometry_shader: bool,
    queue_families: Vec<vk::QueueFlags>,
    properties_fail: bool,
}

impl MockDevice {
    pub fn discrete(name: &str) -> Self {
        Self {
            name: name.to_string(),
            device_type: vk::PhysicalDeviceType::DISCRETE_GPU,
            geometry_shader: true,
            queue_families: vec![vk::QueueFlags::GRAPHICS | vk::QueueFlags::COMPUTE],
            properties_fail: false,
        }
    }

    pub fn integrated(name: &str) -> Self {
        Self {
            device_type: vk::PhysicalDeviceType::INTEGRATED_GPU,
            ..Self::discrete(name)
        }
    }

    pub fn without_geometry_shader(mut self) -> Self {
        self.geometry_shader = false;
        self
    }

    /// Device whose properties query reports an error
    pub fn failing_properties(mut self) -> Self {
        self.properties_fail = true;
        self
    }

    pub fn with_queue_families(mut self, families: Vec<vk::QueueFlags>) -> Self {
        self.queue_families = families;
        self
    }
}

#[derive(Default)]
struct MockState {
    layers: Vec<String>,
    devices: Vec<(vk::PhysicalDevice, MockDevice)>,
    calls: Vec<Call>,
    instance_requests: Vec<InstanceRequest>,
    layers_fail: bool,
    enumeration_fails: bool,
    instance_error: Option<vk::Result>,
    messenger_fails: bool,
    device_fails: bool,
    live_instances: usize,
    live_messengers: usize,
    live_devices: usize,
    next_handle: u64,
}

impl MockState {
    fn next_raw(&mut self) -> u64 {
        self.next_handle += 1;
        0x100 + self.next_handle
    }
}

/// Scriptable [`VulkanDriver`] that records every call
#[derive(Default)]
pub struct MockDriver {
    state: RefCell<MockState>,
}

impl MockDriver {
    /// Driver whose layer list includes the Khronos validation layer
    pub fn with_validation_layer() -> Self {
        let driver = Self::default();
        driver.state.borrow_mut().layers = vec![
            "VK_LAYER_MESA_device_select".to_string(),
            "VK_LAYER_KHRONOS_validation".to_string(),
        ];
        driver
    }

    /// Append a physical device to the enumeration order
    pub fn add_device(&self, device: MockDevice) -> vk::PhysicalDevice {
        let mut state = self.state.borrow_mut();
        let handle = vk::PhysicalDevice::from_raw(state.next_raw());
        state.devices.push((handle, device));
        handle
    }

    pub fn fail_layer_enumeration(&self) {
        self.state.borrow_mut().layers_fail = true;
    }

    pub fn fail_device_enumeration(&self) {
        self.state.borrow_mut().enumeration_fails = true;
    }

    pub fn fail_instance_creation(&self, error: vk::Result) {
        self.state.borrow_mut().instance_error = Some(error);
    }

    pub fn fail_debug_messenger(&self) {
        self.state.borrow_mut().messenger_fails = true;
    }

    pub fn fail_device_creation(&self) {
        self.state.borrow_mut().device_fails = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn last_instance_request(&self) -> Option<InstanceRequest> {
        self.state.borrow().instance_requests.last().cloned()
    }

    pub fn live_instances(&self) -> usize {
        self.state.borrow().live_instances
    }

    pub fn live_messengers(&self) -> usize {
        self.state.borrow().live_messengers
    }

    pub fn live_devices(&self) -> usize {
        self.state.borrow().live_devices
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn device(&self, handle: vk::PhysicalDevice) -> VkResult<MockDevice> {
        self.state
            .borrow()
            .devices
            .iter()
            .find(|(h, _)| *h == handle)
            .map(|(_, device)| device.clone())
            .ok_or(vk::Result::ERROR_DEVICE_LOST)
    }
}

impl VulkanDriver for MockDriver {
    fn available_layers(&self) -> VkResult<Vec<String>> {
        self.record(Call::AvailableLayers);
        let state = self.state.borrow();
        if state.layers_fail {
            return Err(vk::Result::ERROR_OUT_OF_HOST_MEMORY);
        }
        Ok(state.layers.clone())
    }

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<vk::Instance> {
        self.record(Call::CreateInstance);
        let mut state = self.state.borrow_mut();
        state.instance_requests.push(request.clone());
        if let Some(error) = state.instance_error {
            return Err(error);
        }
        state.live_instances += 1;
        Ok(vk::Instance::from_raw(state.next_raw()))
    }

    fn destroy_instance(&self, instance: vk::Instance) {
        self.record(Call::DestroyInstance(instance));
        self.state.borrow_mut().live_instances -= 1;
    }

    fn create_debug_messenger(&self, _instance: vk::Instance) -> VkResult<vk::DebugUtilsMessengerEXT> {
        self.record(Call::CreateDebugMessenger);
        let mut state = self.state.borrow_mut();
        if state.messenger_fails {
            return Err(vk::Result::ERROR_EXTENSION_NOT_PRESENT);
        }
        state.live_messengers += 1;
        Ok(vk::DebugUtilsMessengerEXT::from_raw(state.next_raw()))
    }

    fn destroy_debug_messenger(&self, _instance: vk::Instance, _messenger: vk::DebugUtilsMessengerEXT) {
        self.record(Call::DestroyDebugMessenger);
        self.state.borrow_mut().live_messengers -= 1;
    }

    fn enumerate_physical_devices(&self, _instance: vk::Instance) -> VkResult<Vec<vk::PhysicalDevice>> {
        self.record(Call::EnumeratePhysicalDevices);
        let state = self.state.borrow();
        if state.enumeration_fails {
            return Err(vk::Result::ERROR_INITIALIZATION_FAILED);
        }
        Ok(state.devices.iter().map(|(handle, _)| *handle).collect())
    }

    fn physical_device_properties(
        &self,
        _instance: vk::Instance,
        device: vk::PhysicalDevice,
    ) -> VkResult<DeviceProperties> {
        self.record(Call::PhysicalDeviceProperties(device));
        let device = self.device(device)?;
        if device.properties_fail {
            return Err(vk::Result::ERROR_DEVICE_LOST);
        }
        Ok(DeviceProperties {
            name: device.name,
            device_type: device.device_type,
            geometry_shader: device.geometry_shader,
        })
    }

    fn queue_family_properties(
        &self,
        _instance: vk::Instance,
        device: vk::PhysicalDevice,
    ) -> VkResult<Vec<vk::QueueFamilyProperties>> {
        self.record(Call::QueueFamilyProperties(device));
        let device = self.device(device)?;
        Ok(device
            .queue_families
            .iter()
            .map(|flags| vk::QueueFamilyProperties {
                queue_flags: *flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect())
    }

    fn create_device(
        &self,
        _instance: vk::Instance,
        physical_device: vk::PhysicalDevice,
        queue_family_index: u32,
    ) -> VkResult<vk::Device> {
        self.record(Call::CreateDevice {
            physical_device,
            queue_family_index,
        });
        let mut state = self.state.borrow_mut();
        if state.device_fails {
            return Err(vk::Result::ERROR_FEATURE_NOT_PRESENT);
        }
        state.live_devices += 1;
        Ok(vk::Device::from_raw(state.next_raw()))
    }

    fn destroy_device(&self, device: vk::Device) {
        self.record(Call::DestroyDevice(device));
        self.state.borrow_mut().live_devices -= 1;
    }

    fn destroy_surface(&self, _instance: vk::Instance, surface: vk::SurfaceKHR) {
        self.record(Call::DestroySurface(surface));
    }
}

/// Fake windowing library; its windows close after a fixed number of polls
pub struct MockWindowSystem {
    extensions: Vec<String>,
    polls: Rc<Cell<u32>>,
    close_after: u32,
    surface_error: Option<vk::Result>,
    window_fails: bool,
    windows_created: u32,
    last_config: Option<WindowConfig>,
}

impl MockWindowSystem {
    pub fn closing_after(polls: u32) -> Self {
        Self {
            extensions: vec!["VK_KHR_surface".to_string(), "VK_KHR_xcb_surface".to_string()],
            polls: Rc::new(Cell::new(0)),
            close_after: polls,
            surface_error: None,
            window_fails: false,
            windows_created: 0,
            last_config: None,
        }
    }

    pub fn failing_surface(mut self, error: vk::Result) -> Self {
        self.surface_error = Some(error);
        self
    }

    pub fn failing_window(mut self) -> Self {
        self.window_fails = true;
        self
    }

    pub fn polls(&self) -> u32 {
        self.polls.get()
    }

    pub const fn windows_created(&self) -> u32 {
        self.windows_created
    }

    pub fn last_config(&self) -> Option<&WindowConfig> {
        self.last_config.as_ref()
    }
}

impl WindowSystem for MockWindowSystem {
    type Window = MockWindow;

    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        Ok(self.extensions.clone())
    }

    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<MockWindow> {
        if self.window_fails {
            return Err(WindowError::CreationFailed);
        }
        self.windows_created += 1;
        self.last_config = Some(config.clone());
        Ok(MockWindow {
            polls: Rc::clone(&self.polls),
            close_after: self.close_after,
            surface_error: self.surface_error,
        })
    }

    fn poll_events(&mut self) {
        self.polls.set(self.polls.get() + 1);
    }
}

/// Window handed out by [`MockWindowSystem`]
pub struct MockWindow {
    polls: Rc<Cell<u32>>,
    close_after: u32,
    surface_error: Option<vk::Result>,
}

impl MockWindow {
    /// Standalone window not tied to a window system
    pub fn closing_after(polls: u32) -> Self {
        Self {
            polls: Rc::new(Cell::new(0)),
            close_after: polls,
            surface_error: None,
        }
    }

    pub fn failing_surface(mut self, error: vk::Result) -> Self {
        self.surface_error = Some(error);
        self
    }
}

impl WindowBackend for MockWindow {
    fn should_close(&self) -> bool {
        self.polls.get() >= self.close_after
    }

    fn create_vulkan_surface(&mut self, _instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        match self.surface_error {
            Some(error) => Err(error),
            None => Ok(vk::SurfaceKHR::from_raw(0x5000)),
        }
    }
}
