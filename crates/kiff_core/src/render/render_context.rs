//! Physical device selection and logical device ownership

use ash::vk;
use std::rc::Rc;

use super::driver::VulkanDriver;
use crate::result::{Outcome, ResultCode};

/// Queue family indices resolved for a physical device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueFamilyIndices {
    /// Index of the first graphics-capable queue family, if any
    pub graphics_family: Option<u32>,
}

impl QueueFamilyIndices {
    /// Whether every required family has been found
    pub const fn is_complete(&self) -> bool {
        self.graphics_family.is_some()
    }

    /// Scan queue families in order; the first one with the graphics bit wins
    pub fn from_properties(families: &[vk::QueueFamilyProperties]) -> Self {
        let graphics_family = families
            .iter()
            .position(|family| family.queue_flags.contains(vk::QueueFlags::GRAPHICS))
            .and_then(|index| u32::try_from(index).ok());
        Self { graphics_family }
    }
}

/// A selected physical device and its queue families
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhysicalDevice {
    /// Physical device handle (enumerated, not owned)
    pub handle: vk::PhysicalDevice,
    /// Resolved queue family indices
    pub queue_family_indices: QueueFamilyIndices,
    /// Driver-reported device name
    pub name: String,
    /// Device type
    pub device_type: vk::PhysicalDeviceType,
}

/// Resolve the queue families of `device`
pub fn find_queue_families<D: VulkanDriver + ?Sized>(
    driver: &D,
    instance: vk::Instance,
    device: vk::PhysicalDevice,
) -> Outcome<QueueFamilyIndices> {
    let families = match driver.queue_family_properties(instance, device) {
        Ok(families) => families,
        Err(e) => {
            log::error!("Failed to query queue families: {:?}", e);
            return Outcome::failure(ResultCode::CouldNotFindQueueFamilyIndices);
        }
    };

    let indices = QueueFamilyIndices::from_properties(&families);
    if indices.is_complete() {
        Outcome::success(indices)
    } else {
        Outcome::failure(ResultCode::CouldNotFindQueueFamilyIndices)
    }
}

/// Pick the first enumerated device that is a discrete GPU with geometry
/// shader support and a graphics queue family
///
/// Every device is considered in enumeration order; a rejected device does
/// not end the scan.
pub fn select_physical_device<D: VulkanDriver + ?Sized>(
    driver: &D,
    instance: vk::Instance,
) -> Outcome<PhysicalDevice> {
    let devices = match driver.enumerate_physical_devices(instance) {
        Ok(devices) => devices,
        Err(e) => {
            log::error!("Failed to enumerate physical devices: {:?}", e);
            return Outcome::failure(ResultCode::GenericError);
        }
    };

    if devices.is_empty() {
        log::error!("No physical devices present");
        return Outcome::failure(ResultCode::GenericError);
    }

    let mut candidates = Vec::with_capacity(devices.len());
    for device in devices {
        match driver.physical_device_properties(instance, device) {
            Ok(properties) => candidates.push((device, properties)),
            Err(e) => log::warn!("Skipping device {:?}, properties query failed: {:?}", device, e),
        }
    }

    if cfg!(debug_assertions) {
        log::debug!("Present Physical Devices:");
        for (_, properties) in &candidates {
            log::debug!("\t{}", properties.name);
        }
    }

    for (device, properties) in candidates {
        if properties.device_type != vk::PhysicalDeviceType::DISCRETE_GPU || !properties.geometry_shader {
            continue;
        }

        let indices = find_queue_families(driver, instance, device);
        if !indices.has_value() {
            continue;
        }

        log::debug!("Selected Physical Device: {} ({:?})", properties.name, properties.device_type);
        return Outcome::success(PhysicalDevice {
            handle: device,
            queue_family_indices: indices.into_value(),
            name: properties.name,
            device_type: properties.device_type,
        });
    }

    Outcome::failure(ResultCode::SuitablePhysicalDeviceNotFound)
}

/// Create a logical device with a single graphics queue
pub fn create_logical_device<D: VulkanDriver + ?Sized>(
    driver: &D,
    instance: vk::Instance,
    physical_device: &PhysicalDevice,
) -> Outcome<vk::Device> {
    let Some(graphics_family) = physical_device.queue_family_indices.graphics_family else {
        log::error!("Failed to create logical device: no graphics queue family");
        return Outcome::failure(ResultCode::CreateDeviceFailed);
    };

    match driver.create_device(instance, physical_device.handle, graphics_family) {
        Ok(device) => Outcome::success(device),
        Err(e) => {
            log::error!("Failed to create logical device: {:?}", e);
            Outcome::failure(ResultCode::CreateDeviceFailed)
        }
    }
}

/// Owner of the logical device created for a selected physical device
///
/// The physical device handle is only borrowed from the instance and is not
/// released here.
pub struct RenderContext<D: VulkanDriver> {
    driver: Rc<D>,
    physical_device: PhysicalDevice,
    device: vk::Device,
}

impl<D: VulkanDriver> RenderContext<D> {
    /// Create the logical device for `physical_device`
    pub fn create(driver: Rc<D>, instance: vk::Instance, physical_device: PhysicalDevice) -> Outcome<Self> {
        let device = create_logical_device(&*driver, instance, &physical_device);
        device.map(|device| Self {
            driver,
            physical_device,
            device,
        })
    }

    /// The selected physical device
    pub const fn physical_device(&self) -> &PhysicalDevice {
        &self.physical_device
    }

    /// The logical device handle
    pub const fn device(&self) -> vk::Device {
        self.device
    }
}

impl<D: VulkanDriver> Drop for RenderContext<D> {
    fn drop(&mut self) {
        self.driver.destroy_device(self.device);
    }
}
