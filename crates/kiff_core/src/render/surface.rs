//! Window surface ownership

use ash::vk;
use std::rc::Rc;

use super::driver::VulkanDriver;
use crate::window::WindowBackend;

/// Drawable surface bound to a window, destroyed on drop
pub struct Surface<D: VulkanDriver> {
    driver: Rc<D>,
    instance: vk::Instance,
    surface: vk::SurfaceKHR,
}

impl<D: VulkanDriver> Surface<D> {
    /// Create a surface for `window` through the windowing library
    pub fn create<W: WindowBackend + ?Sized>(
        driver: Rc<D>,
        instance: vk::Instance,
        window: &mut W,
    ) -> Result<Self, vk::Result> {
        let surface = window.create_vulkan_surface(instance).map_err(|e| {
            log::error!("Failed to create window surface. {:?}", e);
            e
        })?;

        Ok(Self {
            driver,
            instance,
            surface,
        })
    }

    /// Get the underlying surface handle
    pub const fn handle(&self) -> vk::SurfaceKHR {
        self.surface
    }
}

impl<D: VulkanDriver> Drop for Surface<D> {
    fn drop(&mut self) {
        self.driver.destroy_surface(self.instance, self.surface);
    }
}
