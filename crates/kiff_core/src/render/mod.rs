//! Vulkan setup
//!
//! Instance creation, physical device selection, logical device and surface
//! creation. All driver access goes through [`VulkanDriver`]; the objects
//! created here are owned by RAII wrappers that release them on drop:
//!
//! - [`Context`]: instance and diagnostics messenger
//! - [`RenderContext`]: logical device
//! - [`Surface`]: window surface

pub mod app_context;
pub mod ash_driver;
pub mod driver;
pub mod render_context;
pub mod surface;

pub use app_context::{create_debug_messenger, create_instance, missing_layers, Context, InstanceInfo};
pub use ash_driver::AshDriver;
pub use driver::{DeviceProperties, InstanceRequest, VulkanDriver};
pub use render_context::{
    create_logical_device, find_queue_families, select_physical_device, PhysicalDevice, QueueFamilyIndices,
    RenderContext,
};
pub use surface::Surface;
