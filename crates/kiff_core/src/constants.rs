//! Process-wide constants

use ash::vk;

/// Vulkan API version requested at instance creation
pub const VULKAN_API_VERSION_PINNED: u32 = vk::API_VERSION_1_3;

/// Validation layers required when validation is enabled
pub const VALIDATION_LAYERS: &[&str] = &["VK_LAYER_KHRONOS_validation"];

/// Whether validation is on when the configuration leaves it unset
pub const ENABLE_VALIDATION_LAYERS: bool = cfg!(debug_assertions);

/// Default window width in pixels
pub const DEFAULT_WINDOW_WIDTH: u32 = 640;

/// Default window height in pixels
pub const DEFAULT_WINDOW_HEIGHT: u32 = 480;
