//! Window management
//!
//! [`WindowSystem`] is the windowing library (init, required instance
//! extensions, event pump); [`WindowBackend`] is a single window created by
//! it. The GLFW implementation lives in [`glfw_window`].

use ash::vk;
use thiserror::Error;

use crate::config::WindowConfig;

pub mod glfw_window;

pub use glfw_window::{GlfwWindow, GlfwWindowing};

/// Window management errors
#[derive(Error, Debug)]
pub enum WindowError {
    /// The windowing library did not initialize
    #[error("GLFW failed to initialize")]
    InitializationFailed,

    /// The window could not be created
    #[error("Window creation failed")]
    CreationFailed,

    /// Any other windowing library error
    #[error("GLFW error: {0}")]
    GlfwError(String),
}

/// Result type for window operations
pub type WindowResult<T> = Result<T, WindowError>;

/// Windowing library binding
pub trait WindowSystem {
    /// Window type created by this system
    type Window: WindowBackend;

    /// Instance extensions the library needs to present to its windows
    fn required_instance_extensions(&self) -> WindowResult<Vec<String>>;

    /// Create a window with no client API bound
    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<Self::Window>;

    /// Process pending events; the error callback fires from here
    fn poll_events(&mut self);
}

/// A single window
pub trait WindowBackend {
    /// Whether the user asked the window to close
    fn should_close(&self) -> bool;

    /// Create a Vulkan surface for this window
    fn create_vulkan_surface(&mut self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result>;
}
