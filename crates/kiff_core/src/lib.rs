//! # Kiff Core
//!
//! Vulkan bootstrap: opens a GLFW window, creates an instance (with
//! validation layers in debug builds), picks a discrete GPU, creates a
//! logical device and a window surface, then idles in the event loop until
//! the window is closed.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use kiff_core::prelude::*;
//! use std::rc::Rc;
//!
//! fn main() -> Result<(), BootstrapError> {
//!     let config = BootstrapConfig::default();
//!     let mut windowing = GlfwWindowing::init()?;
//!     let driver = AshDriver::load().map_err(|e| BootstrapError::Loader(e.to_string()))?;
//!     kiff_core::bootstrap::run(&config, &mut windowing, Rc::new(driver))
//! }
//! ```

#![warn(missing_docs)]

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod foundation;
pub mod render;
pub mod result;
pub mod window;

#[cfg(test)]
mod tests;

/// Common imports for bootstrap users
pub mod prelude {
    pub use crate::{
        bootstrap::{BootstrapError, SetupStage},
        config::{BootstrapConfig, Config, ConfigError, WindowConfig},
        render::{AshDriver, Context, InstanceInfo, PhysicalDevice, RenderContext, Surface, VulkanDriver},
        result::{Outcome, ResultCode},
        window::{GlfwWindowing, WindowBackend, WindowError, WindowSystem},
    };
}
