//! Bootstrap sequence
//!
//! instance → diagnostics messenger → physical device → logical device →
//! window → surface → poll loop → teardown.
//!
//! Every setup step is fatal on failure: the error is logged and returned,
//! and whatever was already created is released by its owner on the way out.

use ash::vk;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

use crate::config::{BootstrapConfig, ConfigError};
use crate::render::{select_physical_device, Context, RenderContext, Surface, VulkanDriver};
use crate::result::ResultCode;
use crate::window::{WindowBackend, WindowError, WindowSystem};

/// Setup step that produced a [`BootstrapError::Setup`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStage {
    /// Instance (and diagnostics messenger) creation
    Instance,
    /// Physical device selection
    PhysicalDevice,
    /// Logical device creation
    LogicalDevice,
}

impl fmt::Display for SetupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Instance => "Vulkan instance creation",
            Self::PhysicalDevice => "Physical device selection",
            Self::LogicalDevice => "Logical device creation",
        })
    }
}

/// Bootstrap errors
#[derive(Error, Debug)]
pub enum BootstrapError {
    /// Windowing library failure
    #[error("Window error: {0}")]
    Window(#[from] WindowError),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The Vulkan library could not be loaded
    #[error("Failed to load Vulkan: {0}")]
    Loader(String),

    /// A setup step returned a failed outcome
    #[error("{stage} failed: {code}")]
    Setup {
        /// Step that failed
        stage: SetupStage,
        /// Result code it reported
        code: ResultCode,
    },

    /// Window surface creation failed
    #[error("Failed to create window surface: {0:?}")]
    Surface(vk::Result),
}

impl BootstrapError {
    /// Result code of a failed setup step, if that is what this is
    pub const fn code(&self) -> Option<ResultCode> {
        match self {
            Self::Setup { code, .. } => Some(*code),
            _ => None,
        }
    }
}

fn setup_failed(stage: SetupStage) -> impl FnOnce(ResultCode) -> BootstrapError {
    move |code| {
        log::error!("{} failed: {}", stage, code);
        BootstrapError::Setup { stage, code }
    }
}

/// Run the bootstrap sequence until the window is closed
pub fn run<S, D>(config: &BootstrapConfig, windowing: &mut S, driver: Rc<D>) -> Result<(), BootstrapError>
where
    S: WindowSystem,
    D: VulkanDriver,
{
    log::info!("App Started");

    let extensions = windowing.required_instance_extensions()?;

    let context = Context::create(
        Rc::clone(&driver),
        config.instance_info(),
        &extensions,
        config.validation_enabled(),
    )
    .into_result()
    .map_err(setup_failed(SetupStage::Instance))?;

    let physical_device = select_physical_device(&*driver, context.instance())
        .into_result()
        .map_err(setup_failed(SetupStage::PhysicalDevice))?;

    let render_context = RenderContext::create(Rc::clone(&driver), context.instance(), physical_device)
        .into_result()
        .map_err(setup_failed(SetupStage::LogicalDevice))?;
    let selected = render_context.physical_device();
    log::info!("Using physical device: {} ({:?})", selected.name, selected.device_type);

    let mut window = windowing.create_window(&config.window)?;
    let surface =
        Surface::create(Rc::clone(&driver), context.instance(), &mut window).map_err(BootstrapError::Surface)?;

    log::info!("Entering event loop");
    while !window.should_close() {
        windowing.poll_events();
    }

    drop(surface);
    drop(render_context);
    drop(context);
    drop(window);

    log::info!("App Exited.");
    Ok(())
}
