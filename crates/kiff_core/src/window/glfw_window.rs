//! GLFW windowing backend

use ash::vk;

use super::{WindowBackend, WindowError, WindowResult, WindowSystem};
use crate::config::WindowConfig;

/// Error callback registered at init
fn forward_glfw_error(error: glfw::Error, description: String) {
    log::error!("GLFW Error: {:?}: {}", error, description);
}

/// Initialized GLFW library
pub struct GlfwWindowing {
    glfw: glfw::Glfw,
}

impl GlfwWindowing {
    /// Initialize GLFW and register the error callback
    pub fn init() -> WindowResult<Self> {
        let glfw = glfw::init(forward_glfw_error).map_err(|e| {
            log::error!("GLFW Failed to initialize: {:?}", e);
            WindowError::InitializationFailed
        })?;
        log::debug!("GLFW Initialized.");

        if !glfw.vulkan_supported() {
            log::warn!("GLFW reports no Vulkan loader; instance creation will likely fail");
        }

        Ok(Self { glfw })
    }
}

impl WindowSystem for GlfwWindowing {
    type Window = GlfwWindow;

    fn required_instance_extensions(&self) -> WindowResult<Vec<String>> {
        self.glfw
            .get_required_instance_extensions()
            .ok_or_else(|| WindowError::GlfwError("Failed to get required extensions".to_string()))
    }

    fn create_window(&mut self, config: &WindowConfig) -> WindowResult<GlfwWindow> {
        // Vulkan only, no OpenGL context
        self.glfw
            .window_hint(glfw::WindowHint::ClientApi(glfw::ClientApiHint::NoApi));

        let (mut window, events) = self
            .glfw
            .create_window(config.width, config.height, &config.title, glfw::WindowMode::Windowed)
            .ok_or(WindowError::CreationFailed)?;
        window.set_close_polling(true);

        log::debug!("Window created: {}x{} \"{}\"", config.width, config.height, config.title);
        Ok(GlfwWindow {
            window,
            _events: events,
        })
    }

    fn poll_events(&mut self) {
        self.glfw.poll_events();
    }
}

/// GLFW window handle; destroyed on drop
pub struct GlfwWindow {
    window: glfw::PWindow,
    _events: glfw::GlfwReceiver<(f64, glfw::WindowEvent)>,
}

impl WindowBackend for GlfwWindow {
    fn should_close(&self) -> bool {
        self.window.should_close()
    }

    fn create_vulkan_surface(&mut self, instance: vk::Instance) -> Result<vk::SurfaceKHR, vk::Result> {
        let mut surface = vk::SurfaceKHR::null();
        let result = self
            .window
            .create_window_surface(instance, std::ptr::null(), &mut surface);

        if result == vk::Result::SUCCESS {
            Ok(surface)
        } else {
            Err(result)
        }
    }
}
