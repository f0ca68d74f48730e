//! Kiff bootstrap application
//!
//! Opens a window, brings up Vulkan and waits for the window to close.
//! Any setup failure is logged and ends the process with a failure status.

use kiff_core::bootstrap::{self, BootstrapError};
use kiff_core::config::BootstrapConfig;
use kiff_core::foundation::logging;
use kiff_core::render::AshDriver;
use kiff_core::window::GlfwWindowing;
use std::process::ExitCode;
use std::rc::Rc;

fn start() -> Result<(), BootstrapError> {
    let config = BootstrapConfig::discover()?;

    let mut windowing = GlfwWindowing::init()?;
    let driver = AshDriver::load().map_err(|e| BootstrapError::Loader(e.to_string()))?;

    bootstrap::run(&config, &mut windowing, Rc::new(driver))
}

fn main() -> ExitCode {
    logging::init();

    match start() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
