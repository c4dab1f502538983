//! Renderer crate for the aurora shader demo.
//!
//! The crate glues the `winit` window, the `wgpu` pipeline, and the GLSL
//! programs loaded by `shaderfetch` together. The overall flow is:
//!
//! ```text
//!   CLI / aurora
//!          │ RendererConfig + ParameterSurface
//!          ▼
//!   Renderer::run ──▶ winit event loop ──▶ Session::source_loaded ×2 ──▶ GpuState
//!                          │
//!                          └─▶ RedrawRequested ─▶ Session::tick ─▶ uniforms ─▶ draw
//! ```
//!
//! [`Session`] owns the parameter surface, camera, and clock and is generic
//! over its [`FrameTarget`], so everything except the GPU calls runs in tests
//! without a device.

mod camera;
mod compile;
mod console;
mod gpu;
mod mesh;
mod runtime;
mod scene;
mod session;
mod types;
mod window;

use anyhow::Result;
use params::ParameterSurface;

pub use camera::{Camera, Viewport};
pub use compile::validate_sources;
pub use console::{respond, ConsoleReply};
pub use mesh::{PlaneMesh, PlaneVertex};
pub use runtime::{
    time_source_for, BoxedTimeSource, FixedStepTimeSource, FrameScheduler, SystemTimeSource,
    TimeSample, TimeSource,
};
pub use scene::{model_matrix, FrameInputs, BASE_TILT, PLANE_POSITION};
pub use session::{FrameTarget, Session};
pub use types::{Antialiasing, ClockMode, RendererConfig};

/// High-level entry point that owns the chosen configuration.
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Opens the preview window and animates `surface` until the window closes.
    ///
    /// Fails when the event loop cannot start, when either shader source cannot
    /// be loaded, or when the loaded programs do not build.
    pub fn run(&self, surface: ParameterSurface) -> Result<()> {
        window::run_window(&self.config, surface)
    }
}
