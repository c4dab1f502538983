//! GPU side of the aurora scene.
//!
//! - `context` owns the wgpu instance, device, and surface and reconfigures the
//!   swapchain when the window resizes.
//! - `pipeline` turns the two validated programs into one render pipeline.
//! - `uniforms` mirrors the shaders' uniform block.
//! - `state` uploads the plane once and implements [`crate::FrameTarget`].

mod context;
mod pipeline;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
pub(crate) use uniforms::AuroraUniforms;
