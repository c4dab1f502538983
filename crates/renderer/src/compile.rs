use std::borrow::Cow;

use anyhow::{anyhow, Result};
use naga::front::glsl::{Frontend, Options};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use shaderfetch::{ShaderSources, ShaderStage};

fn naga_stage(stage: ShaderStage) -> naga::ShaderStage {
    match stage {
        ShaderStage::Vertex => naga::ShaderStage::Vertex,
        ShaderStage::Fragment => naga::ShaderStage::Fragment,
    }
}

/// Parses GLSL 450 source for one stage and validates the resulting module.
///
/// Errors carry the source-annotated diagnostics produced by naga so a bad
/// program is reported before any pipeline is built.
pub(crate) fn parse_stage(stage: ShaderStage, source: &str) -> Result<naga::Module> {
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(naga_stage(stage)), source)
        .map_err(|err| {
            anyhow!(
                "{stage} shader failed to parse:\n{}",
                err.emit_to_string(source)
            )
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::default())
        .validate(&module)
        .map_err(|err| {
            anyhow!(
                "{stage} shader failed validation:\n{}",
                err.emit_to_string(source)
            )
        })?;
    Ok(module)
}

/// Checks that both programs parse and validate.
pub fn validate_sources(sources: &ShaderSources) -> Result<()> {
    parse_stage(ShaderStage::Vertex, &sources.vertex)?;
    parse_stage(ShaderStage::Fragment, &sources.fragment)?;
    Ok(())
}

/// Compiles one stage into a shader module without re-parsing on the device.
pub(crate) fn create_module(
    device: &wgpu::Device,
    stage: ShaderStage,
    source: &str,
) -> Result<wgpu::ShaderModule> {
    let module = parse_stage(stage, source)?;
    let label = format!("aurora {stage}");
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
    }))
}
