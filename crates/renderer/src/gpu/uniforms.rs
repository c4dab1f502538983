use bytemuck::{Pod, Zeroable};

use crate::scene::FrameInputs;

/// Host mirror of the `AuroraBlock` std140 uniform block shared by both stages.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub(crate) struct AuroraUniforms {
    pub view_projection: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub resolution: [f32; 2],
    pub time: f32,
    pub taper_strength: f32,
    pub horizontal_fade: f32,
    pub vertical_fade: f32,
    pub wave_speed: f32,
    pub distortion_intensity: f32,
    pub swirl_intensity: f32,
    pub wave_scale: f32,
    pub _padding0: [f32; 2],
    pub aurora_green: [f32; 3],
    pub _padding1: f32,
    pub aurora_blue: [f32; 3],
    pub _padding2: f32,
    pub aurora_teal: [f32; 3],
    pub _padding3: f32,
}

impl AuroraUniforms {
    pub fn from_frame(frame: &FrameInputs) -> Self {
        let params = &frame.params;
        Self {
            view_projection: frame.view_projection.to_cols_array_2d(),
            model: frame.model.to_cols_array_2d(),
            resolution: params.resolution,
            time: frame.time,
            taper_strength: params.taper_strength,
            horizontal_fade: params.horizontal_fade,
            vertical_fade: params.vertical_fade,
            wave_speed: params.wave_speed,
            distortion_intensity: params.distortion_intensity,
            swirl_intensity: params.swirl_intensity,
            wave_scale: params.wave_scale,
            _padding0: [0.0; 2],
            aurora_green: params.aurora_green,
            _padding1: 0.0,
            aurora_blue: params.aurora_blue,
            _padding2: 0.0,
            aurora_teal: params.aurora_teal,
            _padding3: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::mem::{offset_of, size_of};

    use params::{ParamValue, ParameterSurface};

    use super::*;
    use crate::camera::Camera;

    #[test]
    fn layout_follows_std140() {
        assert_eq!(size_of::<AuroraUniforms>(), 224);
        assert_eq!(offset_of!(AuroraUniforms, model), 64);
        assert_eq!(offset_of!(AuroraUniforms, resolution), 128);
        assert_eq!(offset_of!(AuroraUniforms, time), 136);
        assert_eq!(offset_of!(AuroraUniforms, wave_scale), 164);
        assert_eq!(offset_of!(AuroraUniforms, aurora_green), 176);
        assert_eq!(offset_of!(AuroraUniforms, aurora_blue), 192);
        assert_eq!(offset_of!(AuroraUniforms, aurora_teal), 208);
    }

    #[test]
    fn every_panel_parameter_reaches_the_block() {
        let mut surface = ParameterSurface::aurora();
        let values = [
            ("taperStrength", 1.25),
            ("horizontalFade", 2.5),
            ("verticalFade", 3.5),
            ("waveSpeed", 0.15),
            ("distortionIntensity", 1.75),
            ("swirlIntensity", 12.0),
            ("waveScale", 0.75),
        ];
        for (id, value) in values {
            surface.set(id, ParamValue::Scalar(value)).unwrap();
        }
        surface
            .set("auroraTeal", ParamValue::Color([0.1, 0.2, 0.3]))
            .unwrap();
        surface
            .set(params::RESOLUTION, ParamValue::Vector2([640.0, 480.0]))
            .unwrap();

        let frame = FrameInputs::new(4.0, &Camera::default(), surface.sample());
        let uniforms = AuroraUniforms::from_frame(&frame);
        assert_eq!(uniforms.time, 4.0);
        assert_eq!(uniforms.resolution, [640.0, 480.0]);
        assert_eq!(
            [
                uniforms.taper_strength,
                uniforms.horizontal_fade,
                uniforms.vertical_fade,
                uniforms.wave_speed,
                uniforms.distortion_intensity,
                uniforms.swirl_intensity,
                uniforms.wave_scale,
            ],
            values.map(|(_, value)| value)
        );
        assert_eq!(uniforms.aurora_teal, [0.1, 0.2, 0.3]);
        assert_eq!(uniforms.aurora_green, [0.0, 0.9, 0.4]);
        assert_eq!(uniforms.model, frame.model.to_cols_array_2d());
    }
}
