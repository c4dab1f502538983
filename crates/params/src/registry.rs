use std::f32::consts::PI;
use std::fmt;

use serde::Serialize;

use crate::ParamError;

/// Identifier of the viewport resolution pair written by the resize handler.
pub const RESOLUTION: &str = "resolution";

/// Value shape a parameter stores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamKind {
    Scalar,
    Vector2,
    Vector3,
    /// Normalized RGB triple edited through a packed 24-bit color picker.
    Color,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Scalar => f.write_str("scalar"),
            ParamKind::Vector2 => f.write_str("vector2"),
            ParamKind::Vector3 => f.write_str("vector3"),
            ParamKind::Color => f.write_str("color"),
        }
    }
}

/// A parameter value tagged with its kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Scalar(f32),
    Vector2([f32; 2]),
    Vector3([f32; 3]),
    Color([f32; 3]),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Scalar(_) => ParamKind::Scalar,
            ParamValue::Vector2(_) => ParamKind::Vector2,
            ParamValue::Vector3(_) => ParamKind::Vector3,
            ParamValue::Color(_) => ParamKind::Color,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(value) => write!(f, "{value}"),
            ParamValue::Vector2([x, y]) => write!(f, "{x},{y}"),
            ParamValue::Vector3([x, y, z]) => write!(f, "{x},{y},{z}"),
            ParamValue::Color(rgb) => f.write_str(&crate::color::format_hex_color(
                crate::color::pack_rgb(*rgb),
            )),
        }
    }
}

/// Inclusive bounds used to configure a slider. Never enforced on writes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f32 {
        self.max - self.min
    }

    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

/// Named groups of widgets in the control panel, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Rotation,
    Appearance,
    Color,
    Movement,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Section::Rotation,
        Section::Appearance,
        Section::Color,
        Section::Movement,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::Rotation => "Rotation Controls",
            Section::Appearance => "Appearance Controls",
            Section::Color => "Color Controls",
            Section::Movement => "Movement Controls",
        }
    }
}

/// Snapshot of every value the render step consumes in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuroraParams {
    pub taper_strength: f32,
    pub horizontal_fade: f32,
    pub vertical_fade: f32,
    pub wave_speed: f32,
    pub distortion_intensity: f32,
    pub swirl_intensity: f32,
    pub wave_scale: f32,
    pub aurora_green: [f32; 3],
    pub aurora_blue: [f32; 3],
    pub aurora_teal: [f32; 3],
    #[serde(rename = "rotationX")]
    pub rotation_x: f32,
    #[serde(rename = "rotationY")]
    pub rotation_y: f32,
    #[serde(rename = "rotationZ")]
    pub rotation_z: f32,
    pub resolution: [f32; 2],
}

impl AuroraParams {
    pub(crate) const ZERO: Self = Self {
        taper_strength: 0.0,
        horizontal_fade: 0.0,
        vertical_fade: 0.0,
        wave_speed: 0.0,
        distortion_intensity: 0.0,
        swirl_intensity: 0.0,
        wave_scale: 0.0,
        aurora_green: [0.0; 3],
        aurora_blue: [0.0; 3],
        aurora_teal: [0.0; 3],
        rotation_x: 0.0,
        rotation_y: 0.0,
        rotation_z: 0.0,
        resolution: [0.0; 2],
    };

    /// Euler angles (radians, XYZ order) applied to the plane.
    pub fn rotation(&self) -> [f32; 3] {
        [self.rotation_x, self.rotation_y, self.rotation_z]
    }
}

/// Typed getter/setter pair binding an identifier to one `AuroraParams` field.
#[derive(Clone, Copy)]
pub struct Accessor {
    pub(crate) get: fn(&AuroraParams) -> ParamValue,
    pub(crate) set: fn(&mut AuroraParams, ParamValue) -> Result<(), ParamError>,
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor")
    }
}

/// Declaration of one tunable parameter.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub id: &'static str,
    pub label: &'static str,
    /// Panel section; `None` keeps the parameter out of the panel.
    pub section: Option<Section>,
    pub kind: ParamKind,
    pub default: ParamValue,
    pub range: Option<ParamRange>,
    pub(crate) accessor: Accessor,
}

fn mismatch(id: &'static str, expected: ParamKind, value: ParamValue) -> ParamError {
    ParamError::KindMismatch {
        id: id.to_string(),
        expected,
        found: value.kind(),
    }
}

macro_rules! scalar_param {
    ($id:literal, $label:literal, $section:expr, $field:ident, $default:expr, $min:expr, $max:expr) => {
        ParamSpec {
            id: $id,
            label: $label,
            section: Some($section),
            kind: ParamKind::Scalar,
            default: ParamValue::Scalar($default),
            range: Some(ParamRange::new($min, $max)),
            accessor: Accessor {
                get: |params| ParamValue::Scalar(params.$field),
                set: |params, value| match value {
                    ParamValue::Scalar(scalar) => {
                        params.$field = scalar;
                        Ok(())
                    }
                    other => Err(mismatch($id, ParamKind::Scalar, other)),
                },
            },
        }
    };
}

macro_rules! color_param {
    ($id:literal, $label:literal, $field:ident, $default:expr) => {
        ParamSpec {
            id: $id,
            label: $label,
            section: Some(Section::Color),
            kind: ParamKind::Color,
            default: ParamValue::Color($default),
            range: None,
            accessor: Accessor {
                get: |params| ParamValue::Color(params.$field),
                set: |params, value| match value {
                    ParamValue::Color(rgb) | ParamValue::Vector3(rgb) => {
                        params.$field = rgb;
                        Ok(())
                    }
                    other => Err(mismatch($id, ParamKind::Color, other)),
                },
            },
        }
    };
}

static AURORA_PARAMETERS: [ParamSpec; 14] = [
    scalar_param!("rotationX", "X Axis", Section::Rotation, rotation_x, 0.0, -PI, PI),
    scalar_param!("rotationY", "Y Axis", Section::Rotation, rotation_y, 0.0, -PI, PI),
    scalar_param!("rotationZ", "Z Axis", Section::Rotation, rotation_z, 0.0, -PI, PI),
    scalar_param!("taperStrength", "Height Taper", Section::Appearance, taper_strength, 0.0, 0.0, 2.0),
    scalar_param!("horizontalFade", "Horizontal Fade", Section::Appearance, horizontal_fade, 1.5, 0.0, 5.0),
    scalar_param!("verticalFade", "Vertical Fade", Section::Appearance, vertical_fade, 1.0, 0.0, 5.0),
    color_param!("auroraGreen", "Aurora Green", aurora_green, [0.0, 0.9, 0.4]),
    color_param!("auroraTeal", "Aurora Teal", aurora_teal, [0.0, 0.8, 0.6]),
    color_param!("auroraBlue", "Aurora Blue", aurora_blue, [0.0, 0.6, 0.8]),
    scalar_param!("waveSpeed", "Wave Speed", Section::Movement, wave_speed, 0.25, 0.01, 0.2),
    scalar_param!("distortionIntensity", "Distortion Intensity", Section::Movement, distortion_intensity, 0.75, 0.0, 2.0),
    scalar_param!("swirlIntensity", "Swirl Intensity", Section::Movement, swirl_intensity, 7.0, 0.0, 20.0),
    scalar_param!("waveScale", "Wave Scale", Section::Movement, wave_scale, 1.5, 0.5, 2.0),
    ParamSpec {
        id: RESOLUTION,
        label: "Resolution",
        section: None,
        kind: ParamKind::Vector2,
        default: ParamValue::Vector2([0.0, 0.0]),
        range: None,
        accessor: Accessor {
            get: |params| ParamValue::Vector2(params.resolution),
            set: |params, value| match value {
                ParamValue::Vector2(pair) => {
                    params.resolution = pair;
                    Ok(())
                }
                other => Err(mismatch(RESOLUTION, ParamKind::Vector2, other)),
            },
        },
    },
];

/// The aurora effect's parameter table in panel order.
pub fn aurora_parameters() -> &'static [ParamSpec] {
    &AURORA_PARAMETERS
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn identifiers_are_unique() {
        let mut seen = HashSet::new();
        for spec in aurora_parameters() {
            assert!(seen.insert(spec.id), "duplicate identifier {}", spec.id);
        }
    }

    #[test]
    fn defaults_match_declared_kind() {
        for spec in aurora_parameters() {
            assert_eq!(spec.default.kind(), spec.kind, "{}", spec.id);
        }
    }

    #[test]
    fn sliders_declare_ranges_and_colors_do_not() {
        for spec in aurora_parameters() {
            match spec.kind {
                ParamKind::Scalar => assert!(spec.range.is_some(), "{}", spec.id),
                _ => assert!(spec.range.is_none(), "{}", spec.id),
            }
        }
    }

    #[test]
    fn vector_parameters_stay_out_of_the_panel() {
        for spec in aurora_parameters() {
            if matches!(spec.kind, ParamKind::Vector2 | ParamKind::Vector3) {
                assert!(spec.section.is_none(), "{}", spec.id);
            }
        }
    }

    #[test]
    fn sections_hold_expected_widget_counts() {
        let count = |section: Section| {
            aurora_parameters()
                .iter()
                .filter(|spec| spec.section == Some(section))
                .count()
        };
        assert_eq!(count(Section::Rotation), 3);
        assert_eq!(count(Section::Appearance), 3);
        assert_eq!(count(Section::Color), 3);
        assert_eq!(count(Section::Movement), 4);
    }

    #[test]
    fn every_accessor_targets_a_distinct_field() {
        let mut touched = Vec::new();
        for spec in aurora_parameters() {
            let mut params = AuroraParams::ZERO;
            let marker = match spec.kind {
                ParamKind::Scalar => ParamValue::Scalar(42.0),
                ParamKind::Vector2 => ParamValue::Vector2([42.0, 42.0]),
                ParamKind::Vector3 => ParamValue::Vector3([42.0; 3]),
                ParamKind::Color => ParamValue::Color([0.5; 3]),
            };
            (spec.accessor.set)(&mut params, marker).expect("marker write");
            assert_eq!((spec.accessor.get)(&params), marker, "{}", spec.id);
            assert_ne!(params, AuroraParams::ZERO, "{} wrote nothing", spec.id);
            assert!(!touched.contains(&params), "{} aliases another field", spec.id);
            touched.push(params);
        }
    }

    #[test]
    fn setters_reject_other_kinds() {
        let spec = aurora_parameters()
            .iter()
            .find(|spec| spec.id == "waveScale")
            .expect("waveScale");
        let mut params = AuroraParams::ZERO;
        let err = (spec.accessor.set)(&mut params, ParamValue::Color([1.0; 3])).unwrap_err();
        assert!(matches!(
            err,
            ParamError::KindMismatch {
                expected: ParamKind::Scalar,
                found: ParamKind::Color,
                ..
            }
        ));
    }
}
