//! Tunable parameters for the aurora effect.
//!
//! A [`ParameterSurface`] holds the current value of every effect input. Each
//! identifier is declared once in the registry together with its kind, default,
//! advisory range, panel section, and a typed accessor pair, so panels and the
//! console can only reach [`AuroraParams`] through declared setters. The
//! renderer reads [`ParameterSurface::sample`] once per frame.

mod color;
mod command;
mod panel;
mod registry;
mod surface;

pub use color::{format_hex_color, pack_rgb, parse_hex_color, unpack_rgb, MAX_PACKED};
pub use command::{describe_parameters, parse_command, CommandError, ConsoleCommand, CONSOLE_HELP};
pub use panel::{ControlPanel, KeyboardPanel, PanelEdit, PanelKey, Widget, WidgetValue};
pub use registry::{
    aurora_parameters, AuroraParams, ParamKind, ParamRange, ParamSpec, ParamValue, Section,
    RESOLUTION,
};
pub use surface::ParameterSurface;

#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    #[error("unknown parameter '{0}'")]
    Unknown(String),
    #[error("parameter '{id}' expects a {expected} value, got {found}")]
    KindMismatch {
        id: String,
        expected: ParamKind,
        found: ParamKind,
    },
}
