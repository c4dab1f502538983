use tracing::warn;

use crate::color::{pack_rgb, unpack_rgb};
use crate::panel::{ControlPanel, PanelEdit, Widget, WidgetValue};
use crate::registry::{aurora_parameters, AuroraParams, ParamKind, ParamSpec, ParamValue, Section};
use crate::ParamError;

/// Current values for every tunable effect input.
///
/// The surface is the only writer of [`AuroraParams`]: panels and consoles go
/// through [`ParameterSurface::set`] or [`ParameterSurface::apply`], which route
/// each identifier to its declared setter. Ranges are advisory and are never
/// enforced here.
#[derive(Debug, Clone)]
pub struct ParameterSurface {
    specs: &'static [ParamSpec],
    values: AuroraParams,
}

impl ParameterSurface {
    /// Builds a surface from a parameter table, starting every entry at its default.
    pub fn initialize(specs: &'static [ParamSpec]) -> Self {
        let mut surface = Self {
            specs,
            values: AuroraParams::ZERO,
        };
        surface.apply_defaults(|_| true);
        surface
    }

    /// Surface preloaded with the aurora effect's defaults.
    pub fn aurora() -> Self {
        Self::initialize(aurora_parameters())
    }

    pub fn specs(&self) -> &'static [ParamSpec] {
        self.specs
    }

    pub fn spec(&self, id: &str) -> Result<&'static ParamSpec, ParamError> {
        self.specs
            .iter()
            .find(|spec| spec.id == id)
            .ok_or_else(|| ParamError::Unknown(id.to_string()))
    }

    /// Restores every panel parameter to its declared default.
    ///
    /// Entries without a panel section (`resolution`) follow the viewport and
    /// keep their current value.
    pub fn reset(&mut self) {
        self.apply_defaults(|spec| spec.section.is_some());
    }

    fn apply_defaults(&mut self, include: impl Fn(&ParamSpec) -> bool) {
        for spec in self.specs.iter().filter(|spec| include(*spec)) {
            if let Err(err) = (spec.accessor.set)(&mut self.values, spec.default) {
                warn!(id = spec.id, error = %err, "parameter default does not fit its slot");
            }
        }
    }

    pub fn get(&self, id: &str) -> Result<ParamValue, ParamError> {
        let spec = self.spec(id)?;
        Ok((spec.accessor.get)(&self.values))
    }

    /// Stores `value` for `id`. Values outside the widget range are accepted as-is.
    pub fn set(&mut self, id: &str, value: ParamValue) -> Result<(), ParamError> {
        let spec = self.spec(id)?;
        (spec.accessor.set)(&mut self.values, value)
    }

    /// Applies a change reported by a panel widget.
    pub fn apply(&mut self, edit: &PanelEdit) -> Result<(), ParamError> {
        let spec = self.spec(edit.id)?;
        let value = match (spec.kind, edit.value) {
            (ParamKind::Scalar, WidgetValue::Number(number)) => ParamValue::Scalar(number),
            (ParamKind::Color, WidgetValue::Color(packed)) => ParamValue::Color(unpack_rgb(packed)),
            (expected, WidgetValue::Number(_)) => {
                return Err(ParamError::KindMismatch {
                    id: spec.id.to_string(),
                    expected,
                    found: ParamKind::Scalar,
                })
            }
            (expected, WidgetValue::Color(_)) => {
                return Err(ParamError::KindMismatch {
                    id: spec.id.to_string(),
                    expected,
                    found: ParamKind::Color,
                })
            }
        };
        (spec.accessor.set)(&mut self.values, value)
    }

    /// Registers one widget per panel-visible parameter, grouped by section.
    pub fn bind<P: ControlPanel + ?Sized>(&self, panel: &mut P) {
        for section in Section::ALL {
            let mut members = self
                .specs
                .iter()
                .filter(|spec| spec.section == Some(section))
                .peekable();
            if members.peek().is_none() {
                continue;
            }
            panel.add_section(section.title());
            for spec in members {
                if let Some(widget) = self.widget_for(spec) {
                    panel.add_widget(widget);
                }
            }
        }
    }

    /// Widget reflecting the current value of `spec`, if it has a panel representation.
    pub fn widget_for(&self, spec: &'static ParamSpec) -> Option<Widget> {
        match ((spec.accessor.get)(&self.values), spec.range) {
            (ParamValue::Scalar(value), Some(range)) => Some(Widget::Slider {
                id: spec.id,
                label: spec.label,
                value,
                range,
                step: range.span() / 100.0,
            }),
            (ParamValue::Color(rgb), _) => Some(Widget::Color {
                id: spec.id,
                label: spec.label,
                packed: pack_rgb(rgb),
            }),
            _ => None,
        }
    }

    /// Current value of every parameter, read once per frame by the renderer.
    pub fn sample(&self) -> AuroraParams {
        self.values
    }

    /// Pretty JSON rendering of the current sample.
    pub fn dump_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.values)
    }
}
