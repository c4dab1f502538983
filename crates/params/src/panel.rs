//! Control-panel seam and the keyboard-driven panel used inside the preview window.
//!
//! ```text
//!   ParameterSurface::bind ──▶ ControlPanel::add_section / add_widget
//!            ▲                              │
//!            │ PanelEdit                    ▼
//!   ParameterSurface::apply ◀── KeyboardPanel::handle(PanelKey)
//! ```

use crate::color::{format_hex_color, MAX_PACKED};
use crate::registry::ParamRange;
use crate::surface::ParameterSurface;

/// Levels a color channel moves per key press.
const COLOR_STEP: u32 = 5;

/// Receiver for the widgets a [`ParameterSurface`] registers.
pub trait ControlPanel {
    fn add_section(&mut self, title: &'static str);
    fn add_widget(&mut self, widget: Widget);
}

/// One bound control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Widget {
    Slider {
        id: &'static str,
        label: &'static str,
        value: f32,
        range: ParamRange,
        step: f32,
    },
    Color {
        id: &'static str,
        label: &'static str,
        packed: u32,
    },
}

impl Widget {
    pub fn id(&self) -> &'static str {
        match self {
            Widget::Slider { id, .. } | Widget::Color { id, .. } => *id,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Widget::Slider { label, .. } | Widget::Color { label, .. } => *label,
        }
    }
}

/// Value emitted by a widget on change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WidgetValue {
    Number(f32),
    Color(u32),
}

/// A change reported by a panel, addressed by parameter identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelEdit {
    pub id: &'static str,
    pub value: WidgetValue,
}

/// Abstract key presses understood by [`KeyboardPanel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelKey {
    Toggle,
    Next,
    Previous,
    Increase,
    Decrease,
    NextChannel,
}

#[derive(Debug, Clone)]
struct PanelSection {
    title: &'static str,
    widgets: Vec<Widget>,
}

/// Panel navigated with the keyboard; its status is rendered as a single line.
#[derive(Debug, Clone)]
pub struct KeyboardPanel {
    sections: Vec<PanelSection>,
    focus: usize,
    channel: usize,
    visible: bool,
}

impl KeyboardPanel {
    pub fn new(visible: bool) -> Self {
        Self {
            sections: Vec::new(),
            focus: 0,
            channel: 0,
            visible,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn widget_count(&self) -> usize {
        self.sections.iter().map(|section| section.widgets.len()).sum()
    }

    fn locate(&self, mut index: usize) -> Option<(usize, usize)> {
        for (section_index, section) in self.sections.iter().enumerate() {
            if index < section.widgets.len() {
                return Some((section_index, index));
            }
            index -= section.widgets.len();
        }
        None
    }

    /// Section title and widget under focus.
    pub fn focused(&self) -> Option<(&'static str, &Widget)> {
        let (section, widget) = self.locate(self.focus)?;
        let section = &self.sections[section];
        Some((section.title, &section.widgets[widget]))
    }

    fn focused_mut(&mut self) -> Option<&mut Widget> {
        let (section, widget) = self.locate(self.focus)?;
        Some(&mut self.sections[section].widgets[widget])
    }

    /// Handles a key press; returns the edit to apply when a value changed.
    pub fn handle(&mut self, key: PanelKey) -> Option<PanelEdit> {
        if key == PanelKey::Toggle {
            self.visible = !self.visible;
            return None;
        }
        let count = self.widget_count();
        if !self.visible || count == 0 {
            return None;
        }

        match key {
            PanelKey::Toggle => None,
            PanelKey::Next => {
                self.focus = (self.focus + 1) % count;
                self.channel = 0;
                None
            }
            PanelKey::Previous => {
                self.focus = (self.focus + count - 1) % count;
                self.channel = 0;
                None
            }
            PanelKey::NextChannel => {
                if matches!(self.focused(), Some((_, Widget::Color { .. }))) {
                    self.channel = (self.channel + 1) % 3;
                }
                None
            }
            PanelKey::Increase => self.nudge(1),
            PanelKey::Decrease => self.nudge(-1),
        }
    }

    fn nudge(&mut self, direction: i32) -> Option<PanelEdit> {
        let channel = self.channel;
        let widget = self.focused_mut()?;
        match widget {
            Widget::Slider {
                id,
                value,
                range,
                step,
                ..
            } => {
                let next = range.clamp(*value + *step * direction as f32);
                if next == *value {
                    return None;
                }
                *value = next;
                Some(PanelEdit {
                    id: *id,
                    value: WidgetValue::Number(next),
                })
            }
            Widget::Color { id, packed, .. } => {
                let shift = 16 - 8 * channel as u32;
                let level = (*packed >> shift) & 0xFF;
                let next_level = if direction > 0 {
                    (level + COLOR_STEP).min(255)
                } else {
                    level.saturating_sub(COLOR_STEP)
                };
                if next_level == level {
                    return None;
                }
                *packed = ((*packed & !(0xFF << shift)) | (next_level << shift)) & MAX_PACKED;
                Some(PanelEdit {
                    id: *id,
                    value: WidgetValue::Color(*packed),
                })
            }
        }
    }

    /// Re-reads every widget value from the surface after external changes.
    pub fn refresh(&mut self, surface: &ParameterSurface) {
        for section in &mut self.sections {
            for widget in &mut section.widgets {
                let updated = surface
                    .spec(widget.id())
                    .ok()
                    .and_then(|spec| surface.widget_for(spec));
                if let Some(updated) = updated {
                    *widget = updated;
                }
            }
        }
    }

    /// One-line description of the focused widget, or `None` while hidden.
    pub fn status_line(&self) -> Option<String> {
        if !self.visible {
            return None;
        }
        let Some((section, widget)) = self.focused() else {
            return Some("no controls".to_string());
        };
        let detail = match widget {
            Widget::Slider { value, range, .. } => {
                format!("{value:.3} [{}, {}]", range.min, range.max)
            }
            Widget::Color { packed, .. } => {
                let channel = ["R", "G", "B"][self.channel];
                format!("{} ({channel})", format_hex_color(*packed))
            }
        };
        Some(format!("{section} > {}: {detail}", widget.label()))
    }
}

impl ControlPanel for KeyboardPanel {
    fn add_section(&mut self, title: &'static str) {
        self.sections.push(PanelSection {
            title,
            widgets: Vec::new(),
        });
    }

    fn add_widget(&mut self, widget: Widget) {
        if self.sections.is_empty() {
            self.add_section("Controls");
        }
        if let Some(section) = self.sections.last_mut() {
            section.widgets.push(widget);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound_panel() -> (ParameterSurface, KeyboardPanel) {
        let surface = ParameterSurface::aurora();
        let mut panel = KeyboardPanel::new(true);
        surface.bind(&mut panel);
        (surface, panel)
    }

    fn focus_on(panel: &mut KeyboardPanel, id: &str) {
        for _ in 0..panel.widget_count() {
            if panel.focused().map(|(_, widget)| widget.id()) == Some(id) {
                return;
            }
            panel.handle(PanelKey::Next);
        }
        panic!("widget {id} not found");
    }

    #[test]
    fn hidden_panel_ignores_everything_but_toggle() {
        let surface = ParameterSurface::aurora();
        let mut panel = KeyboardPanel::new(false);
        surface.bind(&mut panel);
        assert_eq!(panel.handle(PanelKey::Increase), None);
        assert_eq!(panel.status_line(), None);
        panel.handle(PanelKey::Toggle);
        assert!(panel.is_visible());
        assert!(panel.status_line().unwrap().starts_with("Rotation Controls > X Axis"));
    }

    #[test]
    fn navigation_wraps_in_both_directions() {
        let (_, mut panel) = bound_panel();
        panel.handle(PanelKey::Previous);
        assert_eq!(panel.focused().unwrap().1.id(), "waveScale");
        panel.handle(PanelKey::Next);
        assert_eq!(panel.focused().unwrap().1.id(), "rotationX");
    }

    #[test]
    fn slider_steps_by_a_hundredth_of_its_range() {
        let (mut surface, mut panel) = bound_panel();
        focus_on(&mut panel, "horizontalFade");
        let edit = panel.handle(PanelKey::Increase).unwrap();
        assert_eq!(edit.id, "horizontalFade");
        let WidgetValue::Number(value) = edit.value else {
            panic!("slider emitted {:?}", edit.value);
        };
        assert!((value - 1.55).abs() < 1e-6);
        surface.apply(&edit).unwrap();
        assert_eq!(surface.sample().horizontal_fade, value);
    }

    #[test]
    fn slider_edits_clamp_to_widget_range() {
        let (_, mut panel) = bound_panel();
        focus_on(&mut panel, "waveSpeed");
        let edit = panel.handle(PanelKey::Increase).unwrap();
        assert_eq!(edit.value, WidgetValue::Number(0.2));
        assert_eq!(panel.handle(PanelKey::Increase), None);
    }

    #[test]
    fn color_edits_move_the_selected_channel() {
        let (mut surface, mut panel) = bound_panel();
        focus_on(&mut panel, "auroraGreen");
        let red = panel.handle(PanelKey::Increase).unwrap();
        assert_eq!(red.value, WidgetValue::Color(0x05E566));
        panel.handle(PanelKey::NextChannel);
        let green = panel.handle(PanelKey::Increase).unwrap();
        assert_eq!(green.value, WidgetValue::Color(0x05EA66));
        surface.apply(&green).unwrap();
        assert_eq!(
            surface.sample().aurora_green,
            [5.0 / 255.0, 234.0 / 255.0, 102.0 / 255.0]
        );
    }

    #[test]
    fn color_channels_saturate() {
        let (_, mut panel) = bound_panel();
        focus_on(&mut panel, "auroraTeal");
        assert_eq!(panel.handle(PanelKey::Decrease), None);
    }

    #[test]
    fn refresh_pulls_external_changes() {
        let (mut surface, mut panel) = bound_panel();
        surface
            .set("rotationX", crate::ParamValue::Scalar(1.25))
            .unwrap();
        panel.refresh(&surface);
        let status = panel.status_line().unwrap();
        assert!(status.contains("1.250"), "{status}");
    }
}
