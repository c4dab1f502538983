use shaderfetch::SourceSet;

/// Anti-aliasing policy for the render pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Antialiasing {
    /// Pick the highest sample count supported by the surface format.
    #[default]
    Auto,
    /// Disable MSAA and render directly into the swapchain.
    Off,
    /// Request a specific MSAA sample count (clamped to what the device supports).
    Samples(u32),
}

/// Where the shader time input comes from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockMode {
    /// Advance by a fixed increment once per rendered frame.
    FixedStep { step: f32 },
    /// Seconds elapsed since the scene started running.
    Realtime,
}

impl ClockMode {
    pub const DEFAULT_STEP: f32 = 0.01;
}

impl Default for ClockMode {
    fn default() -> Self {
        Self::FixedStep {
            step: Self::DEFAULT_STEP,
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Initial window size in physical pixels.
    pub surface_size: (u32, u32),
    pub title: String,
    /// Locations of the vertex and fragment programs.
    pub sources: SourceSet,
    pub antialiasing: Antialiasing,
    /// Optional frame cap; `None` renders on every display refresh.
    pub target_fps: Option<f32>,
    pub clock: ClockMode,
    /// Whether the keyboard panel starts open.
    pub show_panel: bool,
    /// Read console commands from stdin.
    pub console: bool,
}

impl RendererConfig {
    pub fn new(sources: SourceSet) -> Self {
        Self {
            surface_size: (1280, 720),
            title: "Aurora".to_string(),
            sources,
            antialiasing: Antialiasing::default(),
            target_fps: None,
            clock: ClockMode::default(),
            show_panel: false,
            console: true,
        }
    }
}
