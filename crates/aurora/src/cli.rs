use std::path::PathBuf;

use auroraconfig::{parse_antialias, AntialiasSetting};
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "aurora",
    author,
    version,
    about = "Animated aurora shader demo",
    arg_required_else_help = false
)]
pub struct Cli {
    #[command(flatten)]
    pub run: RunArgs,
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Parser, Debug, Default)]
pub struct RunArgs {
    /// TOML configuration file; command-line flags override its values.
    #[arg(long, value_name = "FILE", env = "AURORA_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Directory or http(s) base URL holding `aurora.vert` and `aurora.frag`.
    #[arg(long, value_name = "DIR|URL", global = true)]
    pub source_root: Option<String>,

    /// Vertex program location, overriding the source root.
    #[arg(long, value_name = "PATH|URL", global = true)]
    pub vertex: Option<String>,

    /// Fragment program location, overriding the source root.
    #[arg(long, value_name = "PATH|URL", global = true)]
    pub fragment: Option<String>,

    /// Initial window size (e.g. `1280x720`).
    #[arg(long, value_name = "WIDTHxHEIGHT", value_parser = parse_surface_size)]
    pub size: Option<(u32, u32)>,

    /// Optional FPS cap (0=uncapped).
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f32>,

    /// Anti-aliasing policy: `auto`, `off`, or an explicit MSAA sample count (e.g. `4`).
    #[arg(long, value_name = "MODE", value_parser = parse_antialias)]
    pub antialias: Option<AntialiasSetting>,

    /// Drive the time uniform from the wall clock instead of a fixed per-frame step.
    #[arg(long, conflicts_with = "time_step")]
    pub realtime: bool,

    /// Seconds added to the time uniform per rendered frame.
    #[arg(long, value_name = "SECONDS")]
    pub time_step: Option<f32>,

    /// Open the in-window parameter panel on start-up.
    #[arg(long)]
    pub show_panel: bool,

    /// Do not read console commands from stdin.
    #[arg(long)]
    pub no_console: bool,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Print every tunable parameter with its default and range.
    Params,
    /// Load both shader programs and check that they compile, without opening a window.
    Validate,
}

pub fn parse() -> Cli {
    Cli::parse()
}

pub fn parse_surface_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| "expected WIDTHxHEIGHT".to_string())?;
    let width = w
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid width '{}'", w.trim()))?;
    let height = h
        .trim()
        .parse::<u32>()
        .map_err(|_| format!("invalid height '{}'", h.trim()))?;
    if width == 0 || height == 0 {
        return Err("window dimensions must be greater than zero".into());
    }
    Ok((width, height))
}
