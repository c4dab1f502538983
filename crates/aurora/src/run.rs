use anyhow::{bail, Context, Result};
use auroraconfig::{AntialiasSetting, AuroraConfig, ClockSetting};
use params::{describe_parameters, ParameterSurface};
use renderer::{validate_sources, Antialiasing, ClockMode, Renderer, RendererConfig};
use shaderfetch::{ShaderStage, SourceFetcher, SourceLocation, SourceSet};
use tracing_subscriber::EnvFilter;

use crate::cli::RunArgs;

const DEFAULT_SOURCE_ROOT: &str = "shaders";

pub fn initialise_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// Opens the window and animates the aurora until it is closed.
pub fn run(args: &RunArgs) -> Result<()> {
    let file = load_config(args)?;
    let config = resolve_config(args, &file)?;
    tracing::info!(
        vertex = %config.sources.location(ShaderStage::Vertex),
        fragment = %config.sources.location(ShaderStage::Fragment),
        width = config.surface_size.0,
        height = config.surface_size.1,
        clock = ?config.clock,
        "starting aurora"
    );
    Renderer::new(config).run(ParameterSurface::aurora())
}

pub fn print_parameters() -> Result<()> {
    print!("{}", describe_parameters(ParameterSurface::aurora().specs()));
    Ok(())
}

/// Loads both programs the way the window would and checks that they compile.
pub fn validate(args: &RunArgs) -> Result<()> {
    let file = load_config(args)?;
    let sources = resolve_sources(args, &file)?;
    let fetcher = SourceFetcher::for_sources(&sources)?;
    let loaded = fetcher
        .fetch_pair(&sources)
        .context("failed to load shader sources")?;
    validate_sources(&loaded)?;
    for stage in ShaderStage::ALL {
        println!("{stage:<8} ok  {}", sources.location(stage));
    }
    Ok(())
}

fn load_config(args: &RunArgs) -> Result<AuroraConfig> {
    match &args.config {
        Some(path) => AuroraConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(AuroraConfig::default()),
    }
}

fn resolve_sources(args: &RunArgs, file: &AuroraConfig) -> Result<SourceSet> {
    let root = args
        .source_root
        .as_deref()
        .or(file.sources.root.as_deref())
        .unwrap_or(DEFAULT_SOURCE_ROOT);
    let mut sources = SourceSet::from_root(root)?;
    let overrides = [
        (ShaderStage::Vertex, args.vertex.as_ref().or(file.sources.vertex.as_ref())),
        (ShaderStage::Fragment, args.fragment.as_ref().or(file.sources.fragment.as_ref())),
    ];
    for (stage, raw) in overrides {
        if let Some(raw) = raw {
            sources = sources.with_location(stage, SourceLocation::parse(raw)?);
        }
    }
    Ok(sources)
}

fn map_antialias(setting: AntialiasSetting) -> Antialiasing {
    match setting {
        AntialiasSetting::Auto => Antialiasing::Auto,
        AntialiasSetting::Off => Antialiasing::Off,
        AntialiasSetting::Samples2 => Antialiasing::Samples(2),
        AntialiasSetting::Samples4 => Antialiasing::Samples(4),
        AntialiasSetting::Samples8 => Antialiasing::Samples(8),
        AntialiasSetting::Samples16 => Antialiasing::Samples(16),
    }
}

/// Merges command-line flags over the config file over built-in defaults.
fn resolve_config(args: &RunArgs, file: &AuroraConfig) -> Result<RendererConfig> {
    let mut config = RendererConfig::new(resolve_sources(args, file)?);

    if let Some(size) = args.size {
        config.surface_size = size;
    } else {
        let (width, height) = config.surface_size;
        config.surface_size = (
            file.window.width.unwrap_or(width),
            file.window.height.unwrap_or(height),
        );
    }
    if let Some(title) = &file.window.title {
        config.title = title.clone();
    }

    if let Some(setting) = args.antialias.or(file.render.antialias) {
        config.antialiasing = map_antialias(setting);
    }

    let fps = args.fps.or(file.render.fps);
    if let Some(fps) = fps {
        if !fps.is_finite() || fps < 0.0 {
            bail!("--fps must be a non-negative number");
        }
    }
    config.target_fps = fps.filter(|fps| *fps > 0.0);

    if let Some(step) = args.time_step {
        if !step.is_finite() || step <= 0.0 {
            bail!("--time-step must be a positive number");
        }
    }
    let realtime = args.realtime
        || (args.time_step.is_none() && file.animation.clock == Some(ClockSetting::Realtime));
    config.clock = if realtime {
        ClockMode::Realtime
    } else {
        ClockMode::FixedStep {
            step: args
                .time_step
                .or(file.animation.time_step)
                .unwrap_or(ClockMode::DEFAULT_STEP),
        }
    };

    config.show_panel = args.show_panel || file.panel.visible.unwrap_or(false);
    config.console = !args.no_console && file.panel.console.unwrap_or(true);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn args(argv: &[&str]) -> RunArgs {
        let mut full = vec!["aurora"];
        full.extend_from_slice(argv);
        Cli::try_parse_from(full).unwrap().run
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let config = resolve_config(&RunArgs::default(), &AuroraConfig::default()).unwrap();
        assert_eq!(config.surface_size, (1280, 720));
        assert_eq!(config.title, "Aurora");
        assert_eq!(config.antialiasing, Antialiasing::Auto);
        assert_eq!(config.target_fps, None);
        assert_eq!(config.clock, ClockMode::FixedStep { step: 0.01 });
        assert!(!config.show_panel);
        assert!(config.console);
        assert_eq!(
            config.sources.location(ShaderStage::Vertex),
            &SourceLocation::File(PathBuf::from("shaders/aurora.vert"))
        );
    }

    #[test]
    fn flags_override_file_values() {
        let file = AuroraConfig::from_toml_str(
            r#"
            [window]
            width = 800
            height = 600
            title = "Northern Lights"

            [render]
            antialias = "off"
            fps = 30.0

            [animation]
            clock = "realtime"

            [sources]
            root = "/srv/aurora"
            "#,
        )
        .unwrap();

        let from_file = resolve_config(&RunArgs::default(), &file).unwrap();
        assert_eq!(from_file.surface_size, (800, 600));
        assert_eq!(from_file.title, "Northern Lights");
        assert_eq!(from_file.antialiasing, Antialiasing::Off);
        assert_eq!(from_file.target_fps, Some(30.0));
        assert_eq!(from_file.clock, ClockMode::Realtime);

        let overridden = resolve_config(
            &args(&[
                "--size",
                "1920x1080",
                "--antialias",
                "8",
                "--fps",
                "0",
                "--time-step",
                "0.02",
                "--fragment",
                "https://example.com/fx/alt.frag",
            ]),
            &file,
        )
        .unwrap();
        assert_eq!(overridden.surface_size, (1920, 1080));
        assert_eq!(overridden.antialiasing, Antialiasing::Samples(8));
        assert_eq!(overridden.target_fps, None);
        assert_eq!(overridden.clock, ClockMode::FixedStep { step: 0.02 });
        assert_eq!(
            overridden.sources.location(ShaderStage::Vertex),
            &SourceLocation::File(PathBuf::from("/srv/aurora/aurora.vert"))
        );
        assert!(overridden.sources.location(ShaderStage::Fragment).is_remote());
    }

    #[test]
    fn panel_and_console_switches() {
        let file = AuroraConfig::from_toml_str("[panel]\nvisible = true\nconsole = true\n").unwrap();
        let config = resolve_config(&args(&["--no-console"]), &file).unwrap();
        assert!(config.show_panel);
        assert!(!config.console);
    }

    #[test]
    fn rejects_nonsensical_numbers() {
        assert!(resolve_config(&args(&["--time-step", "0"]), &AuroraConfig::default()).is_err());
        assert!(resolve_config(&args(&["--fps=-5"]), &AuroraConfig::default()).is_err());
    }
}
