use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Result};
use params::{KeyboardPanel, PanelKey, ParameterSurface};
use shaderfetch::{LoadError, ShaderStage, SourceFetcher};
use tracing::{debug, error, info, warn};
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder, EventLoopProxy};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::camera::Viewport;
use crate::console;
use crate::gpu::GpuState;
use crate::runtime::{time_source_for, FrameScheduler};
use crate::session::Session;
use crate::types::RendererConfig;

/// Messages delivered to the event loop from loader and console threads.
#[derive(Debug)]
enum AppEvent {
    SourceLoaded {
        stage: ShaderStage,
        result: Result<String, LoadError>,
    },
    Console(String),
}

/// Opens the preview window and drives the scene until it is closed.
///
/// Returns the first fatal error observed (a failed load, a shader that does
/// not build, or an exhausted surface).
pub(crate) fn run_window(config: &RendererConfig, surface: ParameterSurface) -> Result<()> {
    let event_loop = EventLoopBuilder::<AppEvent>::with_user_event()
        .build()
        .map_err(|err| anyhow!("failed to create event loop: {err}"))?;
    let proxy = event_loop.create_proxy();

    let window = WindowBuilder::new()
        .with_title(config.title.as_str())
        .with_inner_size(PhysicalSize::new(config.surface_size.0, config.surface_size.1))
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create preview window: {err}"))?;
    let window = Arc::new(window);

    let size = window.inner_size();
    let mut session: Session<GpuState> = Session::new(
        surface,
        Viewport::new(size.width, size.height),
        time_source_for(config.clock),
    );
    let mut panel = KeyboardPanel::new(config.show_panel);
    session.surface().bind(&mut panel);
    window.set_title(&window_title(&config.title, &panel));

    spawn_loaders(config, &proxy)?;
    if config.console {
        let console_proxy = proxy.clone();
        console::spawn_reader(move |line| console_proxy.send_event(AppEvent::Console(line)).is_ok())
            .map_err(|err| anyhow!("failed to spawn console thread: {err}"))?;
        info!("console ready; type `help` for commands");
    }

    let mut scheduler = FrameScheduler::new(config.target_fps);
    let mut occluded = false;
    let mut shift = false;
    let mut failure: Option<anyhow::Error> = None;

    let run_result = event_loop.run(|event, elwt| match event {
        Event::UserEvent(AppEvent::SourceLoaded { stage, result }) => {
            let text = match result {
                Ok(text) => text,
                Err(err) => {
                    error!(%stage, error = %err, "shader source failed to load");
                    failure = Some(err.into());
                    elwt.exit();
                    return;
                }
            };
            let started = session.source_loaded(stage, text, |sources, viewport| {
                GpuState::new(window.clone(), viewport, config.antialiasing, sources)
            });
            match started {
                Ok(true) => window.request_redraw(),
                Ok(false) => {}
                Err(err) => {
                    error!("failed to build aurora scene: {err:?}");
                    failure = Some(err);
                    elwt.exit();
                }
            }
        }
        Event::UserEvent(AppEvent::Console(line)) => {
            match console::respond(session.surface_mut(), &line) {
                Ok(reply) => {
                    println!("{}", reply.text);
                    if reply.changed {
                        panel.refresh(session.surface());
                        window.set_title(&window_title(&config.title, &panel));
                    }
                }
                Err(err) => eprintln!("error: {err}"),
            }
        }
        Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
            WindowEvent::CloseRequested | WindowEvent::Destroyed => elwt.exit(),
            WindowEvent::Resized(size) => {
                session.resize(Viewport::new(size.width, size.height));
            }
            WindowEvent::Occluded(hidden) => {
                occluded = hidden;
                debug!(occluded, "window visibility changed");
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                shift = modifiers.state().shift_key();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                if event.logical_key == Key::Named(NamedKey::Escape) {
                    elwt.exit();
                    return;
                }
                let Some(key) = panel_key(&event.logical_key, shift) else {
                    return;
                };
                if let Some(edit) = panel.handle(key) {
                    if let Err(err) = session.surface_mut().apply(&edit) {
                        warn!(id = edit.id, error = %err, "panel edit rejected");
                    }
                }
                window.set_title(&window_title(&config.title, &panel));
            }
            WindowEvent::RedrawRequested => match session.tick() {
                Ok(Some(_)) => scheduler.mark_rendered(Instant::now()),
                Ok(None) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    session.resize(session.viewport());
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    error!("surface out of memory; exiting preview");
                    failure = Some(anyhow!("surface out of memory"));
                    elwt.exit();
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    warn!("surface timeout; retrying next frame");
                }
                Err(other) => {
                    warn!("surface error: {other:?}; retrying next frame");
                }
            },
            _ => {}
        },
        Event::AboutToWait => {
            if !session.is_running() || occluded {
                elwt.set_control_flow(ControlFlow::Wait);
                return;
            }
            let now = Instant::now();
            if scheduler.ready_for_frame(now) {
                window.request_redraw();
                elwt.set_control_flow(ControlFlow::Wait);
            } else if let Some(deadline) = scheduler.next_deadline() {
                elwt.set_control_flow(ControlFlow::WaitUntil(deadline));
            } else {
                elwt.set_control_flow(ControlFlow::Wait);
            }
        }
        _ => {}
    });

    if let Some(err) = failure {
        return Err(err);
    }
    run_result.map_err(|err| anyhow!("window event loop error: {err}"))
}

fn spawn_loaders(config: &RendererConfig, proxy: &EventLoopProxy<AppEvent>) -> Result<()> {
    let fetcher = SourceFetcher::for_sources(&config.sources)?;
    for stage in ShaderStage::ALL {
        let location = config.sources.location(stage).clone();
        info!(%stage, %location, "loading shader source");
        let proxy = proxy.clone();
        fetcher
            .spawn(stage, location, move |stage, result| {
                let _ = proxy.send_event(AppEvent::SourceLoaded { stage, result });
            })
            .map_err(|err| anyhow!("failed to spawn {stage} loader: {err}"))?;
    }
    Ok(())
}

fn window_title(base: &str, panel: &KeyboardPanel) -> String {
    match panel.status_line() {
        Some(status) => format!("{base} | {status}"),
        None => base.to_string(),
    }
}

/// Maps a pressed key to a panel action.
///
/// `H` toggles the panel, Tab/arrows move focus, left/right nudge the focused
/// control and `C` cycles the edited color channel.
fn panel_key(key: &Key, shift: bool) -> Option<PanelKey> {
    match key {
        Key::Named(NamedKey::Tab) if shift => Some(PanelKey::Previous),
        Key::Named(NamedKey::Tab) | Key::Named(NamedKey::ArrowDown) => Some(PanelKey::Next),
        Key::Named(NamedKey::ArrowUp) => Some(PanelKey::Previous),
        Key::Named(NamedKey::ArrowRight) => Some(PanelKey::Increase),
        Key::Named(NamedKey::ArrowLeft) => Some(PanelKey::Decrease),
        Key::Character(value) => match value.to_ascii_lowercase().as_str() {
            "h" => Some(PanelKey::Toggle),
            "c" => Some(PanelKey::NextChannel),
            "+" | "=" => Some(PanelKey::Increase),
            "-" => Some(PanelKey::Decrease),
            _ => None,
        },
        _ => None,
    }
}
