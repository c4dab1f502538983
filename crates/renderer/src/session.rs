//! One animation session: the parameter surface, the camera, and the render
//! target that only exists once both shader stages have loaded.
//!
//! ```text
//!   Idle(SourceJoin) ── source_loaded(vertex) ──┐
//!          │                                     ├─▶ Running(target)
//!          └──────── source_loaded(fragment) ───┘          │
//!                                                   tick() ─▶ FrameTarget::draw
//! ```

use params::{ParamValue, ParameterSurface, RESOLUTION};
use shaderfetch::{ShaderSources, ShaderStage, SourceJoin};
use tracing::{debug, info, warn};

use crate::camera::{Camera, Viewport};
use crate::runtime::BoxedTimeSource;
use crate::scene::FrameInputs;

/// Something a session can draw into once its programs exist.
pub trait FrameTarget {
    type Error;

    /// Adapts drawable resources to a new, non-empty viewport.
    fn resize(&mut self, viewport: Viewport);
    /// Issues exactly one draw for the supplied inputs.
    fn draw(&mut self, frame: &FrameInputs) -> Result<(), Self::Error>;
}

enum Phase<T> {
    Idle(SourceJoin),
    Running(T),
}

pub struct Session<T> {
    surface: ParameterSurface,
    camera: Camera,
    viewport: Viewport,
    phase: Phase<T>,
    clock: BoxedTimeSource,
    time: f32,
}

impl<T: FrameTarget> Session<T> {
    /// Starts idle and applies the initial viewport straight away.
    pub fn new(surface: ParameterSurface, viewport: Viewport, clock: BoxedTimeSource) -> Self {
        let mut session = Self {
            surface,
            camera: Camera::new(viewport.aspect()),
            viewport,
            phase: Phase::Idle(SourceJoin::new()),
            clock,
            time: 0.0,
        };
        session.resize(viewport);
        session
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running(_))
    }

    /// Stages still being waited on; empty once running.
    pub fn pending(&self) -> Vec<ShaderStage> {
        match &self.phase {
            Phase::Idle(join) => join.pending(),
            Phase::Running(_) => Vec::new(),
        }
    }

    pub fn surface(&self) -> &ParameterSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut ParameterSurface {
        &mut self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Time written to the shader by the most recent tick.
    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn target(&self) -> Option<&T> {
        match &self.phase {
            Phase::Running(target) => Some(target),
            Phase::Idle(_) => None,
        }
    }

    /// Records a loaded stage. Once both stages are in, `build` creates the
    /// render target and the session starts running. Returns whether this call
    /// performed the transition.
    pub fn source_loaded<F, E>(
        &mut self,
        stage: ShaderStage,
        text: String,
        build: F,
    ) -> Result<bool, E>
    where
        F: FnOnce(&ShaderSources, Viewport) -> Result<T, E>,
    {
        let Phase::Idle(join) = &mut self.phase else {
            warn!(%stage, "ignoring shader source delivered after start-up");
            return Ok(false);
        };
        debug!(%stage, bytes = text.len(), "shader source arrived");
        let Some(sources) = join.accept(stage, text) else {
            return Ok(false);
        };

        let target = build(&sources, self.viewport)?;
        self.clock.reset();
        self.phase = Phase::Running(target);
        info!(
            width = self.viewport.width,
            height = self.viewport.height,
            "aurora scene running"
        );
        let viewport = self.viewport;
        self.resize(viewport);
        Ok(true)
    }

    /// Keeps projection, drawable size, and the `resolution` parameter in step
    /// with the viewport. Before the target exists only the camera is updated.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport.is_empty() {
            debug!(
                width = viewport.width,
                height = viewport.height,
                "ignoring empty viewport"
            );
            return;
        }
        self.viewport = viewport;
        self.camera.set_aspect(viewport.aspect());
        if let Phase::Running(target) = &mut self.phase {
            target.resize(viewport);
            if let Err(err) = self
                .surface
                .set(RESOLUTION, ParamValue::Vector2(viewport.resolution()))
            {
                warn!(error = %err, "failed to record viewport resolution");
            }
        }
    }

    /// Advances the clock and draws one frame. Returns the frame time, or `None`
    /// while still waiting for sources.
    pub fn tick(&mut self) -> Result<Option<f32>, T::Error> {
        let Phase::Running(target) = &mut self.phase else {
            return Ok(None);
        };
        let sample = self.clock.sample();
        self.time = sample.seconds;
        let frame = FrameInputs::new(sample.seconds, &self.camera, self.surface.sample());
        target.draw(&frame)?;
        Ok(Some(sample.seconds))
    }
}

#[cfg(test)]
mod tests {
    use std::convert::Infallible;

    use super::*;
    use crate::runtime::FixedStepTimeSource;

    #[derive(Default)]
    struct RecordingTarget {
        sources: Option<ShaderSources>,
        resizes: Vec<Viewport>,
        frames: Vec<FrameInputs>,
    }

    impl FrameTarget for RecordingTarget {
        type Error = Infallible;

        fn resize(&mut self, viewport: Viewport) {
            self.resizes.push(viewport);
        }

        fn draw(&mut self, frame: &FrameInputs) -> Result<(), Infallible> {
            self.frames.push(*frame);
            Ok(())
        }
    }

    fn session(width: u32, height: u32) -> Session<RecordingTarget> {
        Session::new(
            ParameterSurface::aurora(),
            Viewport::new(width, height),
            Box::new(FixedStepTimeSource::new(0.01)),
        )
    }

    fn build(sources: &ShaderSources, _: Viewport) -> Result<RecordingTarget, Infallible> {
        Ok(RecordingTarget {
            sources: Some(sources.clone()),
            ..RecordingTarget::default()
        })
    }

    fn start(session: &mut Session<RecordingTarget>) {
        session
            .source_loaded(ShaderStage::Vertex, "vert".into(), build)
            .unwrap();
        assert!(session
            .source_loaded(ShaderStage::Fragment, "frag".into(), build)
            .unwrap());
    }

    #[test]
    fn one_source_keeps_the_session_idle() {
        for stage in ShaderStage::ALL {
            let mut session = session(800, 600);
            let started = session.source_loaded(stage, "src".into(), build).unwrap();
            assert!(!started);
            assert!(!session.is_running());
            assert_eq!(session.tick().unwrap(), None);
        }
    }

    #[test]
    fn both_sources_start_the_session_in_either_order() {
        let mut forward = session(800, 600);
        start(&mut forward);
        assert!(forward.is_running());

        let mut backward = session(800, 600);
        backward
            .source_loaded(ShaderStage::Fragment, "frag".into(), build)
            .unwrap();
        assert_eq!(backward.pending(), vec![ShaderStage::Vertex]);
        backward
            .source_loaded(ShaderStage::Vertex, "vert".into(), build)
            .unwrap();
        let sources = backward.target().unwrap().sources.clone().unwrap();
        assert_eq!(sources.vertex, "vert");
        assert_eq!(sources.fragment, "frag");
    }

    #[test]
    fn transition_happens_once() {
        let mut session = session(800, 600);
        start(&mut session);
        let again = session
            .source_loaded(ShaderStage::Vertex, "late".into(), |_, _| -> Result<_, Infallible> {
                panic!("target rebuilt")
            })
            .unwrap();
        assert!(!again);
    }

    #[test]
    fn build_failure_leaves_the_session_idle() {
        let mut session = session(800, 600);
        session
            .source_loaded(ShaderStage::Vertex, "vert".into(), build)
            .unwrap();
        let err = session
            .source_loaded(ShaderStage::Fragment, "frag".into(), |_, _| Err("bad shader"))
            .unwrap_err();
        assert_eq!(err, "bad shader");
        assert!(!session.is_running());
    }

    #[test]
    fn ticks_advance_time_by_fixed_step() {
        let mut session = session(800, 600);
        start(&mut session);
        for _ in 0..250 {
            session.tick().unwrap();
        }
        assert!((session.time() - 2.5).abs() < 1e-5, "{}", session.time());
        let frames = &session.target().unwrap().frames;
        assert_eq!(frames.len(), 250);
        assert!((frames[0].time - 0.01).abs() < 1e-7);
        assert!(frames.windows(2).all(|pair| pair[1].time > pair[0].time));
    }

    #[test]
    fn startup_viewport_sets_aspect_and_resolution() {
        let mut session = session(1920, 1080);
        assert!((session.camera().aspect - 1.7778).abs() < 1e-4);
        assert_eq!(session.surface().sample().resolution, [0.0, 0.0]);
        start(&mut session);
        assert_eq!(session.surface().sample().resolution, [1920.0, 1080.0]);
        assert_eq!(
            session.target().unwrap().resizes,
            vec![Viewport::new(1920, 1080)]
        );
    }

    #[test]
    fn resize_is_idempotent() {
        let mut once = session(800, 600);
        start(&mut once);
        once.resize(Viewport::new(1024, 768));

        let mut twice = session(800, 600);
        start(&mut twice);
        twice.resize(Viewport::new(1024, 768));
        twice.resize(Viewport::new(1024, 768));

        assert_eq!(once.camera(), twice.camera());
        assert_eq!(once.surface().sample(), twice.surface().sample());
        assert_eq!(
            once.camera().projection(),
            twice.camera().projection()
        );
    }

    #[test]
    fn resize_while_idle_only_touches_the_camera() {
        let mut session = session(800, 600);
        session.resize(Viewport::new(1000, 500));
        assert_eq!(session.camera().aspect, 2.0);
        assert_eq!(session.surface().sample().resolution, [0.0, 0.0]);
        start(&mut session);
        assert_eq!(session.surface().sample().resolution, [1000.0, 500.0]);
    }

    #[test]
    fn empty_viewports_are_ignored() {
        let mut session = session(800, 600);
        start(&mut session);
        session.resize(Viewport::new(0, 0));
        assert_eq!(session.viewport(), Viewport::new(800, 600));
        assert_eq!(session.target().unwrap().resizes.len(), 1);
    }

    #[test]
    fn frames_carry_current_parameters() {
        let mut session = session(800, 600);
        start(&mut session);
        session
            .surface_mut()
            .set("rotationY", ParamValue::Scalar(0.5))
            .unwrap();
        session.tick().unwrap();
        let frame = session.target().unwrap().frames[0];
        assert_eq!(frame.params.rotation_y, 0.5);
        assert_eq!(frame.model, crate::scene::model_matrix([0.0, 0.5, 0.0]));
    }
}
