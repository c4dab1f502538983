use std::time::{Duration, Instant};

use crate::types::ClockMode;

/// Snapshot of the time state supplied to the shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Elapsed simulated or wall-clock time in seconds.
    pub seconds: f32,
    /// Number of frames sampled before this one.
    pub frame_index: u64,
}

impl TimeSample {
    pub fn new(seconds: f32, frame_index: u64) -> Self {
        Self {
            seconds,
            frame_index,
        }
    }
}

/// Abstraction over where time values originate from.
pub trait TimeSource: Send {
    /// Resets the source to its initial state.
    fn reset(&mut self);
    /// Advances to the next frame and reports its time.
    fn sample(&mut self) -> TimeSample;
}

/// Convenient alias for owning time sources behind trait objects.
pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

/// Time source that advances by a constant step per sampled frame.
///
/// Time is derived from the tick count rather than accumulated, so it never
/// drifts: after `n` samples it reports `n * step`.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepTimeSource {
    step: f32,
    ticks: u64,
}

impl FixedStepTimeSource {
    pub fn new(step: f32) -> Self {
        Self { step, ticks: 0 }
    }

    pub fn step(&self) -> f32 {
        self.step
    }
}

impl TimeSource for FixedStepTimeSource {
    fn reset(&mut self) {
        self.ticks = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let frame_index = self.ticks;
        self.ticks = self.ticks.saturating_add(1);
        let seconds = (self.ticks as f64 * f64::from(self.step)) as f32;
        TimeSample::new(seconds, frame_index)
    }
}

/// Time source backed by the system monotonic clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    origin: Instant,
    frame: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            origin: Instant::now(),
            frame: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn reset(&mut self) {
        self.origin = Instant::now();
        self.frame = 0;
    }

    fn sample(&mut self) -> TimeSample {
        let elapsed = self.origin.elapsed();
        let sample = TimeSample::new(elapsed.as_secs_f32(), self.frame);
        self.frame = self.frame.saturating_add(1);
        sample
    }
}

/// Builds the time source for a clock mode.
pub fn time_source_for(clock: ClockMode) -> BoxedTimeSource {
    match clock {
        ClockMode::FixedStep { step } => Box::new(FixedStepTimeSource::new(step)),
        ClockMode::Realtime => Box::new(SystemTimeSource::new()),
    }
}

/// Decides when the next frame may be drawn under an optional fps cap.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    interval: Option<Duration>,
    last_frame: Option<Instant>,
}

impl FrameScheduler {
    /// `None` or a non-positive cap renders whenever the host asks.
    pub fn new(target_fps: Option<f32>) -> Self {
        let interval = target_fps
            .filter(|fps| fps.is_finite() && *fps > 0.0)
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps)));
        Self {
            interval,
            last_frame: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        match (self.interval, self.last_frame) {
            (Some(interval), Some(last)) => now.saturating_duration_since(last) >= interval,
            _ => true,
        }
    }

    /// Earliest instant at which the next frame becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        let interval = self.interval?;
        self.last_frame.map(|last| last + interval)
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_frame = Some(now);
    }

    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
