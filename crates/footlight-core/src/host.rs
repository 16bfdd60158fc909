//! External collaborator interfaces
//!
//! The scheduler core is specified only up to these boundaries: it calls a
//! renderer once per tick, asks it to hit-test click coordinates, drives an
//! audio player during resets and sound requests, and reads a loudness
//! sensor through option values. The host owns everything behind them.
//! The frame clock collaborator has no trait: the one-tick-per-call
//! contract is `Project::tick` itself, invoked by the host once per frame.

use crate::{
    entity::{Cast, Entity},
    input::Point,
    signal::{Completion, CompletionSource},
    value::{OptionValue, Value},
};
use std::rc::Rc;

/// Rendering collaborator
pub trait Renderer {
    /// Draw the current population; called exactly once per tick
    fn render(&mut self, cast: &Cast);

    /// Whether a click coordinate intersects an entity's visual bounds
    ///
    /// The default uses the entity's rectangular bounds; backends with real
    /// geometry override this.
    fn hit_test(&self, entity: &Entity, point: Point) -> bool {
        entity.state.visible && entity.state.bounds_contain(point)
    }
}

/// A playing sound tracked by the scheduler
///
/// The audio backend keeps its own clone of the source to resolve the
/// signal on natural end; the scheduler stops the sound by resolving it
/// during resets.
#[derive(Debug, Clone)]
pub struct SoundHandle {
    source: CompletionSource,
}

impl SoundHandle {
    /// Create a handle for a sound that just started
    pub fn new(source: CompletionSource) -> Self {
        Self { source }
    }

    /// A handle whose sound already finished (or never played)
    pub fn finished() -> Self {
        let source = CompletionSource::new();
        source.resolve();
        Self { source }
    }

    /// A handle for a sound that failed to load
    pub fn failed() -> Self {
        let source = CompletionSource::new();
        source.cancel();
        Self { source }
    }

    /// Signal that settles when playback ends or is stopped
    pub fn completion(&self) -> Completion {
        self.source.completion()
    }

    /// Stop playback; settles the signal
    pub fn stop(&self) {
        self.source.resolve();
    }
}

/// Audio collaborator
pub trait AudioPlayer {
    /// Begin playback of a sound by URL
    fn play(&mut self, url: &str) -> SoundHandle;

    /// Stop everything currently playing
    fn stop_all(&mut self);
}

/// Loudness sensor collaborator
///
/// Not owned by the core: embedders hold it and feed it into trigger
/// options via [`loudness_over`].
pub trait LoudnessSensor {
    /// Current level in [0, 100], or -1.0 when unavailable
    fn current_level(&self) -> f64;
}

/// Build a derived trigger option that is true while loudness exceeds a
/// threshold
///
/// An unavailable sensor reports -1.0 and therefore never exceeds any
/// non-negative threshold (degraded, not an error).
pub fn loudness_over(sensor: Rc<dyn LoudnessSensor>, threshold: f64) -> OptionValue {
    OptionValue::derived(move |_entity| Value::Bool(sensor.current_level() > threshold))
}

/// Renderer that draws nothing and hits nothing
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _cast: &Cast) {}

    fn hit_test(&self, _entity: &Entity, _point: Point) -> bool {
        false
    }
}

/// Audio player with no backend; every sound completes immediately
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioPlayer for NullAudio {
    fn play(&mut self, _url: &str) -> SoundHandle {
        SoundHandle::finished()
    }

    fn stop_all(&mut self) {}
}
