//! Footlight Core - trigger/event model and cooperative frame scheduler
//!
//! This crate provides the runtime core for sprite script engines:
//! - Event kinds (`EventKind`) and option values (`Value`, `OptionValue`)
//! - Resumable script bodies (`Script`, `StepScript`) stepped one
//!   suspension unit per frame tick
//! - Triggers (`Trigger`) binding an event kind, options, and a script,
//!   with supersede-on-restart run state
//! - The entity population (`Entity`, `Cast`) of sprites, clones, and the
//!   stage
//! - The run registry (`Project`): event matching, same-pair dedup,
//!   per-tick stepping, green-flag global reset
//! - Completion signals (`Completion`) polled between ticks
//! - Collaborator traits (`Renderer`, `AudioPlayer`, `LoudnessSensor`) at
//!   the host boundary
//!
//! ## Cooperative model
//!
//! Everything runs on one logical thread. The host invokes
//! [`Project::tick`] once per rendering frame; each active run advances
//! exactly one suspension unit per tick, in active-set insertion order.
//! Scripts queue cross-cutting operations (broadcasts, clone lifecycle,
//! sounds) on their context, and the registry applies them at the tick's
//! safe point.

mod clock;
mod entity;
mod error;
mod event;
pub mod host;
mod input;
mod project;
pub mod script;
mod signal;
mod trigger;
mod value;

pub use clock::{Clock, Tick};
pub use entity::{Cast, Entity, EntityId, EntityState, Role};
pub use error::{Error, Result};
pub use event::EventKind;
pub use host::{
    loudness_over, AudioPlayer, LoudnessSensor, NullAudio, NullRenderer, Renderer, SoundHandle,
};
pub use input::{KeyState, Point};
pub use project::{LogLevel, Project, TickResult};
pub use script::{script, Progress, Request, Script, ScriptCx, ScriptFn, StepScript};
pub use signal::{Completion, CompletionSource};
pub use trigger::{RunStatus, StepOutcome, Trigger};
pub use value::{fired_with, FiredOptions, OptionContext, OptionValue, Value, ValueMap};
