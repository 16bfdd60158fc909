//! Resumable script bodies
//!
//! A script is the engine's unit of cooperative work: `resume` advances it
//! exactly one suspension unit per scheduler tick. The engine never knows
//! why a script suspended, only that it did. Scripts interact with the
//! wider runtime by queueing requests on the context; the registry applies
//! them at the next safe point rather than letting a script mutate the
//! active set it is being stepped from.

use crate::{
    clock::Tick,
    entity::{EntityId, EntityState},
    input::KeyState,
    signal::{Completion, CompletionSource},
    Result,
};
use std::rc::Rc;

/// What one resume call produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The script suspended and has more work to do
    Yielded,
    /// The script ran to natural completion
    Finished,
}

/// A deferred operation queued by a script during a step
#[derive(Debug)]
pub enum Request {
    /// Fire a broadcast event; `done` is linked to the firing's aggregate
    /// completion when the request is applied
    Broadcast {
        name: String,
        done: CompletionSource,
    },
    /// Create a clone of an existing entity
    CreateClone { origin: EntityId },
    /// Destroy a clone
    DeleteClone { target: EntityId },
    /// Start a sound; `done` is linked to the sound's completion
    PlaySound {
        url: String,
        done: CompletionSource,
    },
    /// Stop every playing sound
    StopAllSounds,
    /// Restart the timer epoch
    RestartTimer,
}

/// Execution context handed to a script for one suspension unit
pub struct ScriptCx<'a> {
    /// Mutable state of the entity this run is bound to
    pub target: &'a mut EntityState,
    /// Identity of the bound entity
    pub target_id: EntityId,
    /// Currently-held keys and pointer position
    pub keys: &'a KeyState,
    tick: Tick,
    timer_ticks: Tick,
    requests: &'a mut Vec<Request>,
}

impl<'a> ScriptCx<'a> {
    pub(crate) fn new(
        target: &'a mut EntityState,
        target_id: EntityId,
        keys: &'a KeyState,
        tick: Tick,
        timer_ticks: Tick,
        requests: &'a mut Vec<Request>,
    ) -> Self {
        Self {
            target,
            target_id,
            keys,
            tick,
            timer_ticks,
            requests,
        }
    }

    /// Current scheduler tick
    pub fn tick(&self) -> Tick {
        self.tick
    }

    /// Ticks since the timer was last restarted
    pub fn timer_ticks(&self) -> Tick {
        self.timer_ticks
    }

    /// Queue a broadcast; the returned signal settles once every run the
    /// broadcast touches has reached done
    pub fn broadcast(&mut self, name: impl Into<String>) -> Completion {
        let done = CompletionSource::new();
        let signal = done.completion();
        self.requests.push(Request::Broadcast {
            name: name.into(),
            done,
        });
        signal
    }

    /// Queue a sound; the returned signal settles when playback ends
    pub fn play_sound(&mut self, url: impl Into<String>) -> Completion {
        let done = CompletionSource::new();
        let signal = done.completion();
        self.requests.push(Request::PlaySound {
            url: url.into(),
            done,
        });
        signal
    }

    /// Queue stopping every playing sound
    pub fn stop_all_sounds(&mut self) {
        self.requests.push(Request::StopAllSounds);
    }

    /// Queue creating a clone of the bound entity
    pub fn create_clone(&mut self) {
        self.requests.push(Request::CreateClone {
            origin: self.target_id,
        });
    }

    /// Queue destroying the bound entity (must be a clone)
    pub fn delete_this_clone(&mut self) {
        self.requests.push(Request::DeleteClone {
            target: self.target_id,
        });
    }

    /// Queue a timer restart
    pub fn restart_timer(&mut self) {
        self.requests.push(Request::RestartTimer);
    }
}

/// A resumable unit of work bound to one entity
pub trait Script {
    /// Advance exactly one suspension unit
    fn resume(&mut self, cx: &mut ScriptCx<'_>) -> Result<Progress>;
}

/// Factory producing a fresh execution of a script body
///
/// Restarting a trigger or copying it onto a clone always goes through the
/// factory, so every run has independent state.
pub type ScriptFn = Rc<dyn Fn() -> Box<dyn Script>>;

/// Wrap a constructor closure as a [`ScriptFn`]
pub fn script<S, F>(f: F) -> ScriptFn
where
    S: Script + 'static,
    F: Fn() -> S + 'static,
{
    Rc::new(move || Box::new(f()))
}

/// A script built from a list of per-step closures
///
/// Each closure is one suspension unit; the run finishes on the call that
/// executes the last one. Mostly used by tests and simple hosts.
pub struct StepScript {
    steps: Vec<Box<dyn FnMut(&mut ScriptCx<'_>)>>,
    next: usize,
}

impl StepScript {
    /// Create from a list of step closures
    pub fn new(steps: Vec<Box<dyn FnMut(&mut ScriptCx<'_>)>>) -> Self {
        Self { steps, next: 0 }
    }

    /// A script that does nothing for `count` steps then finishes
    pub fn idle(count: usize) -> Self {
        let steps = (0..count)
            .map(|_| Box::new(|_: &mut ScriptCx<'_>| {}) as Box<dyn FnMut(&mut ScriptCx<'_>)>)
            .collect();
        Self::new(steps)
    }
}

impl Script for StepScript {
    fn resume(&mut self, cx: &mut ScriptCx<'_>) -> Result<Progress> {
        if self.next >= self.steps.len() {
            return Ok(Progress::Finished);
        }
        (self.steps[self.next])(cx);
        self.next += 1;
        if self.next >= self.steps.len() {
            Ok(Progress::Finished)
        } else {
            Ok(Progress::Yielded)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityState;

    fn with_cx<R>(f: impl FnOnce(&mut ScriptCx<'_>) -> R) -> (R, Vec<Request>) {
        let mut state = EntityState::default();
        let keys = KeyState::new();
        let mut requests = Vec::new();
        let mut cx = ScriptCx::new(&mut state, EntityId::new(1), &keys, 0, 0, &mut requests);
        let out = f(&mut cx);
        (out, requests)
    }

    #[test]
    fn test_step_script_progress() {
        let (progresses, _) = with_cx(|cx| {
            let mut script = StepScript::idle(3);
            vec![
                script.resume(cx).unwrap(),
                script.resume(cx).unwrap(),
                script.resume(cx).unwrap(),
                script.resume(cx).unwrap(),
            ]
        });
        assert_eq!(
            progresses,
            vec![
                Progress::Yielded,
                Progress::Yielded,
                Progress::Finished,
                Progress::Finished,
            ]
        );
    }

    #[test]
    fn test_empty_script_finishes_immediately() {
        let (progress, _) = with_cx(|cx| StepScript::idle(0).resume(cx).unwrap());
        assert_eq!(progress, Progress::Finished);
    }

    #[test]
    fn test_requests_are_queued_not_applied() {
        let (signal, requests) = with_cx(|cx| {
            let signal = cx.broadcast("ping");
            cx.restart_timer();
            signal
        });
        assert_eq!(requests.len(), 2);
        assert!(matches!(&requests[0], Request::Broadcast { name, .. } if name == "ping"));
        assert!(matches!(&requests[1], Request::RestartTimer));
        // Nothing has fired yet
        assert!(!signal.is_settled());
    }
}
