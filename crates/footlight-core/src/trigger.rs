//! Triggers: (event kind, options, script body) bindings with run state

use crate::{
    entity::Entity,
    event::EventKind,
    script::{Progress, Script, ScriptCx, ScriptFn},
    signal::{Completion, CompletionSource},
    value::{FiredOptions, OptionContext, OptionValue, Value},
    Error,
};
use std::fmt;

/// Run status of a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    NotStarted,
    Running,
    Done,
}

/// What one trigger step produced
#[derive(Debug)]
pub enum StepOutcome {
    /// Not running; nothing happened
    Idle,
    /// Advanced one suspension unit
    Yielded,
    /// Ran to natural completion this step
    Finished,
    /// The script body errored; the run is abandoned but stays `Running`
    /// so it stalls alone without ever completing
    Failed(Error),
}

/// A registered event listener owned by one entity
///
/// Identity is the (event kind, option context, script body) triple. A
/// trigger has at most one in-progress execution at a time; starting again
/// supersedes the previous run.
pub struct Trigger {
    kind: EventKind,
    options: OptionContext,
    body: ScriptFn,
    status: RunStatus,
    running: Option<Box<dyn Script>>,
    signal: Option<CompletionSource>,
}

impl Trigger {
    /// Create a trigger with no options
    pub fn new(kind: EventKind, body: ScriptFn) -> Self {
        Self::with_options(kind, OptionContext::new(), body)
    }

    /// Create a trigger with declared options
    pub fn with_options(kind: EventKind, options: OptionContext, body: ScriptFn) -> Self {
        Self {
            kind,
            options,
            body,
            status: RunStatus::NotStarted,
            running: None,
            signal: None,
        }
    }

    /// The event kind this trigger listens for
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    /// Current run status
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Whether an execution is in progress
    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    /// Whether the last execution ran to completion
    pub fn is_done(&self) -> bool {
        self.status == RunStatus::Done
    }

    /// Whether this trigger's kind fires on threshold crossings
    pub fn is_edge_activated(&self) -> bool {
        self.kind.is_edge_activated()
    }

    /// Evaluate one declared option against a target entity
    pub fn option(&self, key: &str, target: &Entity) -> Option<Value> {
        self.options.get(key).map(|opt| opt.resolve(target))
    }

    /// Whether this trigger matches a firing
    ///
    /// The comparison is asymmetric: every key present in `fired` must be
    /// declared here and evaluate to the same value against `target`;
    /// fired keys absent from the declaration make the match fail, while
    /// declared keys absent from `fired` impose no constraint.
    ///
    /// # Panics
    ///
    /// Panics if `fired` is non-empty and no target is supplied; options
    /// cannot be evaluated without an entity, and calling this way is a
    /// caller bug.
    pub fn matches(&self, kind: EventKind, fired: &FiredOptions, target: Option<&Entity>) -> bool {
        if self.kind != kind {
            return false;
        }
        if fired.is_empty() {
            return true;
        }
        let target = target.expect("options supplied without a target entity to evaluate against");

        fired
            .iter()
            .all(|(key, value)| self.option(key, target).as_ref() == Some(value))
    }

    /// Begin a fresh execution, superseding any in-progress one
    ///
    /// The previous run's completion signal is resolved immediately; its
    /// body is dropped without cleanup. The new run is not stepped here.
    pub fn start(&mut self) -> Completion {
        if let Some(previous) = self.signal.take() {
            previous.resolve();
        }
        self.running = Some((self.body)());
        self.status = RunStatus::Running;

        let source = CompletionSource::new();
        let completion = source.completion();
        self.signal = Some(source);
        completion
    }

    /// Completion signal of the in-progress run, if any
    pub fn current_completion(&self) -> Option<Completion> {
        self.signal.as_ref().map(|s| s.completion())
    }

    /// Advance the in-progress execution one suspension unit
    pub fn step(&mut self, cx: &mut ScriptCx<'_>) -> StepOutcome {
        let Some(script) = self.running.as_mut() else {
            return StepOutcome::Idle;
        };
        match script.resume(cx) {
            Ok(Progress::Yielded) => StepOutcome::Yielded,
            Ok(Progress::Finished) => {
                self.running = None;
                self.status = RunStatus::Done;
                if let Some(signal) = self.signal.take() {
                    signal.resolve();
                }
                StepOutcome::Finished
            }
            Err(err) => {
                // Abandon the body; the run stalls alone, never completing
                self.running = None;
                StepOutcome::Failed(err)
            }
        }
    }

    /// A copy with identical identity and fresh run state, for clones
    pub fn fresh_copy(&self) -> Trigger {
        Self::with_options(self.kind, self.options.clone(), self.body.clone())
    }
}

impl fmt::Debug for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Trigger")
            .field("kind", &self.kind)
            .field("options", &self.options)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Cast, EntityId, EntityState};
    use crate::input::KeyState;
    use crate::script::{script, Request, StepScript};
    use crate::value::fired_with;
    use std::cell::Cell;
    use std::rc::Rc;

    fn key_trigger(key: &str) -> Trigger {
        let mut options = OptionContext::new();
        options.insert("key".into(), key.into());
        Trigger::with_options(
            EventKind::KeyPressed,
            options,
            script(|| StepScript::idle(1)),
        )
    }

    fn step_in_place(trigger: &mut Trigger) -> StepOutcome {
        let mut state = EntityState::default();
        let keys = KeyState::new();
        let mut requests: Vec<Request> = Vec::new();
        let mut cx = ScriptCx::new(&mut state, EntityId::new(1), &keys, 0, 0, &mut requests);
        trigger.step(&mut cx)
    }

    fn any_entity() -> (Cast, EntityId) {
        let mut cast = Cast::new();
        let id = cast.add_sprite("Cat").unwrap().id;
        (cast, id)
    }

    #[test]
    fn test_matches_kind_only() {
        let trigger = Trigger::new(EventKind::GreenFlag, script(|| StepScript::idle(1)));
        assert!(trigger.matches(EventKind::GreenFlag, &FiredOptions::new(), None));
        assert!(!trigger.matches(EventKind::Clicked, &FiredOptions::new(), None));
    }

    #[test]
    fn test_matches_superset_tolerance() {
        let (cast, id) = any_entity();
        let entity = cast.get(id).unwrap();

        // Trigger declared with {key: "space", extra: 2}
        let mut options = OptionContext::new();
        options.insert("key".into(), "space".into());
        options.insert("extra".into(), 2i64.into());
        let trigger = Trigger::with_options(
            EventKind::KeyPressed,
            options,
            script(|| StepScript::idle(1)),
        );

        // Fired {key: "space"} constrains only the shared key
        assert!(trigger.matches(EventKind::KeyPressed, &fired_with("key", "space"), Some(entity)));
        assert!(!trigger.matches(EventKind::KeyPressed, &fired_with("key", "enter"), Some(entity)));
        // A fired key the trigger never declared fails the match
        assert!(!trigger.matches(EventKind::KeyPressed, &fired_with("other", 1i64), Some(entity)));
    }

    #[test]
    fn test_matches_derived_option() {
        let (mut cast, id) = any_entity();
        cast.get_mut(id).unwrap().state.costume = 3;
        let entity = cast.get(id).unwrap();

        let mut options = OptionContext::new();
        options.insert(
            "costume".into(),
            OptionValue::derived(|e| Value::Num(e.state.costume as f64)),
        );
        let trigger = Trigger::with_options(
            EventKind::BackdropChanged,
            options,
            script(|| StepScript::idle(1)),
        );

        assert!(trigger.matches(
            EventKind::BackdropChanged,
            &fired_with("costume", 3i64),
            Some(entity)
        ));
        assert!(!trigger.matches(
            EventKind::BackdropChanged,
            &fired_with("costume", 2i64),
            Some(entity)
        ));
    }

    #[test]
    #[should_panic(expected = "options supplied without a target")]
    fn test_matches_options_without_target_is_contract_violation() {
        let trigger = key_trigger("space");
        trigger.matches(EventKind::KeyPressed, &fired_with("key", "space"), None);
    }

    #[test]
    fn test_start_supersedes_previous_run() {
        let mut trigger = Trigger::new(EventKind::GreenFlag, script(|| StepScript::idle(3)));

        let first = trigger.start();
        let second = trigger.start();

        // The superseded run resolved without ever reporting done
        assert!(first.is_resolved());
        assert!(!trigger.is_done());
        assert!(!second.is_settled());

        // Only one execution in progress: three steps finish the new run
        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Yielded));
        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Yielded));
        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Finished));
        assert!(trigger.is_done());
        assert!(second.is_resolved());
    }

    #[test]
    fn test_step_when_idle_is_noop() {
        let mut trigger = key_trigger("space");
        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Idle));
        assert_eq!(trigger.status(), RunStatus::NotStarted);
    }

    #[test]
    fn test_failed_script_stalls_alone() {
        struct Broken;
        impl Script for Broken {
            fn resume(&mut self, _cx: &mut ScriptCx<'_>) -> crate::Result<Progress> {
                Err(Error::Script("boom".into()))
            }
        }

        let mut trigger = Trigger::new(EventKind::GreenFlag, script(|| Broken));
        let completion = trigger.start();

        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Failed(_)));
        // Still running, never completing
        assert!(trigger.is_running());
        assert!(!completion.is_settled());
        // Subsequent steps are no-ops
        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Idle));
    }

    #[test]
    fn test_fresh_copy_resets_run_state() {
        let counter = Rc::new(Cell::new(0u32));
        let c = Rc::clone(&counter);
        let mut trigger = Trigger::new(
            EventKind::CloneStarted,
            Rc::new(move || {
                let c = Rc::clone(&c);
                Box::new(StepScript::new(vec![Box::new(move |_| {
                    c.set(c.get() + 1);
                })]))
            }),
        );

        trigger.start();
        assert!(matches!(step_in_place(&mut trigger), StepOutcome::Finished));
        assert_eq!(counter.get(), 1);

        let mut copy = trigger.fresh_copy();
        assert_eq!(copy.status(), RunStatus::NotStarted);
        copy.start();
        assert!(matches!(step_in_place(&mut copy), StepOutcome::Finished));
        assert_eq!(counter.get(), 2);
    }
}
