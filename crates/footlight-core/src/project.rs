//! The run registry: event dispatch and the per-frame scheduler
//!
//! `Project` owns the entity population and the set of currently active
//! (trigger, entity) runs. Events are matched against every entity's
//! triggers in a fixed dispatch order; matched pairs are started with
//! same-pair dedup and stepped once per tick in insertion order.

use crate::{
    clock::{Clock, Tick},
    entity::{Cast, Entity, EntityId, Role},
    event::EventKind,
    host::{AudioPlayer, NullAudio, NullRenderer, Renderer, SoundHandle},
    input::{KeyState, Point},
    script::{Request, ScriptCx},
    signal::Completion,
    trigger::StepOutcome,
    value::{fired_with, FiredOptions},
    Error, Result,
};

/// Log level for collected scheduler reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Result of one scheduler tick
#[derive(Debug, Default)]
pub struct TickResult {
    /// Runs advanced this tick
    pub stepped: usize,
    /// Runs that reached natural completion this tick
    pub finished: usize,
    /// Reports collected during the tick (per-run failures, rejected
    /// requests); never propagated into scheduler control flow
    pub logs: Vec<(LogLevel, String)>,
}

impl TickResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }
}

/// An active (entity, trigger) pair; insertion order governs step order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RunEntry {
    entity: EntityId,
    trigger: usize,
}

/// The scheduler core: entity population plus active-run set
pub struct Project {
    cast: Cast,
    active: Vec<RunEntry>,
    clock: Clock,
    keys: KeyState,
    renderer: Box<dyn Renderer>,
    audio: Box<dyn AudioPlayer>,
    playing: Vec<SoundHandle>,
    pending: Vec<Request>,
}

impl Project {
    /// Create a project with an empty population and null collaborators
    pub fn new() -> Self {
        Self {
            cast: Cast::new(),
            active: Vec::new(),
            clock: Clock::new(),
            keys: KeyState::new(),
            renderer: Box::new(NullRenderer),
            audio: Box::new(NullAudio),
            playing: Vec::new(),
            pending: Vec::new(),
        }
    }

    /// Replace the rendering collaborator
    pub fn with_renderer(mut self, renderer: impl Renderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Replace the audio collaborator
    pub fn with_audio(mut self, audio: impl AudioPlayer + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// The entity population
    pub fn cast(&self) -> &Cast {
        &self.cast
    }

    /// The entity population, mutably (used while defining sprites)
    pub fn cast_mut(&mut self) -> &mut Cast {
        &mut self.cast
    }

    /// Currently-held keys and pointer position
    pub fn keys(&self) -> &KeyState {
        &self.keys
    }

    /// Current scheduler tick
    pub fn current_tick(&self) -> Tick {
        self.clock.tick()
    }

    /// Ticks since the timer was last restarted
    pub fn timer_ticks(&self) -> Tick {
        self.clock.timer_ticks()
    }

    /// Restart the timer epoch
    pub fn restart_timer(&mut self) {
        self.clock.restart_timer();
    }

    /// Number of active runs (for hosts and diagnostics)
    pub fn active_runs(&self) -> usize {
        self.active.len()
    }

    /// Fire the green-flag event: global reset, then restart matching runs
    pub fn green_flag(&mut self) -> Completion {
        self.fire_event(EventKind::GreenFlag, FiredOptions::new())
    }

    /// Fire an event against the whole population
    ///
    /// Matching pairs are started unless the identical pair is already
    /// active; the returned signal settles once every pair touched by this
    /// firing (started or skipped-as-running) reaches done. No matches is
    /// an already-resolved signal, not an error.
    pub fn fire_event(&mut self, kind: EventKind, options: FiredOptions) -> Completion {
        if kind == EventKind::GreenFlag {
            self.reset_all();
        }
        let pairs = self.collect_matches(kind, &options);
        self.start_pairs(pairs)
    }

    /// Translate a key-down occurrence into a `KeyPressed` firing
    pub fn key_pressed(&mut self, key: &str) -> Completion {
        self.keys.press(key);
        self.fire_event(EventKind::KeyPressed, fired_with("key", key))
    }

    /// Record a key release; no event fires
    pub fn key_released(&mut self, key: &str) {
        self.keys.release(key);
    }

    /// Translate a pointer click into `Clicked` firings
    ///
    /// Only entities owning at least one `Clicked` trigger are hit-tested;
    /// the stage always counts as hit.
    pub fn click_at(&mut self, point: Point) -> Completion {
        self.keys.set_pointer(point);

        let mut pairs = Vec::new();
        for entity in self.cast.iter_dispatch() {
            if !entity.listens_for(EventKind::Clicked) {
                continue;
            }
            let hit = entity.role == Role::Stage || self.renderer.hit_test(entity, point);
            if !hit {
                continue;
            }
            for (index, trigger) in entity.triggers.iter().enumerate() {
                if trigger.matches(EventKind::Clicked, &FiredOptions::new(), Some(entity)) {
                    pairs.push(RunEntry {
                        entity: entity.id,
                        trigger: index,
                    });
                }
            }
        }
        self.start_pairs(pairs)
    }

    /// Switch the stage backdrop and fire `BackdropChanged`
    pub fn switch_backdrop(&mut self, backdrop: usize) -> Completion {
        self.cast.stage_mut().state.costume = backdrop;
        self.fire_event(
            EventKind::BackdropChanged,
            fired_with("backdrop", backdrop as i64),
        )
    }

    /// Create a clone of an existing sprite and fire `CloneStarted` scoped
    /// to the new clone only
    pub fn create_clone(&mut self, origin: EntityId) -> Result<EntityId> {
        let id = self.cast.create_clone(origin)?;

        let pairs = match self.cast.get(id) {
            Some(entity) => entity
                .triggers
                .iter()
                .enumerate()
                .filter(|(_, t)| t.matches(EventKind::CloneStarted, &FiredOptions::new(), Some(entity)))
                .map(|(index, _)| RunEntry { entity: id, trigger: index })
                .collect(),
            None => Vec::new(),
        };
        self.start_pairs(pairs);
        Ok(id)
    }

    /// Destroy a clone, purging its active runs immediately
    ///
    /// Origin sprites and the stage cannot be destroyed.
    pub fn destroy_clone(&mut self, id: EntityId) -> Result<()> {
        match self.cast.get(id) {
            None => return Err(Error::EntityNotFound(id)),
            Some(entity) if !entity.is_clone() => {
                return Err(Error::NotAClone(entity.name.clone()))
            }
            Some(_) => {}
        }
        self.cast.remove(id)?;
        self.active.retain(|entry| entry.entity != id);
        Ok(())
    }

    /// Start a sound through the audio collaborator
    pub fn play_sound(&mut self, url: &str) -> Completion {
        let handle = self.audio.play(url);
        let completion = handle.completion();
        self.playing.push(handle);
        completion
    }

    /// Stop every tracked sound and tell the backend to stop everything
    pub fn stop_all_sounds(&mut self) {
        for handle in self.playing.drain(..) {
            handle.stop();
        }
        self.audio.stop_all();
    }

    /// Advance every active run one suspension unit
    ///
    /// Steps the snapshot of entries taken at tick start (runs started
    /// mid-tick wait for the next one), prunes finished runs, applies
    /// requests scripts queued during stepping, and invokes the renderer
    /// exactly once.
    pub fn tick(&mut self) -> TickResult {
        self.clock.advance();
        let mut result = TickResult::new();

        let snapshot = self.active.clone();
        let tick = self.clock.tick();
        let timer_ticks = self.clock.timer_ticks();

        for entry in snapshot {
            let Some(entity) = self.cast.get_mut(entry.entity) else {
                continue;
            };
            let Entity {
                id,
                name,
                triggers,
                state,
                ..
            } = entity;
            let Some(trigger) = triggers.get_mut(entry.trigger) else {
                continue;
            };
            let mut cx = ScriptCx::new(state, *id, &self.keys, tick, timer_ticks, &mut self.pending);
            match trigger.step(&mut cx) {
                StepOutcome::Idle => {}
                StepOutcome::Yielded => result.stepped += 1,
                StepOutcome::Finished => {
                    result.stepped += 1;
                    result.finished += 1;
                }
                StepOutcome::Failed(err) => {
                    result.stepped += 1;
                    result
                        .logs
                        .push((LogLevel::Error, format!("script on \"{}\" failed: {}", name, err)));
                }
            }
        }

        // Prune runs that reached done
        let cast = &self.cast;
        self.active.retain(|entry| {
            cast.get(entry.entity)
                .and_then(|e| e.triggers.get(entry.trigger))
                .map(|t| !t.is_done())
                .unwrap_or(false)
        });

        // Safe point: apply requests queued by scripts during stepping
        let requests = std::mem::take(&mut self.pending);
        for request in requests {
            match request {
                Request::Broadcast { name, done } => {
                    let signal =
                        self.fire_event(EventKind::BroadcastReceived, fired_with("name", name));
                    done.link(signal);
                }
                Request::CreateClone { origin } => {
                    if let Err(err) = self.create_clone(origin) {
                        result
                            .logs
                            .push((LogLevel::Warn, format!("clone request rejected: {}", err)));
                    }
                }
                Request::DeleteClone { target } => {
                    if let Err(err) = self.destroy_clone(target) {
                        result
                            .logs
                            .push((LogLevel::Warn, format!("delete request rejected: {}", err)));
                    }
                }
                Request::PlaySound { url, done } => {
                    let handle = self.audio.play(&url);
                    done.link(handle.completion());
                    self.playing.push(handle);
                }
                Request::StopAllSounds => self.stop_all_sounds(),
                Request::RestartTimer => self.clock.restart_timer(),
            }
        }

        // Drop bookkeeping for sounds that ended on their own
        self.playing.retain(|h| !h.completion().is_settled());

        self.renderer.render(&self.cast);
        result
    }

    /// Global reset, atomic within one tick: abandon every active run
    /// (signals stay unsettled), restart the timer, stop audio, destroy
    /// clones, clear transient effects
    fn reset_all(&mut self) {
        self.active.clear();
        self.pending.clear();
        self.clock.restart_timer();
        self.stop_all_sounds();

        self.cast.remove_clones();
        for entity in self.cast.iter_dispatch_mut() {
            entity.state.effects.clear();
        }
    }

    fn collect_matches(&self, kind: EventKind, options: &FiredOptions) -> Vec<RunEntry> {
        let mut pairs = Vec::new();
        for entity in self.cast.iter_dispatch() {
            for (index, trigger) in entity.triggers.iter().enumerate() {
                if trigger.matches(kind, options, Some(entity)) {
                    pairs.push(RunEntry {
                        entity: entity.id,
                        trigger: index,
                    });
                }
            }
        }
        pairs
    }

    /// Start matched pairs with same-pair dedup
    ///
    /// A pair already in the active set is neither restarted nor moved;
    /// its current run still contributes to the aggregate signal.
    fn start_pairs(&mut self, pairs: Vec<RunEntry>) -> Completion {
        let mut touched = Vec::with_capacity(pairs.len());
        for pair in pairs {
            if self.active.contains(&pair) {
                let current = self
                    .cast
                    .get(pair.entity)
                    .and_then(|e| e.triggers.get(pair.trigger))
                    .and_then(|t| t.current_completion());
                if let Some(signal) = current {
                    touched.push(signal);
                }
                continue;
            }
            let Some(entity) = self.cast.get_mut(pair.entity) else {
                continue;
            };
            let Some(trigger) = entity.triggers.get_mut(pair.trigger) else {
                continue;
            };
            touched.push(trigger.start());
            self.active.push(pair);
        }
        Completion::all(touched)
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}
