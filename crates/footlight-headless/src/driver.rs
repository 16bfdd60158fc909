//! Manual frame clock
//!
//! The scheduler core never owns a clock loop; a host calls
//! `Project::tick()` once per frame. `FrameDriver` is that loop in its
//! simplest form, for tests and batch runs.

use footlight_core::{Completion, Project, TickResult};

/// Drives a project one tick per frame
#[derive(Debug, Default)]
pub struct FrameDriver;

impl FrameDriver {
    /// Run a fixed number of frames, collecting per-tick results
    pub fn run(project: &mut Project, frames: usize) -> Vec<TickResult> {
        (0..frames).map(|_| project.tick()).collect()
    }

    /// Run frames until a signal settles or the budget runs out
    ///
    /// Returns the number of frames run when the signal settled, `None`
    /// when the budget was exhausted first. Checks before the first tick,
    /// so an already-settled signal costs zero frames.
    pub fn run_until_settled(
        project: &mut Project,
        signal: &Completion,
        max_frames: usize,
    ) -> Option<usize> {
        for frame in 0..=max_frames {
            if signal.is_settled() {
                return Some(frame);
            }
            if frame == max_frames {
                break;
            }
            project.tick();
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footlight_core::{script, EventKind, StepScript, Trigger};

    fn idle_project(steps: usize) -> Project {
        let mut project = Project::new();
        project
            .cast_mut()
            .add_sprite("A")
            .unwrap()
            .add_trigger(Trigger::new(
                EventKind::GreenFlag,
                script(move || StepScript::idle(steps)),
            ));
        project
    }

    #[test]
    fn test_run_collects_one_result_per_frame() {
        let mut project = idle_project(2);
        project.green_flag();

        let results = FrameDriver::run(&mut project, 3);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].stepped, 1);
        assert_eq!(results[1].finished, 1);
        assert_eq!(results[2].stepped, 0);
    }

    #[test]
    fn test_run_until_settled_counts_frames() {
        let mut project = idle_project(4);
        let done = project.green_flag();

        assert_eq!(
            FrameDriver::run_until_settled(&mut project, &done, 10),
            Some(4)
        );
        assert!(done.is_resolved());
    }

    #[test]
    fn test_run_until_settled_respects_budget() {
        let mut project = idle_project(50);
        let done = project.green_flag();

        assert_eq!(FrameDriver::run_until_settled(&mut project, &done, 3), None);
        assert!(!done.is_settled());
    }

    #[test]
    fn test_settled_signal_costs_zero_frames() {
        let mut project = Project::new();
        // No listeners: the firing resolves immediately
        let done = project.green_flag();
        assert_eq!(
            FrameDriver::run_until_settled(&mut project, &done, 5),
            Some(0)
        );
        assert_eq!(project.current_tick(), 0);
    }
}
