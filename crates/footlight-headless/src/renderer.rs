//! Recording renderer for tests and headless embedding

use footlight_core::{Cast, Renderer};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct RenderLog {
    frames: usize,
    last_population: Vec<String>,
}

/// Renderer that records render calls instead of drawing
///
/// Clones share the same log, so keep one handle for assertions and hand
/// the other to the project. Hit-testing uses the default rectangular
/// bounds test.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    log: Rc<RefCell<RenderLog>>,
}

impl RecordingRenderer {
    /// Create a renderer with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of render calls so far
    pub fn frames(&self) -> usize {
        self.log.borrow().frames
    }

    /// Entity names of the population at the last render, in dispatch order
    pub fn last_population(&self) -> Vec<String> {
        self.log.borrow().last_population.clone()
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, cast: &Cast) {
        let mut log = self.log.borrow_mut();
        log.frames += 1;
        log.last_population = cast.iter_dispatch().map(|e| e.name.clone()).collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footlight_core::Project;

    #[test]
    fn test_records_frames_and_population() {
        let renderer = RecordingRenderer::new();
        let mut project = Project::new().with_renderer(renderer.clone());
        project.cast_mut().add_sprite("Cat").unwrap();

        project.tick();
        project.tick();

        assert_eq!(renderer.frames(), 2);
        assert_eq!(renderer.last_population(), vec!["Cat", "Stage"]);
    }
}
