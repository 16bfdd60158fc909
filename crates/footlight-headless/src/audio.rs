//! Recording audio player for tests and headless embedding

use footlight_core::{AudioPlayer, CompletionSource, SoundHandle};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct AudioLog {
    played: Vec<String>,
    live: Vec<SoundHandle>,
}

/// Audio player that records playback instead of producing sound
///
/// Sounds stay "playing" until [`RecordingAudio::finish_all`] or a
/// `stop_all` from the scheduler settles them, which lets tests observe
/// reset behavior. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingAudio {
    log: Rc<RefCell<AudioLog>>,
}

impl RecordingAudio {
    /// Create a player with an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// URLs played so far, in order
    pub fn played(&self) -> Vec<String> {
        self.log.borrow().played.clone()
    }

    /// Number of sounds still playing
    pub fn playing_count(&self) -> usize {
        self.log
            .borrow()
            .live
            .iter()
            .filter(|h| !h.completion().is_settled())
            .count()
    }

    /// Finish every live sound as if playback ended naturally
    pub fn finish_all(&self) {
        for handle in self.log.borrow_mut().live.drain(..) {
            handle.stop();
        }
    }
}

impl AudioPlayer for RecordingAudio {
    fn play(&mut self, url: &str) -> SoundHandle {
        let handle = SoundHandle::new(CompletionSource::new());
        let mut log = self.log.borrow_mut();
        log.played.push(url.to_string());
        log.live.push(handle.clone());
        handle
    }

    fn stop_all(&mut self) {
        self.finish_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use footlight_core::Project;

    #[test]
    fn test_records_playback() {
        let audio = RecordingAudio::new();
        let mut project = Project::new().with_audio(audio.clone());

        let done = project.play_sound("meow.mp3");
        assert_eq!(audio.played(), vec!["meow.mp3"]);
        assert_eq!(audio.playing_count(), 1);
        assert!(!done.is_settled());

        audio.finish_all();
        assert!(done.is_resolved());
        assert_eq!(audio.playing_count(), 0);
    }

    #[test]
    fn test_green_flag_stops_playing_sounds() {
        let audio = RecordingAudio::new();
        let mut project = Project::new().with_audio(audio.clone());

        let done = project.play_sound("loop.mp3");
        project.green_flag();

        assert!(done.is_resolved());
        assert_eq!(audio.playing_count(), 0);
    }
}
