//! Footlight Headless - host collaborators for tests and non-browser embedding
//!
//! The core scheduler talks to its host through small traits (renderer,
//! audio player, loudness sensor) and a one-tick-per-frame contract. This
//! crate supplies working stand-ins for all of them:
//! - `RecordingRenderer` and `RecordingAudio` record what the scheduler
//!   asked for instead of drawing or playing anything
//! - `FixedLoudness` and `SharedLoudness` script the microphone level
//! - `FrameDriver` runs the frame clock as a plain loop
//! - `CastLayout` builds a sprite population from a RON file

pub mod audio;
pub mod driver;
pub mod error;
pub mod layout;
pub mod renderer;
pub mod sensor;

pub use audio::RecordingAudio;
pub use driver::FrameDriver;
pub use error::{Error, Result};
pub use layout::{CastLayout, SpriteLayout, StageLayout};
pub use renderer::RecordingRenderer;
pub use sensor::{FixedLoudness, SharedLoudness};
