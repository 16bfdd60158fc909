//! Error types for footlight-core

use crate::EntityId;
use thiserror::Error;

/// Core error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Entity not found: {0}")]
    EntityNotFound(EntityId),

    #[error("Sprite not found: {0}")]
    SpriteNotFound(String),

    #[error("Duplicate sprite name: {0}")]
    DuplicateName(String),

    #[error("Entity is not a clone: {0}")]
    NotAClone(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("Audio error: {0}")]
    Audio(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
