//! RON cast layouts
//!
//! A layout file declares the stage and the sprite population with their
//! starting positions, bounds and properties. Triggers stay in code; the
//! layout only shapes the cast, so the same script set can be rehearsed
//! against different arrangements.

use crate::error::Result;
use footlight_core::{Project, Value};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Declarative description of a cast
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CastLayout {
    /// Stage setup
    #[serde(default)]
    pub stage: StageLayout,
    /// Sprites in dispatch order
    #[serde(default)]
    pub sprites: Vec<SpriteLayout>,
}

/// Stage portion of a layout
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageLayout {
    /// Starting backdrop index
    #[serde(default)]
    pub backdrop: usize,
    /// Initial stage properties
    #[serde(default)]
    pub properties: Vec<(String, Value)>,
}

/// One sprite in a layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteLayout {
    /// Sprite name, unique within the cast
    pub name: String,
    /// Center position in stage coordinates
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    /// Visual bounds used for click hit-testing
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Starting costume index
    #[serde(default)]
    pub costume: usize,
    /// Initial sprite properties
    #[serde(default)]
    pub properties: Vec<(String, Value)>,
}

fn default_visible() -> bool {
    true
}

impl CastLayout {
    /// Parse a layout from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Load a layout from a RON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Build the described cast inside a project
    ///
    /// Sprites are added in declaration order; a name collision with an
    /// existing sprite is an error.
    pub fn apply(&self, project: &mut Project) -> Result<()> {
        {
            let stage = project.cast_mut().stage_mut();
            stage.state.costume = self.stage.backdrop;
            for (key, value) in &self.stage.properties {
                stage.state.properties.insert(key.clone(), value.clone());
            }
        }

        for sprite in &self.sprites {
            let entity = project.cast_mut().add_sprite(&sprite.name)?;
            entity.state.x = sprite.x;
            entity.state.y = sprite.y;
            entity.state.width = sprite.width;
            entity.state.height = sprite.height;
            entity.state.visible = sprite.visible;
            entity.state.costume = sprite.costume;
            for (key, value) in &sprite.properties {
                entity.state.properties.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }
}
