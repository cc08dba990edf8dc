use std::sync::atomic::{AtomicUsize, Ordering};

use crate::presets::DEFAULT_ROTATION;

/// Fixed cyclic sequence of scene names advanced by repeated button presses.
///
/// The cursor is the only mutable state shared between requests. It is an
/// atomic index that always stays within `[0, len)`; concurrent calls to
/// [`Rotation::advance`] each move it exactly one step.
#[derive(Debug)]
pub struct Rotation {
    scenes: Vec<String>,
    cursor: AtomicUsize,
}

impl Rotation {
    /// The sequence length is a deployment parameter; only an empty sequence
    /// is rejected.
    pub fn new(scenes: Vec<String>) -> crate::Result<Self> {
        if scenes.is_empty() {
            return Err(crate::HueError::ConfigError {
                msg: "rotation sequence cannot be empty".into(),
            });
        }
        Ok(Rotation {
            scenes,
            cursor: AtomicUsize::new(0),
        })
    }

    /// Scene at the cursor, without advancing.
    pub fn current(&self) -> &str {
        &self.scenes[self.cursor.load(Ordering::Acquire)]
    }

    /// Moves the cursor one step, wrapping at the end of the sequence.
    pub fn advance(&self) {
        let n = self.scenes.len();
        // fetch_update retries the wrap on contention, so every stored value
        // is in range and no step is lost.
        let _ = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some((c + 1) % n));
    }

    pub fn scenes(&self) -> &[String] {
        &self.scenes
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation {
            scenes: DEFAULT_ROTATION.iter().map(ToString::to_string).collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}
