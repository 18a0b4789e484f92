use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::TypewriterOptions;
use crate::responsive::Viewport;
use crate::typewriter::Typewriter;

/// Class that marks a container as a typewriter host
pub const MARKER_CLASS: &str = "typewriter";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum_macros::Display)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Text,
    Cursor,
}

/// A region of the screen that may host a typewriter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    /// Comma-delimited words
    #[serde(default)]
    pub words: Option<String>,
    #[serde(default)]
    pub slots: Vec<Slot>,
    #[serde(default)]
    pub initialized: bool,
}

impl Container {
    /// A fully formed typewriter container
    pub fn typewriter(id: &str, words: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            classes: vec![MARKER_CLASS.to_string()],
            words: Some(words.to_string()),
            slots: vec![Slot::Text, Slot::Cursor],
            initialized: false,
        }
    }

    pub fn has_slot(&self, slot: Slot) -> bool {
        self.slots.contains(&slot)
    }

    pub fn is_eligible(&self) -> bool {
        !self.initialized && self.words.is_some() && self.classes.iter().any(|c| c == MARKER_CLASS)
    }
}

/// Every container on screen, top to bottom
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub containers: Vec<Container>,
}

impl Page {
    pub fn load<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let bytes = fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Mount a typewriter on every eligible container and mark it initialized, so
/// running this again never mounts a container twice. Containers that fail to
/// mount are still marked.
pub fn bootstrap(page: &mut Page, options: &TypewriterOptions, viewport: Viewport) -> Vec<Typewriter> {
    let mut mounted = Vec::new();
    for container in page.containers.iter_mut().filter(|c| c.is_eligible()) {
        container.initialized = true;
        if let Some(tw) = Typewriter::mount(container, options.clone(), viewport) {
            mounted.push(tw);
        }
    }
    log::info!("bootstrapped {} typewriter(s)", mounted.len());
    mounted
}
