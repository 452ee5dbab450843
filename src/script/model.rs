use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::foundation::error::{SlideError, SlideResult};

/// One normalized slide: narration, pacing and markup.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideRecord {
    /// Positive id, unique within a script.
    pub id: u32,
    /// Display title; defaults to `Slide N`.
    #[serde(default)]
    pub title: String,
    /// Spoken script for this slide. May be empty.
    #[serde(default)]
    pub narration: String,
    /// Authoritative slide length in seconds, already clamped.
    pub duration: f64,
    /// Slide markup: a complete document or a fragment.
    #[serde(default)]
    pub html: String,
}

impl SlideRecord {
    /// Whether the slide carries usable markup.
    pub fn has_markup(&self) -> bool {
        !self.html.trim().is_empty()
    }

    /// Title used for the rendering surface (`slide-preview-<id>`).
    pub fn surface_title(&self) -> String {
        format!("slide-preview-{}", self.id)
    }
}

/// Ordered collection of slides. Order defines the slide sequence.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SlideScript {
    /// Slides in presentation order.
    pub slides: Vec<SlideRecord>,
}

impl SlideScript {
    /// Load an already-normalized script from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> SlideResult<Self> {
        let script: SlideScript = serde_json::from_reader(r)
            .map_err(|e| SlideError::serde(format!("parse slide script JSON: {e}")))?;
        script.validate()?;
        Ok(script)
    }

    /// Load an already-normalized script from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> SlideResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            SlideError::validation(format!("open slide script '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check the collection invariants: positive, unique ids.
    pub fn validate(&self) -> SlideResult<()> {
        let mut seen = std::collections::HashSet::with_capacity(self.slides.len());
        for (i, s) in self.slides.iter().enumerate() {
            if s.id == 0 {
                return Err(SlideError::validation(format!(
                    "slides[{i}].id must be positive"
                )));
            }
            if !seen.insert(s.id) {
                return Err(SlideError::validation(format!(
                    "slides[{i}].id {} is not unique",
                    s.id
                )));
            }
        }
        Ok(())
    }

    /// Number of slides.
    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Whether the script has no slides.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    /// Look up a slide by id.
    pub fn slide(&self, id: u32) -> Option<&SlideRecord> {
        self.slides.iter().find(|s| s.id == id)
    }

    /// Position of a slide in the sequence.
    pub fn position(&self, id: u32) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }

    /// Iterate slides in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SlideRecord> {
        self.slides.iter()
    }

    /// Sum of all slide durations, in seconds.
    pub fn total_duration(&self) -> f64 {
        self.slides.iter().map(|s| s.duration).sum()
    }
}

impl<'a> IntoIterator for &'a SlideScript {
    type Item = &'a SlideRecord;
    type IntoIter = std::slice::Iter<'a, SlideRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.slides.iter()
    }
}
