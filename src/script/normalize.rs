use std::collections::HashSet;

use serde_json::Value;

use crate::foundation::config::DurationBounds;
use crate::foundation::error::{SlideError, SlideResult};
use crate::script::markup::placeholder_document;
use crate::script::model::{SlideRecord, SlideScript};

/// Parse a raw generation-service response body and normalize it.
pub fn normalize_json(text: &str, bounds: &DurationBounds) -> SlideResult<SlideScript> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| SlideError::malformed(format!("response is not JSON: {e}")))?;
    normalize_response(&raw, bounds)
}

/// Convert a raw generation-service response into normalized slides.
///
/// Only a missing or non-list `slides` collection is fatal. Every per-slide gap is defaulted:
/// the output has the same length and order as the input.
#[tracing::instrument(skip(raw, bounds))]
pub fn normalize_response(raw: &Value, bounds: &DurationBounds) -> SlideResult<SlideScript> {
    let slides = raw
        .get("slides")
        .ok_or_else(|| SlideError::malformed("missing slides array"))?
        .as_array()
        .ok_or_else(|| SlideError::malformed("slides is not an array"))?;

    let requested: Vec<u32> = slides
        .iter()
        .enumerate()
        .map(|(i, s)| requested_id(s).unwrap_or(position_id(i)))
        .collect();
    let ids = assign_unique_ids(&requested);

    let mut out = Vec::with_capacity(slides.len());
    for (i, raw_slide) in slides.iter().enumerate() {
        let id = ids[i];
        let title = non_blank_str(raw_slide, "title")
            .map(str::to_owned)
            .unwrap_or_else(|| format!("Slide {}", i + 1));
        let narration = raw_slide
            .get("narration")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_owned();
        let duration = bounds.clamp(raw_slide.get("duration").and_then(Value::as_f64));
        let html = match non_blank_str(raw_slide, "html") {
            Some(h) => h.to_owned(),
            None => {
                tracing::warn!(slide_id = id, "slide has no markup, using placeholder");
                placeholder_document(id, &title)
            }
        };
        out.push(SlideRecord {
            id,
            title,
            narration,
            duration,
            html,
        });
    }

    tracing::debug!(slides = out.len(), "normalized slide script");
    Ok(SlideScript { slides: out })
}

fn position_id(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}

fn requested_id(slide: &Value) -> Option<u32> {
    let v = slide.get("id")?;
    if let Some(n) = v.as_u64() {
        return u32::try_from(n).ok().filter(|n| *n > 0);
    }
    let f = v.as_f64()?;
    if f.is_finite() && f >= 1.0 && f.fract() == 0.0 && f <= f64::from(u32::MAX) {
        Some(f as u32)
    } else {
        None
    }
}

fn non_blank_str<'a>(slide: &'a Value, key: &str) -> Option<&'a str> {
    slide
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Keep each first occurrence of an id; re-key later duplicates to their 1-based position when
/// that is free, else to one past the largest id in use.
fn assign_unique_ids(requested: &[u32]) -> Vec<u32> {
    let declared: HashSet<u32> = requested.iter().copied().collect();
    let mut taken = HashSet::with_capacity(requested.len());
    let mut next_free = requested.iter().copied().max().unwrap_or(0);
    let mut out = Vec::with_capacity(requested.len());

    for (i, &id) in requested.iter().enumerate() {
        let chosen = if taken.insert(id) {
            id
        } else {
            let pos = position_id(i);
            if !declared.contains(&pos) && !taken.contains(&pos) {
                pos
            } else {
                let free = |c: &u32| !declared.contains(c) && !taken.contains(c);
                let start = next_free.saturating_add(1);
                let found = (start..=u32::MAX).chain(1..start).find(free).unwrap_or(pos);
                next_free = next_free.max(found);
                found
            }
        };
        taken.insert(chosen);
        out.push(chosen);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/script/normalize.rs"]
mod tests;
