//! Reveal schedules: the ordered `(element, offset)` list a slide's markup encodes.
//!
//! Generated slides tag each animated node with an `element-N` class and give it a CSS animation
//! delay. Extracting that into an explicit schedule lets playback drive reveals from its own
//! clock instead of trusting timers that started at document load.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// One reveal: element `N` (from its `element-N` class) becomes visible at `offset_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct RevealCue {
    /// Element ordinal from the `element-N` class.
    pub element: u32,
    /// Offset from the start of the slide timeline, in milliseconds.
    pub offset_ms: u64,
}

impl RevealCue {
    /// The class name identifying this cue's node.
    pub fn class_name(&self) -> String {
        format!("element-{}", self.element)
    }
}

/// Soft-convention violations found by [`RevealSchedule::lint`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ScheduleWarning {
    /// A higher-numbered element is revealed before a lower-numbered one.
    NonMonotonic {
        /// The earlier-numbered element.
        before: u32,
        /// The later-numbered element that is revealed first.
        after: u32,
    },
    /// The last reveal leaves less than the trailing margin before the slide ends.
    LateFinalReveal {
        /// Offset of the final cue.
        offset_ms: u64,
        /// Latest offset that still leaves the trailing margin.
        latest_ms: u64,
    },
    /// The markup declares no `element-N` nodes at all.
    Empty,
}

/// Ordered reveal cues for one slide, sorted by `(offset, element)`.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct RevealSchedule {
    cues: Vec<RevealCue>,
}

static RULE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^{}<>]+)\{([^{}]*)\}").expect("static regex"));
static ELEMENT_SELECTOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.element-(\d+)$").expect("static regex"));
static TAG_WITH_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<[a-z][a-z0-9]*\b[^>]*\bclass\s*=\s*["']([^"']*)["'][^>]*>"#)
        .expect("static regex")
});
static INLINE_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bstyle\s*=\s*["']([^"']*)["']"#).expect("static regex")
});
static DELAY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)animation-delay\s*:\s*(-?\d+(?:\.\d+)?|-?\.\d+)(ms|s)\b")
        .expect("static regex")
});
static SHORTHAND_DECL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:^|[;\s{])animation\s*:\s*([^;]+)").expect("static regex"));
static TIME_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:^|[\s,])(-?\d+(?:\.\d+)?|-?\.\d+)(ms|s)\b").expect("static regex")
});

impl RevealSchedule {
    /// Build a schedule from arbitrary cues. Duplicate elements keep their earliest offset.
    pub fn from_cues(cues: impl IntoIterator<Item = RevealCue>) -> Self {
        let mut by_element = BTreeMap::<u32, u64>::new();
        for c in cues {
            by_element
                .entry(c.element)
                .and_modify(|o| *o = (*o).min(c.offset_ms))
                .or_insert(c.offset_ms);
        }
        let mut cues: Vec<RevealCue> = by_element
            .into_iter()
            .map(|(element, offset_ms)| RevealCue { element, offset_ms })
            .collect();
        cues.sort_by_key(|c| (c.offset_ms, c.element));
        Self { cues }
    }

    /// Extract the schedule encoded in slide markup.
    ///
    /// Delays come from `.element-N { animation-delay | animation }` rules and from inline
    /// `style` attributes on nodes carrying an `element-N` class, resolved the way the cascade
    /// would: inline beats rules, a later rule beats an earlier one. Nodes with no discoverable
    /// delay are placed at `(N - 1) * fallback_stagger_ms`.
    pub fn extract(html: &str, fallback_stagger_ms: u64) -> Self {
        let mut rules = BTreeMap::<u32, Option<u64>>::new();
        for cap in RULE_BLOCK.captures_iter(html) {
            let delay = delay_from_declarations(&cap[2]);
            for element in cap[1].split(',').filter_map(element_selector) {
                let slot = rules.entry(element).or_insert(None);
                if delay.is_some() {
                    *slot = delay;
                }
            }
        }

        let mut nodes = BTreeMap::<u32, Option<u64>>::new();
        for tag in TAG_WITH_CLASS.captures_iter(html) {
            let whole = tag.get(0).map(|m| m.as_str()).unwrap_or_default();
            let inline = INLINE_STYLE
                .captures(whole)
                .and_then(|s| delay_from_declarations(&s[1]));
            for class in tag[1].split_whitespace() {
                if let Some(element) = class.strip_prefix("element-").and_then(parse_ordinal) {
                    let effective = inline.or_else(|| rules.get(&element).copied().flatten());
                    keep_earliest(&mut nodes, element, effective);
                }
            }
        }
        for (element, delay) in rules {
            nodes.entry(element).or_insert(delay);
        }

        Self::from_cues(nodes.into_iter().map(|(element, delay)| RevealCue {
            element,
            offset_ms: delay
                .unwrap_or_else(|| u64::from(element - 1).saturating_mul(fallback_stagger_ms)),
        }))
    }

    /// Cues in reveal order.
    pub fn cues(&self) -> &[RevealCue] {
        &self.cues
    }

    /// Number of cues.
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Whether there are no cues.
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Offset of the final cue, if any.
    pub fn last_offset_ms(&self) -> Option<u64> {
        self.cues.last().map(|c| c.offset_ms)
    }

    /// Number of cues due at `elapsed_ms` (cues at exactly `elapsed_ms` are due).
    pub fn due_count(&self, elapsed_ms: u64) -> usize {
        self.cues.partition_point(|c| c.offset_ms <= elapsed_ms)
    }

    /// Check the soft authoring conventions against a slide lasting `duration_secs`.
    pub fn lint(&self, duration_secs: f64, trailing_margin_ms: u64) -> Vec<ScheduleWarning> {
        let mut out = Vec::new();
        if self.cues.is_empty() {
            out.push(ScheduleWarning::Empty);
            return out;
        }

        let mut by_element = self.cues.clone();
        by_element.sort_by_key(|c| c.element);
        for w in by_element.windows(2) {
            if w[1].offset_ms < w[0].offset_ms {
                out.push(ScheduleWarning::NonMonotonic {
                    before: w[0].element,
                    after: w[1].element,
                });
            }
        }

        let duration_ms = crate::foundation::core::secs_to_millis(duration_secs);
        let latest_ms = duration_ms.saturating_sub(trailing_margin_ms);
        if let Some(last) = self.last_offset_ms()
            && last > latest_ms
        {
            out.push(ScheduleWarning::LateFinalReveal {
                offset_ms: last,
                latest_ms,
            });
        }
        out
    }
}

// Several nodes may share one class; the first to appear sets the reveal.
fn keep_earliest(nodes: &mut BTreeMap<u32, Option<u64>>, element: u32, delay: Option<u64>) {
    let slot = nodes.entry(element).or_insert(None);
    if let Some(d) = delay {
        *slot = Some(slot.map_or(d, |cur| cur.min(d)));
    }
}

/// Element ordinal of a selector ending in a bare `.element-N` compound. Pseudo-classes and
/// descendants like `.element-1:hover` or `.element-1 span` do not describe the reveal itself.
fn element_selector(selector: &str) -> Option<u32> {
    let cap = ELEMENT_SELECTOR.captures(selector.trim())?;
    parse_ordinal(&cap[1])
}

fn parse_ordinal(s: &str) -> Option<u32> {
    s.parse::<u32>().ok().filter(|n| *n > 0)
}

/// Pull a delay out of a CSS declaration block. The later of `animation-delay` and the
/// `animation` shorthand (whose second time value is the delay) wins.
fn delay_from_declarations(decls: &str) -> Option<u64> {
    let longhand = DELAY_DECL.captures_iter(decls).last();
    let shorthand = SHORTHAND_DECL.captures_iter(decls).last();
    let start = |c: &regex::Captures<'_>| c.get(0).map_or(0, |m| m.start());
    match (longhand, shorthand) {
        (Some(l), Some(sh)) if start(&sh) > start(&l) => shorthand_delay(&sh[1]),
        (Some(l), _) => time_to_ms(&l[1], &l[2]),
        (None, Some(sh)) => shorthand_delay(&sh[1]),
        (None, None) => None,
    }
}

// A shorthand without a second time value has CSS's default delay of zero.
fn shorthand_delay(value: &str) -> Option<u64> {
    match TIME_VALUE.captures_iter(value).nth(1) {
        Some(delay) => time_to_ms(&delay[1], &delay[2]),
        None => Some(0),
    }
}

fn time_to_ms(value: &str, unit: &str) -> Option<u64> {
    let v: f64 = value.parse().ok()?;
    let ms = if unit.eq_ignore_ascii_case("s") {
        v * 1000.0
    } else {
        v
    };
    if !ms.is_finite() {
        return None;
    }
    Some(ms.max(0.0).round() as u64)
}

#[cfg(test)]
#[path = "../../tests/unit/script/reveal.rs"]
mod tests;
