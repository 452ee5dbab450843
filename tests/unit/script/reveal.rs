use super::*;

const SLIDE: &str = r#"<!DOCTYPE html>
<html><head><style>
@keyframes fadeIn { from { opacity: 0; } to { opacity: 1; } }
.element-1 { animation: fadeIn 0.8s ease-out 0ms forwards; }
.element-2 { opacity: 0; animation: fadeIn 0.8s ease-out forwards; animation-delay: 3500ms; }
.element-3 { animation: slideUp 1s cubic-bezier(0.1, 0.7, 1.0, 0.1) 7.5s both; }
.element-3:hover { animation-delay: 0s; }
</style></head>
<body>
  <h1 class="title element-1">Three benefits</h1>
  <p class="element-2">Speed</p>
  <p class="element-3">Cost</p>
  <p class="bullet element-4" style="animation-delay: 12s">Reach</p>
</body></html>"#;

fn offsets(s: &RevealSchedule) -> Vec<(u32, u64)> {
    s.cues().iter().map(|c| (c.element, c.offset_ms)).collect()
}

#[test]
fn extracts_rule_and_inline_delays() {
    let s = RevealSchedule::extract(SLIDE, 800);
    assert_eq!(
        offsets(&s),
        vec![(1, 0), (2, 3500), (3, 7500), (4, 12_000)]
    );
    assert_eq!(s.last_offset_ms(), Some(12_000));
    assert_eq!(s.cues()[3].class_name(), "element-4");
}

#[test]
fn undeclared_elements_use_fallback_stagger() {
    let html = r#"<div class="element-1">a</div><div class="x element-2 y">b</div><div class="element-3">c</div>"#;
    let s = RevealSchedule::extract(html, 600);
    assert_eq!(offsets(&s), vec![(1, 0), (2, 600), (3, 1200)]);
}

#[test]
fn shorthand_without_delay_means_zero() {
    let html = r#"<style>.element-2 { animation: pop 1s; }</style><b class="element-2">x</b>"#;
    let s = RevealSchedule::extract(html, 1000);
    assert_eq!(offsets(&s), vec![(2, 0)]);
}

#[test]
fn negative_delays_clamp_to_zero_and_duplicates_keep_earliest() {
    let s = RevealSchedule::from_cues([
        RevealCue { element: 2, offset_ms: 900 },
        RevealCue { element: 1, offset_ms: 0 },
        RevealCue { element: 2, offset_ms: 400 },
    ]);
    assert_eq!(offsets(&s), vec![(1, 0), (2, 400)]);

    let html = r#"<i class="element-1" style="animation-delay: -2s">x</i>"#;
    assert_eq!(offsets(&RevealSchedule::extract(html, 0)), vec![(1, 0)]);
}

#[test]
fn markup_without_elements_is_empty() {
    let s = RevealSchedule::extract("<p>hello</p>", 500);
    assert!(s.is_empty());
    assert_eq!(s.lint(20.0, 2000), vec![ScheduleWarning::Empty]);
}

#[test]
fn due_count_is_inclusive_at_the_offset() {
    let s = RevealSchedule::extract(SLIDE, 800);
    assert_eq!(s.due_count(0), 1);
    assert_eq!(s.due_count(3499), 1);
    assert_eq!(s.due_count(3500), 2);
    assert_eq!(s.due_count(60_000), 4);
}

#[test]
fn lint_flags_order_inversions_and_late_finales() {
    let s = RevealSchedule::from_cues([
        RevealCue { element: 1, offset_ms: 0 },
        RevealCue { element: 2, offset_ms: 5000 },
        RevealCue { element: 3, offset_ms: 4000 },
        RevealCue { element: 4, offset_ms: 19_000 },
    ]);
    let w = s.lint(20.0, 2000);
    assert!(w.contains(&ScheduleWarning::NonMonotonic { before: 2, after: 3 }));
    assert!(w.contains(&ScheduleWarning::LateFinalReveal {
        offset_ms: 19_000,
        latest_ms: 18_000
    }));

    let ok = RevealSchedule::extract(SLIDE, 800);
    assert!(ok.lint(15.0, 2000).is_empty());
}

#[test]
fn inline_delay_overrides_class_shorthand() {
    let html = r#"<style>.element-2 { opacity:0; animation: fadeIn 1s ease forwards; }</style>
<p class="element-2" style="animation-delay: 3s">late</p>"#;
    assert_eq!(offsets(&RevealSchedule::extract(html, 800)), vec![(2, 3000)]);
}

#[test]
fn later_rule_overrides_earlier_rule() {
    let html = r#"<style>
.element-2 { opacity:0; animation: fadeIn 1s ease forwards; }
.element-2 { animation-delay: 3s; }
.element-3 { animation-delay: 4s; }
.element-3 { animation: pop 1s; }
</style><p class="element-2">a</p><p class="element-3">b</p>"#;
    assert_eq!(offsets(&RevealSchedule::extract(html, 800)), vec![(3, 0), (2, 3000)]);
}

#[test]
fn selector_lists_apply_to_each_element() {
    let html = r#"<style>.element-1, .element-2 { animation-delay: 1s; }
.intro .element-3,.element-4:hover { animation-delay: 9s; }</style>
<p class="element-1">a</p><p class="element-2">b</p><p class="element-3">c</p><p class="element-4">d</p>"#;
    assert_eq!(
        offsets(&RevealSchedule::extract(html, 500)),
        vec![(1, 1000), (2, 1000), (4, 1500), (3, 9000)]
    );
}
