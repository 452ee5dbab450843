use super::*;
use serde_json::json;

fn bounds() -> DurationBounds {
    DurationBounds::default()
}

#[test]
fn short_duration_and_empty_html_scenario() {
    let raw = json!({ "slides": [ { "id": 1, "narration": "Hi", "duration": 5, "html": "" } ] });
    let script = normalize_response(&raw, &bounds()).unwrap();
    assert_eq!(script.len(), 1);
    let s = &script.slides[0];
    assert_eq!(s.id, 1);
    assert_eq!(s.narration, "Hi");
    assert_eq!(s.duration, 15.0);
    assert!(!s.html.is_empty());
    assert!(s.html.contains("Slide 1"));
}

#[test]
fn missing_slides_is_malformed() {
    let err = normalize_response(&json!({}), &bounds()).unwrap_err();
    assert!(matches!(err, SlideError::MalformedResponse(_)));

    let err = normalize_response(&json!({ "slides": { "id": 1 } }), &bounds()).unwrap_err();
    assert!(matches!(err, SlideError::MalformedResponse(_)));

    let err = normalize_json("not json at all", &bounds()).unwrap_err();
    assert!(matches!(err, SlideError::MalformedResponse(_)));
}

#[test]
fn durations_are_always_clamped() {
    let raw = json!({ "slides": [
        { "duration": 0 },
        { "duration": -4 },
        { "duration": 14.99 },
        { "duration": 15 },
        { "duration": 22.5 },
        { "duration": 30 },
        { "duration": 31 },
        { "duration": 1e9 },
        { "duration": "25" },
        { "duration": null },
        {}
    ] });
    let got: Vec<f64> = normalize_response(&raw, &bounds())
        .unwrap()
        .slides
        .iter()
        .map(|s| s.duration)
        .collect();
    assert_eq!(
        got,
        vec![15.0, 15.0, 15.0, 15.0, 22.5, 30.0, 30.0, 30.0, 20.0, 20.0, 20.0]
    );
    assert!(got.iter().all(|d| (15.0..=30.0).contains(d)));
}

#[test]
fn missing_fields_default_by_position() {
    let raw = json!({ "slides": [
        { "narration": "first", "html": "<p class=\"element-1\">a</p>" },
        { "id": 7, "title": "  Conclusion  " },
        "not an object",
    ] });
    let script = normalize_response(&raw, &bounds()).unwrap();
    let ids: Vec<u32> = script.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![1, 7, 3]);
    assert_eq!(script.slides[0].title, "Slide 1");
    assert_eq!(script.slides[0].html, "<p class=\"element-1\">a</p>");
    assert_eq!(script.slides[1].title, "  Conclusion  ");
    assert_eq!(script.slides[1].narration, "");
    assert!(script.slides[1].html.contains("Conclusion"));
    assert_eq!(script.slides[2].duration, 20.0);
    assert!(script.slides[2].html.contains("needs regeneration"));
}

#[test]
fn invalid_ids_fall_back_to_position() {
    let raw = json!({ "slides": [ { "id": 0 }, { "id": -3 }, { "id": 2.5 }, { "id": "4" }, { "id": 5.0 } ] });
    let ids: Vec<u32> = normalize_response(&raw, &bounds())
        .unwrap()
        .iter()
        .map(|s| s.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5]);
}

#[test]
fn duplicate_ids_are_rekeyed_in_order() {
    let raw = json!({ "slides": [ { "id": 1 }, { "id": 1 }, { "id": 2 }, { "id": 2 } ] });
    let script = normalize_response(&raw, &bounds()).unwrap();
    let ids: Vec<u32> = script.iter().map(|s| s.id).collect();
    // Slot 2 is claimed by a later declared id, so the first duplicate moves past the maximum.
    assert_eq!(ids, vec![1, 3, 2, 4]);
    script.validate().unwrap();
}

#[test]
fn output_preserves_length_and_order() {
    let raw = json!({ "slides": [ { "id": 9 }, { "id": 3 }, { "id": 5 } ] });
    let script = normalize_response(&raw, &bounds()).unwrap();
    let ids: Vec<u32> = script.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![9, 3, 5]);
}

#[test]
fn custom_bounds_are_honoured() {
    let b = DurationBounds {
        min_secs: 5.0,
        max_secs: 10.0,
        default_secs: 8.0,
    };
    let script = normalize_json(r#"{ "slides": [ { "duration": 2 }, {} ] }"#, &b).unwrap();
    assert_eq!(script.slides[0].duration, 5.0);
    assert_eq!(script.slides[1].duration, 8.0);
}
