use super::*;

#[test]
fn detects_documents_case_insensitively() {
    assert_eq!(MarkupKind::detect("<!DOCTYPE html><p>x</p>"), MarkupKind::Document);
    assert_eq!(MarkupKind::detect("<!doctype html>"), MarkupKind::Document);
    assert_eq!(MarkupKind::detect("<HTML lang=\"en\"></HTML>"), MarkupKind::Document);
    assert_eq!(MarkupKind::detect("<div class=\"slide\">hi</div>"), MarkupKind::Fragment);
    assert_eq!(MarkupKind::detect(""), MarkupKind::Fragment);
}

#[test]
fn scaling_style_lands_immediately_before_head_close() {
    let doc = "<!DOCTYPE html><html><head><title>t</title></HEAD><body></body></html>";
    let out = prepare_document(doc, TimingMode::DocumentTimers);
    let idx_style = out.find(SCALING_STYLE).unwrap();
    let idx_close = out.find("</HEAD>").unwrap();
    assert_eq!(idx_style + SCALING_STYLE.len(), idx_close);
    assert!(out.starts_with("<!DOCTYPE html><html><head><title>t</title>"));
    assert!(!out.contains(CLOCK_HOLD_STYLE));
}

#[test]
fn clock_mode_adds_the_hold_style() {
    let doc = "<html><head></head><body></body></html>";
    let out = prepare_document(doc, TimingMode::ClockDriven);
    assert!(out.contains(SCALING_STYLE));
    assert!(out.contains(CLOCK_HOLD_STYLE));
    assert!(out.contains(REVEALED_CLASS));
}

#[test]
fn headless_documents_get_a_head() {
    let out = inject_head_styles("<html lang=\"en\"><body>x</body></html>", "<style></style>");
    assert_eq!(
        out,
        "<html lang=\"en\"><head><style></style></head><body>x</body></html>"
    );

    let out = inject_head_styles("<!DOCTYPE html><body>x</body>", "<s/>");
    assert_eq!(out, "<s/><!DOCTYPE html><body>x</body>");
}

#[test]
fn only_the_first_head_close_is_touched() {
    let out = inject_head_styles("<html><head></head><body>&lt;/head&gt;</head></body></html>", "S");
    assert_eq!(out.matches('S').count(), 1);
    assert!(out.starts_with("<html><head>S</head>"));
}

#[test]
fn fragments_are_wrapped_in_a_neutral_shell() {
    let out = prepare_document("<h1 class=\"element-1\">Hello</h1>", TimingMode::DocumentTimers);
    assert_eq!(MarkupKind::detect(&out), MarkupKind::Document);
    assert!(out.contains("#f9f9f9"));
    assert!(out.contains("<h1 class=\"element-1\">Hello</h1>"));
    assert!(out.contains(SCALING_STYLE));
}

#[test]
fn placeholder_is_non_empty_and_escaped() {
    let doc = placeholder_document(4, "");
    assert!(doc.contains("Slide 4"));
    assert!(doc.contains("needs regeneration"));

    let doc = placeholder_document(1, "<script>alert(1)</script>");
    assert!(!doc.contains("<script>"));
    assert!(doc.contains("&lt;script&gt;"));
}

#[test]
fn escape_covers_quotes() {
    assert_eq!(escape_html(r#"a&b "c" 'd'"#), "a&amp;b &quot;c&quot; &#39;d&#39;");
}
