use super::*;
use crate::foundation::config::TimingMode;
use crate::foundation::core::Size;
use crate::headless::audio::HeadlessAudioBackend;
use crate::headless::surface::HeadlessSurface;
use crate::provider::audio::{PcmSpec, SpeechAudio, pcm_to_wav};

const DOC: &str = "<!DOCTYPE html><html><head><style>\
.element-1{animation: fadeIn 1s ease 0ms both}\
.element-2{animation-delay: 1500ms}\
.element-3{animation-delay:3s}\
</style></head><body>\
<h1 class=\"element-1\">A</h1><p class=\"element-2\">B</p><p class=\"element-3\">C</p>\
</body></html>";

type Session = PreviewSession<HeadlessSurface, HeadlessAudioBackend>;

fn t(ms: u64) -> HostTime {
    HostTime::from_millis(ms)
}

fn slide(id: u32, html: &str) -> SlideRecord {
    SlideRecord {
        id,
        title: String::new(),
        narration: "Narration".to_owned(),
        duration: 20.0,
        html: html.to_owned(),
    }
}

fn audio(secs: usize) -> AudioSource {
    let wav = pcm_to_wav(&vec![0u8; 48_000 * secs], PcmSpec::default()).unwrap();
    AudioSource::Speech(SpeechAudio::from_bytes(wav, "Narration").unwrap())
}

fn session_with(timing: TimingMode) -> Session {
    let cfg = PreviewConfig {
        timing,
        ..PreviewConfig::default()
    };
    PreviewSession::new(
        HeadlessSurface::new(Size::new(1280.0, 720.0)),
        HeadlessAudioBackend::new(),
        &cfg,
    )
    .unwrap()
}

fn session() -> Session {
    session_with(TimingMode::ClockDriven)
}

fn revealed(s: &Session) -> Vec<u32> {
    s.renderer().surface().revealed().to_vec()
}

#[test]
fn open_autoplays_from_a_fresh_start() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    assert!(s.state().is_playing);
    assert_eq!(s.open_slide(), Some(1));
    assert!(
        s.drain_events()
            .contains(&PreviewEvent::Playback(PlaybackEvent::Started { fresh: true }))
    );

    s.tick(t(1)).unwrap();
    assert_eq!(s.renderer().phase(), RenderPhase::Rendered);
    assert_eq!(s.state().duration, 10.0);
    assert_eq!(revealed(&s), vec![1]);
}

#[test]
fn reveals_follow_the_audio_clock_and_freeze_on_pause() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.tick(t(1600)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2]);

    s.pause(t(1600)).unwrap();
    assert!(!s.renderer().surface().animations_running());
    s.tick(t(5000)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2]);

    assert_eq!(s.toggle_play_pause(t(6000)).unwrap(), Some(PlayOutcome::Resume));
    assert!(s.renderer().surface().animations_running());
    s.tick(t(7500)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2, 3]);
}

#[test]
fn document_timers_keep_running_while_paused() {
    let mut s = session_with(TimingMode::DocumentTimers);
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.pause(t(500)).unwrap();
    assert!(s.renderer().surface().animations_running());
    assert!(revealed(&s).is_empty());
}

#[test]
fn replay_after_end_restarts_from_the_first_element() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(2)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.tick(t(1600)).unwrap();
    s.tick(t(2500)).unwrap();
    assert!(!s.state().is_playing);
    assert_eq!(s.state().current_time, 0.0);
    assert_eq!(revealed(&s), vec![1, 2]);
    let ended = s
        .drain_events()
        .into_iter()
        .filter(|e| *e == PreviewEvent::Playback(PlaybackEvent::Ended))
        .count();
    assert_eq!(ended, 1);

    for round in 1..=2u64 {
        let base = round * 10_000;
        assert_eq!(
            s.toggle_play_pause(t(base)).unwrap(),
            Some(PlayOutcome::FreshStart)
        );
        assert_eq!(revealed(&s), vec![1]);
        s.tick(t(base + 2500)).unwrap();
        assert_eq!(s.state().current_time, 0.0);
    }
}

#[test]
fn seeking_back_rederives_reveals() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.tick(t(3500)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2, 3]);
    s.seek(0.5, t(3500)).unwrap();
    assert_eq!(revealed(&s), vec![1]);
}

#[test]
fn reset_returns_to_zero_without_playing() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.tick(t(2000)).unwrap();
    s.reset(t(2000)).unwrap();
    assert!(!s.state().is_playing);
    assert_eq!(s.state().current_time, 0.0);
    assert_eq!(revealed(&s), vec![1]);
    assert_eq!(s.play(t(2100)).unwrap(), Some(PlayOutcome::FreshStart));
}

#[test]
fn silent_preview_runs_the_animation_standalone() {
    let mut s = session();
    s.open(&slide(1, DOC), None, t(0)).unwrap();
    assert!(!s.state().is_playing);
    assert_eq!(s.state().duration, 20.0);
    s.tick(t(0)).unwrap();
    assert_eq!(revealed(&s), vec![1]);
    s.tick(t(3000)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2, 3]);
    assert_eq!(s.toggle_play_pause(t(3100)).unwrap(), None);
}

#[test]
fn missing_markup_shows_placeholder_and_records_recovery() {
    let mut s = session();
    s.open(&slide(5, ""), None, t(0)).unwrap();
    s.tick(t(1)).unwrap();
    let html = s.renderer().surface().current_document().unwrap();
    assert!(html.contains("needs regeneration"));
    assert_eq!(s.recoveries(), vec![Recovery::ContentMissing { slide_id: 5 }]);
}

#[test]
fn close_tears_everything_down() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.close();
    assert_eq!(s.open_slide(), None);
    assert_eq!(s.renderer().phase(), RenderPhase::Empty);
    assert!(!s.renderer().surface().is_observing());
    assert!(s.renderer().surface().current_document().is_none());
    let stats = s.controller().backend().stats();
    assert_eq!(stats.audible, 0);
    assert_eq!(stats.released, 1);
}

#[test]
fn switching_slides_never_overlaps_audio() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.switch(&slide(2, DOC), Some(&audio(10)), t(500)).unwrap();
    s.tick(t(501)).unwrap();

    let stats = s.controller().backend().stats();
    assert_eq!(stats.opened, 2);
    assert_eq!(stats.released, 1);
    assert_eq!(stats.max_audible, 1);
    assert_eq!(s.renderer().slide_id(), Some(2));
    assert_eq!(s.renderer().surface().documents()[0].0, "slide-preview-2");
    assert_eq!(revealed(&s), vec![1]);
}

#[test]
fn resize_during_playback_only_refits() {
    let mut s = session();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.surface_mut().resize(Size::new(1920.0, 1080.0));
    s.tick(t(100)).unwrap();
    assert_eq!(s.renderer().surface().load_attempts(), 1);
    assert_eq!(s.renderer().fit().unwrap().scale, 1.0);
    assert_eq!(revealed(&s), vec![1]);
}

#[test]
fn refused_resume_keeps_the_timeline_where_it_was() {
    let mut s = PreviewSession::new(
        HeadlessSurface::new(Size::new(1280.0, 720.0)),
        HeadlessAudioBackend::refusing_play_after(1),
        &PreviewConfig::default(),
    )
    .unwrap();
    s.open(&slide(1, DOC), Some(&audio(10)), t(0)).unwrap();
    s.tick(t(1)).unwrap();
    s.tick(t(3200)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2, 3]);

    s.pause(t(3200)).unwrap();
    s.drain_events();
    assert_eq!(s.toggle_play_pause(t(4000)).unwrap(), None);
    assert!(!s.controller().has_audio());
    assert!(s.renderer().surface().animations_running());

    s.tick(t(4000)).unwrap();
    s.tick(t(4500)).unwrap();
    assert_eq!(revealed(&s), vec![1, 2, 3]);
    assert_eq!(s.state().current_time, 3.2);
    assert!(
        !s.drain_events()
            .contains(&PreviewEvent::Render(RenderEvent::Concealed))
    );
    assert!(matches!(
        s.recoveries().as_slice(),
        [Recovery::AudioBindFailure { .. }]
    ));
}
