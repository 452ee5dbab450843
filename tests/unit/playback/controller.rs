use super::*;
use crate::headless::audio::HeadlessAudioBackend;
use crate::provider::audio::{PcmSpec, SpeechAudio, pcm_to_wav};

fn t(ms: u64) -> HostTime {
    HostTime::from_millis(ms)
}

/// Mono 16-bit 24 kHz WAV lasting `secs`.
fn wav_source(secs: usize) -> AudioSource {
    let wav = pcm_to_wav(&vec![0u8; 48_000 * secs], PcmSpec::default()).unwrap();
    AudioSource::Speech(SpeechAudio::from_bytes(wav, "some narration").unwrap())
}

fn bound(secs: usize, declared: f64) -> PlaybackController<HeadlessAudioBackend> {
    let mut c = PlaybackController::new(HeadlessAudioBackend::new());
    c.bind(Some(&wav_source(secs)), declared);
    c
}

#[test]
fn missing_source_is_silent_mode() {
    let mut c = PlaybackController::new(HeadlessAudioBackend::new());
    c.bind(None, 20.0);
    assert!(!c.has_audio());
    assert_eq!(c.duration(), 20.0);
    assert_eq!(c.play(t(0)), None);
    assert!(!c.is_playing());
    c.pause(t(10));
    assert_eq!(c.toggle_play_pause(t(20)), None);
    assert_eq!(
        c.drain_events(),
        vec![PlaybackEvent::AudioUnavailable {
            reason: "no audio source".to_owned()
        }]
    );
    assert!(c.recovery().is_none());
}

#[test]
fn decoded_duration_wins_over_declared() {
    let mut c = bound(2, 20.0);
    assert_eq!(c.duration(), 20.0);
    c.poll(t(0));
    assert_eq!(c.duration(), 2.0);
    assert_eq!(c.state().duration, 2.0);
}

#[test]
fn double_toggle_plays_then_pauses_without_reset() {
    let mut c = bound(10, 20.0);
    assert_eq!(c.toggle_play_pause(t(0)), Some(PlayOutcome::FreshStart));
    assert!(c.is_playing());
    assert_eq!(c.toggle_play_pause(t(0)), None);
    assert!(!c.is_playing());
    assert_eq!(c.current_time(), 0.0);
    assert_eq!(
        c.drain_events(),
        vec![PlaybackEvent::Started { fresh: true }, PlaybackEvent::Paused]
    );
}

#[test]
fn pause_keeps_elapsed_time_and_play_resumes() {
    let mut c = bound(10, 20.0);
    c.toggle_play_pause(t(0));
    c.toggle_play_pause(t(750));
    assert!((c.current_time() - 0.75).abs() < 1e-9);
    assert_eq!(c.toggle_play_pause(t(1000)), Some(PlayOutcome::Resume));
    c.poll(t(1250));
    assert!((c.current_time() - 1.0).abs() < 1e-9);
}

#[test]
fn ended_fires_once_and_resets() {
    let mut c = bound(1, 20.0);
    c.play(t(0));
    c.poll(t(0));
    c.poll(t(1500));
    assert!(!c.is_playing());
    assert_eq!(c.current_time(), 0.0);
    c.poll(t(2000));
    let ended = c
        .drain_events()
        .into_iter()
        .filter(|e| *e == PlaybackEvent::Ended)
        .count();
    assert_eq!(ended, 1);
}

#[test]
fn restart_after_end_is_repeatable() {
    let mut c = bound(1, 20.0);
    for round in 0..3u64 {
        let base = round * 10_000;
        c.reset();
        assert_eq!(c.play(t(base)), Some(PlayOutcome::FreshStart));
        c.poll(t(base + 400));
        assert!(c.current_time() > 0.0);
        c.poll(t(base + 1200));
        assert_eq!(c.current_time(), 0.0);
        assert!(!c.is_playing());
    }
}

#[test]
fn toggle_at_end_restarts_from_zero() {
    let mut c = bound(2, 20.0);
    c.poll(t(0));
    c.seek(5.0, t(0));
    assert_eq!(c.current_time(), 2.0);
    assert_eq!(c.toggle_play_pause(t(10)), Some(PlayOutcome::FreshStart));
    assert!(c.current_time() < 1e-9);
}

#[test]
fn seek_clamps_into_range() {
    let mut c = bound(2, 20.0);
    c.poll(t(0));
    c.seek(-3.0, t(0));
    assert_eq!(c.current_time(), 0.0);
    c.seek(1.25, t(0));
    assert_eq!(c.current_time(), 1.25);
    assert_eq!(c.play(t(0)), Some(PlayOutcome::Resume));
    c.seek(f64::NAN, t(0));
    assert_eq!(c.current_time(), 0.0);
}

#[test]
fn rebinding_stops_the_previous_asset() {
    let mut c = bound(10, 20.0);
    c.play(t(0));
    assert_eq!(c.backend().stats().audible, 1);

    c.bind(Some(&wav_source(5)), 20.0);
    assert!(!c.is_playing());
    c.play(t(100));
    let stats = c.backend().stats();
    assert_eq!(stats.opened, 2);
    assert_eq!(stats.released, 1);
    assert_eq!(stats.audible, 1);
    assert_eq!(stats.max_audible, 1);

    c.teardown();
    assert_eq!(c.backend().stats().audible, 0);
    assert_eq!(c.backend().stats().released, 2);
}

#[test]
fn undecodable_audio_degrades_to_silence() {
    let mp3 = SpeechAudio::from_bytes(b"ID3\x04\x00rest".to_vec(), "narration").unwrap();
    let mut c = PlaybackController::new(HeadlessAudioBackend::new());
    c.bind(Some(&AudioSource::Speech(mp3)), 18.0);
    assert!(!c.has_audio());
    assert_eq!(c.duration(), 18.0);
    assert!(matches!(
        c.recovery(),
        Some(Recovery::AudioBindFailure { .. })
    ));
    assert_eq!(c.play(t(0)), None);
}

#[test]
fn refused_play_is_reported_not_retried() {
    let mut c = PlaybackController::new(HeadlessAudioBackend::refusing_play());
    c.bind(Some(&wav_source(3)), 20.0);
    assert!(c.has_audio());
    assert_eq!(c.play(t(0)), None);
    assert!(!c.has_audio());
    assert!(c.recovery().is_some());
    assert_eq!(c.backend().stats().released, 1);
}
