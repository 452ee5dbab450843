use std::io::Cursor;

use crate::foundation::error::{SlideError, SlideResult};

/// Average narration speaking rate used for duration estimates.
pub const WORDS_PER_MINUTE: f64 = 150.0;

/// Container of synthesized narration audio.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    /// RIFF/WAVE with PCM samples.
    Wav,
    /// MPEG-1/2 Layer III.
    Mp3,
}

impl AudioFormat {
    /// Identify the container from its leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WAVE" {
            return Some(Self::Wav);
        }
        if bytes.starts_with(b"ID3") {
            return Some(Self::Mp3);
        }
        // MPEG audio frame sync: 11 set bits.
        if bytes.len() >= 2 && bytes[0] == 0xFF && (bytes[1] & 0xE0) == 0xE0 {
            return Some(Self::Mp3);
        }
        None
    }

    /// MIME type for serving the audio.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Synthesized narration returned by a speech provider.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeechAudio {
    /// Encoded audio bytes.
    pub bytes: Vec<u8>,
    /// Container format.
    pub format: AudioFormat,
    /// Word-count based estimate, shown until the decoded duration is known.
    pub estimated_duration_secs: f64,
}

impl SpeechAudio {
    /// Wrap provider bytes, sniffing the container and estimating duration from `narration`.
    pub fn from_bytes(bytes: Vec<u8>, narration: &str) -> SlideResult<Self> {
        let format = AudioFormat::sniff(&bytes)
            .ok_or_else(|| SlideError::audio("unrecognized audio container"))?;
        Ok(Self {
            bytes,
            format,
            estimated_duration_secs: estimate_duration_secs(narration),
        })
    }

    /// Best known duration: decoded from the container when possible, else the estimate.
    pub fn duration_secs(&self) -> f64 {
        match self.format {
            AudioFormat::Wav => wav_duration_secs(&self.bytes).unwrap_or(self.estimated_duration_secs),
            AudioFormat::Mp3 => self.estimated_duration_secs,
        }
    }
}

/// Estimated spoken length of `text`: `ceil(words / 150 * 60)` seconds.
pub fn estimate_duration_secs(text: &str) -> f64 {
    let words = text.split_whitespace().count() as f64;
    (words / WORDS_PER_MINUTE * 60.0).ceil()
}

/// Raw PCM layout, as described by an `audio/L16;rate=24000` style MIME type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PcmSpec {
    /// Interleaved channel count.
    pub channels: u16,
    /// Samples per second per channel.
    pub sample_rate: u32,
    /// Bits per sample.
    pub bits_per_sample: u16,
}

impl Default for PcmSpec {
    fn default() -> Self {
        Self {
            channels: 1,
            sample_rate: 24_000,
            bits_per_sample: 16,
        }
    }
}

impl PcmSpec {
    /// Parse `audio/L<bits>;rate=<hz>[;channels=<n>]`. Unspecified parts keep their defaults.
    pub fn from_mime(mime: &str) -> SlideResult<Self> {
        let mut spec = Self::default();
        let mut parts = mime.split(';').map(str::trim);
        let kind = parts.next().unwrap_or_default();
        let subtype = kind
            .split_once('/')
            .map(|(_, s)| s)
            .ok_or_else(|| SlideError::validation(format!("bad PCM mime type '{mime}'")))?;
        if let Some(bits) = subtype.strip_prefix('L').or_else(|| subtype.strip_prefix('l')) {
            spec.bits_per_sample = bits
                .parse()
                .map_err(|_| SlideError::validation(format!("bad PCM sample size in '{mime}'")))?;
        }
        for param in parts {
            let Some((key, value)) = param.split_once('=') else {
                continue;
            };
            match key.trim() {
                "rate" => {
                    spec.sample_rate = value.trim().parse().map_err(|_| {
                        SlideError::validation(format!("bad PCM rate in '{mime}'"))
                    })?;
                }
                "channels" => {
                    spec.channels = value.trim().parse().map_err(|_| {
                        SlideError::validation(format!("bad PCM channels in '{mime}'"))
                    })?;
                }
                _ => {}
            }
        }
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> SlideResult<()> {
        if self.channels == 0 || self.sample_rate == 0 {
            return Err(SlideError::validation("PCM channels and rate must be > 0"));
        }
        if !matches!(self.bits_per_sample, 8 | 16 | 24 | 32) {
            return Err(SlideError::validation(
                "PCM bits per sample must be 8, 16, 24 or 32",
            ));
        }
        let block_align = self.block_align();
        if u16::try_from(block_align).is_err()
            || self.sample_rate.checked_mul(block_align).is_none()
        {
            return Err(SlideError::validation(format!(
                "PCM layout {}ch x {} bit at {} Hz does not fit a WAV header",
                self.channels, self.bits_per_sample, self.sample_rate
            )));
        }
        Ok(())
    }

    fn block_align(&self) -> u32 {
        u32::from(self.channels) * u32::from(self.bits_per_sample / 8)
    }

    fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: self.bits_per_sample,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// Wrap raw little-endian PCM in a WAV container. A trailing partial frame is dropped.
pub fn pcm_to_wav(pcm: &[u8], spec: PcmSpec) -> SlideResult<Vec<u8>> {
    spec.validate()?;
    u32::try_from(pcm.len()).map_err(|_| SlideError::validation("PCM payload too large for WAV"))?;
    let block_align = spec.block_align() as usize;
    let pcm = &pcm[..pcm.len() - pcm.len() % block_align];

    let mut out = Cursor::new(Vec::with_capacity(44 + pcm.len()));
    write_samples(&mut out, pcm, spec).map_err(|e| SlideError::audio(format!("encode wav: {e}")))?;
    Ok(out.into_inner())
}

fn write_samples(out: &mut Cursor<Vec<u8>>, pcm: &[u8], spec: PcmSpec) -> hound::Result<()> {
    let mut writer = hound::WavWriter::new(out, spec.wav_spec())?;
    match spec.bits_per_sample {
        // 8-bit WAV is unsigned; hound takes signed samples and re-biases them.
        8 => {
            for &b in pcm {
                writer.write_sample((i16::from(b) - 128) as i8)?;
            }
        }
        16 => {
            for c in pcm.chunks_exact(2) {
                writer.write_sample(i16::from_le_bytes([c[0], c[1]]))?;
            }
        }
        24 => {
            for c in pcm.chunks_exact(3) {
                writer.write_sample(i32::from_le_bytes([0, c[0], c[1], c[2]]) >> 8)?;
            }
        }
        _ => {
            for c in pcm.chunks_exact(4) {
                writer.write_sample(i32::from_le_bytes([c[0], c[1], c[2], c[3]]))?;
            }
        }
    }
    writer.finalize()
}

/// Decoded length of a WAV file, in seconds.
///
/// Streams often leave the data size unset or larger than what arrived, so the sample count is
/// capped by the bytes actually present.
pub fn wav_duration_secs(bytes: &[u8]) -> Option<f64> {
    if AudioFormat::sniff(bytes) != Some(AudioFormat::Wav) {
        return None;
    }
    let reader = hound::WavReader::new(Cursor::new(bytes)).ok()?;
    let spec = reader.spec();
    let declared = u64::from(reader.len());
    // The reader stops at the start of the sample data.
    let data_start = reader.into_inner().position();

    let bytes_per_sample = u64::from(spec.bits_per_sample.div_ceil(8)).max(1);
    let present = (bytes.len() as u64).saturating_sub(data_start) / bytes_per_sample;
    let samples = if declared == 0 {
        present
    } else {
        declared.min(present)
    };
    if spec.channels == 0 || spec.sample_rate == 0 {
        return None;
    }
    let frames = samples / u64::from(spec.channels);
    Some(frames as f64 / f64::from(spec.sample_rate))
}

#[cfg(test)]
#[path = "../../tests/unit/provider/audio.rs"]
mod tests;
