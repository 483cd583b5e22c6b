use super::*;

/// Writes a fixed mono WAV instead of running a TTS engine.
struct FixedWav {
    sample_rate: u32,
    samples: Vec<f32>,
}

impl SpeechProvider for FixedWav {
    fn synthesize(&self, _text: &str, out_dir: &Path) -> SlidewaveResult<PathBuf> {
        let path = out_dir.join("fixed.wav");
        AudioTrack {
            sample_rate: self.sample_rate,
            samples: self.samples.clone(),
        }
        .write_wav(&path)?;
        Ok(path)
    }
}

struct Failing;

impl SpeechProvider for Failing {
    fn synthesize(&self, _text: &str, _out_dir: &Path) -> SlidewaveResult<PathBuf> {
        Err(SlidewaveError::audio("engine unavailable"))
    }
}

fn argv(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

#[test]
fn placeholders_are_substituted() {
    let cmd = CommandSpeech::new(argv(&["espeak-ng", "-w", "{out}", "say: {text}"])).unwrap();
    let got = cmd.argv_for("hi there", Path::new("/tmp/a.wav"));
    assert_eq!(got, argv(&["espeak-ng", "-w", "/tmp/a.wav", "say: hi there"]));
    assert!(!cmd.text_via_stdin());
}

#[test]
fn template_without_text_uses_stdin() {
    let cmd = CommandSpeech::new(argv(&["piper", "--output_file", "{out}"])).unwrap();
    assert!(cmd.text_via_stdin());
}

#[test]
fn empty_command_is_rejected() {
    assert!(CommandSpeech::new(Vec::new()).is_err());
    assert!(CommandSpeech::new(argv(&["  "])).is_err());
}

#[test]
fn missing_program_is_an_audio_error() {
    let dir = tempfile::tempdir().unwrap();
    let cmd = CommandSpeech::new(argv(&["slidewave-no-such-tts-program", "{out}"])).unwrap();
    let err = cmd.synthesize("hello", dir.path()).unwrap_err();
    assert!(matches!(err, SlidewaveError::Audio(_)), "{err}");
}

#[cfg(unix)]
#[test]
fn program_without_output_is_an_audio_error() {
    let dir = tempfile::tempdir().unwrap();
    let cmd = CommandSpeech::new(argv(&["true"])).unwrap();
    let err = cmd.synthesize("hello", dir.path()).unwrap_err();
    assert!(err.to_string().contains("produced no audio"), "{err}");
}

#[test]
fn matching_wav_loads_without_ffmpeg() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FixedWav {
        sample_rate: 8000,
        samples: vec![0.5, -0.5, 0.25],
    };
    let path = provider.synthesize("x", dir.path()).unwrap();
    let samples = load_speech_samples(&path, 8000).unwrap();
    assert_eq!(samples.len(), 3);
    assert!((samples[0] - 16384.0 / 32768.0).abs() < 1e-3);
    assert!((samples[1] + 0.5).abs() < 1e-3);
}

#[test]
fn mixed_speech_sums_onto_track() {
    let dir = tempfile::tempdir().unwrap();
    let provider = FixedWav {
        sample_rate: 8000,
        samples: vec![0.25, 0.25],
    };
    let mut track = AudioTrack {
        sample_rate: 8000,
        samples: vec![0.5, 0.9, 0.1, 0.1],
    };
    mix_speech(&provider, "x", dir.path(), &mut track).unwrap();
    assert_eq!(track.len(), 4);
    assert!((track.samples[0] - 0.75).abs() < 1e-3);
    assert_eq!(track.samples[1], 1.0);
    assert_eq!(&track.samples[2..], &[0.1, 0.1]);
}

#[test]
fn failing_provider_leaves_track_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut track = AudioTrack {
        sample_rate: 8000,
        samples: vec![0.1; 4],
    };
    assert!(mix_speech(&Failing, "x", dir.path(), &mut track).is_err());
    assert_eq!(track.samples, vec![0.1; 4]);
}
