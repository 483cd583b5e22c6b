use std::path::{Path, PathBuf};

use anyhow::Context as _;
use rand::{Rng, SeedableRng as _, distributions::Alphanumeric, rngs::StdRng};

use crate::{
    audio::{
        speech::{self, CommandSpeech, SpeechProvider},
        synth::Synthesizer,
        track::AudioTrack,
    },
    config::model::Config,
    encode::{ffmpeg, frames},
    foundation::core::playback_rate,
    foundation::error::{SlidewaveError, SlidewaveResult},
    foundation::math::derive_seed,
    pipeline::scratch::ScratchDirs,
    scene::composer::SceneComposer,
};

pub const TAG_LEN: usize = 8;

/// Per-video state machine, entered in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Cleanup,
    GenerateImages,
    GenerateAudio,
    MixAudio,
    Assemble,
    Done,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Cleanup => "cleanup",
            Self::GenerateImages => "generate_images",
            Self::GenerateAudio => "generate_audio",
            Self::MixAudio => "mix_audio",
            Self::Assemble => "assemble",
            Self::Done => "done",
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoStatus {
    Done { path: PathBuf },
    Failed { stage: Stage, error: String },
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct VideoOutcome {
    pub index: u32,
    pub tag: String,
    pub status: VideoStatus,
}

impl VideoOutcome {
    pub fn path(&self) -> Option<&Path> {
        match &self.status {
            VideoStatus::Done { path } => Some(path),
            VideoStatus::Failed { .. } => None,
        }
    }

    /// One-line summary handed back to the caller.
    pub fn status_line(&self) -> String {
        match &self.status {
            VideoStatus::Done { path } => format!("ok {} {}", self.tag, path.display()),
            VideoStatus::Failed { stage, error } => {
                format!("failed {} at {stage}: {error}", self.tag)
            }
        }
    }
}

/// Result of one batch. Serializes to `{seed, videos: [{index, tag, status}]}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BatchReport {
    pub seed: u64,
    pub videos: Vec<VideoOutcome>,
}

impl BatchReport {
    pub fn all_succeeded(&self) -> bool {
        self.videos.iter().all(|v| v.path().is_some())
    }

    pub fn to_json(&self) -> SlidewaveResult<String> {
        Ok(serde_json::to_string_pretty(self).context("serialize batch report")?)
    }

    pub fn write_json(&self, path: &Path) -> SlidewaveResult<()> {
        ffmpeg::ensure_parent_dir(path)?;
        std::fs::write(path, self.to_json()?)
            .with_context(|| format!("write batch report '{}'", path.display()))?;
        Ok(())
    }
}

/// Seeded generator for video `index` of a batch.
pub fn video_rng(batch_seed: u64, index: u32) -> StdRng {
    StdRng::seed_from_u64(derive_seed(batch_seed, "video", u64::from(index)))
}

pub fn random_tag<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TAG_LEN)
        .map(|_| char::from(rng.sample(Alphanumeric)))
        .collect()
}

fn track_file_name(tag: &str) -> String {
    format!("track_{tag}.wav")
}

/// Drives slide, audio and video generation for a batch of videos, one at a time.
pub struct Pipeline {
    cfg: Config,
    composer: SceneComposer,
    synth: Synthesizer,
    speech: Option<Box<dyn SpeechProvider>>,
}

impl Pipeline {
    /// Validate `cfg` and load the font. Speech uses `tts_command` when enabled.
    pub fn new(cfg: Config) -> SlidewaveResult<Self> {
        cfg.validate()?;
        let composer = SceneComposer::from_config(&cfg)?;
        let speech: Option<Box<dyn SpeechProvider>> = if cfg.tts_enabled {
            Some(Box::new(CommandSpeech::from_config(&cfg)?))
        } else {
            None
        };
        Ok(Self {
            synth: Synthesizer::from_config(&cfg),
            composer,
            speech,
            cfg,
        })
    }

    /// Replace the speech provider. Ignored when speech is disabled in the config.
    pub fn with_speech(mut self, provider: Box<dyn SpeechProvider>) -> Self {
        if self.cfg.tts_enabled {
            self.speech = Some(provider);
        }
        self
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Run `amount` videos into `out_dir`.
    ///
    /// Scratch is purged once up front. A failed video is reported and the batch moves on to
    /// the next one. Only setup failures (purge, output dir) abort the batch.
    #[tracing::instrument(skip(self, scratch, out_dir), fields(amount = self.cfg.amount))]
    pub fn run(
        &mut self,
        scratch: &ScratchDirs,
        out_dir: &Path,
        seed: Option<u64>,
    ) -> SlidewaveResult<BatchReport> {
        let seed = seed.or(self.cfg.seed).unwrap_or_else(rand::random);
        tracing::info!(seed, "starting batch");

        tracing::info!(stage = %Stage::Cleanup, "stage");
        scratch.purge()?;
        std::fs::create_dir_all(out_dir)
            .with_context(|| format!("create output dir '{}'", out_dir.display()))?;

        let mut videos = Vec::with_capacity(self.cfg.amount as usize);
        for index in 0..self.cfg.amount {
            let mut rng = video_rng(seed, index);
            let tag = random_tag(&mut rng);
            let span = tracing::info_span!("video", index, tag = %tag);
            let _enter = span.enter();

            let status = match self.run_video(scratch, out_dir, &tag, &mut rng) {
                Ok(path) => {
                    tracing::info!(stage = %Stage::Done, path = %path.display(), "stage");
                    VideoStatus::Done { path }
                }
                Err((stage, e)) => {
                    tracing::error!(%stage, "video failed: {e}");
                    VideoStatus::Failed {
                        stage,
                        error: e.to_string(),
                    }
                }
            };
            videos.push(VideoOutcome { index, tag, status });
        }

        Ok(BatchReport { seed, videos })
    }

    fn run_video(
        &mut self,
        scratch: &ScratchDirs,
        out_dir: &Path,
        tag: &str,
        rng: &mut StdRng,
    ) -> Result<PathBuf, (Stage, SlidewaveError)> {
        let at = |stage: Stage| move |e: SlidewaveError| (stage, e);

        tracing::info!(stage = %Stage::GenerateImages, slides = self.cfg.length, "stage");
        let slide_paths = self
            .generate_images(scratch.images_dir(), tag, rng)
            .map_err(at(Stage::GenerateImages))?;

        tracing::info!(stage = %Stage::GenerateAudio, "stage");
        let mut track =
            AudioTrack::synthesize(&self.synth, &self.cfg.slide_durations_ms(), rng);

        tracing::info!(stage = %Stage::MixAudio, "stage");
        self.mix_speech(scratch.audio_dir(), &mut track);
        let wav = scratch.audio_dir().join(track_file_name(tag));
        track.write_wav(&wav).map_err(at(Stage::MixAudio))?;

        let fps = self.cfg.fps().map_err(at(Stage::Assemble))?;
        tracing::info!(
            stage = %Stage::Assemble,
            fps = playback_rate(self.cfg.slide_duration_ms),
            "stage"
        );
        let frames = frames::load_frames(&slide_paths, self.cfg.frame_mismatch)
            .map_err(at(Stage::Assemble))?;
        let out = out_dir.join(format!("{tag}.mp4"));
        ffmpeg::assemble_video(&frames, fps, Some(&wav), &out).map_err(at(Stage::Assemble))
    }

    fn generate_images(
        &mut self,
        dir: &Path,
        tag: &str,
        rng: &mut StdRng,
    ) -> SlidewaveResult<Vec<PathBuf>> {
        (0..self.cfg.length)
            .map(|index| {
                let slide = self.composer.compose(index, tag, rng)?;
                slide.save(dir, rng)
            })
            .collect()
    }

    /// Overlay speech onto `track`. A provider failure disables speech for the rest of the batch.
    fn mix_speech(&mut self, work_dir: &Path, track: &mut AudioTrack) {
        let Some(provider) = self.speech.as_deref() else {
            return;
        };
        if let Err(e) = speech::mix_speech(provider, &self.cfg.tts_text, work_dir, track) {
            tracing::warn!("speech unavailable, continuing without it: {e}");
            self.speech = None;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/orchestrator.rs"]
mod tests;
