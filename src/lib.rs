//! Slidewave generates short procedural videos.
//!
//! Each video is a run of slides filled with random geometric shapes and captions, scored with a
//! synthesized waveform track (optionally mixed with speech), and muxed to MP4 by the system
//! `ffmpeg` binary.
//!
//! # Pipeline overview
//!
//! 1. **Compose**: `Config + seed -> Slide` (shapes, caption, tag and index overlays), saved as PNG
//! 2. **Synthesize**: one waveform buffer per slide, concatenated into an [`AudioTrack`]
//! 3. **Mix**: optional speech from a [`SpeechProvider`] summed onto the track
//! 4. **Assemble**: frames checked for a consistent shape and streamed to `ffmpeg`
//!
//! [`Pipeline`] runs these stages for every video of a batch over an exclusive
//! [`ScratchDirs`] handle. Every random choice flows from one batch seed, so a batch can be
//! reproduced from its [`BatchReport`].
#![forbid(unsafe_code)]

mod foundation {
    pub mod core;
    pub mod error;
    pub mod math;
}

mod config {
    pub mod model;
}

mod resources {
    pub mod palette;
    pub mod words;
}

mod scene {
    pub mod composer;
    pub mod raster;
    pub mod shape;
    pub mod text;
}

mod audio {
    pub mod speech;
    pub mod synth;
    pub mod track;
    pub mod vibe;
}

mod encode {
    pub mod ffmpeg;
    pub mod frames;
}

mod pipeline {
    pub mod orchestrator;
    pub mod scratch;
}

pub use audio::speech::{
    CommandSpeech, SpeechProvider, decode_audio_f32_mono, load_speech_samples, mix_speech,
};
pub use audio::synth::{Synthesizer, WaveBuffer, raw_sample, render_wave};
pub use audio::track::{AudioTrack, quantize_sample};
pub use audio::vibe::{Vibe, WaveParams};
pub use config::model::{
    ColorMode, Config, DeformationLevel, FrameMismatchPolicy, ShapeKind, TextMode, TextPosition,
    WaveForm,
};
pub use encode::ffmpeg::{
    EncodeConfig, FfmpegEncoder, assemble_video, default_mp4_config, ensure_parent_dir,
    is_ffmpeg_on_path,
};
pub use encode::frames::{conform_frames, load_frame, load_frames};
pub use foundation::core::{Affine, BezPath, Canvas, Fps, Point, Rect, Rgb8, Vec2};
pub use foundation::error::{SlidewaveError, SlidewaveResult};
pub use foundation::math::{derive_seed, samples_for_duration};
pub use pipeline::orchestrator::{
    BatchReport, Pipeline, Stage, VideoOutcome, VideoStatus, random_tag, video_rng,
};
pub use pipeline::scratch::ScratchDirs;
pub use resources::palette::{scheme, scheme_names};
pub use resources::words::{general_corpus, pick_word, topic, topic_names};
pub use scene::composer::{SceneComposer, Slide, TextOverlay};
pub use scene::raster::Raster;
pub use scene::shape::{ColorPolicy, Shape, ShapeSize, ShapeSpec, SizeBounds};
pub use scene::text::{
    FONT_ENV, TextBlock, TextRenderer, caption_text, load_font, place_text, resolve_font_path,
};
