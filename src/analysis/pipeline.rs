use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::chord::{ChordNamer, RootHeuristic};
use super::meter::{self, Measure, TimeSignature};
use super::pitch;
use super::spectrum;
use crate::audio::decode::AudioData;

/// Chord label for one complete measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasureLabel {
    pub measure: usize,
    pub label: String,
}

/// Per-measure chord analysis: segmentation, spectrum, pitch classes, label.
///
/// Measures are mutually independent, so they run on the rayon pool; results
/// are always assembled in ascending measure order regardless of completion
/// order.
pub struct Pipeline {
    threshold: f32,
    namer: Box<dyn ChordNamer>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            threshold: pitch::DEFAULT_THRESHOLD,
            namer: Box::new(RootHeuristic),
        }
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_namer(mut self, namer: Box<dyn ChordNamer>) -> Self {
        self.namer = namer;
        self
    }

    pub fn run(
        &self,
        audio: &AudioData,
        beat_times: &[f32],
        signature: TimeSignature,
    ) -> Vec<MeasureLabel> {
        self.run_with(audio, beat_times, signature, &AtomicBool::new(false), |_, _| {})
    }

    /// Like [`run`](Self::run), with a cooperative cancellation flag and a
    /// progress callback called as `(completed, total)` after each measure.
    ///
    /// The flag is checked before each measure starts; measures finished
    /// before cancellation are kept, still in ascending order.
    pub fn run_with(
        &self,
        audio: &AudioData,
        beat_times: &[f32],
        signature: TimeSignature,
        cancel: &AtomicBool,
        progress: impl Fn(usize, usize) + Sync,
    ) -> Vec<MeasureLabel> {
        let measures = meter::segment(beat_times, signature);
        let total = measures.len();
        let completed = AtomicUsize::new(0);

        measures
            .par_iter()
            .map(|measure| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                let label = self.label_measure(audio, measure);
                progress(completed.fetch_add(1, Ordering::Relaxed) + 1, total);
                Some(MeasureLabel {
                    measure: measure.index,
                    label,
                })
            })
            .collect::<Vec<_>>()
            .into_iter()
            .flatten()
            .collect()
    }

    /// Analyze a single measure. Degenerate slices (empty, out of range) and
    /// silent audio fall through to "No chord detected" instead of failing.
    pub fn label_measure(&self, audio: &AudioData, measure: &Measure) -> String {
        let rate = audio.sample_rate as f32;
        let start = (measure.start * rate) as usize;
        let end = ((measure.end * rate) as usize).min(audio.samples.len());

        let slice = if start < end {
            &audio.samples[start..end]
        } else {
            &[][..]
        };

        let spectrum = spectrum::analyze(slice, audio.sample_rate);
        let notes = pitch::map_pitch_classes(&spectrum, self.threshold);
        self.namer.name(&notes)
    }
}
