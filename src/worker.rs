use anyhow::{bail, Context, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::analysis::meter::{self, TimeSignature};
use crate::analysis::pipeline::{MeasureLabel, Pipeline};
use crate::audio::{beats, decode};

/// Messages flowing from the analysis worker to its consumer. The channel is
/// the only shared state; the consumer polls it and must stop once
/// `Complete` arrives — it is always the final message, success or failure.
#[derive(Debug)]
pub enum AnalysisMessage {
    Progress { percent: f32, status: String },
    Measure(MeasureLabel),
    Complete(Result<(), String>),
}

/// Handle to a running background analysis.
pub struct AnalysisJob {
    pub messages: Receiver<AnalysisMessage>,
    cancel: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl AnalysisJob {
    /// Ask the worker to stop. Checked between measures; the job still ends
    /// with a `Complete` message.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Relaxed);
    }

    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for AnalysisJob {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Run the whole decode → beat-track → per-measure pipeline on a dedicated
/// thread, reporting through the returned job's message channel. Measure
/// results arrive incrementally, in ascending measure order.
pub fn spawn(path: PathBuf, signature: TimeSignature, threshold: f32) -> AnalysisJob {
    let (tx, rx) = unbounded();
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);

    let handle = thread::spawn(move || {
        let outcome = run_job(&path, signature, threshold, &tx, &flag);
        // The consumer may have gone away; nothing to do then.
        let _ = tx.send(AnalysisMessage::Complete(
            outcome.map_err(|e| format!("{e:#}")),
        ));
    });

    AnalysisJob {
        messages: rx,
        cancel,
        handle: Some(handle),
    }
}

fn run_job(
    path: &Path,
    signature: TimeSignature,
    threshold: f32,
    tx: &Sender<AnalysisMessage>,
    cancel: &AtomicBool,
) -> Result<()> {
    let progress = |percent: f32, status: String| {
        tx.send(AnalysisMessage::Progress { percent, status })
            .context("analysis consumer disconnected")
    };

    progress(0.0, "Loading audio file...".into())?;
    let audio = decode::decode_audio(path)?;

    if cancel.load(Ordering::Relaxed) {
        bail!("analysis cancelled");
    }

    progress(20.0, "Detecting beats...".into())?;
    let beat_analysis = beats::track_beats(&audio.samples, audio.sample_rate);
    log::debug!("Worker tempo estimate: {:.1} BPM", beat_analysis.tempo_bpm);

    progress(30.0, "Analyzing measures...".into())?;
    let measures = meter::segment(&beat_analysis.beat_times, signature);
    let total = measures.len();
    let pipeline = Pipeline::new().with_threshold(threshold);

    for (i, measure) in measures.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            bail!("analysis cancelled");
        }

        progress(
            30.0 + i as f32 / total as f32 * 70.0,
            format!("Analyzing measure {} of {}", i + 1, total),
        )?;

        let label = pipeline.label_measure(&audio, measure);
        tx.send(AnalysisMessage::Measure(MeasureLabel {
            measure: measure.index,
            label,
        }))
        .context("analysis consumer disconnected")?;
    }

    progress(100.0, "Analysis complete!".into())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_still_completes() {
        let job = spawn(
            PathBuf::from("/nonexistent/audio.wav"),
            TimeSignature::FourFour,
            0.1,
        );

        let mut saw_loading = false;
        loop {
            match job.messages.recv().expect("worker hung up without Complete") {
                AnalysisMessage::Progress { percent, status } => {
                    if status == "Loading audio file..." {
                        assert_eq!(percent, 0.0);
                        saw_loading = true;
                    }
                }
                AnalysisMessage::Measure(_) => panic!("no measures expected"),
                AnalysisMessage::Complete(outcome) => {
                    assert!(outcome.is_err());
                    break;
                }
            }
        }
        assert!(saw_loading);
        job.join();
    }
}
