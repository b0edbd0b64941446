use rustfft::{num_complex::Complex, FftPlanner};

const FFT_SIZE: usize = 2048;
const HOP_SIZE: usize = 1024;

/// Minimum spacing between reported beats, seconds.
const MIN_BEAT_GAP: f32 = 0.1;

/// Beat timeline and tempo estimate for a whole recording. The tempo is
/// informational only; segmentation consumes `beat_times`.
#[derive(Debug, Clone)]
pub struct BeatAnalysis {
    pub tempo_bpm: f32,
    pub beat_times: Vec<f32>,
}

/// Detect beats via spectral-flux onset strength with an adaptive local
/// threshold. Timestamps are strictly ascending.
pub fn track_beats(samples: &[f32], sample_rate: u32) -> BeatAnalysis {
    let flux = onset_strength(samples, sample_rate);
    let beat_times = pick_beats(&flux);
    let tempo_bpm = estimate_tempo(&beat_times);

    log::info!(
        "Beat tracking: {} beats, {:.1} BPM estimate",
        beat_times.len(),
        tempo_bpm
    );

    BeatAnalysis {
        tempo_bpm,
        beat_times,
    }
}

/// Positive spectral flux per hop, as (time, flux) pairs.
fn onset_strength(samples: &[f32], sample_rate: u32) -> Vec<(f32, f32)> {
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(FFT_SIZE);
    let hann = hann_window(FFT_SIZE);

    let mut prev_magnitudes = vec![0.0f32; FFT_SIZE / 2];
    let mut flux_values = Vec::new();

    let mut pos = 0;
    while pos + FFT_SIZE <= samples.len() {
        let mut buffer: Vec<Complex<f32>> = samples[pos..pos + FFT_SIZE]
            .iter()
            .enumerate()
            .map(|(i, &s)| Complex::new(s * hann[i], 0.0))
            .collect();
        fft.process(&mut buffer);

        let magnitudes: Vec<f32> = buffer[..FFT_SIZE / 2].iter().map(|c| c.norm()).collect();

        let flux: f32 = magnitudes
            .iter()
            .zip(prev_magnitudes.iter())
            .map(|(cur, prev)| (cur - prev).max(0.0))
            .sum();

        flux_values.push((pos as f32 / sample_rate as f32, flux));
        prev_magnitudes = magnitudes;
        pos += HOP_SIZE;
    }

    flux_values
}

fn pick_beats(flux_values: &[(f32, f32)]) -> Vec<f32> {
    if flux_values.is_empty() {
        return Vec::new();
    }

    // ~200ms of context on each side at the hop rate
    let window = 20;
    let mut beat_times: Vec<f32> = Vec::new();

    for i in 0..flux_values.len() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(flux_values.len());
        let local_mean: f32 =
            flux_values[start..end].iter().map(|(_, f)| f).sum::<f32>() / (end - start) as f32;

        let threshold = local_mean * 1.5 + 0.01;
        if flux_values[i].1 <= threshold {
            continue;
        }

        let is_peak = (i == 0 || flux_values[i].1 >= flux_values[i - 1].1)
            && (i == flux_values.len() - 1 || flux_values[i].1 >= flux_values[i + 1].1);

        let far_enough = beat_times
            .last()
            .map_or(true, |&last| flux_values[i].0 - last > MIN_BEAT_GAP);

        if is_peak && far_enough {
            beat_times.push(flux_values[i].0);
        }
    }

    beat_times
}

fn estimate_tempo(beat_times: &[f32]) -> f32 {
    if beat_times.len() < 2 {
        return 120.0;
    }

    // Median of the intervals that land in the 60-200 BPM range
    let mut reasonable: Vec<f32> = beat_times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&i| (0.3..=1.0).contains(&i))
        .collect();

    if reasonable.is_empty() {
        return 120.0;
    }

    reasonable.sort_by(|a, b| a.total_cmp(b));
    60.0 / reasonable[reasonable.len() / 2]
}

fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 5 seconds of decaying noise bursts every half second.
    fn click_track(sample_rate: u32) -> Vec<f32> {
        let mut samples = vec![0.0f32; sample_rate as usize * 5];
        let period = sample_rate as usize / 2;
        for start in (0..samples.len()).step_by(period) {
            for i in 0..400.min(samples.len() - start) {
                let decay = (-(i as f32) / 60.0).exp();
                let phase = i as f32 * 0.7;
                samples[start + i] = decay * phase.sin();
            }
        }
        samples
    }

    #[test]
    fn empty_signal_has_no_beats() {
        let analysis = track_beats(&[], 22050);
        assert!(analysis.beat_times.is_empty());
        assert_eq!(analysis.tempo_bpm, 120.0);
    }

    #[test]
    fn silence_has_no_beats() {
        let analysis = track_beats(&vec![0.0; 22050 * 2], 22050);
        assert!(analysis.beat_times.is_empty());
    }

    #[test]
    fn regular_clicks_are_detected() {
        let analysis = track_beats(&click_track(22050), 22050);
        assert!(
            analysis.beat_times.len() >= 6,
            "found {} beats",
            analysis.beat_times.len()
        );
        for pair in analysis.beat_times.windows(2) {
            assert!(pair[1] > pair[0], "beat times must ascend");
        }
    }

    #[test]
    fn click_tempo_is_plausible() {
        // Clicks every 0.5s are 120 BPM; hop quantization blurs the estimate.
        let analysis = track_beats(&click_track(22050), 22050);
        assert!(
            analysis.tempo_bpm > 90.0 && analysis.tempo_bpm < 160.0,
            "estimated {} BPM",
            analysis.tempo_bpm
        );
    }
}
