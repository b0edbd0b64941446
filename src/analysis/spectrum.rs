use rustfft::{num_complex::Complex, FftPlanner};

/// Positive-frequency amplitude spectrum of one audio slice.
///
/// `frequencies` is strictly ascending and co-indexed with `amplitudes`.
#[derive(Debug, Clone, Default)]
pub struct Spectrum {
    pub frequencies: Vec<f32>,
    pub amplitudes: Vec<f32>,
}

impl Spectrum {
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency and amplitude of the strongest bin.
    pub fn peak(&self) -> Option<(f32, f32)> {
        self.frequencies
            .iter()
            .zip(self.amplitudes.iter())
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(&f, &a)| (f, a))
    }
}

/// Compute the positive-frequency spectrum of `samples`.
///
/// Bin `i` of an `n`-point transform maps to `i * sample_rate / n` Hz; the DC
/// bin and the mirrored negative-frequency half are dropped, keeping bins
/// `1..ceil(n/2)`. Slices shorter than two samples have no positive bins and
/// return an empty spectrum.
pub fn analyze(samples: &[f32], sample_rate: u32) -> Spectrum {
    let n = samples.len();
    if n < 2 {
        return Spectrum::default();
    }

    // Per-call planner, same as the per-frame FFT setup elsewhere; planning
    // is cheap relative to measure-length transforms and keeps this safe to
    // call from worker threads.
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);

    let mut buffer: Vec<Complex<f32>> =
        samples.iter().map(|&s| Complex::new(s, 0.0)).collect();
    fft.process(&mut buffer);

    let positive = (n + 1) / 2;
    let bin_hz = sample_rate as f32 / n as f32;

    Spectrum {
        frequencies: (1..positive).map(|i| i as f32 * bin_hz).collect(),
        amplitudes: buffer[1..positive].iter().map(|c| c.norm()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq: f32, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / sample_rate as f32).sin())
            .collect()
    }

    #[test]
    fn degenerate_input_is_empty() {
        assert!(analyze(&[], 22050).is_empty());
        assert!(analyze(&[0.5], 22050).is_empty());
    }

    #[test]
    fn bin_frequencies_exclude_dc_and_mirror() {
        // 8 samples at 8 Hz: positive bins are 1, 2 and 3 Hz.
        let spectrum = analyze(&[0.0; 8], 8);
        assert_eq!(spectrum.frequencies, vec![1.0, 2.0, 3.0]);
        assert_eq!(spectrum.amplitudes.len(), 3);

        // Odd length: 9 samples keep bins 1..=4.
        let spectrum = analyze(&[0.0; 9], 9);
        assert_eq!(spectrum.frequencies.len(), 4);
    }

    #[test]
    fn frequencies_strictly_ascending() {
        let spectrum = analyze(&sine(100.0, 22050, 4096), 22050);
        for pair in spectrum.frequencies.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(spectrum.frequencies.len(), spectrum.amplitudes.len());
    }

    #[test]
    fn pure_tone_peaks_at_its_frequency() {
        // 440 cycles in exactly one second: energy lands in a single bin.
        let spectrum = analyze(&sine(440.0, 22050, 22050), 22050);
        let (freq, amp) = spectrum.peak().unwrap();
        assert!((freq - 440.0).abs() < 0.5, "peak at {freq} Hz");
        assert!(amp > 0.0);
    }
}
