use super::spectrum::Spectrum;

/// Chromatic reference octave under A440 equal temperament, C4 through B4.
/// Table order is the tie-break order for nearest-note matching.
pub const NOTE_TABLE: [(&str, f32); 12] = [
    ("C", 261.63),
    ("C#", 277.18),
    ("D", 293.66),
    ("D#", 311.13),
    ("E", 329.63),
    ("F", 349.23),
    ("F#", 369.99),
    ("G", 392.00),
    ("G#", 415.30),
    ("A", 440.00),
    ("A#", 466.16),
    ("B", 493.88),
];

/// Upper bound of the reference octave (B4).
pub const OCTAVE_TOP: f32 = 493.88;

/// Amplitudes below this fraction of the spectrum maximum are ignored.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Fold a frequency into the half-open reference octave (B/2, B] by repeated
/// halving and doubling. Terminates for any finite positive input and is
/// idempotent: a folded value never moves again.
pub fn fold_to_octave(mut freq: f32) -> f32 {
    while freq > OCTAVE_TOP {
        freq *= 0.5;
    }
    while freq * 2.0 <= OCTAVE_TOP {
        freq *= 2.0;
    }
    freq
}

/// Name of the table entry closest to `freq` (absolute difference in Hz).
/// Exact ties go to the earlier table entry.
pub fn nearest_note(freq: f32) -> &'static str {
    let mut best = NOTE_TABLE[0].0;
    let mut best_diff = (NOTE_TABLE[0].1 - freq).abs();
    for &(name, reference) in &NOTE_TABLE[1..] {
        let diff = (reference - freq).abs();
        if diff < best_diff {
            best = name;
            best_diff = diff;
        }
    }
    best
}

/// Map a spectrum to its prominent pitch classes.
///
/// Frequencies whose amplitude is strictly above `threshold * max(amplitudes)`
/// are folded into the reference octave and matched to the nearest note name;
/// each name is kept once, in order of first appearance (ascending
/// frequency). A silent or empty spectrum maps to no pitch classes.
pub fn map_pitch_classes(spectrum: &Spectrum, threshold: f32) -> Vec<&'static str> {
    let max_amplitude = spectrum
        .amplitudes
        .iter()
        .fold(0.0f32, |acc, &a| acc.max(a));
    if max_amplitude <= 0.0 {
        return Vec::new();
    }

    let cutoff = threshold * max_amplitude;
    let mut notes: Vec<&'static str> = Vec::new();

    for (&freq, &amp) in spectrum.frequencies.iter().zip(spectrum.amplitudes.iter()) {
        if amp <= cutoff {
            continue;
        }
        let name = nearest_note(fold_to_octave(freq));
        if !notes.contains(&name) {
            notes.push(name);
        }
    }

    notes
}
