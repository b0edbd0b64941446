use std::fmt;
use std::str::FromStr;

/// The time signatures the analyzer understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSignature {
    TwoFour,
    ThreeFour,
    FourFour,
    TwoTwo,
    SixEight,
    NineEight,
    TwelveEight,
}

impl TimeSignature {
    pub const ALL: [TimeSignature; 7] = [
        TimeSignature::TwoFour,
        TimeSignature::ThreeFour,
        TimeSignature::FourFour,
        TimeSignature::TwoTwo,
        TimeSignature::SixEight,
        TimeSignature::NineEight,
        TimeSignature::TwelveEight,
    ];

    pub fn numerator(self) -> usize {
        match self {
            TimeSignature::TwoFour | TimeSignature::TwoTwo => 2,
            TimeSignature::ThreeFour => 3,
            TimeSignature::FourFour => 4,
            TimeSignature::SixEight => 6,
            TimeSignature::NineEight => 9,
            TimeSignature::TwelveEight => 12,
        }
    }

    /// Compound meters subdivide each felt pulse into three eighth notes.
    pub fn is_compound(self) -> bool {
        matches!(
            self,
            TimeSignature::SixEight | TimeSignature::NineEight | TimeSignature::TwelveEight
        )
    }

    /// Beats of the working timeline per measure. For compound meters the
    /// working timeline is the triplet-reduced downbeat timeline, so this is
    /// the number of dotted-quarter pulses (2 for 6/8, 3 for 9/8, 4 for 12/8).
    pub fn beats_per_measure(self) -> usize {
        if self.is_compound() {
            self.numerator() / 3
        } else {
            self.numerator()
        }
    }
}

impl fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeSignature::TwoFour => "2/4",
            TimeSignature::ThreeFour => "3/4",
            TimeSignature::FourFour => "4/4",
            TimeSignature::TwoTwo => "2/2",
            TimeSignature::SixEight => "6/8",
            TimeSignature::NineEight => "9/8",
            TimeSignature::TwelveEight => "12/8",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeSignature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "2/4" => Ok(TimeSignature::TwoFour),
            "3/4" => Ok(TimeSignature::ThreeFour),
            "4/4" => Ok(TimeSignature::FourFour),
            "2/2" => Ok(TimeSignature::TwoTwo),
            "6/8" => Ok(TimeSignature::SixEight),
            "9/8" => Ok(TimeSignature::NineEight),
            "12/8" => Ok(TimeSignature::TwelveEight),
            other => Err(format!(
                "unknown time signature '{}' (expected one of 2/4, 3/4, 4/4, 2/2, 6/8, 9/8, 12/8)",
                other
            )),
        }
    }
}

/// One complete measure of the performance, bounded by its first and last
/// beat timestamps (seconds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Measure {
    /// 1-based ordinal position.
    pub index: usize,
    pub start: f32,
    pub end: f32,
}

/// Partition a beat timeline into complete measures. A trailing group with
/// fewer beats than a full measure is dropped.
///
/// Compound meters are segmented on downbeats: the raw timeline is reduced by
/// keeping the first beat of each full triplet (a trailing partial triplet is
/// discarded), then the reduced timeline is grouped by dotted-quarter pulses
/// per measure.
pub fn segment(beat_times: &[f32], signature: TimeSignature) -> Vec<Measure> {
    let downbeats: Vec<f32> = if signature.is_compound() {
        (0..beat_times.len())
            .step_by(3)
            .filter(|i| i + 2 < beat_times.len())
            .map(|i| beat_times[i])
            .collect()
    } else {
        beat_times.to_vec()
    };

    let per_measure = signature.beats_per_measure();

    downbeats
        .chunks(per_measure)
        .enumerate()
        .filter(|(_, chunk)| chunk.len() == per_measure)
        .map(|(i, chunk)| Measure {
            index: i + 1,
            start: chunk[0],
            end: chunk[chunk.len() - 1],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn beats(n: usize) -> Vec<f32> {
        (0..n).map(|i| i as f32 * 0.5).collect()
    }

    #[test]
    fn parses_all_spellings() {
        for sig in TimeSignature::ALL {
            assert_eq!(sig.to_string().parse::<TimeSignature>(), Ok(sig));
        }
        assert!("5/4".parse::<TimeSignature>().is_err());
        assert!("".parse::<TimeSignature>().is_err());
    }

    #[test]
    fn four_four_drops_incomplete_trailing_group() {
        let measures = segment(&beats(10), TimeSignature::FourFour);
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[0].index, 1);
        assert_eq!(measures[0].start, 0.0);
        assert_eq!(measures[0].end, 1.5);
        assert_eq!(measures[1].index, 2);
        assert_eq!(measures[1].start, 2.0);
        assert_eq!(measures[1].end, 3.5);
    }

    #[test]
    fn exact_multiple_has_no_remainder() {
        let measures = segment(&beats(8), TimeSignature::FourFour);
        assert_eq!(measures.len(), 2);
    }

    #[test]
    fn empty_timeline_yields_no_measures() {
        assert!(segment(&[], TimeSignature::ThreeFour).is_empty());
        assert!(segment(&[0.0, 0.5], TimeSignature::ThreeFour).is_empty());
    }

    #[test]
    fn six_eight_groups_downbeats_by_two_pulses() {
        // 13 beats: full triplets start at 0, 3, 6 and 9; the beat at index
        // 12 has no triplet behind it. Downbeats pair up into two measures.
        let measures = segment(&beats(13), TimeSignature::SixEight);
        assert_eq!(measures.len(), 2);
        assert_eq!(measures[0].start, 0.0);
        assert_eq!(measures[0].end, beats(13)[3]);
        assert_eq!(measures[1].start, beats(13)[6]);
        assert_eq!(measures[1].end, beats(13)[9]);
    }

    #[test]
    fn twelve_eight_needs_four_downbeats() {
        // 12 beats = four full triplets = exactly one 12/8 measure.
        let measures = segment(&beats(12), TimeSignature::TwelveEight);
        assert_eq!(measures.len(), 1);
        assert_eq!(measures[0].start, 0.0);
        assert_eq!(measures[0].end, beats(12)[9]);

        // Three downbeats are one short of a measure.
        assert!(segment(&beats(11), TimeSignature::TwelveEight).is_empty());
    }
}
