/// Turns a detected pitch-class sequence into a display label.
///
/// A narrow seam so the naming heuristic can be swapped for a real
/// music-theoretic classifier without touching segmentation or spectral code.
pub trait ChordNamer: Send + Sync {
    fn name(&self, notes: &[&'static str]) -> String;
}

/// Size-based naming: the first-detected pitch class is treated as the root.
/// There is no notion of bass note, inversion or chord quality; three or more
/// notes are labelled "{root} chord" regardless of what they spell.
#[derive(Debug, Default)]
pub struct RootHeuristic;

impl ChordNamer for RootHeuristic {
    fn name(&self, notes: &[&'static str]) -> String {
        match notes {
            [] => "No chord detected".to_string(),
            [single] => (*single).to_string(),
            [first, second] => format!("{first}-{second} dyad"),
            [root, ..] => format!("{root} chord"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_table() {
        let namer = RootHeuristic;
        assert_eq!(namer.name(&[]), "No chord detected");
        assert_eq!(namer.name(&["G"]), "G");
        assert_eq!(namer.name(&["C", "E"]), "C-E dyad");
        assert_eq!(namer.name(&["C", "E", "G"]), "C chord");
        assert_eq!(namer.name(&["A", "C", "E", "G"]), "A chord");
    }
}
