pub mod chord;
pub mod meter;
pub mod pipeline;
pub mod pitch;
pub mod spectrum;

pub use chord::{ChordNamer, RootHeuristic};
pub use meter::{segment, Measure, TimeSignature};
pub use pipeline::{MeasureLabel, Pipeline};
pub use spectrum::Spectrum;
