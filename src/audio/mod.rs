pub mod beats;
pub mod decode;

pub use beats::{track_beats, BeatAnalysis};
pub use decode::{decode_audio, AudioData, DecodeError};
