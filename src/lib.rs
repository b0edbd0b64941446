//! Per-measure chord labelling for recorded audio: beat timeline + time
//! signature → measures, per-measure spectrum → pitch classes → chord name.

pub mod analysis;
pub mod audio;
pub mod cli;
pub mod config;
pub mod worker;
