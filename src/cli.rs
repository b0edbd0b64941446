use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "chordline", about = "Per-measure chord labelling for recorded audio")]
pub struct Cli {
    /// Input audio file (WAV, MP3, FLAC, OGG)
    pub input: Option<PathBuf>,

    /// Time signature: 2/4, 3/4, 4/4, 2/2, 6/8, 9/8 or 12/8
    #[arg(short = 's', long, default_value = "4/4")]
    pub time_signature: String,

    /// Amplitude threshold ratio for pitch detection (0.0-1.0)
    #[arg(long, default_value_t = 0.1)]
    pub threshold: f32,

    /// Emit results as a JSON array instead of plain text
    #[arg(long)]
    pub json: bool,

    /// Run the analysis on a background worker and stream results as they
    /// arrive
    #[arg(long)]
    pub follow: bool,

    /// Config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}
