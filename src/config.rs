use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_threshold")]
    pub threshold: f32,
    #[serde(default = "default_time_signature")]
    pub time_signature: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            time_signature: default_time_signature(),
        }
    }
}

fn default_threshold() -> f32 { 0.1 }
fn default_time_signature() -> String { "4/4".into() }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.analysis.threshold, 0.1);
        assert_eq!(cfg.analysis.time_signature, "4/4");
    }

    #[test]
    fn analysis_section_overrides() {
        let cfg: Config = toml::from_str(
            "[analysis]\nthreshold = 0.2\ntime_signature = \"6/8\"\n",
        )
        .unwrap();
        assert_eq!(cfg.analysis.threshold, 0.2);
        assert_eq!(cfg.analysis.time_signature, "6/8");
    }
}
