//! Optional TOML run configuration (`--config catalog.toml`).
//!
//! Every key has a default, so an absent file or an empty one behaves the same.
//!
//! ```toml
//! schema = "v2"
//! resolution = "auto-accept"
//! default_access_restriction = "אין מגבלות פרטיות"
//!
//! [matching]
//! accept_threshold = 0.6
//! report_candidates = 4
//! role_candidates = 5
//!
//! [marc.constants]
//! owner_code = "VIS"
//!
//! [marc.cataloguer_codes]
//! "רונית לוי" = "RL"
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use catalog_core::{CreatorOptions, DEFAULT_ACCESS_RESTRICTION};
use catalog_ingest::SchemaVersion;
use catalog_map::{
    DEFAULT_ACCEPT_THRESHOLD, REPORT_CANDIDATE_LIMIT, ROLE_CANDIDATE_LIMIT, ResolutionMode,
};
use catalog_marc::EncoderSettings;
use catalog_validate::ValidationOptions;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Catalog template generation; detected from the headers when unset.
    pub schema: Option<SchemaVersion>,
    pub resolution: ResolutionMode,
    pub default_access_restriction: String,
    pub matching: MatchingConfig,
    pub marc: EncoderSettings,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            schema: None,
            resolution: ResolutionMode::default(),
            default_access_restriction: DEFAULT_ACCESS_RESTRICTION.to_string(),
            matching: MatchingConfig::default(),
            marc: EncoderSettings::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub accept_threshold: f32,
    pub report_candidates: usize,
    pub role_candidates: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            accept_threshold: DEFAULT_ACCEPT_THRESHOLD,
            report_candidates: REPORT_CANDIDATE_LIMIT,
            role_candidates: ROLE_CANDIDATE_LIMIT,
        }
    }
}

impl PipelineConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("parse config {}", path.display()))
    }

    pub fn parse(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        anyhow::ensure!(
            (0.0..=1.0).contains(&config.matching.accept_threshold),
            "matching.accept_threshold must be between 0 and 1, got {}",
            config.matching.accept_threshold
        );
        Ok(config)
    }

    pub fn creator_options(&self) -> CreatorOptions {
        CreatorOptions {
            accept_threshold: self.matching.accept_threshold,
            candidate_limit: self.matching.role_candidates,
        }
    }

    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            accept_threshold: self.matching.accept_threshold,
            report_candidates: self.matching.report_candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let config = PipelineConfig::parse("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.resolution, ResolutionMode::AutoReject);
        assert_eq!(config.marc.constants.owner_code, "VIS");
    }

    #[test]
    fn partial_tables_keep_remaining_defaults() {
        let config = PipelineConfig::parse(
            r#"
schema = "v2"
resolution = "auto-accept"

[matching]
accept_threshold = 0.75

[marc.constants]
format = "MY"

[marc.cataloguer_codes]
"רונית" = "RL"
"#,
        )
        .unwrap();
        assert_eq!(config.schema, Some(SchemaVersion::V2));
        assert_eq!(config.resolution, ResolutionMode::AutoAccept);
        assert_eq!(config.creator_options().accept_threshold, 0.75);
        assert_eq!(config.matching.report_candidates, REPORT_CANDIDATE_LIMIT);
        assert_eq!(config.marc.constants.format, "MY");
        assert_eq!(config.marc.constants.owner_code, "VIS");
        assert_eq!(config.marc.cataloguer_codes["רונית"], "RL");
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let error = PipelineConfig::parse("[matching]\naccept_threshold = 1.5\n").unwrap_err();
        assert!(error.to_string().contains("accept_threshold"));
    }
}
