//! Generation Parameters - fixed provider parameters for every submission
//!
//! These are static configuration, not user input. The duration and
//! resolution also populate the metadata of every artifact descriptor.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Parameters sent with each long-running generation request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParameters {
    /// Output aspect ratio, e.g. "16:9"
    pub aspect_ratio: String,
    /// Number of videos to produce (1-4)
    pub sample_count: u8,
    /// Clip length in seconds (1-60)
    pub duration_seconds: u32,
    /// Resolution label reported alongside results
    pub resolution: String,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            sample_count: 1,
            duration_seconds: 8,
            resolution: "720p".to_string(),
        }
    }
}

impl GenerationParameters {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), DomainError> {
        let valid_ratio = self
            .aspect_ratio
            .split_once(':')
            .map(|(w, h)| {
                matches!((w.parse::<u32>(), h.parse::<u32>()), (Ok(w), Ok(h)) if w > 0 && h > 0)
            })
            .unwrap_or(false);
        if !valid_ratio {
            return Err(DomainError::validation(format!(
                "aspect_ratio must look like W:H, got {}",
                self.aspect_ratio
            )));
        }
        if !(1..=4).contains(&self.sample_count) {
            return Err(DomainError::validation("sample_count must be between 1 and 4"));
        }
        if !(1..=60).contains(&self.duration_seconds) {
            return Err(DomainError::validation(
                "duration_seconds must be between 1 and 60",
            ));
        }
        if self.resolution.trim().is_empty() {
            return Err(DomainError::validation("resolution cannot be empty"));
        }
        Ok(())
    }

    /// Human-readable duration, e.g. "8 seconds"
    pub fn duration_label(&self) -> String {
        format!("{} seconds", self.duration_seconds)
    }
}
