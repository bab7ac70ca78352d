//! Job file loading.

use anyhow::{Context, Result};
use cutplan_core::{PartList, PartSpec, PlanConfig, SheetSize};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// One calculation request read from a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Job {
    /// Stock sheet sizes as `[width, height]` pairs. Overrides
    /// `config.sheet_sizes` when non-empty.
    pub sheet_sizes: Vec<[f64; 2]>,
    /// Engine configuration.
    pub config: PlanConfig,
    /// Requested parts.
    pub parts: Vec<PartSpec>,
}

impl Job {
    /// Parses a job from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid job file")
    }

    /// Reads a job from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("while loading {}", path.display()))
    }

    /// Writes the job as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
    }

    /// Effective engine configuration, with the job's sheet sizes applied.
    pub fn plan_config(&self) -> PlanConfig {
        if self.sheet_sizes.is_empty() {
            return self.config.clone();
        }
        let sizes = self
            .sheet_sizes
            .iter()
            .map(|&[w, h]| SheetSize::new(w, h))
            .collect();
        self.config.clone().with_sheet_sizes(sizes)
    }

    /// Registers every part spec, rejecting the job on the first invalid one.
    pub fn part_list(&self) -> Result<PartList> {
        let mut list = PartList::new();
        for (i, spec) in self.parts.iter().enumerate() {
            list.add(spec.clone())
                .with_context(|| format!("part #{} ({})", i + 1, spec.reference))?;
        }
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_job() {
        let job = Job::from_json(r#"{"parts": [{"ref": "A", "width": 100, "height": 50}]}"#).unwrap();
        assert!(job.sheet_sizes.is_empty());
        assert_eq!(job.plan_config(), PlanConfig::default());

        let list = job.part_list().unwrap();
        assert_eq!(list.len(), 1);
        let part = list.iter().next().unwrap();
        assert_eq!(part.material(), "default");
        assert_eq!(part.quantity(), 1);
    }

    #[test]
    fn test_sheet_sizes_override_config() {
        let job = Job::from_json(
            r#"{"sheet_sizes": [[1200, 600]], "config": {"spacing": 4.0}, "parts": []}"#,
        )
        .unwrap();
        let config = job.plan_config();
        assert_eq!(config.sheet_sizes, vec![SheetSize::new(1200.0, 600.0)]);
        assert_eq!(config.spacing, 4.0);
    }

    #[test]
    fn test_invalid_part_names_position() {
        let job = Job::from_json(
            r#"{"parts": [{"ref": "ok", "width": 10, "height": 10}, {"ref": "bad", "width": -1, "height": 10}]}"#,
        )
        .unwrap();
        let err = job.part_list().unwrap_err();
        assert!(format!("{err}").contains("part #2 (bad)"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(Job::from_json("{\"parts\": 3}").is_err());
    }
}
