use crate::error::Result;
use crate::processors::ReplicationTable;
use crate::utils::constants::{DEFAULT_INPUT_DIR, DEFAULT_MIN_SAMPLE_COUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use validator::Validate;

/// Tunable pipeline settings.
///
/// Price thresholds live in `utils::constants`, not here. Loadable from a
/// TOML, YAML or JSON file; missing keys fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct PipelineConfig {
    /// Folder holding the `YYYY-qN` quarter folders
    pub input_dir: PathBuf,

    /// Regions with fewer transactions are left out of the output
    #[validate(range(min = 1))]
    pub min_sample_count: usize,

    /// Cities whose city-wide figures are copied onto their districts
    pub city_wide: ReplicationTable,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            min_sample_count: DEFAULT_MIN_SAMPLE_COUNT,
            city_wide: ReplicationTable::default(),
        }
    }
}

impl PipelineConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from(path))
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use the defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_input_dir(mut self, input_dir: PathBuf) -> Self {
        self.input_dir = input_dir;
        self
    }

    pub fn with_min_sample_count(mut self, min_sample_count: usize) -> Self {
        self.min_sample_count = min_sample_count;
        self
    }

    /// Validate the settings and every city-wide rule
    pub fn check(&self) -> Result<()> {
        self.validate()?;
        self.city_wide.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProcessingError;
    use crate::processors::CityWideRule;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.input_dir, PathBuf::from("./land-data"));
        assert_eq!(config.min_sample_count, 1);
        assert_eq!(config.city_wide.rules().len(), 1);
        assert!(config.check().is_ok());
    }

    #[test]
    fn test_zero_min_sample_count_is_invalid() {
        let config = PipelineConfig::default().with_min_sample_count(0);
        assert!(matches!(config.check(), Err(ProcessingError::Validation(_))));
    }

    #[test]
    fn test_from_toml_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "input_dir = \"/data/lvr\"")?;
        writeln!(file, "min_sample_count = 3")?;
        writeln!(file, "[[city_wide]]")?;
        writeln!(file, "city = \"嘉義市\"")?;
        writeln!(file, "districts = [\"東區\", \"西區\"]")?;

        let config = PipelineConfig::from_file(file.path())?;

        assert_eq!(config.input_dir, PathBuf::from("/data/lvr"));
        assert_eq!(config.min_sample_count, 3);
        assert_eq!(
            config.city_wide.rules(),
            &[CityWideRule::new("嘉義市", &["東區", "西區"])]
        );
        Ok(())
    }

    #[test]
    fn test_partial_file_uses_defaults() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "min_sample_count = 5")?;

        let config = PipelineConfig::from_file(file.path())?;

        assert_eq!(config.min_sample_count, 5);
        assert_eq!(config.input_dir, PathBuf::from("./land-data"));
        assert_eq!(config.city_wide, ReplicationTable::default());
        Ok(())
    }

    #[test]
    fn test_invalid_rule_in_file() -> Result<()> {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile()?;
        writeln!(file, "[[city_wide]]")?;
        writeln!(file, "city = \"新竹市\"")?;
        writeln!(file, "districts = []")?;

        assert!(PipelineConfig::from_file(file.path()).is_err());
        Ok(())
    }
}
