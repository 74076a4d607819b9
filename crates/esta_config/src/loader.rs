//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{BinPolicy, CondFunc, EstaConfig};
use std::path::Path;

/// Loads and validates an `esta.toml` configuration from a project directory.
///
/// Reads `<project_dir>/esta.toml`, parses it, and validates cross-field
/// consistency that `serde` alone cannot express.
pub fn load_config(project_dir: &Path) -> Result<EstaConfig, ConfigError> {
    let config_path = project_dir.join("esta.toml");
    let content = std::fs::read_to_string(&config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates an `esta.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<EstaConfig, ConfigError> {
    let config: EstaConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates cross-field consistency of a parsed configuration.
fn validate_config(config: &EstaConfig) -> Result<(), ConfigError> {
    if let BinPolicy::StaSlack {
        threshold_frac,
        w_coarse,
        w_fine,
    } = config.bin_policy
    {
        if !(0.0..=1.0).contains(&threshold_frac) {
            return Err(ConfigError::ValidationError(
                "bin_policy.threshold_frac must be in [0, 1]".to_string(),
            ));
        }
        if w_fine > w_coarse {
            return Err(ConfigError::ValidationError(
                "bin_policy.w_fine must be <= w_coarse".to_string(),
            ));
        }
    }
    if let CondFunc::Grouped { k, .. } = config.cond_func {
        if k == 0 {
            return Err(ConfigError::ValidationError(
                "cond_func.k must be >= 1".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{PartitionScheme, ReorderMethod};

    #[test]
    fn parse_minimal_config_is_defaults() {
        let config = load_config_from_str("").unwrap();
        assert_eq!(config, EstaConfig::default());
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
max_permutations = 65536
xfunc_cache_capacity = 2048
infer_last_max_probability = false
enable_transition_filter = true
reorder_method = "window_two"

[bin_policy]
kind = "sta_slack"
threshold_frac = 0.75
w_coarse = 2.0
w_fine = 0.25

[cond_func]
kind = "grouped"
scheme = "binary"
k = 4
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.max_permutations, 65_536);
        assert_eq!(config.xfunc_cache_capacity, 2048);
        assert!(config.enable_transition_filter);
        assert_eq!(config.reorder_method, ReorderMethod::WindowTwo);
        assert_eq!(
            config.cond_func,
            CondFunc::Grouped {
                scheme: PartitionScheme::Binary,
                k: 4,
            }
        );
    }

    #[test]
    fn sta_slack_threshold_out_of_range_errors() {
        let toml = r#"
[bin_policy]
kind = "sta_slack"
threshold_frac = 1.5
w_coarse = 1.0
w_fine = 0.1
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn sta_slack_fine_wider_than_coarse_errors() {
        let toml = r#"
[bin_policy]
kind = "sta_slack"
threshold_frac = 0.5
w_coarse = 0.1
w_fine = 1.0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn grouped_cond_func_zero_k_errors() {
        let toml = r#"
[cond_func]
kind = "grouped"
scheme = "round_robin"
k = 0
"#;
        let err = load_config_from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn invalid_toml_errors() {
        let err = load_config_from_str("this is not valid toml {{{}}}").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn io_error_from_nonexistent_dir() {
        let err = load_config(Path::new("/nonexistent/dir")).unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
