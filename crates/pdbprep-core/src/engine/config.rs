use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Invalid chain id '{0}': expected a single ASCII letter or digit")]
    InvalidChainId(char),
    #[error("Invalid residue name '{0}': expected 1 to 4 non-blank ASCII characters")]
    InvalidResidueName(String),
}

/// Settings for one preprocessing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Residue names accepted in addition to the base whitelist.
    pub extra_residues: Vec<String>,
    /// Chain id written over every record after homogenization.
    pub forced_chain: Option<char>,
    /// Log a summary of the forced chain override.
    pub report_chain_override: bool,
    /// Reassign chain ids that collide across inputs in [`process_all`].
    ///
    /// [`process_all`]: crate::workflows::preprocess::Preprocessor::process_all
    pub correct_chain_collisions: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            extra_residues: Vec::new(),
            forced_chain: None,
            report_chain_override: false,
            correct_chain_collisions: true,
        }
    }
}

#[derive(Default)]
pub struct PreprocessConfigBuilder {
    extra_residues: Vec<String>,
    forced_chain: Option<char>,
    report_chain_override: Option<bool>,
    correct_chain_collisions: Option<bool>,
}

impl PreprocessConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extra_residues<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_residues.extend(names.into_iter().map(Into::into));
        self
    }
    pub fn extra_residue(mut self, name: impl Into<String>) -> Self {
        self.extra_residues.push(name.into());
        self
    }
    pub fn forced_chain(mut self, chain: Option<char>) -> Self {
        self.forced_chain = chain;
        self
    }
    pub fn report_chain_override(mut self, report: bool) -> Self {
        self.report_chain_override = Some(report);
        self
    }
    pub fn correct_chain_collisions(mut self, enabled: bool) -> Self {
        self.correct_chain_collisions = Some(enabled);
        self
    }

    pub fn build(self) -> Result<PreprocessConfig, ConfigError> {
        if let Some(chain) = self.forced_chain {
            if !chain.is_ascii_alphanumeric() {
                return Err(ConfigError::InvalidChainId(chain));
            }
        }

        let mut extra_residues: Vec<String> = Vec::with_capacity(self.extra_residues.len());
        for name in self.extra_residues {
            let trimmed = name.trim();
            let valid = !trimmed.is_empty()
                && trimmed.len() <= 4
                && trimmed.chars().all(|c| c.is_ascii_graphic());
            if !valid {
                return Err(ConfigError::InvalidResidueName(name));
            }
            if !extra_residues.iter().any(|n| n == trimmed) {
                extra_residues.push(trimmed.to_string());
            }
        }

        let defaults = PreprocessConfig::default();
        Ok(PreprocessConfig {
            extra_residues,
            forced_chain: self.forced_chain,
            report_chain_override: self
                .report_chain_override
                .unwrap_or(defaults.report_chain_override),
            correct_chain_collisions: self
                .correct_chain_collisions
                .unwrap_or(defaults.correct_chain_collisions),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults_match_default_config() {
        let config = PreprocessConfigBuilder::new().build().unwrap();
        assert_eq!(config, PreprocessConfig::default());
        assert!(config.correct_chain_collisions);
    }

    #[test]
    fn builder_trims_and_deduplicates_extra_residues() {
        let config = PreprocessConfigBuilder::new()
            .extra_residues(["LIG", " DA2"])
            .extra_residue("LIG")
            .forced_chain(Some('B'))
            .report_chain_override(true)
            .build()
            .unwrap();
        assert_eq!(config.extra_residues, vec!["LIG", "DA2"]);
        assert_eq!(config.forced_chain, Some('B'));
        assert!(config.report_chain_override);
    }

    #[test]
    fn builder_rejects_invalid_chain_id() {
        let result = PreprocessConfigBuilder::new().forced_chain(Some('-')).build();
        assert_eq!(result, Err(ConfigError::InvalidChainId('-')));
    }

    #[test]
    fn builder_rejects_invalid_residue_names() {
        for name in ["", "TOOLONG", "A B"] {
            let result = PreprocessConfigBuilder::new().extra_residue(name).build();
            assert_eq!(result, Err(ConfigError::InvalidResidueName(name.to_string())));
        }
    }
}
