use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

static BUNDLED_TOPOLOGY: &str = include_str!("../../../data/residues.top");

static BASE_WHITELIST: Lazy<ResidueWhitelist> =
    Lazy::new(|| ResidueWhitelist::from_topology_lines(BUNDLED_TOPOLOGY.lines()));

/// Residue names accepted by downstream processing.
///
/// The set is read from the residue declarations of a reference topology. It is
/// never mutated after construction; callers widen it per call by passing extra
/// residue names alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResidueWhitelist {
    names: Vec<String>,
    index: HashSet<String>,
}

impl ResidueWhitelist {
    /// The whitelist built from the topology bundled with the crate.
    pub fn base() -> &'static ResidueWhitelist {
        &BASE_WHITELIST
    }

    pub fn load(path: &Path) -> Result<Self, WhitelistError> {
        let content = std::fs::read_to_string(path).map_err(|e| WhitelistError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let whitelist = Self::from_topology_lines(content.lines());
        debug!(
            "Loaded {} residue name(s) from topology {:?}",
            whitelist.len(),
            path
        );
        Ok(whitelist)
    }

    /// Collects the second token of every line whose first four characters,
    /// case-folded, contain `resi`.
    pub fn from_topology_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut whitelist = Self::default();
        for line in lines {
            let line = line.as_ref();
            let head: String = line.chars().take(4).collect();
            if !head.to_lowercase().contains("resi") {
                continue;
            }
            if let Some(name) = line.split_whitespace().nth(1) {
                whitelist.insert(name);
            }
        }
        whitelist
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains(name)
    }

    /// Residue names in order of first declaration.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    fn insert(&mut self, name: &str) {
        if self.index.insert(name.to_string()) {
            self.names.push(name.to_string());
        }
    }
}

/// Reads the residue names declared in a custom topology, in declaration order.
pub fn read_additional_residues(path: &Path) -> Result<Vec<String>, WhitelistError> {
    Ok(ResidueWhitelist::load(path)?.names)
}

#[derive(Debug, Error)]
pub enum WhitelistError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const CUSTOM_TOPOLOGY: &str = "\
! custom residues
RESIdue DA2  {  }
 GROUP
  ATOM C1 TYPE=C END
END
residue DE3 { }
Resi DI
RESI DO
RESI DU1
RESI DI
PRESidue PATCH
";

    #[test]
    fn from_topology_lines_reads_residue_declarations_in_order() {
        let whitelist = ResidueWhitelist::from_topology_lines(CUSTOM_TOPOLOGY.lines());
        assert_eq!(whitelist.names(), &["DA2", "DE3", "DI", "DO", "DU1"]);
        assert!(whitelist.contains("DO"));
        assert!(!whitelist.contains("PATCH"));
        assert!(!whitelist.contains("C1"));
    }

    #[test]
    fn read_additional_residues_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.top");
        std::fs::write(&path, CUSTOM_TOPOLOGY).unwrap();
        let names = read_additional_residues(&path).unwrap();
        assert_eq!(names, vec!["DA2", "DE3", "DI", "DO", "DU1"]);
    }

    #[test]
    fn load_reports_missing_file_path() {
        let result = ResidueWhitelist::load(Path::new("/nonexistent/custom.top"));
        assert!(matches!(
            result,
            Err(WhitelistError::Io { path, .. }) if path == "/nonexistent/custom.top"
        ));
    }

    #[test]
    fn base_whitelist_covers_standard_residues_and_ions() {
        let base = ResidueWhitelist::base();
        for name in ["ALA", "ARG", "GLU", "HIS", "TIP3", "ZN", "ZN2", "K1", "NI", "F1", "DA"] {
            assert!(base.contains(name), "missing {name}");
        }
        assert!(!base.contains("HSD"));
        assert!(!base.contains("END"));
    }
}
