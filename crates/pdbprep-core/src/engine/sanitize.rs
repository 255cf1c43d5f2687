use super::error::PrepError;
use crate::core::io::record::{LineError, Record, RecordError, RecordKind};
use crate::core::topology::whitelist::ResidueWhitelist;
use crate::core::utils::tables::{apply_renames, contains_disallowed_tag};
use std::collections::HashSet;
use tracing::{debug, warn};

const END_RECORD: &str = "END";

/// Filters and renames raw lines against a residue whitelist.
///
/// The whitelist is borrowed and never modified; additional residue names are an
/// explicit, per-sanitizer extension.
#[derive(Debug, Clone)]
pub struct Sanitizer<'w> {
    whitelist: &'w ResidueWhitelist,
    extra: HashSet<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Dropped {
    blank: usize,
    disallowed: usize,
    end: usize,
    not_whitelisted: usize,
}

impl Default for Sanitizer<'static> {
    fn default() -> Self {
        Self::new(ResidueWhitelist::base())
    }
}

impl<'w> Sanitizer<'w> {
    pub fn new(whitelist: &'w ResidueWhitelist) -> Self {
        Self {
            whitelist,
            extra: HashSet::new(),
        }
    }

    /// Accepts `names` in addition to the whitelist for this sanitizer only.
    /// Blank names are ignored.
    pub fn with_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            let name = name.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            if self.whitelist.contains(name) {
                warn!("Extra residue '{}' is already whitelisted", name);
                continue;
            }
            self.extra.insert(name.to_string());
        }
        self
    }

    pub fn accepts(&self, residue: &str) -> bool {
        !residue.is_empty() && (self.whitelist.contains(residue) || self.extra.contains(residue))
    }

    /// Removes disallowed and blank lines, applies the rename table, drops
    /// coordinate records of unknown residues, and terminates a non-empty result
    /// with a single `END`.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::MalformedRecord`] for a coordinate record too short to
    /// hold its residue name.
    pub fn sanitize<I, S>(&self, lines: I) -> Result<Vec<String>, PrepError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dropped = Dropped::default();
        let mut output = Vec::new();

        for (i, line) in lines.into_iter().enumerate() {
            let line = line.as_ref();
            if line.trim().is_empty() {
                dropped.blank += 1;
                continue;
            }
            if contains_disallowed_tag(line) {
                dropped.disallowed += 1;
                continue;
            }
            let line = apply_renames(line);
            let record = Record::new(line.as_ref());
            match record.kind() {
                RecordKind::End => {
                    dropped.end += 1;
                    continue;
                }
                kind if kind.is_coordinate() => {
                    if !self.is_whitelisted(&record).map_err(LineError::at(i))? {
                        dropped.not_whitelisted += 1;
                        continue;
                    }
                }
                _ => {}
            }
            output.push(record.into_line());
        }

        if !output.is_empty() {
            output.push(END_RECORD.to_string());
        }
        debug!(
            kept = output.len(),
            blank = dropped.blank,
            disallowed = dropped.disallowed,
            end = dropped.end,
            not_whitelisted = dropped.not_whitelisted,
            "Sanitized input lines."
        );
        Ok(output)
    }

    fn is_whitelisted(&self, record: &Record) -> Result<bool, RecordError> {
        if self.accepts(record.res_name()?) {
            return Ok(true);
        }
        let extended = record.res_name_extended();
        Ok(!extended.is_empty() && self.accepts(extended))
    }
}

/// Sanitizes `lines` against the bundled whitelist widened by `extra`.
pub fn sanitize<I, S>(lines: I, extra: &[String]) -> Result<Vec<String>, PrepError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    Sanitizer::default().with_extra(extra).sanitize(lines)
}
