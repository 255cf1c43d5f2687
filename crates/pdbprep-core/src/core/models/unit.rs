use crate::core::io::record::{Column, LineError, Record, RecordKind};

/// Distinct chain and segment identifiers found in a set of coordinate records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainSegIds {
    /// First character of every distinct non-blank segment id.
    pub segids: Vec<char>,
    pub chains: Vec<char>,
}

/// Chain ids of the ATOM/HETATM records in order of first appearance.
///
/// A coordinate record too short to hold the chain-id column is an error; a blank
/// chain id is skipped.
pub fn chain_ids_in_order<S: AsRef<str>>(lines: &[S]) -> Result<Vec<char>, LineError> {
    let mut seen = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref();
        if !RecordKind::of(line).is_coordinate() {
            continue;
        }
        if let Some(chain) = Record::new(line).chain_id().map_err(LineError::at(i))? {
            if !seen.contains(&chain) {
                seen.push(chain);
            }
        }
    }
    Ok(seen)
}

/// Trimmed, non-blank segment ids of the ATOM/HETATM records in order of first
/// appearance.
pub fn segids_in_order<S: AsRef<str>>(lines: &[S]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for line in lines.iter().map(AsRef::as_ref) {
        if !RecordKind::of(line).is_coordinate() {
            continue;
        }
        let record = Record::new(line);
        let segid = record.seg_id();
        if !segid.is_empty() && !seen.iter().any(|s| s == segid) {
            seen.push(segid.to_string());
        }
    }
    seen
}

/// Collects the distinct segment-id initials and chain ids of a structure.
///
/// Short records simply contribute nothing. With `sort` both lists are sorted,
/// otherwise they keep first-appearance order.
pub fn identify_chainseg<S: AsRef<str>>(lines: &[S], sort: bool) -> ChainSegIds {
    let mut ids = ChainSegIds::default();
    for line in lines.iter().map(AsRef::as_ref) {
        if !RecordKind::of(line).is_coordinate() {
            continue;
        }
        let record = Record::new(line);
        if let Some(initial) = record.seg_id().chars().next() {
            push_unique(&mut ids.segids, initial);
        }
        if let Some(chain) = record.trimmed(Column::ChainId).chars().next() {
            push_unique(&mut ids.chains, chain);
        }
    }
    if sort {
        ids.segids.sort_unstable();
        ids.chains.sort_unstable();
    }
    ids
}

fn push_unique(values: &mut Vec<char>, value: char) {
    if !values.contains(&value) {
        values.push(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINES: &[&str] = &[
        "ATOM      1  N   ARG C   4      37.080  43.455  -3.421  1.00  0.00      C    N",
        "ATOM      2  CA  ARG C   4      37.080  43.455  -3.421  1.00  0.00      C    C",
        "TER",
        "ATOM      3  N   GLY A   5      37.080  43.455  -3.421  1.00  0.00      A1   N",
        "HETATM    4 ZN    ZN B   6      37.080  43.455  -3.421  1.00  0.00          ZN",
    ];

    #[test]
    fn chain_ids_keep_first_appearance_order() {
        assert_eq!(chain_ids_in_order(LINES).unwrap(), vec!['C', 'A', 'B']);
    }

    #[test]
    fn chain_ids_skip_blank_and_reject_short_records() {
        let blank = ["ATOM      1  N   ARG     4      37.080  43.455  -3.421"];
        assert!(chain_ids_in_order(&blank).unwrap().is_empty());

        let short = ["TER", "ATOM      1  N   ARG"];
        let err = chain_ids_in_order(&short).unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn segids_are_trimmed_and_distinct() {
        assert_eq!(segids_in_order(LINES), vec!["C", "A1"]);
    }

    #[test]
    fn identify_chainseg_sorts_on_request() {
        let sorted = identify_chainseg(LINES, true);
        assert_eq!(sorted.segids, vec!['A', 'C']);
        assert_eq!(sorted.chains, vec!['A', 'B', 'C']);

        let unsorted = identify_chainseg(LINES, false);
        assert_eq!(unsorted.segids, vec!['C', 'A']);
        assert_eq!(unsorted.chains, vec!['C', 'A', 'B']);
    }

    #[test]
    fn identify_chainseg_tolerates_short_records() {
        let ids = identify_chainseg(&["ATOM      1  N"], true);
        assert_eq!(ids, ChainSegIds::default());
    }
}
