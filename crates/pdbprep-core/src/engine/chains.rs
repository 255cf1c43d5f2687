use super::error::PrepError;
use super::utils::rewrite::{coordinates, coordinates_and_terminators, rewrite_records};
use crate::core::io::record::{Column, RecordKind};
use crate::core::models::unit::chain_ids_in_order;
use tracing::{debug, info, warn};

/// Collapses every chain id of a unit onto the first one seen.
///
/// ATOM/HETATM records receive the canonical id in both the chain-id and the
/// segment-id column. When more than one chain id was present, TER records get
/// the canonical id in their chain-id column too. A unit without any chain id is
/// returned unchanged.
pub fn homogenize_chains<S: AsRef<str>>(lines: &[S]) -> Result<Vec<String>, PrepError> {
    let chains = chain_ids_in_order(lines)?;
    let Some(&canonical) = chains.first() else {
        return Ok(lines.iter().map(|l| l.as_ref().to_string()).collect());
    };
    if chains.len() > 1 {
        debug!(
            canonical = %canonical,
            found = ?chains,
            "Collapsing chain ids onto the first one seen."
        );
    }

    let segid = canonical.to_string();
    let rewrite_terminators = chains.len() > 1;
    let out = rewrite_records(lines, coordinates_and_terminators, |record| {
        match record.kind() {
            RecordKind::Ter if rewrite_terminators => {
                record.write_char(Column::ChainId, canonical)?
            }
            RecordKind::Ter => {}
            _ => {
                record.write_char(Column::ChainId, canonical)?;
                record.write_left(Column::SegId, &segid)?;
            }
        }
        Ok(())
    })?;
    Ok(out)
}

/// Writes `chain` into the chain-id column of every ATOM, HETATM, and TER record.
///
/// The segment id is left alone. With `report`, the number of changed records is
/// logged at INFO.
pub fn override_chain<S: AsRef<str>>(
    lines: &[S],
    chain: char,
    report: bool,
) -> Result<Vec<String>, PrepError> {
    let out = rewrite_records(lines, coordinates_and_terminators, |record| {
        record.write_char(Column::ChainId, chain)
    })?;

    let changed = lines
        .iter()
        .zip(&out)
        .filter(|(before, after)| before.as_ref() != after.as_str())
        .count();
    if report {
        info!(
            chain = %chain,
            changed,
            total = lines.len(),
            "Chain override would rewrite {} line(s).",
            changed
        );
    } else {
        debug!(chain = %chain, changed, "Forced chain id applied.");
    }
    Ok(out)
}

/// Rewrites both the chain-id and segment-id columns of every ATOM/HETATM record,
/// and the chain-id column of TER records.
pub fn assign_chain<S: AsRef<str>>(lines: &[S], chain: char) -> Result<Vec<String>, PrepError> {
    let segid = chain.to_string();
    let out = rewrite_records(lines, coordinates_and_terminators, |record| {
        record.write_char(Column::ChainId, chain)?;
        if coordinates(record.kind()) {
            record.write_left(Column::SegId, &segid)?;
        }
        Ok(())
    })?;
    Ok(out)
}

/// Decides new chain ids for structures whose chain id is already used by an
/// earlier structure.
///
/// `chains[i]` is the chain id of structure `i`. The result holds `Some(new)`
/// for every structure that must be reassigned. Replacement ids are the letters
/// `A..=Z` that no structure uses, handed out in order.
pub fn plan_chain_reassignments(chains: &[Option<char>]) -> Vec<Option<char>> {
    let mut free = ('A'..='Z').filter(|c| !chains.contains(&Some(*c)));
    let mut taken: Vec<char> = Vec::with_capacity(chains.len());

    chains
        .iter()
        .enumerate()
        .map(|(i, chain)| {
            let chain = (*chain)?;
            if !taken.contains(&chain) {
                taken.push(chain);
                return None;
            }
            let replacement = free.next();
            match replacement {
                Some(new) => {
                    debug!(structure = i, from = %chain, to = %new, "Reassigning duplicate chain id.")
                }
                None => {
                    warn!(structure = i, chain = %chain, "No free chain id left; keeping duplicate.")
                }
            }
            replacement
        })
        .collect()
}

/// Gives every structure a chain id no earlier structure uses.
///
/// A structure's chain id is the first non-blank chain id among its records. The
/// first structure using an id keeps it; later ones are rewritten with
/// [`assign_chain`]. Structures without a chain id are left alone.
pub fn correct_equal_chain_segids(
    structures: Vec<Vec<String>>,
) -> Result<Vec<Vec<String>>, PrepError> {
    let chains = structures
        .iter()
        .map(|lines| -> Result<Option<char>, PrepError> {
            Ok(chain_ids_in_order(lines)?.first().copied())
        })
        .collect::<Result<Vec<_>, _>>()?;

    structures
        .into_iter()
        .zip(plan_chain_reassignments(&chains))
        .map(|(lines, new_chain)| match new_chain {
            Some(chain) => assign_chain(&lines, chain),
            None => Ok(lines),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(chain: char, segid: &str) -> String {
        format!(
            "ATOM      3  CA  ARG {}   4      37.080  43.455  -3.421  1.00  0.00      {:<4} C  ",
            chain, segid
        )
    }

    #[test]
    fn homogenize_collapses_chains_onto_first_seen_id() {
        let lines = vec![atom('A', ""), atom('B', ""), "TER".to_string(), atom('C', "")];
        let out = homogenize_chains(&lines).unwrap();
        assert_eq!(out[0], atom('A', "A"));
        assert_eq!(out[1], atom('A', "A"));
        assert_eq!(out[3], atom('A', "A"));
        assert_eq!(out[2].len(), crate::core::io::record::RECORD_WIDTH);
        assert_eq!(out[2].trim_end(), "TER                  A");
    }

    #[test]
    fn homogenize_preserves_line_lengths() {
        let lines = vec![atom('C', "X"), atom('A', "Y")];
        let out = homogenize_chains(&lines).unwrap();
        for (before, after) in lines.iter().zip(&out) {
            assert_eq!(before.len(), after.len());
        }
    }

    #[test]
    fn homogenize_syncs_segid_of_a_single_chain_and_leaves_ter_alone() {
        let lines = vec![atom('B', ""), "TER".to_string(), atom('B', "")];
        let out = homogenize_chains(&lines).unwrap();
        assert_eq!(out, vec![atom('B', "B"), "TER".to_string(), atom('B', "B")]);
    }

    #[test]
    fn homogenize_without_chain_ids_is_a_no_op() {
        let lines = vec![atom(' ', ""), "TER".to_string()];
        assert_eq!(homogenize_chains(&lines).unwrap(), lines);
    }

    #[test]
    fn override_chain_touches_only_the_chain_column() {
        let lines = vec![atom('A', "A")];
        let out = override_chain(&lines, 'B', true).unwrap();
        assert_eq!(out, vec![atom('B', "A")]);
    }

    #[test]
    fn override_chain_writes_terminators() {
        let lines = vec!["TER     100      ARG A   4".to_string()];
        let out = override_chain(&lines, 'Z', false).unwrap();
        assert_eq!(out[0], "TER     100      ARG Z   4");
    }

    #[test]
    fn duplicate_chain_is_reassigned_to_first_free_letter() {
        let structures = vec![vec![atom('B', "")], vec![atom('B', "")]];
        let out = correct_equal_chain_segids(structures).unwrap();
        assert_eq!(out[0], vec![atom('B', "")]);
        assert_eq!(out[1], vec![atom('A', "A")]);
    }

    #[test]
    fn distinct_chains_are_left_unchanged() {
        let structures = vec![vec![atom('A', "")], vec![atom('B', "")]];
        let out = correct_equal_chain_segids(structures.clone()).unwrap();
        assert_eq!(out, structures);
    }

    #[test]
    fn reassignment_skips_letters_used_by_any_structure() {
        let chains = [Some('A'), Some('A'), Some('B'), None, Some('A')];
        assert_eq!(
            plan_chain_reassignments(&chains),
            vec![None, Some('C'), None, None, Some('D')]
        );
    }
}
