use super::error::PrepError;
use super::utils::rewrite::{coordinates, rewrite_records};
use crate::core::io::record::Column;
use crate::core::models::unit::{chain_ids_in_order, segids_in_order};
use tracing::debug;

/// Identifier given to units that carry neither a chain id nor a segment id.
pub const DEFAULT_CHAIN: char = 'A';

/// Fills in missing chain and segment ids so that both agree on every record.
///
/// Per ATOM/HETATM record:
/// - a chain id is authoritative; a differing or missing segment id is overwritten
///   with it,
/// - without a chain id, the first character of the segment id becomes the chain
///   id and the segment id is kept,
/// - with neither, the unit's identifier is written to both columns. The unit's
///   identifier is its first chain id, else the first segment id's initial, else
///   [`DEFAULT_CHAIN`].
pub fn resolve_chain_segids<S: AsRef<str>>(lines: &[S]) -> Result<Vec<String>, PrepError> {
    let chains = chain_ids_in_order(lines)?;
    let segids = segids_in_order(lines);
    let fallback = chains
        .first()
        .copied()
        .or_else(|| segids.first().and_then(|s| s.chars().next()))
        .unwrap_or(DEFAULT_CHAIN);
    debug!(
        chains = chains.len(),
        segids = segids.len(),
        fallback = %fallback,
        "Resolving chain and segment ids."
    );

    let out = rewrite_records(lines, coordinates, |record| {
        let chain = record.chain_id()?;
        let segid_initial = record.seg_id().chars().next();
        match (chain, segid_initial) {
            (Some(chain), _) => {
                let chain = chain.to_string();
                if record.seg_id() != chain {
                    record.write_left(Column::SegId, &chain)?;
                }
            }
            (None, Some(initial)) => record.write_char(Column::ChainId, initial)?,
            (None, None) => {
                record.write_char(Column::ChainId, fallback)?;
                record.write_char(Column::SegId, fallback)?;
            }
        }
        Ok(())
    })?;
    Ok(out)
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

    fn resolve(lines: &[String]) -> Vec<String> {
        resolve_chain_segids(lines).unwrap()
    }

    #[test]
    fn neither_chain_nor_segid_defaults_both_to_a() {
        let lines = vec![atom(' ', ""), atom(' ', "")];
        assert_eq!(resolve(&lines), vec![atom('A', "A"), atom('A', "A")]);
    }

    #[test]
    fn chain_without_segid_is_copied_into_segid() {
        assert_eq!(resolve(&[atom('B', "")]), vec![atom('B', "B")]);
        assert_eq!(resolve(&[atom('A', "")]), vec![atom('A', "A")]);
    }

    #[test]
    fn segid_without_chain_is_copied_into_chain() {
        assert_eq!(resolve(&[atom(' ', "A")]), vec![atom('A', "A")]);
        assert_eq!(resolve(&[atom(' ', "B1")]), vec![atom('B', "B1")]);
    }

    #[test]
    fn chain_wins_over_a_conflicting_segid() {
        assert_eq!(resolve(&[atom('B', "A")]), vec![atom('B', "B")]);
    }

    #[test]
    fn blank_records_in_a_mixed_unit_take_the_unit_chain() {
        let lines = vec![atom('C', ""), atom(' ', "")];
        assert_eq!(resolve(&lines), vec![atom('C', "C"), atom('C', "C")]);
    }

    #[test]
    fn consistent_records_are_untouched() {
        let lines = vec![atom('A', "A"), "TER".to_string()];
        assert_eq!(resolve(&lines), lines);
    }

    #[test]
    fn short_records_are_padded_before_writing_the_segid() {
        let short = "ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00";
        let out = resolve(&[short.to_string()]);
        assert_eq!(out[0].len(), crate::core::io::record::RECORD_WIDTH);
        assert_eq!(&out[0][..short.len()], short);
        assert_eq!(&out[0][72..76], "B   ");
    }
}
