use super::error::PrepError;
use crate::core::io::record::{Column, LineError, Record, RecordError, RecordKind};
use crate::core::utils::tables::ion_charges;

/// Annotates monoatomic ion records with their formal charge.
///
/// This is a pure mapping: the returned iterator can be cloned and replayed, and
/// yields exactly one item per input line. Non-ion lines pass through unchanged.
pub fn annotate_ions<'a, S: AsRef<str>>(
    lines: &'a [S],
) -> impl Iterator<Item = Result<String, PrepError>> + Clone + 'a {
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            annotate_line(line.as_ref()).map_err(|e| PrepError::from(LineError::at(i)(e)))
        })
}

/// Annotates a single record; see [`annotate_ions`].
///
/// A HETATM record is an ion when the symbol of its atom name (charge suffix
/// removed) equals the symbol of its residue name (trailing charge digit removed)
/// and that symbol has an entry in the ion table. The charge is taken from, in
/// order: the atom-name suffix, the residue-name digit, the element/charge
/// columns, and finally the table's canonical charge. Ions whose charge stays
/// unknown only get their residue name right-justified and a blank element
/// column filled with the symbol.
pub fn annotate_line(line: &str) -> Result<String, RecordError> {
    let mut record = Record::new(line);
    if record.kind() != RecordKind::HetAtom {
        return Ok(record.into_line());
    }

    let atom = parse_atom_name(record.atom_name()?);
    let residue = parse_residue_name(record.res_name()?);
    let (Some(atom), Some(residue)) = (atom, residue) else {
        return Ok(record.into_line());
    };
    if atom.symbol != residue.symbol {
        return Ok(record.into_line());
    }
    let Some(permitted) = ion_charges(atom.symbol) else {
        return Ok(record.into_line());
    };

    let charge = atom
        .charge
        .or_else(|| residue.digit.map(|n| permitted.sign() * n))
        .or_else(|| parse_charge(record.charge()))
        .or_else(|| permitted.canonical());
    let rename_atom = atom.charge.is_none();
    let symbol = atom.symbol.to_string();

    match charge {
        Some(q) => write_charged(&mut record, &symbol, q, rename_atom)?,
        None => write_uncharged(&mut record, &symbol)?,
    }
    Ok(record.into_line())
}

fn write_charged(
    record: &mut Record,
    symbol: &str,
    charge: i8,
    rename_atom: bool,
) -> Result<(), RecordError> {
    let sign = if charge < 0 { '-' } else { '+' };
    let magnitude = charge.unsigned_abs();
    if rename_atom {
        record.write_left(Column::AtomName, &format!("{:>2}{}{}", symbol, sign, magnitude))?;
    }
    record.write_right(Column::ResName, &format!("{}{}", symbol, magnitude))?;
    record.write_right(Column::Element, symbol)?;
    record.write_left(Column::Charge, &format!("{}{}", sign, magnitude))
}

fn write_uncharged(record: &mut Record, symbol: &str) -> Result<(), RecordError> {
    record.write_right(Column::ResName, symbol)?;
    if record.element().is_empty() {
        record.write_right(Column::Element, symbol)?;
        record.write_left(Column::Charge, "")?;
    }
    Ok(())
}

struct AtomName<'a> {
    symbol: &'a str,
    charge: Option<i8>,
}

struct ResidueName<'a> {
    symbol: &'a str,
    digit: Option<i8>,
}

/// `ZN+2` -> (`ZN`, +2); `K` -> (`K`, none). Anything after the symbol that is not
/// a charge disqualifies the name.
fn parse_atom_name(name: &str) -> Option<AtomName<'_>> {
    let split = name
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(name.len());
    let (symbol, suffix) = name.split_at(split);
    if symbol.is_empty() {
        return None;
    }
    let charge = if suffix.is_empty() {
        None
    } else {
        Some(parse_charge(suffix)?)
    };
    Some(AtomName { symbol, charge })
}

/// `ZN2` -> (`ZN`, 2); `NI` -> (`NI`, none). The suffix must be a positive
/// unsigned number, so `ZN0` and `K-1` are not ion residue names.
fn parse_residue_name(name: &str) -> Option<ResidueName<'_>> {
    let split = name
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(name.len());
    let (symbol, suffix) = name.split_at(split);
    if symbol.is_empty() {
        return None;
    }
    let digit = match suffix {
        "" => None,
        digits if digits.chars().all(|c| c.is_ascii_digit()) => {
            Some(digits.parse::<i8>().ok().filter(|&n| n > 0)?)
        }
        _ => return None,
    };
    Some(ResidueName { symbol, digit })
}

/// Accepts `+2`, `2+`, `-1`, `1-`, `+` and `-`.
fn parse_charge(text: &str) -> Option<i8> {
    let text = text.trim();
    let (sign, digits) = if let Some(rest) = text.strip_prefix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_prefix('-') {
        (-1, rest)
    } else if let Some(rest) = text.strip_suffix('+') {
        (1, rest)
    } else if let Some(rest) = text.strip_suffix('-') {
        (-1, rest)
    } else {
        return None;
    };
    let magnitude = match digits {
        "" => 1,
        digits if digits.chars().all(|c| c.is_ascii_digit()) => digits.parse::<i8>().ok()?,
        _ => return None,
    };
    (magnitude > 0).then_some(sign * magnitude)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(line: &str) -> String {
        annotate_line(line).unwrap()
    }

    #[test]
    fn charged_atom_name_fills_the_element_column() {
        assert_eq!(
            annotate("HETATM 3833 ZN+2 ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN  "),
            "HETATM 3833 ZN+2 ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN+2"
        );
    }

    #[test]
    fn residue_digit_charges_the_atom_name() {
        assert_eq!(
            annotate("HETATM 3833 ZN   ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN  "),
            "HETATM 3833 ZN+2 ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN+2"
        );
        assert_eq!(
            annotate("HETATM 3834  K    K1 A  42      21.391  -8.794  33.944  1.00 24.37              "),
            "HETATM 3834  K+1  K1 A  42      21.391  -8.794  33.944  1.00 24.37           K+1"
        );
    }

    #[test]
    fn charged_atom_name_renames_the_residue() {
        assert_eq!(
            annotate("HETATM 3833 ZN+2 ZN  A  42      21.391  -8.794  33.944  1.00 24.37          ZN  "),
            "HETATM 3833 ZN+2 ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN+2"
        );
        assert_eq!(
            annotate("HETATM 3834  F-1   F A  42      21.391  -8.794  33.944  1.00 24.37              "),
            "HETATM 3834  F-1  F1 A  42      21.391  -8.794  33.944  1.00 24.37           F-1"
        );
    }

    #[test]
    fn element_column_charge_is_used_when_names_carry_none() {
        assert_eq!(
            annotate("HETATM 3833 ZN    ZN A  42      21.391  -8.794  33.944  1.00 24.37          ZN+2"),
            "HETATM 3833 ZN+2 ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN+2"
        );
    }

    #[test]
    fn unambiguous_table_charge_is_applied() {
        assert_eq!(
            annotate("HETATM 3833 ZN   ZN  A  42      21.391  -8.794  33.944  1.00 24.37          ZN  "),
            "HETATM 3833 ZN+2 ZN2 A  42      21.391  -8.794  33.944  1.00 24.37          ZN+2"
        );
    }

    #[test]
    fn ambiguous_ion_only_gets_its_element() {
        assert_eq!(
            annotate("HETATM 3835 NI    NI A  42      21.391  -8.794  33.944  1.00 24.37              "),
            "HETATM 3835 NI    NI A  42      21.391  -8.794  33.944  1.00 24.37          NI  "
        );
    }

    #[test]
    fn non_ions_pass_through() {
        for line in [
            "ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00           C  ",
            "HETATM    1  C1  LIG A   1      37.080  43.455  -3.421  1.00  0.00           C  ",
            "HETATM    1  O   HOH W   1      37.080  43.455  -3.421  1.00  0.00           O  ",
            "HETATM    1 ZN1  ZN  A   1      37.080  43.455  -3.421  1.00  0.00          ZN  ",
            "TER",
        ] {
            assert_eq!(annotate(line), line);
        }
    }

    #[test]
    fn zero_or_signed_residue_suffix_is_not_an_ion() {
        for line in [
            "HETATM 3833 ZN   ZN0 A  42      21.391  -8.794  33.944  1.00 24.37          ZN  ",
            "HETATM 3833  K   K-1 A  42      21.391  -8.794  33.944  1.00 24.37              ",
            "HETATM 3833  K   K+1 A  42      21.391  -8.794  33.944  1.00 24.37              ",
        ] {
            assert_eq!(annotate(line), line);
        }
    }

    #[test]
    fn annotation_preserves_line_length() {
        let line = "HETATM 3834  K    K1 A  42      21.391  -8.794  33.944  1.00 24.37              ";
        assert_eq!(annotate(line).len(), line.len());
    }

    #[test]
    fn annotate_ions_is_restartable() {
        let lines = vec![
            "HETATM 3834  K    K1 A  42      21.391  -8.794  33.944  1.00 24.37              "
                .to_string(),
            "END".to_string(),
        ];
        let iter = annotate_ions(&lines);
        let first: Vec<String> = iter.clone().collect::<Result<_, _>>().unwrap();
        let second: Vec<String> = iter.collect::<Result<_, _>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert!(first[0].ends_with(" K+1"));
    }

    #[test]
    fn short_hetatm_record_is_malformed() {
        let lines = ["END", "HETATM 3834  K"];
        let results: Vec<_> = annotate_ions(&lines).collect();
        assert!(results[0].is_ok());
        assert!(matches!(
            results[1],
            Err(PrepError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn charges_parse_in_both_notations() {
        assert_eq!(parse_charge("+2"), Some(2));
        assert_eq!(parse_charge("2+"), Some(2));
        assert_eq!(parse_charge("1-"), Some(-1));
        assert_eq!(parse_charge("-"), Some(-1));
        assert_eq!(parse_charge(""), None);
        assert_eq!(parse_charge("2"), None);
        assert_eq!(parse_charge("+0"), None);
    }
}
