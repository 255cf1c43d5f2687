use crate::core::io::record::{LineError, Record, RecordError, RecordKind};

/// Applies `edit` to every line whose kind satisfies `select` and returns the
/// rewritten sequence. Other lines are copied unchanged.
///
/// Errors carry the 1-based line number within `lines`.
pub fn rewrite_records<S, P, F>(lines: &[S], select: P, mut edit: F) -> Result<Vec<String>, LineError>
where
    S: AsRef<str>,
    P: Fn(RecordKind) -> bool,
    F: FnMut(&mut Record) -> Result<(), RecordError>,
{
    lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let mut record = Record::new(line.as_ref());
            if select(record.kind()) {
                edit(&mut record).map_err(LineError::at(i))?;
            }
            Ok(record.into_line())
        })
        .collect()
}

/// Selects ATOM and HETATM records.
pub fn coordinates(kind: RecordKind) -> bool {
    kind.is_coordinate()
}

/// Selects ATOM, HETATM, and TER records.
pub fn coordinates_and_terminators(kind: RecordKind) -> bool {
    kind.is_coordinate() || kind == RecordKind::Ter
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::record::Column;

    #[test]
    fn only_selected_records_are_edited() {
        let lines = ["ATOM      1  CA  ALA     1", "REMARK    1", "TER"];
        let out = rewrite_records(&lines, coordinates_and_terminators, |r| {
            r.write_char(Column::ChainId, 'Z')
        })
        .unwrap();
        assert_eq!(out[0], "ATOM      1  CA  ALA Z   1");
        assert_eq!(out[1], "REMARK    1");
        assert_eq!(&out[2][21..22], "Z");
    }

    #[test]
    fn edit_errors_report_the_line_number() {
        let lines = ["TER", "ATOM      1  CA  ALA A   1"];
        let err = rewrite_records(&lines, coordinates, |r| {
            r.write_left(Column::SegId, "TOOLONG")
        })
        .unwrap_err();
        assert_eq!(err.line, 2);
    }
}
