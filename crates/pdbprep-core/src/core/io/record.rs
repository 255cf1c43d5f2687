use std::fmt;
use std::ops::Range;
use thiserror::Error;

/// Width of a complete coordinate record, including the element and charge columns.
pub const RECORD_WIDTH: usize = 80;

/// Named column ranges of a fixed-column coordinate record (0-based, half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    RecordType,
    Serial,
    AtomName,
    AltLoc,
    ResName,
    ChainId,
    ResSeq,
    ICode,
    X,
    Y,
    Z,
    Occupancy,
    TempFactor,
    SegId,
    Element,
    Charge,
}

impl Column {
    pub const fn range(self) -> Range<usize> {
        match self {
            Column::RecordType => 0..6,
            Column::Serial => 6..11,
            Column::AtomName => 12..16,
            Column::AltLoc => 16..17,
            Column::ResName => 17..20,
            Column::ChainId => 21..22,
            Column::ResSeq => 22..26,
            Column::ICode => 26..27,
            Column::X => 30..38,
            Column::Y => 38..46,
            Column::Z => 46..54,
            Column::Occupancy => 54..60,
            Column::TempFactor => 60..66,
            Column::SegId => 72..76,
            Column::Element => 76..78,
            Column::Charge => 78..80,
        }
    }

    pub const fn width(self) -> usize {
        let range = self.range();
        range.end - range.start
    }

    fn label(self) -> &'static str {
        match self {
            Column::RecordType => "record type",
            Column::Serial => "serial",
            Column::AtomName => "atom name",
            Column::AltLoc => "alternate location",
            Column::ResName => "residue name",
            Column::ChainId => "chain id",
            Column::ResSeq => "residue sequence",
            Column::ICode => "insertion code",
            Column::X => "x coordinate",
            Column::Y => "y coordinate",
            Column::Z => "z coordinate",
            Column::Occupancy => "occupancy",
            Column::TempFactor => "temperature factor",
            Column::SegId => "segment id",
            Column::Element => "element",
            Column::Charge => "charge",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.range();
        write!(f, "{} (columns {}-{})", self.label(), range.start + 1, range.end)
    }
}

/// The record kinds the normalizer understands; everything else is `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Atom,
    HetAtom,
    Model,
    EndModel,
    Ter,
    End,
    Other,
}

impl RecordKind {
    pub fn of(line: &str) -> Self {
        let tag = line.get(..line.len().min(6)).unwrap_or("").trim_end();
        match tag {
            "ATOM" => RecordKind::Atom,
            "HETATM" => RecordKind::HetAtom,
            "MODEL" => RecordKind::Model,
            "ENDMDL" => RecordKind::EndModel,
            "TER" => RecordKind::Ter,
            "END" => RecordKind::End,
            _ => RecordKind::Other,
        }
    }

    /// `true` for the two record kinds that carry atomic coordinates.
    pub fn is_coordinate(self) -> bool {
        matches!(self, RecordKind::Atom | RecordKind::HetAtom)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Record is {len} characters long, too short to hold the {column}")]
    TooShort { column: Column, len: usize },
    #[error("Value '{value}' does not fit the {column}")]
    FieldOverflow { column: Column, value: String },
    #[error("Invalid number '{value}' in the {column}")]
    InvalidNumber { column: Column, value: String },
    #[error("Non-ASCII text in the {column}")]
    NotAscii { column: Column },
    #[error("Coordinate record lies outside every MODEL/ENDMDL block")]
    OutsideModel,
}

/// A [`RecordError`] tied to the 1-based line it occurred on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("line {line}: {source}")]
pub struct LineError {
    pub line: usize,
    pub source: RecordError,
}

impl LineError {
    /// Builds a mapper for `Result::map_err` from a 0-based line index.
    pub fn at(index: usize) -> impl Fn(RecordError) -> LineError {
        move |source| LineError {
            line: index + 1,
            source,
        }
    }
}

/// One record line with column-addressed access.
///
/// Reads borrow from the underlying buffer. Writes overwrite a column in place, so
/// the line length never changes, except that a line shorter than the written
/// column is first padded with blanks to [`RECORD_WIDTH`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    line: String,
    kind: RecordKind,
}

impl Record {
    pub fn new(line: impl Into<String>) -> Self {
        let line = line.into();
        let kind = RecordKind::of(&line);
        Self { line, kind }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.line
    }

    pub fn into_line(self) -> String {
        self.line
    }

    pub fn len(&self) -> usize {
        self.line.len()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Raw text of an optional column; truncated or empty if the line ends early.
    pub fn field(&self, column: Column) -> &str {
        let range = column.range();
        let end = range.end.min(self.line.len());
        if range.start >= end {
            return "";
        }
        self.line.get(range.start..end).unwrap_or("")
    }

    pub fn trimmed(&self, column: Column) -> &str {
        self.field(column).trim()
    }

    /// Raw text of a column the caller cannot do without.
    pub fn required(&self, column: Column) -> Result<&str, RecordError> {
        let range = column.range();
        if self.line.len() < range.end {
            return Err(RecordError::TooShort {
                column,
                len: self.line.len(),
            });
        }
        self.line
            .get(range)
            .ok_or(RecordError::NotAscii { column })
    }

    pub fn serial(&self) -> Result<i64, RecordError> {
        self.parse_number(Column::Serial)
    }

    pub fn atom_name(&self) -> Result<&str, RecordError> {
        Ok(self.required(Column::AtomName)?.trim())
    }

    pub fn alt_loc(&self) -> Option<char> {
        self.trimmed(Column::AltLoc).chars().next()
    }

    pub fn res_name(&self) -> Result<&str, RecordError> {
        Ok(self.required(Column::ResName)?.trim())
    }

    /// Residue name read through the chain-id separator column, for four-letter
    /// names such as `TIP3`.
    pub fn res_name_extended(&self) -> &str {
        let start = Column::ResName.range().start;
        let end = Column::ChainId.range().start.min(self.line.len());
        self.line.get(start..end).unwrap_or("").trim()
    }

    pub fn chain_id(&self) -> Result<Option<char>, RecordError> {
        Ok(self.required(Column::ChainId)?.trim().chars().next())
    }

    pub fn res_seq(&self) -> Result<i32, RecordError> {
        self.parse_number(Column::ResSeq)
    }

    pub fn insertion_code(&self) -> Option<char> {
        self.trimmed(Column::ICode).chars().next()
    }

    pub fn coordinates(&self) -> Result<[f64; 3], RecordError> {
        Ok([
            self.parse_number(Column::X)?,
            self.parse_number(Column::Y)?,
            self.parse_number(Column::Z)?,
        ])
    }

    pub fn occupancy(&self) -> Option<f64> {
        self.trimmed(Column::Occupancy).parse().ok()
    }

    pub fn temp_factor(&self) -> Option<f64> {
        self.trimmed(Column::TempFactor).parse().ok()
    }

    pub fn seg_id(&self) -> &str {
        self.trimmed(Column::SegId)
    }

    pub fn element(&self) -> &str {
        self.trimmed(Column::Element)
    }

    pub fn charge(&self) -> &str {
        self.trimmed(Column::Charge)
    }

    /// Overwrites `column` with `value`, which must be exactly the column width.
    pub fn write(&mut self, column: Column, value: &str) -> Result<(), RecordError> {
        let range = column.range();
        if value.len() != column.width() {
            return Err(RecordError::FieldOverflow {
                column,
                value: value.to_string(),
            });
        }
        if !value.is_ascii() {
            return Err(RecordError::NotAscii { column });
        }
        if self.line.len() < range.end {
            let width = RECORD_WIDTH.max(range.end);
            let padding = width - self.line.len();
            self.line.extend(std::iter::repeat_n(' ', padding));
        }
        if !self.line.is_char_boundary(range.start) || !self.line.is_char_boundary(range.end) {
            return Err(RecordError::NotAscii { column });
        }

        let before = self.line.len();
        self.line.replace_range(range, value);
        debug_assert_eq!(before, self.line.len());
        Ok(())
    }

    pub fn write_left(&mut self, column: Column, value: &str) -> Result<(), RecordError> {
        self.write(column, &justify(column, value, Justify::Left)?)
    }

    pub fn write_right(&mut self, column: Column, value: &str) -> Result<(), RecordError> {
        self.write(column, &justify(column, value, Justify::Right)?)
    }

    pub fn write_char(&mut self, column: Column, value: char) -> Result<(), RecordError> {
        let mut buf = [0u8; 4];
        self.write_left(column, value.encode_utf8(&mut buf))
    }

    fn parse_number<T: std::str::FromStr>(&self, column: Column) -> Result<T, RecordError> {
        let text = self.required(column)?.trim();
        text.parse().map_err(|_| RecordError::InvalidNumber {
            column,
            value: text.to_string(),
        })
    }
}

impl From<Record> for String {
    fn from(record: Record) -> Self {
        record.line
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.line)
    }
}

enum Justify {
    Left,
    Right,
}

fn justify(column: Column, value: &str, side: Justify) -> Result<String, RecordError> {
    let width = column.width();
    if value.len() > width {
        return Err(RecordError::FieldOverflow {
            column,
            value: value.to_string(),
        });
    }
    Ok(match side {
        Justify::Left => format!("{:<width$}", value),
        Justify::Right => format!("{:>width$}", value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const ATOM: &str =
        "ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00           C  ";

    #[test]
    fn kind_recognizes_coordinate_records_and_markers() {
        assert_eq!(RecordKind::of(ATOM), RecordKind::Atom);
        assert_eq!(RecordKind::of("HETATM 3833 ZN"), RecordKind::HetAtom);
        assert_eq!(RecordKind::of("MODEL        1"), RecordKind::Model);
        assert_eq!(RecordKind::of("ENDMDL"), RecordKind::EndModel);
        assert_eq!(RecordKind::of("TER"), RecordKind::Ter);
        assert_eq!(RecordKind::of("END"), RecordKind::End);
        assert_eq!(RecordKind::of("REMARK 1"), RecordKind::Other);
        assert_eq!(RecordKind::of(""), RecordKind::Other);
        assert!(RecordKind::Atom.is_coordinate());
        assert!(!RecordKind::Ter.is_coordinate());
    }

    #[test]
    fn accessors_read_every_field() {
        let record = Record::new(ATOM);
        assert_eq!(record.serial().unwrap(), 3);
        assert_eq!(record.atom_name().unwrap(), "CA");
        assert_eq!(record.alt_loc(), None);
        assert_eq!(record.res_name().unwrap(), "ARG");
        assert_eq!(record.chain_id().unwrap(), Some('B'));
        assert_eq!(record.res_seq().unwrap(), 4);
        assert_eq!(record.insertion_code(), None);
        assert_eq!(record.coordinates().unwrap(), [37.080, 43.455, -3.421]);
        assert_eq!(record.occupancy(), Some(1.0));
        assert_eq!(record.temp_factor(), Some(0.0));
        assert_eq!(record.seg_id(), "");
        assert_eq!(record.element(), "C");
        assert_eq!(record.charge(), "");
    }

    #[test]
    fn extended_residue_name_spans_the_separator_column() {
        let record = Record::new("HETATM    7  OH2 TIP3W   8");
        assert_eq!(record.res_name().unwrap(), "TIP");
        assert_eq!(record.res_name_extended(), "TIP3");
        assert_eq!(Record::new("ATOM").res_name_extended(), "");
    }

    #[test]
    fn optional_fields_past_the_end_read_as_empty() {
        let record = Record::new("ATOM      3  CA  ARG B   4      37.080  43.455  -3.421");
        assert_eq!(record.seg_id(), "");
        assert_eq!(record.element(), "");
        assert_eq!(record.occupancy(), None);
    }

    #[test]
    fn required_field_on_short_line_is_reported() {
        let record = Record::new("ATOM      3  CA  AR");
        let err = record.res_name().unwrap_err();
        assert_eq!(
            err,
            RecordError::TooShort {
                column: Column::ResName,
                len: 19
            }
        );
        assert!(err.to_string().contains("residue name (columns 18-20)"));
    }

    #[test]
    fn invalid_residue_sequence_is_reported() {
        let record = Record::new("ATOM      3  CA  ARG B   X");
        assert!(matches!(
            record.res_seq(),
            Err(RecordError::InvalidNumber {
                column: Column::ResSeq,
                ..
            })
        ));
    }

    #[test]
    fn write_overwrites_in_place_and_preserves_length() {
        let mut record = Record::new(ATOM);
        record.write_char(Column::ChainId, 'A').unwrap();
        record.write_left(Column::SegId, "A").unwrap();
        assert_eq!(record.len(), ATOM.len());
        assert_eq!(
            record.as_str(),
            "ATOM      3  CA  ARG A   4      37.080  43.455  -3.421  1.00  0.00      A    C  "
        );
    }

    #[test]
    fn write_right_justifies_within_the_column() {
        let mut record = Record::new(ATOM);
        record.write_right(Column::ResName, "K1").unwrap();
        assert_eq!(record.field(Column::ResName), " K1");
        assert_eq!(record.len(), ATOM.len());
    }

    #[test]
    fn write_past_the_end_pads_to_record_width() {
        let mut record = Record::new("TER");
        record.write_char(Column::ChainId, 'A').unwrap();
        assert_eq!(record.len(), RECORD_WIDTH);
        assert_eq!(&record.as_str()[..22], "TER                  A");
        assert!(record.as_str()[22..].chars().all(|c| c == ' '));
    }

    #[test]
    fn write_rejects_values_wider_than_the_column() {
        let mut record = Record::new(ATOM);
        let err = record.write_left(Column::ChainId, "AB").unwrap_err();
        assert!(matches!(err, RecordError::FieldOverflow { column: Column::ChainId, .. }));
        assert_eq!(record.as_str(), ATOM);
    }

    #[test]
    fn write_rejects_non_ascii_values() {
        let mut record = Record::new(ATOM);
        assert!(matches!(
            record.write(Column::ChainId, "é"),
            Err(RecordError::FieldOverflow { .. } | RecordError::NotAscii { .. })
        ));
    }
}
