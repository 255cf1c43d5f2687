use crate::core::io::record::{LineError, Record, RecordError, RecordKind};
use crate::core::io::traits::{ModelSplitter, first_stray_record};
use std::fmt;

/// Identity of one coordinate record within a model: residue name and number.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueLabel {
    pub res_name: String,
    pub res_seq: i32,
    pub insertion_code: Option<char>,
}

impl fmt::Display for ResidueLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.res_name, self.res_seq)?;
        if let Some(code) = self.insertion_code {
            write!(f, "{}", code)?;
        }
        Ok(())
    }
}

/// One structural snapshot, borrowed from the ensemble's lines.
#[derive(Debug, Clone, Copy)]
pub struct Model<'a> {
    number: usize,
    offset: usize,
    lines: &'a [String],
}

impl<'a> Model<'a> {
    /// 1-based model number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn lines(&self) -> &'a [String] {
        self.lines
    }

    /// The ordered `(resName, resSeq)` key of every ATOM/HETATM record.
    pub fn labels(&self) -> Result<Vec<ResidueLabel>, LineError> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(_, line)| RecordKind::of(line).is_coordinate())
            .map(|(i, line)| {
                let record = Record::new(line.as_str());
                let at = LineError::at(self.offset + i);
                Ok(ResidueLabel {
                    res_name: record.res_name().map_err(&at)?.to_string(),
                    res_seq: record.res_seq().map_err(&at)?,
                    insertion_code: record.insertion_code(),
                })
            })
            .collect()
    }
}

/// The models of one input, in file order.
#[derive(Debug, Clone)]
pub struct Ensemble<'a> {
    models: Vec<Model<'a>>,
}

impl<'a> Ensemble<'a> {
    /// Splits `lines` into models.
    ///
    /// # Errors
    ///
    /// Fails with [`RecordError::OutsideModel`] at the first ATOM/HETATM line that
    /// belongs to no model, so that no coordinate record is dropped unnoticed.
    pub fn split(lines: &'a [String], splitter: &impl ModelSplitter) -> Result<Self, LineError> {
        let ranges = splitter.split(lines);
        if let Some(stray) = first_stray_record(lines, &ranges) {
            return Err(LineError::at(stray)(RecordError::OutsideModel));
        }
        let models = ranges
            .into_iter()
            .enumerate()
            .map(|(i, range)| Model {
                number: i + 1,
                offset: range.start,
                lines: &lines[range],
            })
            .collect();
        Ok(Self { models })
    }

    pub fn models(&self) -> &[Model<'a>] {
        &self.models
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::io::record::Column;
    use crate::core::io::traits::MarkerModelSplitter;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn split_numbers_models_from_one() {
        let input = lines(
            "MODEL        1
ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00           C
ENDMDL
MODEL        2
ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00           C
ENDMDL",
        );
        let ensemble = Ensemble::split(&input, &MarkerModelSplitter).unwrap();
        assert_eq!(ensemble.len(), 2);
        assert_eq!(ensemble.models()[0].number(), 1);
        assert_eq!(ensemble.models()[1].number(), 2);
        assert_eq!(ensemble.models()[1].lines().len(), 1);
    }

    #[test]
    fn labels_follow_coordinate_records_only() {
        let input = lines(
            "ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00           C
TER
HETATM    4 ZN    ZN B  10A     37.080  43.455  -3.421  1.00  0.00          ZN",
        );
        let ensemble = Ensemble::split(&input, &MarkerModelSplitter).unwrap();
        let labels = ensemble.models()[0].labels().unwrap();
        assert_eq!(
            labels,
            vec![
                ResidueLabel {
                    res_name: "ARG".into(),
                    res_seq: 4,
                    insertion_code: None
                },
                ResidueLabel {
                    res_name: "ZN".into(),
                    res_seq: 10,
                    insertion_code: Some('A')
                },
            ]
        );
        assert_eq!(labels[1].to_string(), "ZN 10A");
    }

    #[test]
    fn labels_report_absolute_line_of_short_records() {
        let input = lines("MODEL        1\nATOM      3  CA  ARG B\nENDMDL");
        let ensemble = Ensemble::split(&input, &MarkerModelSplitter).unwrap();
        let err = ensemble.models()[0].labels().unwrap_err();
        assert_eq!(err.line, 2);
        assert!(matches!(
            err.source,
            RecordError::TooShort {
                column: Column::ResSeq,
                ..
            }
        ));
    }

    #[test]
    fn coordinate_record_outside_models_fails_the_split() {
        let input = lines(
            "MODEL        1
ATOM      3  CA  ARG B   4      37.080  43.455  -3.421  1.00  0.00           C
ENDMDL
HETATM    4 ZN    ZN B  10      37.080  43.455  -3.421  1.00  0.00          ZN
END",
        );
        let err = Ensemble::split(&input, &MarkerModelSplitter).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.source, RecordError::OutsideModel);
    }
}
