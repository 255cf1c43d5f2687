use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Unsupported input type: {kind} (expected a path, a readable stream, or a sequence of lines)")]
    UnsupportedInputType { kind: String },
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: io::Error,
    },
    #[error("Failed to read input stream: {0}")]
    Stream(#[source] io::Error),
}

/// Any input the preprocessing pipeline accepts: a file path, an open stream, or
/// lines already held in memory.
pub enum StructureSource {
    Path(PathBuf),
    Reader(Box<dyn BufRead + Send>),
    Lines(Vec<String>),
}

impl StructureSource {
    pub fn reader<R: Read + Send + 'static>(reader: R) -> Self {
        StructureSource::Reader(Box::new(BufReader::new(reader)))
    }

    /// Short description of the source for logging.
    pub fn describe(&self) -> String {
        match self {
            StructureSource::Path(path) => path.display().to_string(),
            StructureSource::Reader(_) => "<stream>".to_string(),
            StructureSource::Lines(lines) => format!("<{} in-memory lines>", lines.len()),
        }
    }

    /// Normalizes the source into an owned line sequence, without line terminators.
    pub fn into_lines(self) -> Result<Vec<String>, SourceError> {
        match self {
            StructureSource::Path(path) => read_path(&path),
            StructureSource::Reader(reader) => read_stream(reader).map_err(SourceError::Stream),
            StructureSource::Lines(lines) => Ok(lines
                .into_iter()
                .map(|line| strip_terminator(&line).to_string())
                .collect()),
        }
    }
}

impl fmt::Debug for StructureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StructureSource({})", self.describe())
    }
}

fn read_path(path: &Path) -> Result<Vec<String>, SourceError> {
    let metadata = std::fs::metadata(path).map_err(|e| SourceError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    if metadata.is_dir() {
        return Err(SourceError::UnsupportedInputType {
            kind: format!("directory '{}'", path.display()),
        });
    }
    let file = File::open(path).map_err(|e| SourceError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_stream(BufReader::new(file)).map_err(|e| SourceError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })
}

fn read_stream(mut reader: impl BufRead) -> io::Result<Vec<String>> {
    let mut lines = Vec::new();
    let mut buf = String::new();
    while reader.read_line(&mut buf)? > 0 {
        lines.push(strip_terminator(&buf).to_string());
        buf.clear();
    }
    Ok(lines)
}

fn strip_terminator(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

impl From<PathBuf> for StructureSource {
    fn from(path: PathBuf) -> Self {
        StructureSource::Path(path)
    }
}

impl From<&Path> for StructureSource {
    fn from(path: &Path) -> Self {
        StructureSource::Path(path.to_path_buf())
    }
}

impl From<Vec<String>> for StructureSource {
    fn from(lines: Vec<String>) -> Self {
        StructureSource::Lines(lines)
    }
}

impl From<&[String]> for StructureSource {
    fn from(lines: &[String]) -> Self {
        StructureSource::Lines(lines.to_vec())
    }
}

impl From<&[&str]> for StructureSource {
    fn from(lines: &[&str]) -> Self {
        StructureSource::Lines(lines.iter().map(|l| l.to_string()).collect())
    }
}

impl From<File> for StructureSource {
    fn from(file: File) -> Self {
        StructureSource::reader(file)
    }
}

/// Dynamic inputs (such as entries of a configuration file) are accepted when they
/// look like a path (a string) or a sequence of lines (an array of strings).
impl TryFrom<toml::Value> for StructureSource {
    type Error = SourceError;

    fn try_from(value: toml::Value) -> Result<Self, Self::Error> {
        match value {
            toml::Value::String(path) => Ok(StructureSource::Path(PathBuf::from(path))),
            toml::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    toml::Value::String(line) => Ok(line),
                    other => Err(SourceError::UnsupportedInputType {
                        kind: format!("array containing {}", other.type_str()),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()
                .map(StructureSource::Lines),
            other => Err(SourceError::UnsupportedInputType {
                kind: other.type_str().to_string(),
            }),
        }
    }
}
