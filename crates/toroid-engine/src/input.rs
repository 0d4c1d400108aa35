//! Whitespace-separated text input.
//!
//! The stream starts with a header `height width p t`, followed by
//! records `type x y value`:
//!
//! | type | meaning                                   |
//! |------|-------------------------------------------|
//! | 0    | set a free cell to `value`                |
//! | 1    | set a fixed cell to `value`               |
//! | 2    | query the value at `(x, y)`; `value` unused |
//!
//! A record that cannot be parsed ends the stream. An unknown type code
//! is reported and skipped.

use std::collections::VecDeque;
use std::io::BufRead;
use std::str::FromStr;

use toroid_core::{CellKind, ConfigError, Coord, GridDims, RunHeader, SimulationParameters};
use tracing::{debug, warn};

/// Type code of a query record.
pub const GET_CODE: i64 = 2;

/// Failure to read the run header.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    /// The stream ended before the named header field.
    #[error("input ended before the header field `{field}`")]
    TruncatedHeader {
        /// Header field that was missing.
        field: &'static str,
    },
    /// A header field did not parse.
    #[error("header field `{field}` is not valid: {token:?}")]
    InvalidHeaderField {
        /// Header field being parsed.
        field: &'static str,
        /// Offending token.
        token: String,
    },
    /// The header parsed but describes an invalid run.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What one record asks for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    /// Set the cell's kind and value.
    Assign(CellKind),
    /// Query the cell's value.
    Get,
}

/// One parsed input record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Record {
    /// What the record asks for.
    pub kind: RecordKind,
    /// Target coordinate, not yet normalized.
    pub coord: Coord,
    /// Assigned value; unused by queries.
    pub value: f64,
}

impl Record {
    /// A free-cell assignment.
    pub fn free(coord: Coord, value: f64) -> Self {
        Self {
            kind: RecordKind::Assign(CellKind::Free),
            coord,
            value,
        }
    }

    /// A fixed-cell assignment.
    pub fn fixed(coord: Coord, value: f64) -> Self {
        Self {
            kind: RecordKind::Assign(CellKind::Fixed),
            coord,
            value,
        }
    }

    /// A query.
    pub fn get(coord: Coord) -> Self {
        Self {
            kind: RecordKind::Get,
            coord,
            value: 0.0,
        }
    }
}

/// A source of input records, consumed only by the coordinator.
pub trait RecordSource {
    /// Next valid record, or `None` once the stream is exhausted.
    fn next_record(&mut self) -> Option<Record>;
}

impl RecordSource for VecDeque<Record> {
    fn next_record(&mut self) -> Option<Record> {
        self.pop_front()
    }
}

impl<S: RecordSource + ?Sized> RecordSource for Box<S> {
    fn next_record(&mut self) -> Option<Record> {
        (**self).next_record()
    }
}

/// Tokenizing reader over any buffered text stream.
///
/// Tokens may be split across lines arbitrarily.
#[derive(Debug)]
pub struct TextRecords<R> {
    reader: R,
    pending: VecDeque<String>,
    exhausted: bool,
}

impl<R: BufRead> TextRecords<R> {
    /// Wrap a reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
            exhausted: false,
        }
    }

    /// Parse the four-field header `height width p t`.
    pub fn header(&mut self) -> Result<RunHeader, InputError> {
        let height: u32 = self.header_field("height")?;
        let width: u32 = self.header_field("width")?;
        let p: f64 = self.header_field("p")?;
        let t: u64 = self.header_field("t")?;
        let dims = GridDims::new(width, height)?;
        let params = SimulationParameters::new(p, t)?;
        Ok(RunHeader::new(dims, params))
    }

    fn header_field<T: FromStr>(&mut self, field: &'static str) -> Result<T, InputError> {
        let token = self
            .next_token()
            .ok_or(InputError::TruncatedHeader { field })?;
        token
            .parse()
            .map_err(|_| InputError::InvalidHeaderField { field, token })
    }

    fn next_token(&mut self) -> Option<String> {
        while self.pending.is_empty() {
            if self.exhausted {
                return None;
            }
            let mut line = String::new();
            match self.reader.read_line(&mut line) {
                Ok(0) => self.exhausted = true,
                Ok(_) => self
                    .pending
                    .extend(line.split_whitespace().map(str::to_owned)),
                Err(e) => {
                    warn!(error = %e, "input read failed, treating as end of stream");
                    self.exhausted = true;
                }
            }
        }
        self.pending.pop_front()
    }

    fn parsed<T: FromStr>(&mut self) -> Option<T> {
        let token = self.next_token()?;
        match token.parse() {
            Ok(v) => Some(v),
            Err(_) => {
                debug!(token = %token, "unparsable record field, ending input");
                self.exhausted = true;
                self.pending.clear();
                None
            }
        }
    }
}

impl<R: BufRead> RecordSource for TextRecords<R> {
    fn next_record(&mut self) -> Option<Record> {
        loop {
            let code: i64 = self.parsed()?;
            let x: i64 = self.parsed()?;
            let y: i64 = self.parsed()?;
            let value: f64 = self.parsed()?;
            let coord = Coord::new(x, y);
            if code == GET_CODE {
                return Some(Record::get(coord));
            }
            match CellKind::from_code(code) {
                Some(kind) => {
                    return Some(Record {
                        kind: RecordKind::Assign(kind),
                        coord,
                        value,
                    })
                }
                None => warn!(code, %coord, "unknown record type, skipping"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &str) -> TextRecords<&[u8]> {
        TextRecords::new(text.as_bytes())
    }

    fn drain(src: &mut impl RecordSource) -> Vec<Record> {
        std::iter::from_fn(|| src.next_record()).collect()
    }

    // ── Header ──────────────────────────────────────────────────

    #[test]
    fn header_is_height_first() {
        let mut r = reader("3 5 0.25 10\n");
        let h = r.header().unwrap();
        assert_eq!(h.dims.x(), 5);
        assert_eq!(h.dims.y(), 3);
        assert_eq!(h.params.coefficient(), 0.25);
        assert_eq!(h.params.iterations(), 10);
    }

    #[test]
    fn header_split_across_lines() {
        let mut r = reader("2\n 2\n\n0.5   \n 7");
        let h = r.header().unwrap();
        assert_eq!(h.dims.cell_count(), 4);
        assert_eq!(h.params.iterations(), 7);
    }

    #[test]
    fn truncated_header() {
        let mut r = reader("4 4 0.5");
        assert_eq!(r.header(), Err(InputError::TruncatedHeader { field: "t" }));
    }

    #[test]
    fn invalid_header_field() {
        let mut r = reader("4 four 0.5 1");
        assert_eq!(
            r.header(),
            Err(InputError::InvalidHeaderField {
                field: "width",
                token: "four".to_owned()
            })
        );
    }

    #[test]
    fn header_coefficient_out_of_range() {
        let mut r = reader("2 2 1.5 1");
        assert!(matches!(
            r.header(),
            Err(InputError::Config(ConfigError::InvalidCoefficient { .. }))
        ));
    }

    #[test]
    fn header_empty_axis() {
        let mut r = reader("0 2 0.5 1");
        assert!(matches!(
            r.header(),
            Err(InputError::Config(ConfigError::EmptyGrid { .. }))
        ));
    }

    // ── Records ─────────────────────────────────────────────────

    #[test]
    fn records_in_order() {
        let mut r = reader("2 2 0.5 1\n0 0 0 1.5\n1 1 1 -2\n2 0 1 0\n");
        r.header().unwrap();
        assert_eq!(
            drain(&mut r),
            vec![
                Record::free(Coord::new(0, 0), 1.5),
                Record::fixed(Coord::new(1, 1), -2.0),
                Record::get(Coord::new(0, 1)),
            ]
        );
    }

    #[test]
    fn unknown_type_is_skipped() {
        let mut r = reader("7 0 0 3.0\n0 1 1 4.0\n");
        assert_eq!(drain(&mut r), vec![Record::free(Coord::new(1, 1), 4.0)]);
    }

    #[test]
    fn parse_failure_ends_stream() {
        let mut r = reader("0 0 0 1.0\n0 x 1 2.0\n0 1 1 3.0\n");
        assert_eq!(drain(&mut r), vec![Record::free(Coord::new(0, 0), 1.0)]);
        assert_eq!(r.next_record(), None);
    }

    #[test]
    fn partial_record_ends_stream() {
        let mut r = reader("0 0 0 1.0\n2 1");
        assert_eq!(drain(&mut r), vec![Record::free(Coord::new(0, 0), 1.0)]);
    }

    #[test]
    fn negative_coordinates_kept_raw() {
        let mut r = reader("2 -1 -1 0\n");
        let rec = r.next_record().unwrap();
        assert!(rec.coord.is_sentinel());
    }

    #[test]
    fn queue_source() {
        let mut q: VecDeque<Record> = [Record::get(Coord::ORIGIN)].into_iter().collect();
        assert_eq!(q.next_record(), Some(Record::get(Coord::ORIGIN)));
        assert_eq!(q.next_record(), None);
    }
}
