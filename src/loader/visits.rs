//! CSV loader for the site-visit log.
//!
//! Expected layout, header row first:
//!
//! ```text
//! ts,user_id,country_id,site_id
//! 2019-02-01 00:01:24,LC36FC,TL6,N0OTG
//! ```

use std::io::Read;

use chrono::NaiveDateTime;

use crate::loader::trait_def::{LoadError, LoadResult, ParseCause, ParseError, RecordLoader};
use crate::models::VisitEvent;

pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const FIELD_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct VisitCsvLoader {
    timestamp_format: String,
}

impl VisitCsvLoader {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }

    fn parse_record(
        &self,
        record: &csv::ByteRecord,
        line_number: u64,
        raw_text: impl Fn() -> String,
    ) -> Result<VisitEvent, ParseError> {
        let fail = |cause| ParseError {
            line_number,
            raw_text: raw_text(),
            cause,
        };

        if record.len() != FIELD_COUNT {
            return Err(fail(ParseCause::FieldCount {
                expected: FIELD_COUNT,
                found: record.len(),
            }));
        }

        let fields = record
            .iter()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<&str>, _>>()
            .map_err(|e| fail(ParseCause::Utf8(e)))?;

        let timestamp = NaiveDateTime::parse_from_str(fields[0], &self.timestamp_format)
            .map_err(|e| fail(ParseCause::Timestamp(e)))?;

        Ok(VisitEvent::new(timestamp, fields[1], fields[2], fields[3]))
    }
}

/// Source text between two byte offsets, without the line terminator.
fn source_text(input: &[u8], start: usize, end: usize) -> String {
    let end = end.min(input.len());
    let start = start.min(end);
    String::from_utf8_lossy(&input[start..end])
        .trim_end_matches(|c: char| c == '\r' || c == '\n')
        .to_string()
}

impl Default for VisitCsvLoader {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl RecordLoader for VisitCsvLoader {
    type Record = VisitEvent;

    fn load<R: Read>(&self, mut reader: R) -> LoadResult<Vec<VisitEvent>> {
        // Kept whole so a failing record can be reported as written.
        let mut input = Vec::new();
        reader.read_to_end(&mut input)?;

        // Field counts and UTF-8 are checked per record so the error carries the line.
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(input.as_slice());

        let mut events = Vec::new();
        let mut record = csv::ByteRecord::new();
        loop {
            match reader.read_byte_record(&mut record) {
                Ok(false) => break,
                Ok(true) => {
                    let (line_number, start) = record
                        .position()
                        .map(|p| (p.line(), p.byte() as usize))
                        .unwrap_or((events.len() as u64 + 2, 0));
                    let end = reader.position().byte() as usize;

                    let event = self.parse_record(&record, line_number, || {
                        source_text(&input, start, end)
                    })?;
                    events.push(event);
                }
                Err(e) => {
                    let (line_number, start) = e
                        .position()
                        .map(|p| (p.line(), p.byte() as usize))
                        .unwrap_or((0, input.len()));
                    return Err(match e.into_kind() {
                        csv::ErrorKind::Io(io) => LoadError::Io(io),
                        kind => {
                            let end = input[start.min(input.len())..]
                                .iter()
                                .position(|&b| b == b'\n')
                                .map_or(input.len(), |offset| start + offset);
                            LoadError::Parse(ParseError {
                                line_number,
                                raw_text: source_text(&input, start, end),
                                cause: ParseCause::Csv(format!("{kind:?}")),
                            })
                        }
                    });
                }
            }
        }

        Ok(events)
    }
}
