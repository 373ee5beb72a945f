//! Newline-delimited JSON loader for the purchase log.

use std::io::{BufRead, BufReader, Read};

use crate::loader::trait_def::{LoadResult, ParseCause, ParseError, RecordLoader};
use crate::models::PurchaseEvent;

#[derive(Debug, Clone, Default)]
pub struct PurchaseJsonLoader;

impl RecordLoader for PurchaseJsonLoader {
    type Record = PurchaseEvent;

    fn load<R: Read>(&self, reader: R) -> LoadResult<Vec<PurchaseEvent>> {
        let mut reader = BufReader::new(reader);
        let mut purchases = Vec::new();
        let mut buf = Vec::new();
        let mut line_number = 0u64;

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let line = std::str::from_utf8(&buf)
                .map_err(|e| ParseError {
                    line_number,
                    raw_text: String::from_utf8_lossy(&buf)
                        .trim_end_matches(|c: char| c == '\r' || c == '\n')
                        .to_string(),
                    cause: ParseCause::Utf8(e),
                })?
                .trim_end_matches(|c: char| c == '\r' || c == '\n');
            if line.trim().is_empty() {
                continue;
            }

            let purchase = serde_json::from_str::<PurchaseEvent>(line).map_err(|e| ParseError {
                line_number,
                raw_text: line.to_string(),
                cause: ParseCause::Json(e),
            })?;
            purchases.push(purchase);
        }

        Ok(purchases)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::LoadError;

    #[test]
    fn test_load_purchases_skips_blank_lines() {
        let input = "{\"user_id\": \"KB/WRFTC\", \"product_id\": \"F5H\", \"quantity\": 12}\n\
            \n\
            {\"user_id\": \"AA/XYZ\", \"product_id\": \"F5H\", \"quantity\": 3}\n";

        let purchases = PurchaseJsonLoader.load(input.as_bytes()).unwrap();
        assert_eq!(purchases.len(), 2);
        assert_eq!(purchases[1].user_id, "AA/XYZ");
        assert_eq!(purchases[1].quantity, 3);
    }

    #[test]
    fn test_malformed_line_aborts_load() {
        let input = "{\"user_id\": \"A\", \"product_id\": \"P\", \"quantity\": 1}\n\
            {\"user_id\": \"B\", \"product_id\": \"P\"}\n";

        let err = PurchaseJsonLoader.load(input.as_bytes()).unwrap_err();
        match err {
            LoadError::Parse(parse) => {
                assert_eq!(parse.line_number, 2);
                assert!(parse.raw_text.contains("\"B\""));
                assert!(matches!(parse.cause, ParseCause::Json(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let input: &[u8] = b"{\"user_id\": \"A\", \"product_id\": \"P\", \"quantity\": 1}\n\
            {\"user_id\": \"\xff\", \"product_id\": \"P\", \"quantity\": 1}\n";

        let err = PurchaseJsonLoader.load(input).unwrap_err();
        match err {
            LoadError::Parse(parse) => {
                assert_eq!(parse.line_number, 2);
                assert!(parse.raw_text.contains('\u{FFFD}'));
                assert!(!parse.raw_text.ends_with('\n'));
                assert!(matches!(parse.cause, ParseCause::Utf8(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
