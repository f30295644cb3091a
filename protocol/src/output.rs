//! The record a solver prints when it finishes.

use std::io::BufRead;

use mqpow_types::{BitVec, MqError};
use serde::{Deserialize, Serialize};

use crate::ProtocolError;

/// Result of one solver run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverOutput {
    /// Root as a `'0'`/`'1'` string over the solver's variables, `None` if not found.
    #[serde(default)]
    pub x: Option<String>,
    /// Points tried.
    #[serde(default)]
    pub count: u64,
}

impl SolverOutput {
    pub fn found(x: &BitVec, count: u64) -> Self {
        Self {
            x: Some(x.to_bit_string()),
            count,
        }
    }

    pub fn not_found(count: u64) -> Self {
        Self { x: None, count }
    }

    /// Parse one JSON record.
    pub fn parse(line: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(line.trim()).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// Read a solver's stdout and parse its final non-empty line.
    ///
    /// Solvers may print progress before the result; only the last line counts.
    pub fn read_from<R: BufRead>(reader: R) -> Result<Self, ProtocolError> {
        let mut last = None;
        for line in reader.lines() {
            let line = line?;
            if !line.trim().is_empty() {
                last = Some(line);
            }
        }
        let line = last.ok_or_else(|| ProtocolError::Malformed("empty solver output".into()))?;
        Self::parse(&line)
    }

    pub fn to_json(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|e| ProtocolError::Malformed(e.to_string()))
    }

    /// The root as bits, checked against the expected variable count.
    pub fn bits(&self, variables_n: usize) -> Result<Option<BitVec>, ProtocolError> {
        let Some(x) = self.x.as_deref() else {
            return Ok(None);
        };
        if x.len() != variables_n {
            return Err(MqError::Length {
                expected: variables_n,
                actual: x.len(),
            }
            .into());
        }
        Ok(Some(BitVec::from_bit_str(x)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_found_record() {
        let out = SolverOutput::parse(r#"{"x":"0110","count":42}"#).unwrap();
        assert_eq!(out.x.as_deref(), Some("0110"));
        assert_eq!(out.count, 42);
        assert_eq!(out.bits(4).unwrap().unwrap().to_bit_string(), "0110");
    }

    #[test]
    fn missing_or_null_x_means_not_found() {
        for text in [r#"{"count":7}"#, r#"{"x":null,"count":7}"#] {
            let out = SolverOutput::parse(text).unwrap();
            assert_eq!(out, SolverOutput::not_found(7));
            assert!(out.bits(4).unwrap().is_none());
        }
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let out = SolverOutput::parse(r#"{"x":"1","count":1,"gpu":"0"}"#).unwrap();
        assert_eq!(out.count, 1);
    }

    #[test]
    fn bits_are_validated() {
        let out = SolverOutput::parse(r#"{"x":"01x0","count":1}"#).unwrap();
        assert!(matches!(out.bits(4), Err(ProtocolError::Invalid(MqError::Encoding(_)))));
        let out = SolverOutput::parse(r#"{"x":"010","count":1}"#).unwrap();
        assert!(matches!(
            out.bits(4),
            Err(ProtocolError::Invalid(MqError::Length { expected: 4, actual: 3 }))
        ));
    }

    #[test]
    fn read_takes_last_line() {
        let text = "progress 10%\nprogress 90%\n{\"x\":\"11\",\"count\":4}\n\n";
        let out = SolverOutput::read_from(text.as_bytes()).unwrap();
        assert_eq!(out, SolverOutput::found(&BitVec::from_bit_str("11").unwrap(), 4));
        assert!(SolverOutput::read_from("".as_bytes()).is_err());
    }

    #[test]
    fn json_form() {
        let out = SolverOutput::found(&BitVec::from_bit_str("101").unwrap(), 9);
        assert_eq!(out.to_json().unwrap(), r#"{"x":"101","count":9}"#);
        assert!(SolverOutput::parse("not json").is_err());
    }
}
