//! Line-delimited hex encoding of equation systems.

use std::io::{BufRead, Read, Write};

use mqpow_work::{EquationLayout, EquationSystem};

use crate::ProtocolError;

/// Terminates the equation list.
pub const END_MARKER: &str = "end";

/// Upper bound on rows accepted from a peer; 255 + any sane offset stays below it.
pub const MAX_EQUATIONS: usize = 1024;

/// Write every equation as a hex line followed by the end marker.
pub fn write_equations<W: Write>(system: &EquationSystem, out: &mut W) -> Result<(), ProtocolError> {
    for row in system.equations() {
        writeln!(out, "{}", hex::encode(row))?;
    }
    writeln!(out, "{END_MARKER}")?;
    out.flush()?;
    Ok(())
}

/// In-memory form of [`write_equations`].
pub fn encode_equations(system: &EquationSystem) -> String {
    let mut text = String::with_capacity(
        system.equations_n() * (2 * system.layout().coefficient_byte + 1) + END_MARKER.len() + 1,
    );
    for row in system.to_hex() {
        text.push_str(&row);
        text.push('\n');
    }
    text.push_str(END_MARKER);
    text.push('\n');
    text
}

/// Read rows up to the end marker and rebuild a system over `variables_n` variables.
///
/// Every row must be exactly as wide as the layout for `variables_n` demands.
/// Lines are read at most `2 * coefficient_byte + 2` bytes at a time (row plus
/// CRLF), so an oversized line is rejected without being buffered.
pub fn read_equations<R: BufRead>(variables_n: usize, mut reader: R) -> Result<EquationSystem, ProtocolError> {
    let row_chars = EquationLayout::new(0, variables_n).coefficient_byte.saturating_mul(2);
    let max_line = row_chars.max(END_MARKER.len()).saturating_add(2);

    let mut rows = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        line_no += 1;
        buf.clear();
        let read = (&mut reader)
            .take(max_line as u64)
            .read_until(b'\n', &mut buf)?;
        if read == 0 {
            break;
        }
        if read == max_line && buf.last() != Some(&b'\n') {
            return Err(ProtocolError::Malformed(format!(
                "line {line_no}: longer than {max_line} bytes"
            )));
        }
        let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        if line == END_MARKER.as_bytes() {
            return Ok(EquationSystem::from_equations(variables_n, rows)?);
        }
        if rows.len() == MAX_EQUATIONS {
            return Err(ProtocolError::Malformed(format!(
                "more than {MAX_EQUATIONS} equations"
            )));
        }
        let row = hex::decode(line)
            .map_err(|e| ProtocolError::Malformed(format!("line {line_no}: {e}")))?;
        rows.push(row);
    }
    Err(ProtocolError::Malformed(format!(
        "missing {END_MARKER:?} after {} equations",
        rows.len()
    )))
}

/// In-memory form of [`read_equations`].
pub fn decode_equations(variables_n: usize, text: &str) -> Result<EquationSystem, ProtocolError> {
    read_equations(variables_n, text.as_bytes())
}
