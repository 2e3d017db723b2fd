//! C9: deterministic JSON serialization for the C8 diagnosis records.
//!
//! Not `serde_json` — a hand-rolled escaped writer matching spec §4.8's
//! exact escaping table, since these are a small fixed set of record
//! shapes and the crate's other constraints already rule out dynamic
//! string construction.

use std::fmt::{self, Write};

use crate::diagnosis::{CauseRecord, Check, MissingOperation, PatternMatch, Symptom, SymptomReport};
use crate::issue::Severity;

/// Escape `s` into `out` per spec §4.8: two-character escapes for
/// backslash/quote/newline/tab/carriage-return, `\u00XX` for the rest of
/// `0x00..0x1F`, everything else passed through.
fn write_escaped<W: Write>(s: &str, w: &mut W) -> fmt::Result {
    for ch in s.chars() {
        match ch {
            '\\' => w.write_str("\\\\")?,
            '"' => w.write_str("\\\"")?,
            '\n' => w.write_str("\\n")?,
            '\t' => w.write_str("\\t")?,
            '\r' => w.write_str("\\r")?,
            c if (c as u32) < 0x20 => write!(w, "\\u{:04x}", c as u32)?,
            c => w.write_char(c)?,
        }
    }
    Ok(())
}

fn write_json_string<W: Write>(s: &str, w: &mut W) -> fmt::Result {
    w.write_char('"')?;
    write_escaped(s, w)?;
    w.write_char('"')
}

fn write_json_string_or_null<W: Write>(s: Option<&str>, w: &mut W) -> fmt::Result {
    match s {
        Some(s) => write_json_string(s, w),
        None => w.write_str("null"),
    }
}

fn severity_str(s: Severity) -> &'static str {
    match s {
        Severity::Error => "error",
        Severity::Warning => "warning",
    }
}

fn symptom_str(s: Symptom) -> &'static str {
    match s {
        Symptom::BlackScreen => "black_screen",
        Symptom::WrongColors => "wrong_colors",
        Symptom::BlendIssues => "blend_issues",
        Symptom::TransparentOutput => "transparent_output",
        Symptom::Flickering => "flickering",
        Symptom::GeometryIssues => "geometry_issues",
    }
}

/// Implemented by every C8 record type: a streaming writer plus a
/// convenience allocator.
pub trait WriteJson {
    fn write_json<W: Write>(&self, w: &mut W) -> fmt::Result;

    fn to_json_alloc(&self) -> String {
        let mut out = String::new();
        // A `String`'s `Write` impl is infallible; the `unwrap` here can
        // never observe an actual I/O failure.
        self.write_json(&mut out).unwrap();
        out
    }
}

impl WriteJson for CauseRecord {
    fn write_json<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("{\"name\":")?;
        write_json_string(self.name, w)?;
        write!(w, ",\"probability\":{}}}", self.probability)
    }
}

impl WriteJson for MissingOperation {
    fn write_json<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("{\"operation\":")?;
        write_json_string(self.operation, w)?;
        w.write_str(",\"severity\":")?;
        write_json_string(severity_str(self.severity), w)?;
        w.write_str(",\"message\":")?;
        write_json_string(self.message, w)?;
        w.write_str(",\"context\":")?;
        write_json_string_or_null(self.context, w)?;
        w.write_char('}')
    }
}

impl WriteJson for PatternMatch {
    fn write_json<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("{\"name\":")?;
        write_json_string(self.name, w)?;
        w.write_str(",\"description\":")?;
        write_json_string(self.description, w)?;
        write!(w, ",\"confidence\":{}}}", self.confidence)
    }
}

impl WriteJson for Check {
    fn write_json<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("{\"name\":")?;
        write_json_string(self.name, w)?;
        write!(w, ",\"passed\":{}", self.passed)?;
        w.write_str(",\"severity\":")?;
        write_json_string(severity_str(self.severity), w)?;
        w.write_str(",\"message\":")?;
        write_json_string(self.message, w)?;
        w.write_str(",\"suggestion\":")?;
        write_json_string_or_null(self.suggestion, w)?;
        w.write_char('}')
    }
}

impl WriteJson for SymptomReport {
    fn write_json<W: Write>(&self, w: &mut W) -> fmt::Result {
        w.write_str("{\"symptom\":")?;
        write_json_string(symptom_str(self.symptom), w)?;
        w.write_str(",\"checks\":[")?;
        for (i, check) in self.checks.iter().enumerate() {
            if i > 0 {
                w.write_char(',')?;
            }
            check.write_json(w)?;
        }
        w.write_str("],\"likely_cause\":")?;
        write_json_string_or_null(self.likely_cause, w)?;
        write!(w, ",\"probability\":{}}}", self.probability)
    }
}

/// Serialize a cause list as a JSON array, re-sorting descending by
/// probability first (spec §4.8: "Array emission sorts causes before
/// printing") so the wire output is independent of call-site ordering.
pub fn write_causes_json<W: Write>(causes: &[CauseRecord], w: &mut W) -> fmt::Result {
    let mut sorted: Vec<&CauseRecord> = causes.iter().collect();
    sorted.sort_by(|a, b| b.probability.cmp(&a.probability));

    w.write_char('[')?;
    for (i, cause) in sorted.iter().enumerate() {
        if i > 0 {
            w.write_char(',')?;
        }
        cause.write_json(w)?;
    }
    w.write_char(']')
}

pub fn causes_to_json_alloc(causes: &[CauseRecord]) -> String {
    let mut out = String::new();
    write_causes_json(causes, &mut out).unwrap();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        let mut out = String::new();
        write_json_string("line\nbreak\ttab\u{01}end", &mut out).unwrap();
        assert_eq!(out, "\"line\\nbreak\\ttab\\u0001end\"");
    }

    #[test]
    fn cause_record_round_trips_fields() {
        let cause = CauseRecord { name: "No draws", probability: 95 };
        assert_eq!(cause.to_json_alloc(), "{\"name\":\"No draws\",\"probability\":95}");
    }

    #[test]
    fn causes_json_sorts_descending() {
        let causes = vec![
            CauseRecord { name: "low", probability: 10 },
            CauseRecord { name: "high", probability: 90 },
        ];
        assert_eq!(
            causes_to_json_alloc(&causes),
            "[{\"name\":\"high\",\"probability\":90},{\"name\":\"low\",\"probability\":10}]"
        );
    }
}
