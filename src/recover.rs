use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

use crate::session::SessionPayload;
use crate::table::{Row, StudentWork};

/// Literal prefix some export rows carry before the payload.
pub const RESPONSE_PREFIX: &str = "Response #1: ";

/// Upper bound on structural fix attempts per payload. A second failure is
/// surfaced as data loss (`StudentWork::Invalid`) rather than hidden behind
/// escalating heuristics.
pub const MAX_FIX_ATTEMPTS: usize = 1;

/// Recovery state machine: `Unparsed -> FixAttempted -> {Recovered, Invalid}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    Unparsed,
    FixAttempted(usize),
}

impl ParseState {
    fn attempts(self) -> usize {
        match self {
            ParseState::Unparsed => 0,
            ParseState::FixAttempted(n) => n,
        }
    }
}

/// Replace `student_work` on every simulation-step row with the recovered
/// payload or a sentinel. Rows of other step types are left untouched.
pub fn recover_rows(rows: &mut [Row]) {
    for row in rows.iter_mut() {
        if !row.is_netlogo() {
            continue;
        }
        if let StudentWork::Raw(raw) = &row.student_work {
            row.student_work = recover_payload(raw);
        }
    }
}

/// Recover one raw `Student Work` cell.
pub fn recover_payload(raw: &str) -> StudentWork {
    let text = raw.strip_prefix(RESPONSE_PREFIX).unwrap_or(raw);
    let text = if looks_double_encoded(text) {
        unescape_double_encoded(text)
    } else {
        text.to_string()
    };
    if text.is_empty() {
        return StudentWork::NoData;
    }

    let mut state = ParseState::Unparsed;
    let mut candidate = text;
    loop {
        match serde_json::from_str::<SessionPayload>(&candidate) {
            Ok(payload) => return StudentWork::Session(Box::new(payload)),
            Err(_) if state.attempts() < MAX_FIX_ATTEMPTS => {
                state = ParseState::FixAttempted(state.attempts() + 1);
                candidate = quote_inquiry_summaries(&candidate);
            }
            Err(err) => {
                warn!(
                    attempts = state.attempts(),
                    %err,
                    "student work unrecoverable, downgrading to sentinel"
                );
                return StudentWork::Invalid;
            }
        }
    }
}

/// Legacy exporter encoding: `inquirySummary` emitted as a bare, unquoted
/// array-like token stream. Rewrite `"inquirySummary":[...]` to
/// `"inquirySummary":"[...]"` so the bracketed content becomes a string
/// literal.
pub fn quote_inquiry_summaries(text: &str) -> String {
    static INQUIRY_RE: OnceLock<Regex> = OnceLock::new();
    let re = INQUIRY_RE
        .get_or_init(|| Regex::new(r#""inquirySummary":\[([^\]]*)\]"#).expect("inquiry pattern"));
    re.replace_all(text, "\"inquirySummary\":\"[$1]\"").into_owned()
}

/// Best-effort signature of a string-within-a-string payload: wrapped in
/// quote characters and containing escaped quotes or escaped newlines.
/// Input matching this while already being valid JSON is ambiguous; the
/// pre-pass wins, which mirrors how the exporter actually behaves.
fn looks_double_encoded(text: &str) -> bool {
    text.len() >= 2
        && text.starts_with('"')
        && text.ends_with('"')
        && (text.contains("\\\"") || text.contains("\\n"))
}

fn unescape_double_encoded(text: &str) -> String {
    let inner = &text[1..text.len() - 1];
    inner.replace("\\\"", "\"").replace("\\n", "\n")
}
