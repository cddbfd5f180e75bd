use std::cmp::Ordering;
use std::fmt;

use crate::error::ExportError;
use crate::session::SessionPayload;

/// Number of leading data rows checked against the header width.
const STRUCTURE_CHECK_ROWS: usize = 5;

/// A CSV cell coerced to a native scalar wherever the text round-trips.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    /// Coerce cell text. `"007"` and `"1.50"` do not round-trip and stay
    /// strings; an empty cell is `Null`.
    pub fn parse(text: &str) -> Scalar {
        if text.is_empty() {
            return Scalar::Null;
        }
        match text {
            "true" => return Scalar::Bool(true),
            "false" => return Scalar::Bool(false),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            if i.to_string() == text {
                return Scalar::Int(i);
            }
        }
        if let Ok(f) = text.parse::<f64>() {
            if f.is_finite() && f.to_string() == text {
                return Scalar::Float(f);
            }
        }
        Scalar::Str(text.to_string())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    /// Total ordering: type rank (null < bool < number < string), numbers
    /// compared numerically across `Int`/`Float`, strings lexically.
    pub fn cmp_scalar(&self, other: &Scalar) -> Ordering {
        fn rank(s: &Scalar) -> u8 {
            match s {
                Scalar::Null => 0,
                Scalar::Bool(_) => 1,
                Scalar::Int(_) | Scalar::Float(_) => 2,
                Scalar::Str(_) => 3,
            }
        }
        match (self, other) {
            (Scalar::Bool(a), Scalar::Bool(b)) => a.cmp(b),
            (Scalar::Int(a), Scalar::Int(b)) => a.cmp(b),
            (Scalar::Str(a), Scalar::Str(b)) => a.cmp(b),
            (a, b) if rank(a) == 2 && rank(b) == 2 => {
                let fa = a.as_f64().unwrap_or(f64::NAN);
                let fb = b.as_f64().unwrap_or(f64::NAN);
                fa.total_cmp(&fb)
            }
            (a, b) => rank(a).cmp(&rank(b)),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{}", b),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(x) => write!(f, "{}", x),
            Scalar::Str(s) => write!(f, "{}", s),
        }
    }
}

/// State of the `Student Work` cell across the pipeline.
///
/// `Raw` as exported; after the recovery stage a simulation row carries
/// either a parsed session or one of the two sentinels.
#[derive(Debug, Clone, PartialEq)]
pub enum StudentWork {
    Raw(String),
    Session(Box<SessionPayload>),
    NoData,
    Invalid,
}

impl StudentWork {
    /// Sentinel text as shown in reports.
    pub fn sentinel(&self) -> Option<&'static str> {
        match self {
            StudentWork::NoData => Some("nodata"),
            StudentWork::Invalid => Some("invalid JSON"),
            _ => None,
        }
    }
}

impl Default for StudentWork {
    fn default() -> Self {
        StudentWork::Raw(String::new())
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::Null
    }
}

/// One interaction-log entry.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub number: Scalar,
    pub workgroup_id: Scalar,
    pub wise_id_1: Scalar,
    pub wise_id_2: Scalar,
    pub wise_id_3: Scalar,
    pub step_work_id: Scalar,
    pub step_title: Scalar,
    pub step_type: Scalar,
    pub step_prompt: Scalar,
    pub node_id: Scalar,
    pub post_time_server_clock: Scalar,
    pub start_time_student_clock: Scalar,
    pub end_time_student_clock: Scalar,
    pub time_spent_seconds: Scalar,
    pub teacher_score_timestamp: Scalar,
    pub teacher_score: Scalar,
    pub teacher_comment_timestamp: Scalar,
    pub teacher_comment: Scalar,
    pub classmate_id: Scalar,
    pub receiving_text: Scalar,
    pub student_work: StudentWork,
}

impl Row {
    /// Whether this row is a simulation step carrying an embedded session.
    pub fn is_netlogo(&self) -> bool {
        self.step_type.as_str() == Some("Netlogo")
    }

    fn from_record(headers: &[String], record: &csv::StringRecord) -> Row {
        let cell = |name: &str| -> Scalar {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| record.get(i))
                .map(Scalar::parse)
                .unwrap_or(Scalar::Null)
        };
        let raw_cell = |name: &str| -> String {
            headers
                .iter()
                .position(|h| h == name)
                .and_then(|i| record.get(i))
                .unwrap_or("")
                .to_string()
        };
        Row {
            number: cell("number"),
            workgroup_id: cell("workgroup_id"),
            wise_id_1: cell("wise_id_1"),
            wise_id_2: cell("wise_id_2"),
            wise_id_3: cell("wise_id_3"),
            step_work_id: cell("step_work_id"),
            step_title: cell("step_title"),
            step_type: cell("step_type"),
            step_prompt: cell("step_prompt"),
            node_id: cell("node_id"),
            post_time_server_clock: cell("post_time_server_clock"),
            start_time_student_clock: cell("start_time_student_clock"),
            end_time_student_clock: cell("end_time_student_clock"),
            time_spent_seconds: cell("time_spent_seconds"),
            teacher_score_timestamp: cell("teacher_score_timestamp"),
            teacher_score: cell("teacher_score"),
            teacher_comment_timestamp: cell("teacher_comment_timestamp"),
            teacher_comment: cell("teacher_comment"),
            classmate_id: cell("classmate_id"),
            receiving_text: cell("receiving_text"),
            // Kept as raw text; the recovery stage owns its interpretation.
            student_work: StudentWork::Raw(raw_cell("student_work")),
        }
    }
}

/// Parsed export: normalized header keys plus rows in file order.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

/// Parse the repaired blob as CSV with a header row.
pub fn parse_table(repaired: &str) -> Result<Table, ExportError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(repaired.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

    let mut records = Vec::new();
    for result in reader.records() {
        records.push(result?);
    }

    // Catch repair failures early instead of propagating a shifted table.
    for (i, record) in records.iter().take(STRUCTURE_CHECK_ROWS).enumerate() {
        if record.len() != headers.len() {
            return Err(ExportError::CsvStructure(format!(
                "header has {} fields but data row {} has {}",
                headers.len(),
                i + 1,
                record.len()
            )));
        }
    }

    let rows = records
        .iter()
        .map(|r| Row::from_record(&headers, r))
        .collect();
    Ok(Table { headers, rows })
}

/// Normalize header text to a field key: lower-case, non-alphanumeric runs
/// collapsed to one underscore. `"Post Time (Server Clock)"` becomes
/// `post_time_server_clock`.
pub fn normalize_header(text: &str) -> String {
    let mut key = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !key.is_empty() {
                key.push('_');
            }
            pending_sep = false;
            key.push(c.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }
    key
}
