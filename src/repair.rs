use crate::error::ExportError;

/// First cell of the recurring 4-line duplicate-header artifact the exporter
/// interleaves at workgroup boundaries.
const ARTIFACT_MARKER: &str = "\"Workgroup Id\"";

/// Number of lines each duplicate-header artifact occupies.
const ARTIFACT_LINES: usize = 4;

/// Repair the raw export text into a blob suitable for CSV parsing.
///
/// Lines 0-2 are file preamble and dropped. Line index 3 is the true header;
/// its leading column, literally named `"#"`, is rewritten to `"number"`.
/// The remaining lines pass through [`strip_duplicate_headers`].
pub fn repair_export(raw: &str) -> Result<String, ExportError> {
    let lines: Vec<&str> = raw.lines().collect();
    if lines.len() < 4 {
        return Err(ExportError::MalformedExport(format!(
            "expected preamble and header rows, got {} line(s)",
            lines.len()
        )));
    }

    let header = rewrite_leading_column(lines[3]);
    let mut repaired = Vec::with_capacity(lines.len() - 3);
    repaired.push(header.as_str());
    repaired.extend(strip_duplicate_headers(&lines[4..]));

    let mut blob = repaired.join("\n");
    blob.push('\n');
    Ok(blob)
}

/// Drop every duplicate-header artifact: a line whose content begins with the
/// literal quoted field `"Workgroup Id"` plus the 3 lines that follow it.
/// All other lines are kept verbatim, in order. Running this over
/// already-stripped lines is a no-op.
pub fn strip_duplicate_headers<'a>(lines: &[&'a str]) -> Vec<&'a str> {
    let mut kept = Vec::with_capacity(lines.len());
    let mut i = 0;
    while i < lines.len() {
        if lines[i].starts_with(ARTIFACT_MARKER) {
            i += ARTIFACT_LINES;
        } else {
            kept.push(lines[i]);
            i += 1;
        }
    }
    kept
}

fn rewrite_leading_column(header: &str) -> String {
    match header.strip_prefix("\"#\"") {
        Some(rest) => format!("\"number\"{}", rest),
        None => header.to_string(),
    }
}
