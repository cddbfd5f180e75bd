use indexmap::IndexMap;
use serde_json::Value;

use crate::session::{Run, SessionPayload, VariableDescriptor};
use crate::table::{Row, StudentWork, Table};

/// Minimum field widths, left-justified. These are a formatting contract:
/// downstream tooling splits the descriptor lines on these columns.
pub const LABEL_WIDTH: usize = 32;
pub const BOUND_WIDTH: usize = 6;
pub const UNITS_WIDTH: usize = 16;

const WORKGROUP_RULE: &str = "================================================================";
const SESSION_RULE: &str = "--------------------------------------------------------";

/// Everything the report stage needs, threaded explicitly from the earlier
/// stages.
pub struct ReportContext<'a> {
    pub filename: &'a str,
    pub table: &'a Table,
    pub groups: &'a IndexMap<String, Vec<Row>>,
}

/// Render the complete report: global summary, then one per-workgroup
/// section (in first-appearance order) with a session detail per
/// simulation-step row.
pub fn render_report(ctx: &ReportContext<'_>) -> String {
    let mut out = global_summary(ctx);
    for (workgroup, rows) in ctx.groups {
        out.push_str(&workgroup_report(workgroup, rows));
    }
    out
}

/// Source filename, row/workgroup counts, header list, distinct step types,
/// total simulation-step count.
pub fn global_summary(ctx: &ReportContext<'_>) -> String {
    let rows = &ctx.table.rows;
    let netlogo_steps = rows.iter().filter(|r| r.is_netlogo()).count();
    format!(
        "\nParsing:    {}\nRows:       {}\nWorkgroups: {}\n\nHeaders:    [{}]\n\nStep Types: [{}]\n\nNetLogo step sessions:    {}\n",
        ctx.filename,
        rows.len(),
        ctx.groups.len(),
        ctx.table.headers.join(", "),
        distinct_step_types(rows).join(", "),
        netlogo_steps
    )
}

/// Workgroup id and simulation-step count, followed by one session detail
/// per `"Netlogo"` row. A workgroup without simulation steps renders the
/// header alone.
pub fn workgroup_report(workgroup: &str, rows: &[Row]) -> String {
    let netlogo_rows: Vec<&Row> = rows.iter().filter(|r| r.is_netlogo()).collect();
    let mut out = format!(
        "\n{}\nWorkgroup: {}\nNetLogo steps: {}\n",
        WORKGROUP_RULE,
        workgroup,
        netlogo_rows.len()
    );
    for row in netlogo_rows {
        out.push_str(&session_report(row));
    }
    out
}

/// One session detail: step title, time spent, model information, then the
/// run-indexed descriptor sections and the verbatim inquiry summaries.
/// Sentinel payloads report a run count of zero and no descriptor sections.
pub fn session_report(row: &Row) -> String {
    let mut out = format!(
        "{}\nStep name:      {}\nTotal time:     {} s\n",
        SESSION_RULE, row.step_title, row.time_spent_seconds
    );
    match &row.student_work {
        StudentWork::Session(payload) => out.push_str(&session_body(payload)),
        work => {
            if let Some(sentinel) = work.sentinel() {
                out.push_str(&format!("Student work:   {}\n", sentinel));
            }
            out.push_str("Number of runs: 0\n");
        }
    }
    out
}

fn session_body(payload: &SessionPayload) -> String {
    let mut out = model_information_section(payload);
    if payload.runs.is_empty() {
        out.push_str("Number of runs: 0\n");
        return out;
    }
    out.push_str(&format!("Number of runs: {}\n", payload.runs.len()));

    if let Some(description) = &payload.description {
        descriptor_section(
            &mut out,
            "Computational inputs",
            &description.computational_inputs,
            &payload.runs,
            comp_inputs,
        );
        descriptor_section(
            &mut out,
            "Computational outputs",
            &description.computational_outputs,
            &payload.runs,
            comp_outputs,
        );
        descriptor_section(
            &mut out,
            "Representational inputs",
            &description.representational_inputs,
            &payload.runs,
            repr_inputs,
        );
        descriptor_section(
            &mut out,
            "Student inputs",
            &description.student_inputs,
            &payload.runs,
            student_inputs,
        );
    }

    out.push_str("\nInquiry summaries:\n");
    let summaries: Vec<&str> = payload
        .runs
        .iter()
        .map(|run| run.inquiry_summary.as_str())
        .collect();
    out.push_str(&summaries.join("\n"));
    out.push('\n');
    out
}

fn model_information_section(payload: &SessionPayload) -> String {
    let info = payload
        .description
        .as_ref()
        .and_then(|d| d.model_information.as_ref());
    match info {
        None => "Model Information: not available\n".to_string(),
        Some(info) => format!(
            "Model Information:\n  name:      {}\n  file name: {}\n  version:   {}\n",
            info.name.as_deref().unwrap_or(""),
            info.file_name.as_deref().unwrap_or(""),
            info.version.as_ref().map(value_text).unwrap_or_default()
        ),
    }
}

fn comp_inputs(run: &Run) -> &[Value] {
    &run.computational_inputs
}

fn comp_outputs(run: &Run) -> &[Value] {
    &run.computational_outputs
}

fn repr_inputs(run: &Run) -> &[Value] {
    &run.representational_inputs
}

fn student_inputs(run: &Run) -> &[Value] {
    &run.student_inputs
}

/// One descriptor category: `<Title>: N`, then a fixed-width line per
/// descriptor pairing descriptor i with value i of every run.
fn descriptor_section(
    out: &mut String,
    title: &str,
    descriptors: &[VariableDescriptor],
    runs: &[Run],
    values_of: fn(&Run) -> &[Value],
) {
    out.push_str(&format!("\n{}: {}\n", title, descriptors.len()));
    for (index, descriptor) in descriptors.iter().enumerate() {
        out.push_str(&descriptor_line(descriptor, index, runs, values_of));
    }
}

fn descriptor_line(
    descriptor: &VariableDescriptor,
    index: usize,
    runs: &[Run],
    values_of: fn(&Run) -> &[Value],
) -> String {
    let mut line = format!("{:<width$}", descriptor.label, width = LABEL_WIDTH);
    if let Some(min) = &descriptor.min {
        line.push_str(&format!(" min: {:<width$}", value_text(min), width = BOUND_WIDTH));
    }
    if let Some(max) = &descriptor.max {
        line.push_str(&format!(" max: {:<width$}", value_text(max), width = BOUND_WIDTH));
    }
    if let Some(units) = &descriptor.units {
        line.push_str(&format!(" {:<width$}", units, width = UNITS_WIDTH));
    }
    let values: Vec<String> = runs
        .iter()
        .map(|run| {
            values_of(run)
                .get(index)
                .map(value_text)
                .unwrap_or_default()
        })
        .collect();
    line.push_str(&format!(" values({})\n", values.join(", ")));
    line
}

fn distinct_step_types(rows: &[Row]) -> Vec<String> {
    let mut seen = Vec::new();
    for row in rows {
        let step_type = row.step_type.to_string();
        if !seen.contains(&step_type) {
            seen.push(step_type);
        }
    }
    seen
}

/// JSON value as report text: strings unquoted, everything else in its JSON
/// form.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
