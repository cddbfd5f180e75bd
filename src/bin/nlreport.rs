use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use netlogo_report::error::{ExportError, EXIT_IO_ERROR, EXIT_SUCCESS};
use netlogo_report::{group, recover, repair, report, table};

/// Export consumed when no path is given, matching the original tool.
const DEFAULT_EXPORT: &str = "exports/Designing a Safer Airbag (P)-4239-all-student-work.csv";

#[derive(Parser)]
#[command(name = "nlreport")]
#[command(about = "Diagnostic reports for WISE NetLogo CSV exports")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the exported all-student-work CSV file
    #[arg(default_value = DEFAULT_EXPORT)]
    export: PathBuf,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let filename = cli.export.display().to_string();

    let raw = match std::fs::read_to_string(&cli.export) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("error: cannot read {}: {}", filename, e);
            process::exit(EXIT_IO_ERROR);
        }
    };

    let repaired = match repair::repair_export(&raw) {
        Ok(repaired) => repaired,
        Err(e) => fail("repair", e),
    };
    let mut table = match table::parse_table(&repaired) {
        Ok(table) => table,
        Err(e) => fail("parse", e),
    };

    recover::recover_rows(&mut table.rows);
    let groups = group::group_by_workgroup(&table.rows);

    let ctx = report::ReportContext {
        filename: &filename,
        table: &table,
        groups: &groups,
    };
    print!("{}", report::render_report(&ctx));
    process::exit(EXIT_SUCCESS);
}

fn fail(stage: &str, err: ExportError) -> ! {
    eprintln!("error: {}: {}", stage, err);
    process::exit(err.exit_code());
}
