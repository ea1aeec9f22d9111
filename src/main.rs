use std::path::PathBuf;
use std::process;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Render a play-equipment inspection report as a PDF certificate")]
struct Args {
    /// Inspection report JSON
    #[arg(long)]
    report: PathBuf,

    /// Layout and category configuration JSON
    #[arg(long)]
    config: PathBuf,

    /// Label translations JSON
    #[arg(long)]
    labels: PathBuf,

    /// Output PDF path (defaults to the report path with a .pdf extension)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    let output = args
        .output
        .unwrap_or_else(|| args.report.with_extension("pdf"));

    if let Err(e) =
        inspection_pdf::render_report_to_pdf(&args.report, &args.config, &args.labels, &output)
    {
        eprintln!("Error: {e}");
        process::exit(1);
    }
    println!("Wrote {}", output.display());
}
