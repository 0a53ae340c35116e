use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use hmm_hits::filter::HitFilter;
use hmm_hits::{read_hits_batch, HitTable, NamingMode};

#[derive(Parser)]
#[command(name = "read-hmm")]
#[command(version)]
#[command(about = "Collect integrase hits from HMMER domain tables (--domtblout)")]
struct Cli {
    /// Domain table(s) produced by hmmsearch (plain or .gz)
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Replicon id written in Accession_number (single input only; defaults to the file stem)
    #[arg(short, long, value_name = "ID")]
    replicon: Option<String>,

    /// Keep hits with an e-value strictly below this
    #[arg(short, long, value_name = "FLOAT", default_value_t = HitFilter::default().evalue_threshold)]
    evalue: f64,

    /// Keep hits covering strictly more than this fraction of the profile
    #[arg(short, long, value_name = "FLOAT", default_value_t = HitFilter::default().coverage_threshold)]
    coverage: f64,

    /// Proteins come from a Gembase genome
    #[arg(long)]
    gembase: bool,

    /// Write the table here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

/// `acba.007.p01.13_intI.res(.gz)` -> `acba.007.p01.13`
fn replicon_from_path(path: &Path) -> String {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);
    let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(name);
    stem.rsplit_once('_').map(|(s, _)| s).unwrap_or(stem).to_string()
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.replicon.is_some() && cli.inputs.len() > 1 {
        bail!("--replicon can only be used with a single input file");
    }
    let mode = if cli.gembase { NamingMode::Gembase } else { NamingMode::Default };

    let jobs: Vec<(String, PathBuf)> = cli
        .inputs
        .iter()
        .map(|path| {
            let id = cli.replicon.clone().unwrap_or_else(|| replicon_from_path(path));
            (id, path.clone())
        })
        .collect();

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_strings(&[
                "⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏",
            ])
            .template("{spinner:.green} {msg}")
            .context("invalid spinner template")?,
    );
    spinner.set_message(format!("Reading {} result file(s)...", jobs.len()));

    let results = read_hits_batch(&jobs, cli.evalue, cli.coverage, mode);
    spinner.finish_and_clear();

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    writeln!(out, "{}", HitTable::header_line())?;
    let mut total = 0;
    for ((replicon_id, path), result) in jobs.iter().zip(results) {
        let table = result.with_context(|| format!("{replicon_id}: failed on {}", path.display()))?;
        total += table.len();
        table.write_rows(&mut out)?;
    }
    out.flush()?;

    log::info!("{} hit(s) written for {} replicon(s)", total, jobs.len());
    Ok(())
}
