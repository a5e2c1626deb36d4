use anyhow::{bail, ensure, Context, Result};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use std::{env, fs, path::PathBuf};

use czesl_vert::{
    aligner::{convert_batch, ConvertOptions},
    meta_file::{find_meta_files, find_meta_files_in_dir, read_meta_file},
};

struct Args {
    dir: Option<PathBuf>,
    files: Vec<PathBuf>,
    output_path: Option<PathBuf>,
    report_path: Option<PathBuf>,
    options: ConvertOptions,
}

fn get_args() -> Result<Option<Args>> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut opts = getopts::Options::new();
    opts.optopt("d", "dir", "directory to process", "DIR");
    opts.optopt("o", "output", "write the vertical to FILE instead of stdout", "FILE");
    opts.optopt("r", "report", "write input anomalies as JSON to FILE", "FILE");
    opts.optflag("g", "guess-errors", "tag unannotated text changes as errors");
    opts.optflag("h", "help", "print this help");

    let matches = match opts.parse(&args) {
        Ok(m) => m,
        Err(f) => bail!(f),
    };

    if matches.opt_present("h") {
        let brief = "Usage: czesl-vert [options] (-d DIR | FILE...)";
        print!("{}", opts.usage(brief));
        return Ok(None);
    }

    let dir = matches.opt_str("d").map(PathBuf::from);
    let files: Vec<PathBuf> = matches.free.iter().map(PathBuf::from).collect();
    ensure!(
        dir.is_some() != !files.is_empty(),
        "either a directory (-d) or a list of files is required, not both"
    );

    Ok(Some(Args {
        dir,
        files,
        output_path: matches.opt_str("o").map(PathBuf::from),
        report_path: matches.opt_str("r").map(PathBuf::from),
        options: ConvertOptions {
            guess_errors: matches.opt_present("g"),
        },
    }))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("czesl_vert=info".parse()?),
        )
        .init();

    let Some(args) = get_args()? else {
        return Ok(());
    };

    let meta_files = match &args.dir {
        Some(dir) => find_meta_files_in_dir(dir)
            .with_context(|| format!("Failed to list {}", dir.display()))?,
        None => find_meta_files(&args.files)?,
    };

    tracing::info!("Processing {} document sets...", meta_files.len());

    let pb = create_progress_bar(meta_files.len() as u64);
    let batch = convert_batch(
        meta_files
            .iter()
            .progress_with(pb.clone())
            .inspect(|meta_file| pb.set_message(meta_file.name.clone()))
            .map(read_meta_file),
        &args.options,
    );
    pb.finish_and_clear();

    tracing::info!(
        "Finished: {} document sets failed, {} documents or paragraphs skipped, {} anomalies",
        batch.failures.len(),
        batch.skipped.len(),
        batch.diagnostics.len()
    );

    match &args.output_path {
        Some(output_path) => fs::write(output_path, format!("{}\n", batch.vert))
            .with_context(|| format!("Failed to write {}", output_path.display()))?,
        None => println!("{}", batch.vert),
    }

    if let Some(report_path) = &args.report_path {
        fs::write(report_path, serde_json::to_string_pretty(&batch.diagnostics)?)
            .with_context(|| format!("Failed to write {}", report_path.display()))?;
    }

    Ok(())
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(
            "{percent:>3}% [{wide_bar:.cyan/blue}] {pos}/{len} {msg} [{elapsed_precise} < {eta_precise}]",
        )
        .unwrap()
        .progress_chars("#-"),
    );
    pb
}
