use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{span, Level};
use tracing_subscriber::EnvFilter;

mod args;
use args::CommandLineArgs;
use robowrap::{
    batch::{self, Batch},
    robocopy::Robocopy,
};
use robowrap_drives::{DriveSource, DriveTable, SystemDrives};
use robowrap_filesystem::DiskFilesystem;
use robowrap_resolve::{JobCompiler, StackFrame};

fn init_logger(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::try_from_env("ROBOWRAP_LOG")
        .unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let sub = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_file(false)
        .with_line_number(false)
        .with_env_filter(filter);
    if verbosity >= 3 {
        sub.pretty().init();
    } else {
        sub.without_time().init();
    }
}

fn main() -> Result<ExitCode> {
    let CommandLineArgs {
        jobs,
        dry_run,
        verbose,
        drives: list_drives,
        drive_table,
        robocopy,
    } = CommandLineArgs::parse();

    init_logger(verbose);
    let span = span!(Level::DEBUG, "main");
    let _guard = span.enter();

    let drives = match &drive_table {
        Some(path) => DriveTable::load(path)?.drives()?,
        None => SystemDrives::new().drives()?,
    };
    tracing::debug!("Found {} drive(s)", drives.len());

    if list_drives {
        print!("{}", DriveTable::from(drives));
        return Ok(ExitCode::SUCCESS);
    }

    let jobs = batch::find_jobs(&jobs)?;
    tracing::info!("Found {} job(s) to run", jobs.len());
    if dry_run {
        tracing::warn!("--dry-run option given, won't execute Robocopy");
    }

    let environment = StackFrame::environment();
    let fs = DiskFilesystem::new();
    let compiler = JobCompiler::new(&drives, &fs, &environment).dry_run(dry_run);
    let robocopy = Robocopy::new(robocopy).show_output(verbose >= 2);
    let summary = Batch::new(compiler, &robocopy).run(&jobs);

    tracing::info!("Finished: {}", summary);
    Ok(if summary.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
