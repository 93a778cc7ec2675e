//! Finding job files and running them one after another

use std::{collections::BTreeSet, fmt::Display};

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Utc};
use robowrap_config::{Job, JobFormat};
use robowrap_filesystem::Filesystem;
use robowrap_resolve::{JobCompiler, RefusalReason, Verdict};
use tracing::{span, Level};

use crate::robocopy::{CopyTool, RobocopyExit};

/// Expands job file names and globs into a sorted list of job files, each listed once
///
/// Files without a job file extension are skipped with a warning, as are patterns matching
/// nothing.
pub fn find_jobs(patterns: &[impl AsRef<str>]) -> Result<Vec<Utf8PathBuf>> {
    let mut jobs = BTreeSet::new();
    for pattern in patterns {
        let pattern = pattern.as_ref();
        let mut matched = false;
        let entries =
            glob::glob(pattern).with_context(|| format!("Invalid job pattern {pattern:?}"))?;
        for entry in entries {
            let path = Utf8PathBuf::try_from(entry?)?;
            matched = true;
            if JobFormat::from_path(&path).is_none() {
                tracing::warn!("Ignoring job with incorrect extension: {}", path);
                continue;
            }
            jobs.insert(path);
        }
        if !matched {
            tracing::warn!("No job files match {}", pattern);
        }
    }
    Ok(jobs.into_iter().collect())
}

/// How a job ended, if it got as far as the safety gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    /// The copy tool ran
    Copied(RobocopyExit),
    /// The safety gate stopped the job
    Refused(RefusalReason),
}

impl JobOutcome {
    /// A dry run counts as success, since it only stopped because it was asked to
    pub fn succeeded(&self) -> bool {
        match self {
            JobOutcome::Copied(exit) => exit.success(),
            JobOutcome::Refused(reason) => *reason == RefusalReason::DryRun,
        }
    }
}

/// Counts of jobs run by a [`Batch`]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub succeeded: usize,
    pub failed: usize,
}

impl Summary {
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, succeeded: bool) {
        if succeeded {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} succeeded and {} failed", self.succeeded, self.failed)
    }
}

/// Runs job files in turn, continuing past any that fail
pub struct Batch<'a, FS, T> {
    compiler: JobCompiler<'a, FS>,
    tool: &'a T,
    now: Option<DateTime<Utc>>,
}

impl<'a, FS, T> Batch<'a, FS, T>
where
    FS: Filesystem,
    T: CopyTool,
{
    pub fn new(compiler: JobCompiler<'a, FS>, tool: &'a T) -> Self {
        Batch {
            compiler,
            tool,
            now: None,
        }
    }

    /// Fixes the time used for `$timestamp$`, which is otherwise taken as each job starts
    pub fn at(self, now: DateTime<Utc>) -> Self {
        Batch {
            now: Some(now),
            ..self
        }
    }

    /// Loads, compiles and (if authorized) runs a single job file
    pub fn run_job(&self, path: &Utf8Path) -> Result<JobOutcome> {
        let job = Job::load(path)?;
        let span = span!(Level::DEBUG, "job", name = job.name.as_str());
        let _guard = span.enter();

        let now = self.now.unwrap_or_else(Utc::now);
        let plan = self
            .compiler
            .compile(&job, now)
            .with_context(|| format!("Compiling job {:?}", job.name))?;

        match plan.verdict() {
            Verdict::Refused(RefusalReason::DryRun) => {
                tracing::info!("Dry run, would copy: {}", plan);
                Ok(JobOutcome::Refused(RefusalReason::DryRun))
            }
            Verdict::Refused(reason) => {
                tracing::error!("Not running {:?}: {}", job.name, reason);
                Ok(JobOutcome::Refused(reason))
            }
            Verdict::Authorized => {
                tracing::info!(
                    "Copying {} to {}",
                    plan.source_path(),
                    plan.destination_path()
                );
                let exit = self
                    .tool
                    .run(&plan)
                    .with_context(|| format!("Running job {:?}", job.name))?;
                if !exit.success() {
                    tracing::error!("Copy failed for {:?}: {}", job.name, exit);
                }
                Ok(JobOutcome::Copied(exit))
            }
        }
    }

    /// Runs every job, logging and counting failures rather than stopping at them
    pub fn run(&self, jobs: &[Utf8PathBuf]) -> Summary {
        let mut summary = Summary::default();
        for path in jobs {
            tracing::info!("Running job from {}", path);
            let succeeded = match self.run_job(path) {
                Ok(outcome) => outcome.succeeded(),
                Err(error) => {
                    tracing::error!("{:#} (in {})", error, path);
                    false
                }
            };
            if succeeded {
                tracing::debug!("Job status OK {}", path);
            } else {
                tracing::warn!("Job status failed {}", path);
            }
            summary.record(succeeded);
        }
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_run_counts_as_success() {
        assert!(JobOutcome::Refused(RefusalReason::DryRun).succeeded());
        assert!(!JobOutcome::Refused(RefusalReason::SourceMissing).succeeded());
        assert!(JobOutcome::Copied(RobocopyExit::from_code(Some(1))).succeeded());
        assert!(!JobOutcome::Copied(RobocopyExit::from_code(Some(8))).succeeded());
    }

    #[test]
    fn summary() {
        let mut summary = Summary::default();
        summary.record(true);
        summary.record(false);
        summary.record(true);
        assert_eq!(summary.to_string(), "2 succeeded and 1 failed");
        assert!(!summary.all_succeeded());
    }
}
