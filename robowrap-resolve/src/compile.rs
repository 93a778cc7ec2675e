use std::{collections::HashMap, fmt::Display, fmt::Write as _};

use chrono::{
    format::{Item, StrftimeItems},
    DateTime, Utc,
};
use robowrap_config::{EndpointSpec, Job};
use robowrap_drives::DriveRecord;
use robowrap_filesystem::Filesystem;
use tracing::{span, Level};

use crate::{
    authorize, expand, resolve, Endpoint, RefusalReason, ResolveError, ResolvedEndpoint,
    StackFrame, VariableSource, Verdict,
};

/// The Robocopy file selection used when a job gives none
pub const DEFAULT_FILE_TYPES: &str = "*.*";

/// Compiles jobs against one snapshot of the attached drives
pub struct JobCompiler<'a, FS> {
    drives: &'a [DriveRecord],
    filesystem: &'a FS,
    environment: &'a StackFrame<'a>,
    dry_run: bool,
}

impl<'a, FS> JobCompiler<'a, FS>
where
    FS: Filesystem,
{
    /// Constructs a compiler; `environment` is the bottom frame of every expansion
    pub fn new(
        drives: &'a [DriveRecord],
        filesystem: &'a FS,
        environment: &'a StackFrame<'a>,
    ) -> Self {
        JobCompiler {
            drives,
            filesystem,
            environment,
            dry_run: false,
        }
    }

    /// Whether plans should always be refused, after making every check
    pub fn dry_run(self, dry_run: bool) -> Self {
        JobCompiler { dry_run, ..self }
    }

    /// Resolves both endpoints of `job`, expands its Robocopy settings and flags, and runs the
    /// safety gate
    ///
    /// Errors stop compilation before the safety gate is consulted. A plan that the gate refuses
    /// is still a successful compilation.
    pub fn compile(&self, job: &Job, now: DateTime<Utc>) -> Result<ExecutionPlan, ResolveError> {
        let span = span!(Level::DEBUG, "compile", job = job.name.as_str());
        let _guard = span.enter();

        let source = resolve(Endpoint::Source, &job.source, self.drives, self.environment)?;
        let destination = resolve(
            Endpoint::Destination,
            &job.destination,
            self.drives,
            self.environment,
        )?;

        let timestamp = format_timestamp(now, job.settings.time_format.as_deref())?;
        let job_variables = job_variables(&source, &destination, timestamp);
        let job_frame = self.environment.push(job_variables.clone().into());

        let options = match &job.robocopy.options {
            // Split before expanding, so paths with spaces stay one argument
            Some(options) => options
                .split_whitespace()
                .map(|option| expand(option, &job_frame))
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![],
        };
        let file_types = expand(
            job.robocopy.files.as_deref().unwrap_or(DEFAULT_FILE_TYPES),
            &job_frame,
        )?;
        let log_path = job
            .robocopy
            .log
            .as_deref()
            .map(|log| expand(log, &job_frame))
            .transpose()?;
        if let Some(log_path) = &log_path {
            tracing::debug!("Log will be saved to: {}", log_path);
        }

        let source = self.expand_flag(source, &job.source, &job_variables)?;
        let destination = self.expand_flag(destination, &job.destination, &job_variables)?;

        let verdict = authorize(self.filesystem, &source, &destination, self.dry_run);
        tracing::debug!("Verdict: {:?}", verdict);

        Ok(ExecutionPlan {
            name: job.name.clone(),
            source,
            destination,
            file_types,
            options,
            log_path,
            verdict,
        })
    }

    /// Flags see the environment, then the endpoint's own variables, then the job variables
    fn expand_flag(
        &self,
        resolved: ResolvedEndpoint,
        spec: &EndpointSpec,
        job_variables: &HashMap<String, String>,
    ) -> Result<ResolvedEndpoint, ResolveError> {
        let Some(flag) = &spec.flag else {
            return Ok(resolved);
        };
        let endpoint_frame = self.environment.push(resolved.variables());
        let flag_frame = endpoint_frame.push(job_variables.clone().into());
        let flag_path = expand(flag, &flag_frame)?;
        Ok(resolved.with_flag(flag_path))
    }
}

fn job_variables(
    source: &ResolvedEndpoint,
    destination: &ResolvedEndpoint,
    timestamp: String,
) -> HashMap<String, String> {
    let mut variables = HashMap::from([("timestamp".to_owned(), timestamp)]);
    for endpoint in [source, destination] {
        let prefix = endpoint.endpoint().prefix();
        variables.insert(format!("{prefix}_drive"), endpoint.drive().to_owned());
        variables.insert(format!("{prefix}_path"), endpoint.absolute_path().to_owned());
    }
    variables
}

/// Formats `now` with a strftime pattern, or as seconds since the epoch without one
fn format_timestamp(now: DateTime<Utc>, format: Option<&str>) -> Result<String, ResolveError> {
    let Some(format) = format else {
        return Ok(now.timestamp().to_string());
    };
    let invalid = || ResolveError::InvalidTimeFormat(format.to_owned());
    let items: Vec<Item> = StrftimeItems::new(format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }
    let mut timestamp = String::new();
    write!(timestamp, "{}", now.format_with_items(items.iter())).map_err(|_| invalid())?;
    Ok(timestamp)
}

/// Everything needed to run Robocopy for one job, and whether it may
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionPlan {
    name: String,
    source: ResolvedEndpoint,
    destination: ResolvedEndpoint,
    file_types: String,
    options: Vec<String>,
    log_path: Option<String>,
    verdict: Verdict,
}

impl ExecutionPlan {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &ResolvedEndpoint {
        &self.source
    }

    pub fn destination(&self) -> &ResolvedEndpoint {
        &self.destination
    }

    pub fn source_path(&self) -> &str {
        self.source.absolute_path()
    }

    pub fn destination_path(&self) -> &str {
        self.destination.absolute_path()
    }

    pub fn file_types(&self) -> &str {
        &self.file_types
    }

    /// Robocopy options, already expanded
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn log_path(&self) -> Option<&str> {
        self.log_path.as_deref()
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// True only if the safety gate passed outside of a dry run
    pub fn authorized(&self) -> bool {
        self.verdict == Verdict::Authorized
    }

    pub fn refusal(&self) -> Option<RefusalReason> {
        match self.verdict {
            Verdict::Authorized => None,
            Verdict::Refused(reason) => Some(reason),
        }
    }

    /// The arguments to pass to Robocopy, in order
    pub fn arguments(&self) -> Vec<String> {
        let mut arguments = vec![
            self.source_path().to_owned(),
            self.destination_path().to_owned(),
            self.file_types.clone(),
        ];
        arguments.extend(self.options.iter().cloned());
        if let Some(log_path) = &self.log_path {
            arguments.push(format!("/LOG:{log_path}"));
        }
        arguments
    }
}

/// The arguments as they would be typed, quoting any containing spaces
impl Display for ExecutionPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, argument) in self.arguments().iter().enumerate() {
            if index > 0 {
                write!(f, " ")?;
            }
            if argument.contains(char::is_whitespace) {
                write!(f, "\"{argument}\"")?;
            } else {
                write!(f, "{argument}")?;
            }
        }
        Ok(())
    }
}
