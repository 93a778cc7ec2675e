//! Resolution of a job's endpoints into concrete paths, and the checks made before a copy
//!
//! A [`JobCompiler`] takes a parsed [`Job`][robowrap_config::Job] and the drives attached right
//! now, and produces an [`ExecutionPlan`]:
//!
//! 1. Each endpoint's path is expanded against the environment and joined onto the drive found
//!    by serial or label ([`resolve`]).
//! 2. The job variables (`$src_drive$`, `$dst_path$`, `$timestamp$`, ...) are derived from both
//!    endpoints and used to expand the Robocopy options, log path and flag files.
//! 3. The safety gate ([`authorize`]) checks the paths and flags on disk and gives its
//!    [`Verdict`].
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use robowrap_config::Job;
//! use robowrap_drives::DriveRecord;
//! use robowrap_filesystem::MemoryFilesystem;
//! use robowrap_resolve::{JobCompiler, StackFrame, VariableSource, Verdict};
//!
//! let drives = [
//!     DriveRecord::new('C', Some("70DC81A0"), None)?,
//!     DriveRecord::new('E', Some("2C724B02"), Some("data"))?,
//! ];
//! let mut fs = MemoryFilesystem::new();
//! fs.create_directory_all(r"C:\MyStuff")?;
//! fs.create_directory_all(r"E:\Backup")?;
//!
//! let job = Job::from_yaml(r"
//! name: My stuff
//! source: { serial: 70DC81A0, path: MyStuff }
//! destination: { serial: 2C724B02, path: Backup\MyStuff }
//! robocopy: { options: /MIR }
//! ")?;
//!
//! let environment = StackFrame::stack(VariableSource::Empty);
//! let plan = JobCompiler::new(&drives, &fs, &environment)
//!     .compile(&job, Utc.timestamp_opt(0, 0).unwrap())?;
//! assert_eq!(plan.verdict(), Verdict::Authorized);
//! assert_eq!(
//!     plan.arguments(),
//!     [r"C:\MyStuff", r"E:\Backup\MyStuff", "*.*", "/MIR"]
//! );
//! # Ok::<(), anyhow::Error>(())
//! ```

mod compile;
mod endpoint;
mod error;
mod gate;
mod stack;
mod template;

pub use self::{
    compile::{ExecutionPlan, JobCompiler, DEFAULT_FILE_TYPES},
    endpoint::{resolve, Endpoint, ResolvedEndpoint},
    error::ResolveError,
    gate::{authorize, RefusalReason, Verdict},
    stack::{StackFrame, VariableSource, DERIVED_VARIABLES},
    template::{expand, Identifier, Template, Token},
};

#[cfg(test)]
mod tests;
