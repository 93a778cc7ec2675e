//! Configuration of robowrap jobs
//!
//! Each job lives in its own file, in YAML or TOML:
//! ```
//! # use robowrap_config::Job;
//! let job = Job::from_yaml(r#"
//! name: My stuff to USB
//! source:
//!   serial: 70DC81A0
//!   path: MyStuff
//!   flag: $path$\Robocopy.flag
//! destination:
//!   label: KINGSTON
//!   path: Backup\MyStuff
//! robocopy:
//!   options: /MIR /R:1 /W:1
//!   log: $dst_drive$\Logs\mystuff-$timestamp$.log
//! settings:
//!   time_format: "%Y-%m-%dT%H%M%S"
//! "#)?;
//! assert_eq!(job.source.serial.as_deref(), Some("70DC81A0"));
//! assert_eq!(job.destination.label.as_deref(), Some("KINGSTON"));
//! # Ok::<(), anyhow::Error>(())
//! ```
#![warn(missing_docs)]

mod job;

pub use job::{EndpointSpec, Job, JobFormat, RobocopySettings, Settings};
