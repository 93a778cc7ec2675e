//! Run Robocopy jobs against drives that move around.
//!
//! Removable disks, USB sticks and mapped shares rarely keep the same drive letter. A robowrap
//! job names its drives by volume serial number or volume label instead, and the letter is
//! found each time the job runs:
//!
//! ```yaml
//! name: Mirror My Stuff
//! source:
//!   serial: 70DC81A0
//!   path: MyStuff
//! destination:
//!   label: KINGSTON
//!   path: Backup\$COMPUTERNAME$\MyStuff
//!   flag: $drive$\Robocopy.flag
//! robocopy:
//!   options: /MIR /R:1 /W:1
//!   log: $dst_drive$\Logs\$timestamp$.log
//! ```
//!
//! Paths, options and logs may use `$VARIABLE$`s from the environment, and the variables derived
//! from the resolved endpoints (see [`robowrap_resolve::DERIVED_VARIABLES`]). Before anything is
//! copied the source must exist, the destination must be reachable, and any `flag` files must be
//! present; so a stray disk that happens to share a label is left alone unless it carries the
//! flag.
//!
//! The pieces:
//! * [`robowrap_config`] reads job files (YAML or TOML)
//! * [`robowrap_drives`] lists the attached drives and matches them to a job
//! * [`robowrap_resolve`] turns a job into an [`ExecutionPlan`](robowrap_resolve::ExecutionPlan)
//!   and decides whether it may run
//! * [`robocopy`] runs the plan, and [`batch`] runs many jobs in turn

pub mod batch;
pub mod robocopy;

pub use robowrap_config as config;
pub use robowrap_drives as drives;
pub use robowrap_filesystem as filesystem;
pub use robowrap_resolve as resolve;
