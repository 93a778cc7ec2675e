use thiserror::Error;

use crate::Endpoint;

/// Why a job could not be resolved
///
/// All of these are fatal to the job being compiled, but not to any other job in a batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// A `$name$` token with no value
    #[error("Undefined variable ${0}$")]
    UnresolvedVariable(String),

    /// The path is relative but there is no serial or label to find a drive with, or the path
    /// names a drive of its own as well as a serial or label
    #[error("Cannot tell which drive the {endpoint} path {path:?} is on; give a serial, a label or an absolute path")]
    AmbiguousEndpoint {
        /// The side of the job at fault
        endpoint: Endpoint,
        /// The path after environment variables were expanded
        path: String,
    },

    /// Neither the serial nor the label is attached right now
    #[error("Couldn't find the {endpoint} drive, tried {}", tried(.serial, .label))]
    DriveNotFound {
        /// The side of the job at fault
        endpoint: Endpoint,
        /// The serial that was looked for
        serial: Option<String>,
        /// The label that was looked for
        label: Option<String>,
    },

    /// The timestamp pattern is not understood by strftime
    #[error("Invalid time format {0:?}")]
    InvalidTimeFormat(String),

    /// The template could not be tokenised
    #[error("Invalid template {0:?}")]
    InvalidTemplate(String),
}

fn tried(serial: &Option<String>, label: &Option<String>) -> String {
    let tried: Vec<String> = serial
        .iter()
        .map(|serial| format!("serial {serial}"))
        .chain(label.iter().map(|label| format!("label {label}")))
        .collect();
    tried.join(", ")
}
