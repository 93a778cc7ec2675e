use std::{collections::HashMap, fmt::Display};

use robowrap_config::EndpointSpec;
use robowrap_drives::{match_drive, DriveLetter, DriveRecord};
use robowrap_filesystem::paths;

use crate::{expand, ResolveError, StackFrame, VariableSource};

/// Which side of a copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Copied from
    Source,
    /// Copied to
    Destination,
}

impl Endpoint {
    /// The prefix of this endpoint's job variables, as in `$src_path$`
    pub fn prefix(&self) -> &'static str {
        match self {
            Endpoint::Source => "src",
            Endpoint::Destination => "dst",
        }
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endpoint::Source => write!(f, "source"),
            Endpoint::Destination => write!(f, "destination"),
        }
    }
}

/// An endpoint after its drive has been found and its path made absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    endpoint: Endpoint,
    drive_letter: Option<DriveLetter>,
    drive: String,
    absolute_path: String,
    flag_path: Option<String>,
}

impl ResolvedEndpoint {
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// The letter the path is on, if it is on a lettered drive
    pub fn drive_letter(&self) -> Option<DriveLetter> {
        self.drive_letter
    }

    /// The value of `$drive$`: `E:`, a UNC share such as `\\nas\backup`, or empty
    pub fn drive(&self) -> &str {
        &self.drive
    }

    pub fn absolute_path(&self) -> &str {
        &self.absolute_path
    }

    /// The expanded flag file, once the job variables are known
    pub fn flag_path(&self) -> Option<&str> {
        self.flag_path.as_deref()
    }

    /// This endpoint's own variables, `$drive$` and `$path$`
    pub fn variables(&self) -> VariableSource {
        VariableSource::Map(HashMap::from([
            ("drive".to_owned(), self.drive.clone()),
            ("path".to_owned(), self.absolute_path.clone()),
        ]))
    }

    pub(crate) fn with_flag(self, flag_path: String) -> Self {
        ResolvedEndpoint {
            flag_path: Some(flag_path),
            ..self
        }
    }
}

/// Finds the absolute path described by `spec` among the attached `drives`
///
/// The path is expanded using only `environment`, since the derived variables depend on the
/// result. With a serial or label the path is taken relative to the root of the matched drive;
/// without either it must already be absolute.
pub fn resolve(
    endpoint: Endpoint,
    spec: &EndpointSpec,
    drives: &[DriveRecord],
    environment: &StackFrame,
) -> Result<ResolvedEndpoint, ResolveError> {
    let path = expand(&spec.path, environment)?;
    let letter = match_drive(drives, spec);
    let absolute_path = match letter {
        Some(letter) => {
            if !paths::split_drive(&path).0.is_empty() {
                return Err(ResolveError::AmbiguousEndpoint { endpoint, path });
            }
            paths::join(&letter.root(), &path)
        }
        None if spec.serial.is_some() || spec.label.is_some() => {
            return Err(ResolveError::DriveNotFound {
                endpoint,
                serial: spec.serial.clone(),
                label: spec.label.clone(),
            });
        }
        None if paths::is_absolute(&path) => path,
        None => return Err(ResolveError::AmbiguousEndpoint { endpoint, path }),
    };
    let drive_letter =
        letter.or_else(|| paths::drive_letter(&absolute_path).and_then(|c| c.try_into().ok()));
    let drive = paths::split_drive(&absolute_path).0.to_owned();
    tracing::debug!("Resolved {} to {}", endpoint, absolute_path);
    Ok(ResolvedEndpoint {
        endpoint,
        drive_letter,
        drive,
        absolute_path,
        flag_path: None,
    })
}
