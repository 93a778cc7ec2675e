use std::fmt::Display;

use robowrap_filesystem::{paths, Filesystem};

use crate::{Endpoint, ResolvedEndpoint};

/// Whether a compiled job may run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Authorized,
    Refused(RefusalReason),
}

/// Why a compiled job will not run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefusalReason {
    /// The source is not an existing directory
    SourceMissing,
    /// The destination can't be a directory: the drive or share is missing, or a file is in the way
    DestinationUnreachable,
    /// A flag file that must exist before a copy is missing
    FlagMissing(Endpoint),
    /// Every check passed, but this is a dry run
    DryRun,
}

impl Display for RefusalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefusalReason::SourceMissing => write!(f, "source doesn't exist"),
            RefusalReason::DestinationUnreachable => write!(f, "destination can't be reached"),
            RefusalReason::FlagMissing(endpoint) => {
                write!(f, "could not find {endpoint} safety flag")
            }
            RefusalReason::DryRun => write!(f, "dry run"),
        }
    }
}

/// Checks both resolved endpoints on the filesystem, stopping at the first problem
///
/// Only existence is checked; nothing is created. In a dry run every check is still made, but
/// even a job passing them all is refused.
pub fn authorize(
    filesystem: &impl Filesystem,
    source: &ResolvedEndpoint,
    destination: &ResolvedEndpoint,
    dry_run: bool,
) -> Verdict {
    match check(filesystem, source, destination) {
        Some(reason) => Verdict::Refused(reason),
        None if dry_run => Verdict::Refused(RefusalReason::DryRun),
        None => Verdict::Authorized,
    }
}

fn check(
    filesystem: &impl Filesystem,
    source: &ResolvedEndpoint,
    destination: &ResolvedEndpoint,
) -> Option<RefusalReason> {
    if !filesystem.is_directory(source.absolute_path()) {
        tracing::debug!("Source doesn't exist: {}", source.absolute_path());
        return Some(RefusalReason::SourceMissing);
    }

    let target = destination.absolute_path();
    if !creatable(filesystem, target) {
        tracing::debug!("Destination can't be reached: {}", target);
        return Some(RefusalReason::DestinationUnreachable);
    }

    for endpoint in [source, destination] {
        if let Some(flag) = endpoint.flag_path() {
            tracing::debug!("Checking flag: {}", flag);
            if !filesystem.is_file(flag) {
                return Some(RefusalReason::FlagMissing(endpoint.endpoint()));
            }
        }
    }
    None
}

/// Robocopy creates the whole destination tree, but not the drive or share it goes on, and not
/// through a file
///
/// The nearest part of the path that exists must be a directory.
fn creatable(filesystem: &impl Filesystem, path: &str) -> bool {
    let mut current = path;
    loop {
        if filesystem.is_directory(current) {
            return true;
        }
        if filesystem.exists(current) {
            return false;
        }
        match paths::parent(current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}
