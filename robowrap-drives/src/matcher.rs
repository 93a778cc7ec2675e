use crate::{DriveLetter, DriveRecord};

/// What a job knows about the drive it wants
pub trait DriveQuery {
    /// The wanted volume serial number
    fn serial(&self) -> Option<&str>;

    /// The wanted volume label
    fn label(&self) -> Option<&str>;
}

/// Selects the letter of the drive wanted by `query`
///
/// A serial match always wins, even when a label is also given. Should the serial be missing from
/// `drives` (or not given) the label is tried instead. Both comparisons are case insensitive (labels
/// beyond ASCII too) and the first drive in enumeration order wins. Returns `None` when nothing
/// matches; it is up to the caller to decide whether that is an error.
pub fn match_drive(drives: &[DriveRecord], query: &impl DriveQuery) -> Option<DriveLetter> {
    if let Some(serial) = query.serial() {
        let wanted = normalize_serial(serial);
        let found = drives.iter().find(|drive| {
            drive
                .serial
                .as_deref()
                .map_or(false, |s| normalize_serial(s) == wanted)
        });
        if let Some(drive) = found {
            tracing::debug!("Serial {} found on drive {}", serial, drive.letter);
            return Some(drive.letter);
        }
        tracing::debug!("Serial {} not attached", serial);
    }
    if let Some(label) = query.label() {
        let wanted = label.to_lowercase();
        let found = drives.iter().find(|drive| {
            drive
                .label
                .as_deref()
                .map_or(false, |l| l.to_lowercase() == wanted)
        });
        if let Some(drive) = found {
            tracing::debug!("Label {} found on drive {}", label, drive.letter);
            return Some(drive.letter);
        }
        tracing::debug!("Label {} not attached", label);
    }
    None
}

/// `vol` prints serials as `70DC-81A0` where WMI reports `70DC81A0`
fn normalize_serial(serial: &str) -> String {
    serial
        .chars()
        .filter(|&c| c != '-')
        .map(|c| c.to_ascii_uppercase())
        .collect()
}
