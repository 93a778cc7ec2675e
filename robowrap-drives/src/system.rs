use anyhow::Result;

use crate::{DriveRecord, DriveSource};

/// The drives attached to this machine, as reported by the operating system
///
/// Every call enumerates afresh; drive letters move around between runs so nothing is cached.
/// Only Windows assigns drive letters. Elsewhere the list is empty and a drive table must be
/// supplied instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemDrives;

impl SystemDrives {
    /// Constructs access to the operating system's drive list
    pub fn new() -> Self {
        SystemDrives
    }
}

impl DriveSource for SystemDrives {
    #[cfg(windows)]
    fn drives(&self) -> Result<Vec<DriveRecord>> {
        let drives = windows::logical_drives();
        tracing::debug!("Enumerated {} logical drive(s)", drives.len());
        Ok(drives)
    }

    #[cfg(not(windows))]
    fn drives(&self) -> Result<Vec<DriveRecord>> {
        tracing::warn!("Drive letters are only enumerated on Windows, use a drive table instead");
        Ok(vec![])
    }
}

#[cfg(windows)]
mod windows {
    use std::{iter, ptr};

    use windows_sys::Win32::Storage::FileSystem::{GetLogicalDrives, GetVolumeInformationW};

    use crate::{DriveLetter, DriveRecord};

    const MAX_LABEL: usize = 261;

    pub(super) fn logical_drives() -> Vec<DriveRecord> {
        // SAFETY: takes no arguments, returns a bitmask of A: (bit 0) through Z:
        let mask = unsafe { GetLogicalDrives() };
        (0..26u8)
            .filter(|bit| mask & (1 << bit) != 0)
            .filter_map(|bit| DriveLetter::try_from(char::from(b'A' + bit)).ok())
            .map(volume_information)
            .collect()
    }

    fn volume_information(letter: DriveLetter) -> DriveRecord {
        let root: Vec<u16> = letter.root().encode_utf16().chain(iter::once(0)).collect();
        let mut label = [0u16; MAX_LABEL];
        let mut serial = 0u32;
        // SAFETY: root is NUL terminated, the label buffer length is passed alongside it, and
        // unused outputs are null
        let ok = unsafe {
            GetVolumeInformationW(
                root.as_ptr(),
                label.as_mut_ptr(),
                MAX_LABEL as u32,
                &mut serial,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                0,
            )
        };
        if ok == 0 {
            // No media (empty card reader, optical drive) or an unreachable network drive
            tracing::trace!("No volume information for {}", letter.root());
            return DriveRecord {
                letter,
                serial: None,
                label: None,
            };
        }
        let len = label.iter().position(|&c| c == 0).unwrap_or(MAX_LABEL);
        let label = String::from_utf16_lossy(&label[..len]);
        DriveRecord {
            letter,
            serial: Some(format!("{serial:08X}")),
            label: (!label.is_empty()).then_some(label),
        }
    }
}
