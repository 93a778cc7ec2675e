//! Drives currently attached to the machine, and how a job finds one of them
//!
//! A [`DriveSource`] produces a snapshot list of [`DriveRecord`]s (letter, serial, label) once per
//! program run. Jobs never name a drive letter directly; instead [`match_drive`] selects a letter
//! from the snapshot by volume serial number or volume label.
//!
//! ```
//! use robowrap_drives::{match_drive, DriveRecord, DriveQuery};
//!
//! struct Wanted;
//! impl DriveQuery for Wanted {
//!     fn serial(&self) -> Option<&str> { None }
//!     fn label(&self) -> Option<&str> { Some("KINGSTON") }
//! }
//!
//! let drives = [
//!     DriveRecord::new('F', None, Some("KINGSTON"))?,
//!     DriveRecord::new('G', None, Some("KINGSTON"))?,
//! ];
//! assert_eq!(match_drive(&drives, &Wanted).map(|d| d.as_char()), Some('F'));
//! # Ok::<(), anyhow::Error>(())
//! ```
#![warn(missing_docs)]

use std::{fmt::Display, str::FromStr};

use anyhow::{anyhow, bail, Result};
use serde::Deserialize;

mod matcher;
mod system;
mod table;

pub use self::{
    matcher::{match_drive, DriveQuery},
    system::SystemDrives,
    table::DriveTable,
};

/// Anything that can list the drives currently attached
pub trait DriveSource {
    /// Returns the attached drives in enumeration order
    fn drives(&self) -> Result<Vec<DriveRecord>>;
}

/// A drive letter, `A` to `Z`, always held in upper case
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "String")]
pub struct DriveLetter(char);

impl DriveLetter {
    /// The letter itself
    pub fn as_char(&self) -> char {
        self.0
    }

    /// The drive designator, for example `C:`
    pub fn designator(&self) -> String {
        format!("{}:", self.0)
    }

    /// The root directory of the drive, for example `C:\`
    pub fn root(&self) -> String {
        format!("{}:\\", self.0)
    }
}

impl TryFrom<char> for DriveLetter {
    type Error = anyhow::Error;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        if value.is_ascii_alphabetic() {
            Ok(DriveLetter(value.to_ascii_uppercase()))
        } else {
            Err(anyhow!("Invalid drive letter: {:?}", value))
        }
    }
}

impl FromStr for DriveLetter {
    type Err = anyhow::Error;

    /// Parses `E`, `e:` or `E:\`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let letter = chars
            .next()
            .ok_or_else(|| anyhow!("Empty drive letter"))?;
        match chars.as_str() {
            "" | ":" | ":\\" | ":/" => letter.try_into(),
            _ => bail!("Invalid drive letter: {:?}", s),
        }
    }
}

impl TryFrom<String> for DriveLetter {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Display for DriveLetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single attached drive
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DriveRecord {
    /// The letter the drive is currently mounted as
    pub letter: DriveLetter,
    /// The volume serial number, in hex (e.g. `70DC81A0`)
    pub serial: Option<String>,
    /// The volume label (e.g. `KINGSTON`)
    pub label: Option<String>,
}

impl DriveRecord {
    /// Constructs a record, validating the letter
    pub fn new(letter: char, serial: Option<&str>, label: Option<&str>) -> Result<Self> {
        Ok(DriveRecord {
            letter: letter.try_into()?,
            serial: serial.map(ToOwned::to_owned),
            label: label.map(ToOwned::to_owned),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_parse_in_any_form() {
        for text in ["e", "E", "e:", "E:\\", "E:/"] {
            assert_eq!(text.parse::<DriveLetter>().unwrap().as_char(), 'E');
        }
        assert!("".parse::<DriveLetter>().is_err());
        assert!("EF".parse::<DriveLetter>().is_err());
        assert!("1".parse::<DriveLetter>().is_err());
    }

    #[test]
    fn letter_forms() {
        let letter = DriveLetter::try_from('c').unwrap();
        assert_eq!(letter.to_string(), "C");
        assert_eq!(letter.designator(), "C:");
        assert_eq!(letter.root(), "C:\\");
    }
}
