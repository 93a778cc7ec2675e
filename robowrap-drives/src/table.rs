use std::fmt::Display;

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::Deserialize;

use crate::{DriveRecord, DriveSource};

/// A fixed list of drives, usually read from a TOML drive table file
///
/// ```toml
/// [[drive]]
/// letter = "C"
/// serial = "70DC81A0"
///
/// [[drive]]
/// letter = "E"
/// serial = "2C724B02"
/// label = "data"
/// ```
#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct DriveTable {
    #[serde(rename = "drive", default)]
    drives: Vec<DriveRecord>,
}

impl DriveTable {
    /// Load a drive table from the specified file
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let table_context = || format!("Reading drive table {path:?}");
        let table_data = std::fs::read_to_string(path).with_context(table_context)?;
        DriveTable::try_from(table_data.as_str()).with_context(table_context)
    }

    /// The drives of this table, in order
    pub fn records(&self) -> &[DriveRecord] {
        &self.drives
    }
}

impl TryFrom<&str> for DriveTable {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(toml::from_str(value)?)
    }
}

impl From<Vec<DriveRecord>> for DriveTable {
    fn from(drives: Vec<DriveRecord>) -> Self {
        DriveTable { drives }
    }
}

impl DriveSource for DriveTable {
    fn drives(&self) -> Result<Vec<DriveRecord>> {
        Ok(self.drives.clone())
    }
}

/// Lays the drives out as a table of letter, serial and label
impl Display for DriveTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let serial_width = self
            .drives
            .iter()
            .filter_map(|drive| drive.serial.as_deref())
            .map(str::len)
            .chain([6])
            .max()
            .unwrap_or(6);
        writeln!(f, "{:5}  {:serial_width$}  Label", "Drive", "Serial")?;
        writeln!(f, "{:-<5}  {:-<serial_width$}  {:-<5}", "", "", "")?;
        for drive in &self.drives {
            writeln!(
                f,
                "{:5}  {:serial_width$}  {}",
                drive.letter.designator(),
                drive.serial.as_deref().unwrap_or("-"),
                drive.label.as_deref().unwrap_or("-"),
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use anyhow::Result;
    use camino::Utf8PathBuf;

    use super::*;
    use crate::DriveLetter;

    #[test]
    fn table_from_toml() -> Result<()> {
        let table: DriveTable = concat!(
            "[[drive]]\n",
            "letter = \"C\"\n",
            "serial = \"70DC81A0\"\n",
            "\n",
            "[[drive]]\n",
            "letter = \"e:\"\n",
            "serial = \"2C724B02\"\n",
            "label = \"data\"\n",
        )
        .try_into()?;
        let drives = table.drives()?;
        assert_eq!(drives.len(), 2);
        assert_eq!(drives[0], DriveRecord::new('C', Some("70DC81A0"), None)?);
        assert_eq!(drives[1].letter, DriveLetter::try_from('E')?);
        assert_eq!(drives[1].label.as_deref(), Some("data"));
        Ok(())
    }

    #[test]
    fn empty_table() -> Result<()> {
        let table: DriveTable = "".try_into()?;
        assert!(table.records().is_empty());
        Ok(())
    }

    #[test]
    fn invalid_letter_rejected() {
        let table: Result<DriveTable> = "[[drive]]\nletter = \"CD\"\n".try_into();
        assert!(table.is_err());
    }

    #[test]
    fn load_reports_file_name() -> Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "[[drive]]\nletter = \"F\"\nlabel = \"KINGSTON\"")?;
        let path = Utf8PathBuf::try_from(file.path().to_owned())?;
        let table = DriveTable::load(&path)?;
        assert_eq!(table.records()[0].label.as_deref(), Some("KINGSTON"));

        let missing = DriveTable::load(path.with_extension("missing")).unwrap_err();
        assert!(format!("{missing:#}").contains("Reading drive table"));
        Ok(())
    }

    #[test]
    fn display_lists_every_drive() -> Result<()> {
        let table = DriveTable::from(vec![
            DriveRecord::new('C', Some("70DC81A0"), None)?,
            DriveRecord::new('F', None, Some("KINGSTON"))?,
        ]);
        let text = table.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("C:"));
        assert!(lines[2].contains("70DC81A0"));
        assert!(lines[3].ends_with("KINGSTON"));
        Ok(())
    }
}
