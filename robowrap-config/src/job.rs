use anyhow::{anyhow, Context, Result};
use camino::Utf8Path;
use robowrap_drives::DriveQuery;
use serde::{Deserialize, Deserializer};

/// Deserialization of a job file
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// A name for reporting
    pub name: String,

    /// Where to copy from
    pub source: EndpointSpec,

    /// Where to copy to
    pub destination: EndpointSpec,

    /// How to run Robocopy
    #[serde(default)]
    pub robocopy: RobocopySettings,

    /// General job settings
    #[serde(default)]
    pub settings: Settings,
}

/// One side of a copy: the drive, found by serial and/or label, and a path on it
///
/// Without a serial or label the path must be absolute.
#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct EndpointSpec {
    /// Volume serial number, e.g. `70DC81A0`
    #[serde(default, deserialize_with = "serial_number")]
    pub serial: Option<String>,

    /// Volume label, e.g. `KINGSTON`
    #[serde(alias = "name")]
    pub label: Option<String>,

    /// The path on the drive (or an absolute path), which may use `$VARIABLE$`s
    pub path: String,

    /// A file that must exist before the job may run, e.g. `$drive$\Robocopy.flag`
    pub flag: Option<String>,
}

/// Settings passed through to Robocopy
#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct RobocopySettings {
    /// Space separated options, e.g. `/MIR /R:1 /W:1`
    pub options: Option<String>,

    /// File selection, `*.*` if not given
    pub files: Option<String>,

    /// A path for Robocopy's log, passed as `/LOG:<path>`
    pub log: Option<String>,
}

/// General job settings
#[derive(Deserialize, Default, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// A strftime pattern for `$timestamp$`; epoch seconds if not given
    pub time_format: Option<String>,
}

/// The formats a job file may be written in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFormat {
    /// `.yaml` or `.yml`
    Yaml,
    /// `.toml`
    Toml,
}

impl JobFormat {
    /// Chooses the format from the file extension, if it is a job file at all
    pub fn from_path(path: impl AsRef<Utf8Path>) -> Option<Self> {
        match path.as_ref().extension()?.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(JobFormat::Yaml),
            "toml" => Some(JobFormat::Toml),
            _ => None,
        }
    }
}

impl Job {
    /// Load a job from the specified file, in the format given by its extension
    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let job_context = || format!("Reading job file {path:?}");
        let format = JobFormat::from_path(path)
            .ok_or_else(|| anyhow!("Unrecognised job file extension"))
            .with_context(job_context)?;
        let job_data = std::fs::read_to_string(path).with_context(job_context)?;
        let job = match format {
            JobFormat::Yaml => Job::from_yaml(&job_data),
            JobFormat::Toml => Job::from_toml(&job_data),
        }
        .with_context(job_context)?;
        tracing::debug!("Loaded job {:?} from {}", job.name, path);
        Ok(job)
    }

    /// Parse a job from YAML
    pub fn from_yaml(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parse a job from TOML
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }
}

impl DriveQuery for EndpointSpec {
    fn serial(&self) -> Option<&str> {
        self.serial.as_deref()
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}

/// Accepts serials written without quotes, where an all-digit serial reads as a number
fn serial_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Serial {
        Text(String),
        Number(u64),
    }

    Ok(Option::<Serial>::deserialize(deserializer)?.map(|serial| match serial {
        Serial::Text(text) => text,
        Serial::Number(number) => format!("{number:08}"),
    }))
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use super::*;

    #[test]
    fn minimal_yaml() -> Result<()> {
        let job = Job::from_yaml(indoc! {r#"
            name: Minimal
            source:
              path: C:\MyStuff
            destination:
              serial: 2C724B02
              path: Backup\MyStuff
        "#})?;
        assert_eq!(job.name, "Minimal");
        assert_eq!(job.source.path, "C:\\MyStuff");
        assert_eq!(job.source.serial, None);
        assert_eq!(job.destination.serial.as_deref(), Some("2C724B02"));
        assert_eq!(job.robocopy, RobocopySettings::default());
        assert_eq!(job.settings.time_format, None);
        Ok(())
    }

    #[test]
    fn name_is_an_alias_for_label() -> Result<()> {
        let job = Job::from_yaml(indoc! {"
            name: Aliased
            source:
              name: KINGSTON
              path: Photos
            destination:
              label: data
              path: Photos
        "})?;
        assert_eq!(job.name, "Aliased");
        assert_eq!(job.source.label.as_deref(), Some("KINGSTON"));
        assert_eq!(job.destination.label.as_deref(), Some("data"));
        Ok(())
    }

    #[test]
    fn numeric_serial() -> Result<()> {
        let job = Job::from_yaml(indoc! {"
            name: Digits
            source:
              serial: 01234567
              path: x
            destination:
              serial: 12345678
              path: y
        "})?;
        assert_eq!(job.source.serial.as_deref(), Some("01234567"));
        assert_eq!(job.destination.serial.as_deref(), Some("12345678"));
        Ok(())
    }

    #[test]
    fn full_toml() -> Result<()> {
        let job = Job::from_toml(indoc! {r#"
            name = "Nightly"

            [source]
            serial = "70DC81A0"
            path = "MyStuff"
            flag = '$path$\Robocopy.flag'

            [destination]
            label = "KINGSTON"
            path = 'Backup\MyStuff'

            [robocopy]
            options = "/MIR /R:1"
            files = "*.doc"
            log = '$dst_drive$\robocopy.log'

            [settings]
            time_format = "%Y%m%d"
        "#})?;
        assert_eq!(job.source.flag.as_deref(), Some("$path$\\Robocopy.flag"));
        assert_eq!(job.robocopy.options.as_deref(), Some("/MIR /R:1"));
        assert_eq!(job.robocopy.files.as_deref(), Some("*.doc"));
        assert_eq!(job.robocopy.log.as_deref(), Some("$dst_drive$\\robocopy.log"));
        assert_eq!(job.settings.time_format.as_deref(), Some("%Y%m%d"));
        Ok(())
    }

    #[test]
    fn path_required() {
        let job = Job::from_yaml(indoc! {"
            name: No path
            source:
              serial: 70DC81A0
            destination:
              path: E:\\
        "});
        assert!(job.unwrap_err().to_string().contains("path"));
    }

    #[test]
    fn formats_by_extension() {
        assert_eq!(JobFormat::from_path("jobs/a.yaml"), Some(JobFormat::Yaml));
        assert_eq!(JobFormat::from_path("jobs/a.YML"), Some(JobFormat::Yaml));
        assert_eq!(JobFormat::from_path("jobs/a.toml"), Some(JobFormat::Toml));
        assert_eq!(JobFormat::from_path("jobs/a.txt"), None);
        assert_eq!(JobFormat::from_path("jobs/yaml"), None);
    }

    #[test]
    fn endpoint_is_a_drive_query() {
        let spec = EndpointSpec {
            serial: Some("70DC81A0".into()),
            label: None,
            path: "MyStuff".into(),
            flag: None,
        };
        assert_eq!(DriveQuery::serial(&spec), Some("70DC81A0"));
        assert_eq!(DriveQuery::label(&spec), None);
    }
}
