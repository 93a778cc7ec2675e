use std::collections::HashMap;

use chrono::{DateTime, TimeZone, Utc};
use robowrap_drives::DriveRecord;

use crate::{StackFrame, VariableSource};

/// Compiles a YAML job against the given drives and in-memory filesystem, asserting on the
/// resulting plan
macro_rules! assert_plan {
    {
        drives: { $($letter:literal => ($serial:expr, $label:expr)),* $(,)? }
        directories: [ $($directory:literal),* $(,)? ]
        files: [ $($file:literal),* $(,)? ]
        $(dry_run: $dry_run:expr,)?
        job: $job:expr,
        yields: {
            source: $source:literal,
            destination: $destination:literal,
            verdict: $verdict:expr $(,)?
        }
    } => {{
        #[allow(unused_imports)]
        use crate::{tests, JobCompiler, RefusalReason, Verdict, Endpoint};

        let drives: Vec<robowrap_drives::DriveRecord> = vec![
            $(robowrap_drives::DriveRecord::new($letter, $serial, $label)?,)*
        ];
        #[allow(unused_mut)]
        let mut fs = robowrap_filesystem::MemoryFilesystem::new();
        $(fs.create_directory_all($directory)?;)*
        $(fs.create_file($file)?;)*

        let job = robowrap_config::Job::from_yaml($job)?;
        let environment = tests::environment();
        let plan = JobCompiler::new(&drives, &fs, &environment)
            .dry_run(false $(|| $dry_run)?)
            .compile(&job, tests::now())?;

        assert_eq!(plan.source_path(), $source);
        assert_eq!(plan.destination_path(), $destination);
        assert_eq!(plan.verdict(), $verdict);
        Ok(())
    }};
}


/// A fixed environment, so tests don't depend on the machine they run on
pub fn environment() -> StackFrame<'static> {
    StackFrame::stack(VariableSource::Map(HashMap::from([
        ("USERNAME".to_owned(), "david".to_owned()),
        ("COMPUTERNAME".to_owned(), "DESKTOP".to_owned()),
        ("SYSTEMDRIVE".to_owned(), "C:".to_owned()),
    ])))
}

/// 2014-03-09T12:30:15Z, or 1394368215 seconds since the epoch
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2014, 3, 9, 12, 30, 15).unwrap()
}

/// `C:` is the system drive, `E:` a data disk, `F:` and `G:` identically labelled USB sticks
pub fn drives() -> anyhow::Result<Vec<DriveRecord>> {
    Ok(vec![
        DriveRecord::new('C', Some("70DC81A0"), None)?,
        DriveRecord::new('E', Some("2C724B02"), Some("data"))?,
        DriveRecord::new('F', Some("11112222"), Some("KINGSTON"))?,
        DriveRecord::new('G', Some("33334444"), Some("KINGSTON"))?,
    ])
}
