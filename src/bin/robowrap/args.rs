use camino::Utf8PathBuf;
use clap::Parser;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Run Robocopy in a world of changing drive letters",
    long_about = None
)]
pub struct CommandLineArgs {
    /// Job files to run (each can be a glob like "jobs/*.yaml")
    #[arg(required_unless_present = "drives")]
    pub jobs: Vec<String>,

    /// Compile and check every job, but don't run Robocopy
    #[arg(short, long)]
    pub dry_run: bool,

    /// Increase logging verbosity level (0: warn; 1: info; 2: debug, with Robocopy's output;
    /// 3: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// List information about the available drives and exit
    #[arg(long)]
    pub drives: bool,

    /// Read drives from a TOML table instead of asking the system
    #[arg(long, value_name = "FILE")]
    pub drive_table: Option<Utf8PathBuf>,

    /// The Robocopy executable to run
    #[arg(long, value_name = "PROGRAM", default_value = "robocopy")]
    pub robocopy: String,
}
