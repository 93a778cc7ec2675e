//! Running the copy tool and reading its exit code

use std::{
    fmt::Display,
    process::{Command, Stdio},
};

use anyhow::{Context, Result};
use robowrap_resolve::ExecutionPlan;

/// Something that can carry out an authorized [`ExecutionPlan`]
pub trait CopyTool {
    /// Runs the copy described by the plan, waiting for it to finish
    fn run(&self, plan: &ExecutionPlan) -> Result<RobocopyExit>;
}

/// Runs Robocopy, or a program taking the same arguments, as a child process
#[derive(Debug, Clone)]
pub struct Robocopy {
    program: String,
    show_output: bool,
}

impl Robocopy {
    /// Constructs a runner for the given executable, discarding its output
    pub fn new(program: impl Into<String>) -> Self {
        Robocopy {
            program: program.into(),
            show_output: false,
        }
    }

    /// Whether the tool's own output should pass through to the terminal
    pub fn show_output(self, show_output: bool) -> Self {
        Robocopy {
            show_output,
            ..self
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Builds the command for a plan without starting it
    pub fn command(&self, plan: &ExecutionPlan) -> Command {
        let mut command = Command::new(&self.program);
        command.args(plan.arguments());
        if !self.show_output {
            command.stdout(Stdio::null()).stderr(Stdio::null());
        }
        command
    }
}

impl Default for Robocopy {
    fn default() -> Self {
        Robocopy::new("robocopy")
    }
}

impl CopyTool for Robocopy {
    fn run(&self, plan: &ExecutionPlan) -> Result<RobocopyExit> {
        tracing::debug!("Command: {} {}", self.program, plan);
        let mut child = self
            .command(plan)
            .spawn()
            .with_context(|| format!("Starting {}", self.program))?;
        tracing::debug!("{} running (PID: {})", self.program, child.id());
        let status = child
            .wait()
            .with_context(|| format!("Waiting for {}", self.program))?;
        let exit = RobocopyExit::from_code(status.code());
        tracing::debug!("{} finished: {}", self.program, exit);
        Ok(exit)
    }
}

/// Robocopy's exit code, a set of bits
///
/// Codes below 8 mean every file was handled. A process killed by a signal has no code and is
/// treated as failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobocopyExit {
    code: Option<i32>,
}

impl RobocopyExit {
    pub const COPIED: i32 = 1;
    pub const EXTRA: i32 = 2;
    pub const MISMATCHED: i32 = 4;
    pub const FAILED: i32 = 8;
    pub const FATAL: i32 = 16;

    pub fn from_code(code: Option<i32>) -> Self {
        RobocopyExit { code }
    }

    pub fn code(&self) -> Option<i32> {
        self.code
    }

    fn has(&self, bit: i32) -> bool {
        self.code.map_or(false, |code| code & bit != 0)
    }

    /// One or more files were copied
    pub fn copied(&self) -> bool {
        self.has(Self::COPIED)
    }

    /// The destination has files the source does not
    pub fn extra(&self) -> bool {
        self.has(Self::EXTRA)
    }

    pub fn mismatched(&self) -> bool {
        self.has(Self::MISMATCHED)
    }

    /// Some files or directories could not be copied
    pub fn copy_failures(&self) -> bool {
        self.has(Self::FAILED)
    }

    /// Nothing was copied, usually from bad arguments or access being denied
    pub fn fatal(&self) -> bool {
        self.has(Self::FATAL)
    }

    pub fn success(&self) -> bool {
        matches!(self.code, Some(code) if (0..Self::FAILED).contains(&code))
    }
}

impl Display for RobocopyExit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(code) = self.code else {
            return write!(f, "terminated without an exit code");
        };
        write!(f, "exit code {code}")?;
        let notes: Vec<&str> = [
            (self.copied(), "files copied"),
            (self.extra(), "extra files"),
            (self.mismatched(), "mismatches"),
            (self.copy_failures(), "copy failures"),
            (self.fatal(), "fatal error"),
        ]
        .into_iter()
        .filter_map(|(set, note)| set.then_some(note))
        .collect();
        if code == 0 {
            write!(f, " (nothing to copy)")?;
        } else if !notes.is_empty() {
            write!(f, " ({})", notes.join(", "))?;
        }
        Ok(())
    }
}
