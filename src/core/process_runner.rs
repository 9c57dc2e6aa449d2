use async_trait::async_trait;
use std::fmt;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};

/// A fully built external command: program plus an immutable argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSpec {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.program, self.args.join(" "))
    }
}

/// Exit outcome of an external process, decoupled from `std::process::ExitStatus`
/// so fakes can construct one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandStatus {
    pub success: bool,
    pub code: Option<i32>, // None when terminated by a signal
}

impl CommandStatus {
    pub fn success() -> Self {
        CommandStatus {
            success: true,
            code: Some(0),
        }
    }

    pub fn failure(code: i32) -> Self {
        CommandStatus {
            success: false,
            code: Some(code),
        }
    }
}

impl From<ExitStatus> for CommandStatus {
    fn from(status: ExitStatus) -> Self {
        CommandStatus {
            success: status.success(),
            code: status.code(),
        }
    }
}

impl fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "exit status {}", code),
            None => f.write_str("terminated by signal"),
        }
    }
}

/// A started process the caller may wait on.
#[async_trait]
pub trait RunningProcess: Send {
    fn id(&self) -> Option<u32>;
    async fn wait(&mut self) -> io::Result<CommandStatus>;
}

/// Capability for executing external tools. Output streams are always inherited
/// from the calling process.
///
/// Implementations do not log arguments; callers log a redacted form themselves.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `command` to completion.
    async fn run(&self, command: &CommandSpec) -> io::Result<CommandStatus>;

    /// Starts `command` without waiting for it.
    fn start(&self, command: &CommandSpec) -> io::Result<Box<dyn RunningProcess>>;
}

#[derive(Debug, Clone, Default)]
pub struct SystemProcessRunner;

impl SystemProcessRunner {
    pub fn new() -> Self {
        SystemProcessRunner
    }

    fn build(command: &CommandSpec) -> Command {
        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        cmd
    }
}

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, command: &CommandSpec) -> io::Result<CommandStatus> {
        let mut child = Self::build(command).spawn()?;
        Ok(child.wait().await?.into())
    }

    fn start(&self, command: &CommandSpec) -> io::Result<Box<dyn RunningProcess>> {
        let child = Self::build(command).spawn()?;
        Ok(Box::new(SystemProcess { child }))
    }
}

struct SystemProcess {
    child: Child,
}

#[async_trait]
impl RunningProcess for SystemProcess {
    fn id(&self) -> Option<u32> {
        self.child.id()
    }

    async fn wait(&mut self) -> io::Result<CommandStatus> {
        Ok(self.child.wait().await?.into())
    }
}
