// Shared helpers for the integration tests.
#![allow(dead_code)]

use async_trait::async_trait;
use log::{LevelFilter, Log, Metadata, Record};
use pistream::core::process_runner::{CommandSpec, CommandStatus, ProcessRunner, RunningProcess};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

/// What a faked process invocation does.
#[derive(Debug, Clone, Copy)]
pub enum FakeOutcome {
    Exit(CommandStatus),
    SpawnError,
}

impl FakeOutcome {
    pub fn exit(code: i32) -> Self {
        if code == 0 {
            FakeOutcome::Exit(CommandStatus::success())
        } else {
            FakeOutcome::Exit(CommandStatus::failure(code))
        }
    }
}

#[derive(Default)]
struct FakeState {
    runs: Vec<CommandSpec>,
    starts: Vec<CommandSpec>,
    run_outcomes: VecDeque<FakeOutcome>,
    start_outcome: Option<FakeOutcome>,
}

/// Records every invocation instead of spawning anything. Unscripted calls succeed.
#[derive(Default)]
pub struct FakeProcessRunner {
    state: Mutex<FakeState>,
}

impl FakeProcessRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(FakeProcessRunner::default())
    }

    /// Outcomes for successive `run` calls, in order.
    pub fn with_run_outcomes(outcomes: impl IntoIterator<Item = FakeOutcome>) -> Arc<Self> {
        let runner = FakeProcessRunner::default();
        runner.state.lock().unwrap().run_outcomes = outcomes.into_iter().collect();
        Arc::new(runner)
    }

    pub fn with_start_outcome(outcome: FakeOutcome) -> Arc<Self> {
        let runner = FakeProcessRunner::default();
        runner.state.lock().unwrap().start_outcome = Some(outcome);
        Arc::new(runner)
    }

    pub fn runs(&self) -> Vec<CommandSpec> {
        self.state.lock().unwrap().runs.clone()
    }

    pub fn starts(&self) -> Vec<CommandSpec> {
        self.state.lock().unwrap().starts.clone()
    }
}

fn spawn_error(command: &CommandSpec) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("{}: not found", command.program))
}

#[async_trait]
impl ProcessRunner for FakeProcessRunner {
    async fn run(&self, command: &CommandSpec) -> io::Result<CommandStatus> {
        let mut state = self.state.lock().unwrap();
        state.runs.push(command.clone());
        let outcome = state.run_outcomes.pop_front().unwrap_or(FakeOutcome::exit(0));
        match outcome {
            FakeOutcome::Exit(status) => Ok(status),
            FakeOutcome::SpawnError => Err(spawn_error(command)),
        }
    }

    fn start(&self, command: &CommandSpec) -> io::Result<Box<dyn RunningProcess>> {
        let mut state = self.state.lock().unwrap();
        state.starts.push(command.clone());
        match state.start_outcome.unwrap_or(FakeOutcome::exit(0)) {
            FakeOutcome::Exit(status) => Ok(Box::new(FakeProcess { status })),
            FakeOutcome::SpawnError => Err(spawn_error(command)),
        }
    }
}

pub struct FakeProcess {
    status: CommandStatus,
}

#[async_trait]
impl RunningProcess for FakeProcess {
    fn id(&self) -> Option<u32> {
        Some(4242)
    }

    async fn wait(&mut self) -> io::Result<CommandStatus> {
        Ok(self.status)
    }
}

/// Splits a `--set-...=k=v,k=v` argument into its `k=v` fields.
pub fn param_fields(arg: &str, prefix: &str) -> Vec<String> {
    arg.strip_prefix(prefix)
        .unwrap_or_else(|| panic!("'{}' does not start with '{}'", arg, prefix))
        .split(',')
        .map(str::to_string)
        .collect()
}

/// Keeps the formatted message of every log record.
pub struct CapturingLogger {
    records: Mutex<Vec<String>>,
}

static LOGGER: CapturingLogger = CapturingLogger {
    records: Mutex::new(Vec::new()),
};

impl Log for CapturingLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records.lock().unwrap().push(record.args().to_string());
    }

    fn flush(&self) {}
}

impl CapturingLogger {
    pub fn records(&self) -> Vec<String> {
        self.records.lock().unwrap().clone()
    }

    pub fn records_containing(&self, needle: &str) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|r| r.contains(needle))
            .collect()
    }
}

/// Installs the capturing logger for this test binary at trace level.
pub fn capture_logs() -> &'static CapturingLogger {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(LevelFilter::Trace);
    &LOGGER
}
