use std::io::Write;
use std::process::{Command, ExitStatus, Stdio};

use log::debug;

use crate::environment::Environment;
use crate::error::ExecError;

/// A program and its arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Invocation {
            program: program.into(),
            args,
        }
    }

    /// Split an argument vector into program and arguments.
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        let mut argv = argv.into_iter();
        let program = argv.next()?;
        Some(Invocation {
            program,
            args: argv.collect(),
        })
    }

    fn command(&self, env: &Environment) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        env.apply_to(&mut command);
        command
    }
}

/// Spawns one child process at a time and waits for it.
pub trait ProcessRunner {
    /// Run to completion and return the exit code.
    fn run(&mut self, invocation: &Invocation, env: &Environment) -> Result<i32, ExecError>;
}

/// Children share the terminal: stdin, stdout and stderr are inherited.
#[derive(Debug, Clone, Copy, Default)]
pub struct InheritRunner;

impl ProcessRunner for InheritRunner {
    fn run(&mut self, invocation: &Invocation, env: &Environment) -> Result<i32, ExecError> {
        debug!("spawn {} ({} args)", invocation.program, invocation.args.len());
        let status = invocation
            .command(env)
            .status()
            .map_err(|source| ExecError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        Ok(exit_code(status))
    }
}

/// Children's stdout is collected into a writer. Stderr still goes to
/// the terminal and stdin is closed.
#[derive(Debug, Default)]
pub struct CaptureRunner<W: Write> {
    out: W,
}

impl<W: Write> CaptureRunner<W> {
    pub fn new(out: W) -> Self {
        CaptureRunner { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ProcessRunner for CaptureRunner<W> {
    fn run(&mut self, invocation: &Invocation, env: &Environment) -> Result<i32, ExecError> {
        debug!("spawn {} (captured)", invocation.program);
        let output = invocation
            .command(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| ExecError::Spawn {
                program: invocation.program.clone(),
                source,
            })?;
        self.out.write_all(&output.stdout)?;
        Ok(exit_code(output.status))
    }
}

/// Exit code of a finished child. A child killed by a signal reports
/// `128 + signal`, the way shells do.
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
