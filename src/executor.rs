//! Running the candidate program and the reference solution on an instance.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};
use std::string::FromUtf8Error;
use std::thread;

use thiserror::Error;

/// Runs both programs of a stress run on the same input.
///
/// Closures with the signature of [`Executor::run`] implement this trait,
/// which is convenient for testing the driver without spawning processes.
pub trait Executor {
    /// Feeds `stdin` to `program` and `solution` and returns their standard
    /// output, in that order.
    ///
    /// # Errors
    ///
    /// Returns an [`ExecutionError`] if either program could not be run to
    /// successful completion.
    fn run(
        &mut self,
        program: &Path,
        solution: &Path,
        stdin: &str,
    ) -> Result<(String, String), ExecutionError>;
}

impl<F> Executor for F
where
    F: FnMut(&Path, &Path, &str) -> Result<(String, String), ExecutionError>,
{
    fn run(
        &mut self,
        program: &Path,
        solution: &Path,
        stdin: &str,
    ) -> Result<(String, String), ExecutionError> {
        self(program, solution, stdin)
    }
}

/// Executes both programs as child processes, one after the other.
///
/// Each executable is started without arguments. Its standard error is
/// captured and only reported if it exits unsuccessfully.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// Creates a new process executor.
    pub fn new() -> Self {
        Self
    }

    /// Runs a single executable with `stdin` as its standard input and
    /// returns its standard output.
    ///
    /// A program that exits before consuming all of its input is not an
    /// error, as long as it exits successfully.
    ///
    /// # Errors
    ///
    /// See [`ExecutionError`].
    pub fn run_one(&self, program: &Path, stdin: &str) -> Result<String, ExecutionError> {
        let mut child = Command::new(program)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutionError::Spawn {
                program: program.to_path_buf(),
                source,
            })?;
        let io_error = |source| ExecutionError::Io {
            program: program.to_path_buf(),
            source,
        };

        let mut input = child
            .stdin
            .take()
            .ok_or_else(|| io_error(io::Error::other("standard input was not captured")))?;

        // Feed the input from a separate thread so that a child filling its
        // output pipe before reading everything cannot block us.
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || input.write_all(stdin.as_bytes()));
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("input writer panicked")));
            (written, output)
        });
        let output = output.map_err(io_error)?;
        if let Err(err) = written {
            if err.kind() != io::ErrorKind::BrokenPipe {
                return Err(io_error(err));
            }
        }

        if !output.status.success() {
            return Err(ExecutionError::Exit {
                program: program.to_path_buf(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        String::from_utf8(output.stdout).map_err(|source| ExecutionError::NonUtf8 {
            program: program.to_path_buf(),
            source,
        })
    }
}

impl Executor for ProcessExecutor {
    fn run(
        &mut self,
        program: &Path,
        solution: &Path,
        stdin: &str,
    ) -> Result<(String, String), ExecutionError> {
        let program_output = self.run_one(program, stdin)?;
        tracing::trace!(program = %program.display(), output = ?program_output, "program finished");
        let solution_output = self.run_one(solution, stdin)?;
        tracing::trace!(solution = %solution.display(), output = ?solution_output, "solution finished");
        Ok((program_output, solution_output))
    }
}

/// Error raised when a program cannot be run to successful completion.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum ExecutionError {
    /// The executable could not be started.
    #[error("failed to start '{}'", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Communication with a running executable failed.
    #[error("I/O error while running '{}'", .program.display())]
    Io {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The executable exited unsuccessfully.
    #[error("'{}' exited with {status}: {}", .program.display(), .stderr.trim_end())]
    Exit {
        program: PathBuf,
        status: ExitStatus,
        stderr: String,
    },
    /// The executable wrote something other than UTF-8 to its standard output.
    #[error("'{}' wrote output that is not valid UTF-8", .program.display())]
    NonUtf8 {
        program: PathBuf,
        #[source]
        source: FromUtf8Error,
    },
}

impl ExecutionError {
    /// The executable that failed.
    pub fn program(&self) -> &Path {
        match self {
            ExecutionError::Spawn { program, .. }
            | ExecutionError::Io { program, .. }
            | ExecutionError::Exit { program, .. }
            | ExecutionError::NonUtf8 { program, .. } => program,
        }
    }
}
