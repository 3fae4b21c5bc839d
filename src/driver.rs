//! The differential stress run.
//!
//! A [`Driver`] repeats trials until the configured number of them has
//! passed. Every trial draws a fresh instance, runs the candidate program and
//! the reference solution on it, and compares both outputs byte for byte. The
//! run stops at the first trial that does not pass.
//!
//! The driver is a small state machine:
//!
//! ```text
//! Ready -> Generating -> Executing -> Comparing -> Ready
//!   |                        |            |
//!   v                        v            v
//! Completed                Failed      Failed
//! ```
//!
//! [`Driver::run`] steps it until it reaches a terminal state, while
//! [`Driver::step`] performs a single transition.

use std::mem;
use std::path::PathBuf;

use thiserror::Error;

use crate::executor::{ExecutionError, Executor};
use crate::generator::InstanceSource;
use crate::instance::GraphInstance;

/// Parameters of a stress run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Number of trials that must pass.
    pub iterations: usize,
    /// The candidate program.
    pub program: PathBuf,
    /// The trusted reference solution.
    pub solution: PathBuf,
}

impl Config {
    /// Creates a new configuration.
    pub fn new(iterations: usize, program: impl Into<PathBuf>, solution: impl Into<PathBuf>) -> Self {
        Self {
            iterations,
            program: program.into(),
            solution: solution.into(),
        }
    }
}

/// State of a [`Driver`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DriverState {
    /// Waiting to start the next trial.
    Ready,
    /// About to draw the instance of the current trial.
    Generating,
    /// About to run both programs on `instance`.
    Executing {
        /// The instance of the current trial.
        instance: GraphInstance,
    },
    /// About to compare the outputs of both programs.
    Comparing {
        /// The instance of the current trial.
        instance: GraphInstance,
        /// Standard output of the candidate program.
        candidate_output: String,
        /// Standard output of the reference solution.
        reference_output: String,
    },
    /// Every trial passed.
    Completed,
    /// A trial failed. The failure is returned by [`Driver::run`].
    Failed,
}

impl DriverState {
    /// Whether the driver has stopped.
    pub fn is_terminal(&self) -> bool {
        matches!(self, DriverState::Completed | DriverState::Failed)
    }
}

/// Result of a single trial.
#[derive(Debug)]
pub enum TrialOutcome {
    /// Both programs printed the same output.
    Pass,
    /// The programs disagree on `instance`.
    Mismatch {
        /// The instance both programs were run on.
        instance: GraphInstance,
        /// Standard output of the candidate program.
        candidate_output: String,
        /// Standard output of the reference solution.
        reference_output: String,
    },
    /// One of the programs could not be run on `instance`.
    ExecutionFailed {
        /// The instance both programs were run on.
        instance: GraphInstance,
        /// What went wrong.
        cause: ExecutionError,
    },
}

impl TrialOutcome {
    /// Compares the outputs of both programs.
    pub fn compare(
        instance: GraphInstance,
        candidate_output: String,
        reference_output: String,
    ) -> Self {
        if candidate_output == reference_output {
            TrialOutcome::Pass
        } else {
            TrialOutcome::Mismatch {
                instance,
                candidate_output,
                reference_output,
            }
        }
    }

    /// Whether the trial passed.
    pub fn is_pass(&self) -> bool {
        matches!(self, TrialOutcome::Pass)
    }

    /// Converts a failed outcome into the error of a stress run, numbering it
    /// as the `trial`-th trial. Returns `None` for a passing trial.
    pub fn into_error(self, trial: usize) -> Option<StressError> {
        match self {
            TrialOutcome::Pass => None,
            TrialOutcome::Mismatch {
                instance,
                candidate_output,
                reference_output,
            } => Some(StressError::Mismatch {
                trial,
                instance,
                candidate_output,
                reference_output,
            }),
            TrialOutcome::ExecutionFailed { instance, cause } => Some(StressError::Execution {
                trial,
                instance,
                source: cause,
            }),
        }
    }
}

/// Summary of a stress run in which every trial passed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of trials that were run.
    pub trials: usize,
}

/// Error that ends a stress run. Trials are numbered from 1.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum StressError {
    /// The candidate and the reference printed different outputs.
    #[error(
        "trial {trial}: outputs differ\n  program:  {candidate_output:?}\n  solution: {reference_output:?}"
    )]
    Mismatch {
        trial: usize,
        instance: GraphInstance,
        candidate_output: String,
        reference_output: String,
    },
    /// One of the programs could not be run.
    #[error("trial {trial}: could not run both programs")]
    Execution {
        trial: usize,
        instance: GraphInstance,
        #[source]
        source: ExecutionError,
    },
}

impl StressError {
    /// The number of the failing trial.
    pub fn trial(&self) -> usize {
        match self {
            StressError::Mismatch { trial, .. } | StressError::Execution { trial, .. } => *trial,
        }
    }

    /// The instance of the failing trial.
    pub fn instance(&self) -> &GraphInstance {
        match self {
            StressError::Mismatch { instance, .. } | StressError::Execution { instance, .. } => {
                instance
            }
        }
    }
}

/// Runs a differential stress test.
#[derive(Debug)]
pub struct Driver<S, E> {
    config: Config,
    source: S,
    executor: E,
    state: DriverState,
    trials_run: usize,
    failure: Option<StressError>,
}

impl<S, E> Driver<S, E>
where
    S: InstanceSource,
    E: Executor,
{
    /// Creates a driver in the [`DriverState::Ready`] state.
    pub fn new(config: Config, source: S, executor: E) -> Self {
        Self {
            config,
            source,
            executor,
            state: DriverState::Ready,
            trials_run: 0,
            failure: None,
        }
    }

    /// The configuration of the run.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> &DriverState {
        &self.state
    }

    /// Number of trials that passed so far.
    #[inline]
    pub fn trials_run(&self) -> usize {
        self.trials_run
    }

    /// The failure that stopped the run, once in [`DriverState::Failed`].
    #[inline]
    pub fn failure(&self) -> Option<&StressError> {
        self.failure.as_ref()
    }

    /// Performs a single state transition and returns the new state.
    ///
    /// Terminal states are left unchanged.
    pub fn step(&mut self) -> &DriverState {
        let state = mem::replace(&mut self.state, DriverState::Ready);
        self.state = match state {
            DriverState::Ready if self.trials_run < self.config.iterations => {
                DriverState::Generating
            }
            DriverState::Ready => DriverState::Completed,
            DriverState::Generating => DriverState::Executing {
                instance: self.next_instance(),
            },
            DriverState::Executing { instance } => match self.execute(&instance) {
                Ok((candidate_output, reference_output)) => DriverState::Comparing {
                    instance,
                    candidate_output,
                    reference_output,
                },
                Err(cause) => self.fail(TrialOutcome::ExecutionFailed { instance, cause }),
            },
            DriverState::Comparing {
                instance,
                candidate_output,
                reference_output,
            } => match TrialOutcome::compare(instance, candidate_output, reference_output) {
                TrialOutcome::Pass => {
                    self.trials_run += 1;
                    DriverState::Ready
                }
                failure => self.fail(failure),
            },
            terminal @ (DriverState::Completed | DriverState::Failed) => terminal,
        };
        &self.state
    }

    /// Runs one complete trial, independently of the state machine.
    ///
    /// Unlike [`Driver::run`], this lets the caller decide what to do with a
    /// failing trial, e.g. keep going and collect every failure. A passing
    /// trial counts towards [`Driver::trials_run`].
    pub fn run_trial(&mut self) -> TrialOutcome {
        let instance = self.next_instance();
        let outcome = match self.execute(&instance) {
            Ok((candidate_output, reference_output)) => {
                TrialOutcome::compare(instance, candidate_output, reference_output)
            }
            Err(cause) => TrialOutcome::ExecutionFailed { instance, cause },
        };
        if outcome.is_pass() {
            self.trials_run += 1;
        }
        outcome
    }

    /// Runs trials until the configured number has passed or one fails.
    ///
    /// # Errors
    ///
    /// Returns the first failing trial as a [`StressError`].
    #[tracing::instrument(skip_all, fields(iterations = self.config.iterations))]
    pub fn run(mut self) -> Result<RunSummary, StressError> {
        while !self.step().is_terminal() {}

        match self.failure.take() {
            Some(err) => {
                tracing::warn!(trial = err.trial(), "stress run failed");
                Err(err)
            }
            None => {
                tracing::info!(trials = self.trials_run, "all trials passed");
                Ok(RunSummary {
                    trials: self.trials_run,
                })
            }
        }
    }

    fn next_instance(&mut self) -> GraphInstance {
        let instance = self.source.next_instance();
        tracing::debug!(
            trial = self.trials_run + 1,
            nodes = instance.node_count(),
            edges = instance.edge_count(),
            "generated instance"
        );
        instance
    }

    fn execute(&mut self, instance: &GraphInstance) -> Result<(String, String), ExecutionError> {
        let input = instance.to_string();
        self.executor
            .run(&self.config.program, &self.config.solution, &input)
    }

    fn fail(&mut self, outcome: TrialOutcome) -> DriverState {
        self.failure = outcome.into_error(self.trials_run + 1);
        DriverState::Failed
    }
}
