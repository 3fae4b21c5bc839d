#![warn(missing_docs)]
//! `maxflow-stress` is a differential stress tester for programs computing
//! the maximum flow of a directed graph.
//!
//! A stress run generates random graph instances, feeds each one to a
//! candidate program and to a trusted reference solution, and checks that
//! both print exactly the same output. The first disagreement ends the run,
//! and is reported together with the instance that triggered it.
//!
//! The building blocks are:
//!
//! - [`GraphInstance`], the instance model and its text format.
//! - [`RandomGenerator`] and [`generate`], which draw random instances.
//! - The [`Executor`] trait, with [`ProcessExecutor`] running the programs as
//!   child processes.
//! - [`Driver`], which runs the trials and compares the outputs.
//!
//! Instances are written as
//!
//! ```text
//! <node_count> <edge_count>
//! <from_1> <to_1> <weight_1>
//! ...
//! ```
//!
//! and both programs are expected to compute the flow from node `1` to node
//! `node_count`.
//!
//! [`generate`]: crate::generator::generate
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//!
//! use maxflow_stress::executor::ExecutionError;
//! use maxflow_stress::{Config, Driver, InstanceLimits, RandomGenerator};
//!
//! let config = Config::new(10, "./candidate", "./reference");
//! let limits = InstanceLimits::new(20, 50, 100).unwrap();
//! let generator = RandomGenerator::with_limits(7, limits);
//!
//! // Stand-ins for the two programs: both count the input lines.
//! let executor = |_: &Path, _: &Path, stdin: &str| -> Result<(String, String), ExecutionError> {
//!     let answer = stdin.lines().count().to_string();
//!     Ok((answer.clone(), answer))
//! };
//!
//! let summary = Driver::new(config, generator, executor).run().unwrap();
//! assert_eq!(summary.trials, 10);
//! ```
//!
//! # Features
//!
//! - `serde` enables serialization and deserialization of instances and
//!   limits.
//! - `proptest` exposes strategies generating random instances.
//!

pub mod driver;
pub mod executor;
pub mod generator;
pub mod instance;

#[cfg(feature = "proptest")]
pub mod proptest;

#[doc(inline)]
pub use crate::driver::{Config, Driver, DriverState, RunSummary, StressError, TrialOutcome};
#[doc(inline)]
pub use crate::executor::{Executor, ProcessExecutor};
#[doc(inline)]
pub use crate::generator::{InstanceLimits, InstanceSource, RandomGenerator};
#[doc(inline)]
pub use crate::instance::{Edge, GraphInstance};
