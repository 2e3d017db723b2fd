//! Offline validator for a binary, WebGPU-like GPU command-buffer stream.
//!
//! The crate is a pipeline of independent stages: [`parser`] turns a raw
//! byte stream into a [`command::Command`] sequence; [`validator`] replays
//! that sequence against a resource [`registry`] and pass/pipeline
//! [`state`] machine, appending to an [`issue::IssueList`]; [`diagnosis`]
//! runs read-only analyses over the validator's final state; [`json`]
//! serializes the diagnosis records for a caller that wants wire output
//! instead of the native types.
//!
//! ```no_run
//! use gpu_trace_validator::{parser, validator::Validator};
//!
//! # fn run(stream: &[u8]) -> Result<(), gpu_trace_validator::error::ParseError> {
//! let commands = parser::parse(stream)?;
//! let mut validator = Validator::new();
//! validator.validate(&commands);
//! if validator.has_errors() {
//!     for issue in validator.issues().iter() {
//!         eprintln!("{}: {}", issue.code, issue.message);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod descriptor;
pub mod diagnosis;
pub mod error;
pub mod issue;
pub mod json;
pub mod limits;
pub mod parser;
pub mod registry;
pub mod state;
pub mod validator;

mod le;

pub use error::ParseError;
pub use issue::{Issue, IssueList, Severity};
pub use limits::Limits;
pub use validator::Validator;
