#![warn(missing_docs)]
//! `playground-remote` - job submission and incremental output streaming for `playground-core`.
//!
//! A job is started by posting the current resources to the compile service, which answers with
//! an opaque identifier. The client then polls for new output lines until the service reports
//! completion, classifying each line with [`playground_core::DiagnosticParser`] as it arrives.
//!
//! The protocol logic is runtime-agnostic and performs no I/O of its own: it talks to a
//! [`Transport`]. [`HttpTransport`] is the blocking `reqwest` implementation used by the CLI.

pub mod config;
pub mod http;
pub mod poller;
pub mod session;
pub mod submit;
pub mod transport;
pub mod wire;

pub use config::{ClientConfig, ConfigError};
pub use http::HttpTransport;
pub use poller::{
    Clock, DEFAULT_POLL_INTERVAL, Job, OutputPoller, PollEvent, PollState, SystemClock,
};
pub use session::{JobTag, OutputReport, Session, SessionError};
pub use submit::{JobHandle, JobSubmitter, RunMode, RunParameters, SubmissionError};
pub use transport::{Endpoint, Transport, TransportError};
pub use wire::{
    CheckOutputRequest, CheckOutputResponse, ExampleResponse, ExampleSummary, SubmitRequest,
    SubmitResponse,
};
