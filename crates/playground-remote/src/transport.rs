//! The network capability the job-streaming protocol runs on.
//!
//! Nothing in this crate except [`crate::http`] performs I/O. The submitter, poller and session
//! only call a [`Transport`], so hosts can plug in their own client and tests can script
//! replies.

use crate::wire::{
    CheckOutputRequest, CheckOutputResponse, ExampleResponse, ExampleSummary, SubmitRequest,
    SubmitResponse,
};

/// Path of the example listing.
pub const EXAMPLES_PATH: &str = "/examples/";
/// Path of the output polling endpoint.
pub const CHECK_OUTPUT_PATH: &str = "/check_output/";

/// Path of a single example.
pub fn example_path(name: &str) -> String {
    format!("/example/{name}")
}

/// Which submission endpoint a job goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    /// `/check_program/`: static checking only.
    Check,
    /// `/run_program/`: build and execute.
    Run,
}

impl Endpoint {
    /// Request path of the endpoint.
    pub fn path(self) -> &'static str {
        match self {
            Self::Check => "/check_program/",
            Self::Run => "/run_program/",
        }
    }
}

/// Failure to obtain a well-formed reply.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The service could not be reached (connection refused, timeout, DNS).
    #[error("service unreachable: {0}")]
    Unreachable(String),
    /// The service answered with a non-success HTTP status.
    #[error("service returned HTTP {0}")]
    Status(u16),
    /// The reply body did not decode.
    #[error("malformed reply: {0}")]
    Malformed(String),
    /// Any other client-side failure.
    #[error("{0}")]
    Other(String),
}

/// Request/reply access to the compile service.
pub trait Transport {
    /// `GET /example/{name}`
    fn fetch_example(&mut self, name: &str) -> Result<ExampleResponse, TransportError>;

    /// `GET /examples/`
    fn list_examples(&mut self) -> Result<Vec<ExampleSummary>, TransportError>;

    /// `POST /check_program/` or `POST /run_program/`
    fn submit(
        &mut self,
        endpoint: Endpoint,
        request: &SubmitRequest,
    ) -> Result<SubmitResponse, TransportError>;

    /// `POST /check_output/`
    fn check_output(
        &mut self,
        request: &CheckOutputRequest,
    ) -> Result<CheckOutputResponse, TransportError>;
}
