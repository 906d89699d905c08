//! JSON bodies exchanged with the compile service.
//!
//! Field names follow the service verbatim. Optional fields default when the service omits
//! them, so partially filled responses still decode.

use playground_core::Resource;
use serde::{Deserialize, Serialize};

/// `GET /example/{name}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleResponse {
    /// Example name.
    #[serde(default)]
    pub name: Option<String>,
    /// Human-readable description.
    #[serde(default)]
    pub description: Option<String>,
    /// Source resources, markers included.
    pub resources: Vec<Resource>,
    /// Main program basename, if the example is runnable.
    #[serde(default)]
    pub main: Option<String>,
}

/// One entry of `GET /examples/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSummary {
    /// Example name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

/// `POST /check_program/` and `POST /run_program/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Example the files belong to.
    pub example_name: String,
    /// Current contents of every resource.
    pub files: Vec<Resource>,
    /// Main program basename.
    pub main: Option<String>,
    /// Extra command-line arguments for the job.
    pub extra_args: Vec<String>,
}

/// Reply to a submission. An empty identifier means the job was not started.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// Opaque job identifier.
    #[serde(default)]
    pub identifier: String,
    /// Status or rejection message.
    #[serde(default)]
    pub message: String,
}

/// `POST /check_output/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutputRequest {
    /// Job identifier.
    pub identifier: String,
    /// Number of output lines already received.
    pub already_read: usize,
}

/// New output of a job since `already_read`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CheckOutputResponse {
    /// Lines produced since the last poll.
    #[serde(default)]
    pub output_lines: Vec<String>,
    /// Exit status; meaningful once `completed`.
    #[serde(default)]
    pub status: i32,
    /// Whether the job has finished.
    pub completed: bool,
    /// Service message (`running`, `completed`, ...); the service sends `null` when it has none.
    #[serde(default)]
    pub message: Option<String>,
}
