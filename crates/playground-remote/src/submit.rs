//! Job submission.

use crate::transport::{Endpoint, Transport, TransportError};
use crate::wire::SubmitRequest;
use playground_core::Resource;
use std::collections::HashSet;

/// Whether a job only checks the program or also runs it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Static checking.
    #[default]
    Check,
    /// Build and execute.
    Run,
}

impl RunMode {
    /// Endpoint the mode submits to.
    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::Check => Endpoint::Check,
            Self::Run => Endpoint::Run,
        }
    }
}

/// How a job should be started.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunParameters {
    /// Check or run.
    pub mode: RunMode,
    /// Main program basename; `None` lets the session use the example's own.
    pub main: Option<String>,
    /// Extra command-line arguments.
    pub extra_args: Vec<String>,
}

impl RunParameters {
    /// Parameters for a check job.
    pub fn check() -> Self {
        Self::default()
    }

    /// Parameters for a run job.
    pub fn run(main: Option<String>) -> Self {
        Self {
            mode: RunMode::Run,
            main,
            extra_args: Vec::new(),
        }
    }

    /// Append extra arguments.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Self {
        self.extra_args.extend(args);
        self
    }
}

/// A job accepted by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// Opaque job identifier.
    pub identifier: String,
    /// Message returned with the identifier.
    pub message: String,
}

/// Why a job could not be started.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    /// The request did not complete.
    #[error("submission failed: {0}")]
    Transport(#[from] TransportError),
    /// The service answered without a job identifier.
    #[error("submission rejected: {0}")]
    Rejected(String),
    /// Two resources share a basename.
    #[error("duplicate resource basename `{0}`")]
    DuplicateBasename(String),
    /// No example is loaded.
    #[error("no example loaded")]
    NoExample,
}

/// Submits the resources of one example.
#[derive(Debug, Clone)]
pub struct JobSubmitter {
    example_name: String,
}

impl JobSubmitter {
    /// Create a submitter for `example_name`.
    pub fn new(example_name: impl Into<String>) -> Self {
        Self {
            example_name: example_name.into(),
        }
    }

    /// Example the submitter sends jobs for.
    pub fn example_name(&self) -> &str {
        &self.example_name
    }

    /// Build the request body for `resources`.
    pub fn request(
        &self,
        resources: Vec<Resource>,
        params: &RunParameters,
    ) -> Result<SubmitRequest, SubmissionError> {
        let mut seen = HashSet::new();
        for resource in &resources {
            if !seen.insert(resource.basename.as_str()) {
                return Err(SubmissionError::DuplicateBasename(resource.basename.clone()));
            }
        }

        Ok(SubmitRequest {
            example_name: self.example_name.clone(),
            files: resources,
            main: params.main.clone(),
            extra_args: params.extra_args.clone(),
        })
    }

    /// Send `resources` to the endpoint selected by `params`.
    pub fn submit<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        resources: Vec<Resource>,
        params: &RunParameters,
    ) -> Result<JobHandle, SubmissionError> {
        let request = self.request(resources, params)?;
        let endpoint = params.mode.endpoint();
        let response = transport.submit(endpoint, &request).map_err(|err| {
            log::warn!("submission to {} failed: {err}", endpoint.path());
            err
        })?;

        if response.identifier.is_empty() {
            return Err(SubmissionError::Rejected(response.message));
        }
        log::debug!(
            "job {} started for `{}`: {}",
            response.identifier,
            self.example_name,
            response.message
        );
        Ok(JobHandle {
            identifier: response.identifier,
            message: response.message,
        })
    }
}
