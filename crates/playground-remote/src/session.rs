//! One playground session: a loaded example and the job currently streaming output for it.
//!
//! Starting a job supersedes the previous one. Every job gets a fresh [`JobTag`]; replies
//! delivered with an older tag are dropped, so a slow reply to an abandoned job can never leak
//! into the report of the current one.

use crate::config::ClientConfig;
use crate::poller::{Clock, OutputPoller, PollEvent};
use crate::submit::{JobSubmitter, RunParameters, SubmissionError};
use crate::transport::{Transport, TransportError};
use crate::wire::CheckOutputResponse;
use playground_core::{OutputLine, RunSummary, Workspace, WorkspaceError};
use std::time::{Duration, Instant};

/// Identifies one job started by a [`Session`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JobTag(u64);

impl JobTag {
    /// Raw tag value.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Accumulated output of the current job.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputReport {
    /// Output lines in arrival order.
    pub lines: Vec<OutputLine>,
    /// Final verdict, once the job completed.
    pub summary: Option<RunSummary>,
    /// The failure that stopped polling, if any.
    pub error: Option<TransportError>,
}

impl OutputReport {
    /// Returns `true` once the job completed or failed.
    pub fn is_finished(&self) -> bool {
        self.summary.is_some() || self.error.is_some()
    }

    fn record(&mut self, event: &PollEvent) {
        match event {
            PollEvent::Line(line) => self.lines.push(line.clone()),
            PollEvent::Finished(summary) => self.summary = Some(*summary),
            PollEvent::Failed(err) => self.error = Some(err.clone()),
        }
    }
}

/// Errors loading an example.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The example could not be fetched.
    #[error("failed to fetch example: {0}")]
    Transport(#[from] TransportError),
    /// The example's resources could not be opened.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

/// Owns the workspace of a loaded example and drives its jobs.
#[derive(Debug)]
pub struct Session {
    workspace: Workspace,
    example_name: Option<String>,
    main: Option<String>,
    next_tag: u64,
    current: Option<(JobTag, OutputPoller)>,
    report: OutputReport,
    poll_interval: Duration,
}

impl Session {
    /// Create an empty session.
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            workspace: Workspace::new(config.marker_syntax()),
            example_name: None,
            main: None,
            next_tag: 0,
            current: None,
            report: OutputReport::default(),
            poll_interval: config.poll_interval(),
        }
    }

    /// The resources being edited.
    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Mutable access to the resources being edited.
    pub fn workspace_mut(&mut self) -> &mut Workspace {
        &mut self.workspace
    }

    /// Name of the loaded example.
    pub fn example_name(&self) -> Option<&str> {
        self.example_name.as_deref()
    }

    /// Main program basename of the loaded example.
    pub fn main(&self) -> Option<&str> {
        self.main.as_deref()
    }

    /// Output of the current job.
    pub fn report(&self) -> &OutputReport {
        &self.report
    }

    /// Tag of the current job.
    pub fn current_job(&self) -> Option<JobTag> {
        self.current.as_ref().map(|(tag, _)| *tag)
    }

    /// Poller of the current job.
    pub fn poller(&self) -> Option<&OutputPoller> {
        self.current.as_ref().map(|(_, poller)| poller)
    }

    /// Fetch example `name` and open its resources, markers extracted.
    ///
    /// Any running job is abandoned.
    pub fn load_example<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        name: &str,
    ) -> Result<(), SessionError> {
        let example = transport.fetch_example(name)?;
        self.workspace.open(example.resources)?;
        self.example_name = Some(example.name.unwrap_or_else(|| name.to_string()));
        self.main = example.main.filter(|m| !m.is_empty());
        self.current = None;
        self.report = OutputReport::default();
        log::debug!("loaded example `{name}` ({} resources)", self.workspace.len());
        Ok(())
    }

    /// Submit the current buffer contents and make the new job current.
    ///
    /// Without an explicit `main`, the example's own main program is used.
    pub fn start<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        mut params: RunParameters,
    ) -> Result<JobTag, SubmissionError> {
        let example_name = self
            .example_name
            .as_deref()
            .ok_or(SubmissionError::NoExample)?;
        if params.main.is_none() {
            params.main = self.main.clone();
        }

        let handle = JobSubmitter::new(example_name).submit(
            transport,
            self.workspace.resources(),
            &params,
        )?;

        let tag = JobTag(self.next_tag);
        self.next_tag += 1;
        if let Some((old, _)) = &self.current {
            log::debug!("job {} superseded by {}", old.get(), tag.get());
        }
        self.current = Some((
            tag,
            OutputPoller::new(handle).with_interval(self.poll_interval),
        ));
        self.report = OutputReport::default();
        self.workspace.apply_diagnostics(std::iter::empty());
        Ok(tag)
    }

    /// Issue the current job's next request if it is due, and process the reply.
    pub fn poll<T: Transport + ?Sized>(&mut self, transport: &mut T, now: Instant) -> Vec<PollEvent> {
        let Some((tag, poller)) = self.current.as_mut() else {
            return Vec::new();
        };
        let tag = *tag;
        let Some(request) = poller.due_request(now) else {
            return Vec::new();
        };
        let result = transport.check_output(&request);
        self.accept(tag, now, result)
    }

    /// Deliver a reply obtained for the job tagged `tag`.
    ///
    /// Replies for any job other than the current one are discarded.
    pub fn accept(
        &mut self,
        tag: JobTag,
        now: Instant,
        result: Result<CheckOutputResponse, TransportError>,
    ) -> Vec<PollEvent> {
        let Some((current, poller)) = self.current.as_mut() else {
            log::debug!("discarding reply for job {}: no current job", tag.get());
            return Vec::new();
        };
        if *current != tag {
            log::debug!(
                "discarding stale reply for job {} (current {})",
                tag.get(),
                current.get()
            );
            return Vec::new();
        }

        let events = poller.handle_response(now, result);
        for event in &events {
            self.report.record(event);
        }
        if !events.is_empty() {
            self.refresh_diagnostics();
        }
        events
    }

    /// Poll the current job until it completes or fails.
    pub fn run<T, C>(&mut self, transport: &mut T, clock: &mut C) -> &OutputReport
    where
        T: Transport + ?Sized,
        C: Clock + ?Sized,
    {
        if let Some((_, poller)) = self.current.as_mut() {
            let report = &mut self.report;
            poller.run_to_completion(transport, clock, |event| report.record(event));
            self.refresh_diagnostics();
        }
        &self.report
    }

    /// Restore every resource to the contents it was loaded with.
    pub fn reset(&mut self) {
        self.workspace.reset();
    }

    fn refresh_diagnostics(&mut self) {
        let diagnostics = self.report.lines.iter().filter_map(OutputLine::diagnostic);
        self.workspace.apply_diagnostics(diagnostics);
    }
}
