//! Incremental output polling.
//!
//! [`OutputPoller`] is a sans-IO state machine: the caller asks it for the next request with
//! [`OutputPoller::due_request`], performs the request however it likes, and feeds the reply back
//! through [`OutputPoller::handle_response`]. At most one request is outstanding at a time, and
//! a new one is only issued once the poll interval has elapsed since the last reply.
//!
//! [`OutputPoller::run_to_completion`] is the blocking driver built on top, parameterized by a
//! [`Clock`] so tests can run it without sleeping.

use crate::submit::JobHandle;
use crate::transport::{Transport, TransportError};
use crate::wire::{CheckOutputRequest, CheckOutputResponse};
use playground_core::{Diagnostic, DiagnosticParser, OutputLine, RunSummary};
use std::time::{Duration, Instant};

/// Delay between a non-final reply and the next request.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Client-side record of a remote job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// Opaque job identifier.
    pub identifier: String,
    /// Number of output lines received so far.
    pub already_read: usize,
    /// Whether the service reported completion.
    pub completed: bool,
    /// Exit status reported with completion.
    pub status: i32,
    /// Every line received, classified, in order.
    pub output_lines: Vec<OutputLine>,
    /// Last message reported by the service, if any.
    pub message: Option<String>,
}

impl Job {
    fn new(handle: JobHandle) -> Self {
        Self {
            identifier: handle.identifier,
            already_read: 0,
            completed: false,
            status: 0,
            output_lines: Vec::new(),
            message: Some(handle.message).filter(|m| !m.is_empty()),
        }
    }

    /// Diagnostics among the received lines.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.output_lines.iter().filter_map(OutputLine::diagnostic)
    }
}

/// Where the poller stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    /// No request issued yet.
    Idle,
    /// A request is outstanding.
    Requesting,
    /// Waiting for the poll interval to elapse.
    Waiting {
        /// When the next request becomes due.
        until: Instant,
    },
    /// The job finished; no further requests.
    Completed,
    /// A request failed; polling stopped.
    Failed,
}

/// Something the UI should react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// A new output line, in arrival order.
    Line(OutputLine),
    /// The job completed.
    Finished(RunSummary),
    /// A request failed; the job is abandoned.
    Failed(TransportError),
}

/// Source of time for [`OutputPoller::run_to_completion`].
pub trait Clock {
    /// The current instant.
    fn now(&self) -> Instant;

    /// Block until `deadline` (returns immediately if it already passed).
    fn sleep_until(&mut self, deadline: Instant);
}

/// Wall clock backed by [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep_until(&mut self, deadline: Instant) {
        let now = Instant::now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
    }
}

/// Streams the output of one job.
#[derive(Debug, Clone)]
pub struct OutputPoller {
    job: Job,
    state: PollState,
    parser: DiagnosticParser,
    interval: Duration,
}

impl OutputPoller {
    /// Start polling the job behind `handle`.
    pub fn new(handle: JobHandle) -> Self {
        Self {
            job: Job::new(handle),
            state: PollState::Idle,
            parser: DiagnosticParser::new(),
            interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Use `interval` between replies and requests.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// The job record.
    pub fn job(&self) -> &Job {
        &self.job
    }

    /// Current state.
    pub fn state(&self) -> PollState {
        self.state
    }

    /// Returns `true` once the job completed or polling failed.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, PollState::Completed | PollState::Failed)
    }

    /// Verdict of a completed job.
    pub fn summary(&self) -> Option<RunSummary> {
        match self.state {
            PollState::Completed => Some(self.parser.summary(self.job.status)),
            _ => None,
        }
    }

    /// When the next request becomes due, if the poller is waiting.
    pub fn next_due(&self) -> Option<Instant> {
        match self.state {
            PollState::Waiting { until } => Some(until),
            _ => None,
        }
    }

    /// The request to send now, if any.
    ///
    /// Returns `None` while a request is outstanding, before the poll interval elapsed, and
    /// once polling has ended. Issuing a request moves the poller to `Requesting`.
    pub fn due_request(&mut self, now: Instant) -> Option<CheckOutputRequest> {
        let due = match self.state {
            PollState::Idle => true,
            PollState::Waiting { until } => now >= until,
            PollState::Requesting | PollState::Completed | PollState::Failed => false,
        };
        if !due {
            return None;
        }

        self.state = PollState::Requesting;
        Some(CheckOutputRequest {
            identifier: self.job.identifier.clone(),
            already_read: self.job.already_read,
        })
    }

    /// Feed the reply to the outstanding request.
    ///
    /// Replies arriving while no request is outstanding are ignored.
    pub fn handle_response(
        &mut self,
        now: Instant,
        result: Result<CheckOutputResponse, TransportError>,
    ) -> Vec<PollEvent> {
        if self.state != PollState::Requesting {
            log::debug!(
                "ignoring reply for job {} in state {:?}",
                self.job.identifier,
                self.state
            );
            return Vec::new();
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => {
                log::warn!("polling job {} failed: {err}", self.job.identifier);
                self.state = PollState::Failed;
                return vec![PollEvent::Failed(err)];
            }
        };

        let mut events = Vec::with_capacity(response.output_lines.len() + 1);
        self.job.already_read += response.output_lines.len();
        for line in &response.output_lines {
            let parsed = self.parser.parse_line(line);
            self.job.output_lines.push(parsed.clone());
            events.push(PollEvent::Line(parsed));
        }
        if let Some(message) = response.message {
            self.job.message = Some(message);
        }

        if response.completed {
            self.job.completed = true;
            self.job.status = response.status;
            self.state = PollState::Completed;
            let summary = self.parser.summary(response.status);
            log::debug!("job {} finished: {summary}", self.job.identifier);
            events.push(PollEvent::Finished(summary));
        } else {
            self.state = PollState::Waiting {
                until: now + self.interval,
            };
        }
        events
    }

    /// Poll until the job completes or a request fails, reporting every event to `on_event`.
    ///
    /// A request left outstanding by the caller is considered lost and issued again.
    pub fn run_to_completion<T, C, F>(&mut self, transport: &mut T, clock: &mut C, mut on_event: F)
    where
        T: Transport + ?Sized,
        C: Clock + ?Sized,
        F: FnMut(&PollEvent),
    {
        if self.state == PollState::Requesting {
            self.state = PollState::Idle;
        }

        while !self.is_finished() {
            if let Some(deadline) = self.next_due() {
                clock.sleep_until(deadline);
            }
            let now = clock.now();
            let Some(request) = self.due_request(now) else {
                continue;
            };
            let result = transport.check_output(&request);
            for event in self.handle_response(clock.now(), result) {
                on_event(&event);
            }
        }
    }
}
