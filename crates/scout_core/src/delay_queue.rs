//! FIFO delay queue modelled as an explicit state machine.
//!
//! The queue never touches a clock. `start` and every fired job hand back a
//! [`TimerRequest`]; the driver sleeps for the requested delay and reports
//! back through [`DelayQueue::timer_elapsed`]. Tokens from a stopped or reset
//! run no longer match and are ignored, so at most one timer is ever live.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct JobId(u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// Request to arm the single one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
    pub token: TimerToken,
    pub delay: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueueError {
    #[error("invalid state: {0}")]
    InvalidState(&'static str),
    #[error("job {0} not found")]
    NotFound(JobId),
}

pub struct ScheduledJob<A> {
    id: JobId,
    action: A,
    delay: Duration,
}

impl<A> ScheduledJob<A> {
    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

/// Result of a timer firing: the action to invoke and the next timer, if any.
pub struct Fired<A> {
    pub job_id: JobId,
    pub action: A,
    pub next: Option<TimerRequest>,
}

enum Phase<A> {
    Idle,
    Running {
        head: ScheduledJob<A>,
        token: TimerToken,
    },
}

pub struct DelayQueue<A> {
    pending: VecDeque<ScheduledJob<A>>,
    phase: Phase<A>,
    next_job: u64,
    next_token: u64,
}

impl<A> Default for DelayQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for DelayQueue<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelayQueue")
            .field("running", &self.is_running())
            .field("len", &self.len())
            .finish()
    }
}

impl<A> DelayQueue<A> {
    pub fn new() -> Self {
        Self {
            pending: VecDeque::new(),
            phase: Phase::Idle,
            next_job: 1,
            next_token: 1,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.phase, Phase::Running { .. })
    }

    /// Jobs not yet executed, including the one whose timer is armed.
    pub fn len(&self) -> usize {
        self.pending.len() + usize::from(self.is_running())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn pending_ids(&self) -> Vec<JobId> {
        self.pending.iter().map(ScheduledJob::id).collect()
    }

    pub fn enqueue(&mut self, action: A, delay: Duration) -> Result<JobId, QueueError> {
        if self.is_running() {
            return Err(QueueError::InvalidState("queue is running"));
        }
        let id = JobId(self.next_job);
        self.next_job += 1;
        self.pending.push_back(ScheduledJob { id, action, delay });
        Ok(id)
    }

    pub fn dequeue(&mut self, id: JobId) -> Result<A, QueueError> {
        if self.is_running() {
            return Err(QueueError::InvalidState("queue is running"));
        }
        let index = self
            .pending
            .iter()
            .position(|job| job.id == id)
            .ok_or(QueueError::NotFound(id))?;
        self.pending
            .remove(index)
            .map(|job| job.action)
            .ok_or(QueueError::NotFound(id))
    }

    pub fn start(&mut self) -> Result<TimerRequest, QueueError> {
        if self.is_running() {
            return Err(QueueError::InvalidState("queue already started"));
        }
        self.arm_next()
            .ok_or(QueueError::InvalidState("queue is empty"))
    }

    /// Advances the machine when the armed timer fires.
    ///
    /// Returns `None` for a stale token; the caller must not run anything then.
    pub fn timer_elapsed(&mut self, token: TimerToken) -> Option<Fired<A>> {
        match &self.phase {
            Phase::Running { token: armed, .. } if *armed == token => {}
            _ => return None,
        }
        let Phase::Running { head, .. } = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return None;
        };
        let next = self.arm_next();
        Some(Fired {
            job_id: head.id,
            action: head.action,
            next,
        })
    }

    /// Cancels the armed timer. The job it was waiting for goes back to the
    /// front of the queue, so a later `start` resumes where this run left off.
    pub fn stop(&mut self) -> Result<(), QueueError> {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Running { head, .. } => {
                self.pending.push_front(head);
                Ok(())
            }
            Phase::Idle => Err(QueueError::InvalidState("queue is not started")),
        }
    }

    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.pending.clear();
    }

    fn arm_next(&mut self) -> Option<TimerRequest> {
        let head = self.pending.pop_front()?;
        let token = TimerToken(self.next_token);
        self.next_token += 1;
        let delay = head.delay;
        self.phase = Phase::Running { head, token };
        Some(TimerRequest { token, delay })
    }
}
