//! Tokio driver for the core [`DelayQueue`].
//!
//! The scheduler owns the queue and the single armed deadline. It never
//! spawns: the caller awaits [`Scheduler::deadline`] (usually inside a
//! `select!`) and then calls [`Scheduler::fire`].

use std::time::Duration;

use scout_core::{DelayQueue, JobId, QueueError, TimerRequest, TimerToken};
use scout_logging::scout_trace;
use tokio::time::Instant;

pub type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: TimerToken,
    deadline: Instant,
}

#[derive(Default)]
pub struct Scheduler {
    queue: DelayQueue<Job>,
    armed: Option<Armed>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue<F>(&mut self, job: F, delay: Duration) -> Result<JobId, QueueError>
    where
        F: FnOnce() + Send + 'static,
    {
        self.queue.enqueue(Box::new(job), delay)
    }

    pub fn dequeue(&mut self, id: JobId) -> Result<(), QueueError> {
        self.queue.dequeue(id).map(drop)
    }

    pub fn start(&mut self) -> Result<(), QueueError> {
        let timer = self.queue.start()?;
        self.arm(timer);
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), QueueError> {
        self.queue.stop()?;
        self.armed = None;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.queue.reset();
        self.armed = None;
    }

    pub fn is_running(&self) -> bool {
        self.queue.is_running()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.deadline)
    }

    /// Runs the armed job if its deadline has passed, then arms the next one
    /// relative to now.
    pub fn fire(&mut self) -> Option<JobId> {
        let armed = self.armed?;
        if Instant::now() < armed.deadline {
            return None;
        }
        self.armed = None;
        let fired = self.queue.timer_elapsed(armed.token)?;
        scout_trace!("Firing scheduled job {}", fired.job_id);
        (fired.action)();
        if let Some(next) = fired.next {
            self.arm(next);
        }
        Some(fired.job_id)
    }

    /// Sleeps through every remaining deadline until the queue is idle.
    pub async fn run_until_idle(&mut self) {
        while let Some(deadline) = self.deadline() {
            tokio::time::sleep_until(deadline).await;
            self.fire();
        }
    }

    fn arm(&mut self, timer: TimerRequest) {
        self.armed = Some(Armed {
            token: timer.token,
            deadline: Instant::now() + timer.delay,
        });
    }
}
