use std::sync::{mpsc as std_mpsc, Arc};
use std::thread;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use scout_core::{jittered_delay, AnalyticsEvent, Handoff, PlannedOpen};
use scout_logging::{scout_debug, scout_error, scout_warn};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};

use crate::handoff::perform_handoff;
use crate::scheduler::Scheduler;
use crate::{AnalyticsSink, EngineEvent, Navigator, WindowTarget};

#[derive(Debug, Clone, Default)]
pub struct EngineSettings {
    /// Seed for the delay jitter; `None` seeds from the OS.
    pub jitter_seed: Option<u64>,
}

enum EngineCommand {
    Open(PlannedOpen),
    Schedule {
        opens: Vec<PlannedOpen>,
        throttle: Duration,
    },
    Stop,
    Resume,
    Reset,
    HandOff {
        handoff: Handoff,
        grace: Duration,
    },
    Track(AnalyticsEvent),
    Shutdown,
}

/// Owns the engine thread. Commands go in through the handle, events come
/// back through [`EngineHandle::try_recv`].
pub struct EngineHandle {
    cmd_tx: mpsc::UnboundedSender<EngineCommand>,
    event_rx: std_mpsc::Receiver<EngineEvent>,
    worker: Option<thread::JoinHandle<()>>,
}

impl EngineHandle {
    pub fn new(
        navigator: Arc<dyn Navigator>,
        analytics: Arc<dyn AnalyticsSink>,
        settings: EngineSettings,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = std_mpsc::channel();

        let worker = thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    scout_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let rng = match settings.jitter_seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let (due_tx, due_rx) = mpsc::unbounded_channel();
            let worker = Worker {
                navigator,
                analytics,
                event_tx,
                scheduler: Scheduler::new(),
                rng,
                tasks: JoinSet::new(),
                due_tx,
                due_rx,
            };
            runtime.block_on(worker.run(cmd_rx));
        });

        Self {
            cmd_tx,
            event_rx,
            worker: Some(worker),
        }
    }

    pub fn open(&self, open: PlannedOpen) {
        self.send(EngineCommand::Open(open));
    }

    pub fn schedule(&self, opens: Vec<PlannedOpen>, throttle: Duration) {
        self.send(EngineCommand::Schedule { opens, throttle });
    }

    pub fn stop_schedule(&self) {
        self.send(EngineCommand::Stop);
    }

    pub fn resume_schedule(&self) {
        self.send(EngineCommand::Resume);
    }

    pub fn reset_schedule(&self) {
        self.send(EngineCommand::Reset);
    }

    pub fn hand_off(&self, handoff: Handoff, grace: Duration) {
        self.send(EngineCommand::HandOff { handoff, grace });
    }

    pub fn track(&self, event: AnalyticsEvent) {
        self.send(EngineCommand::Track(event));
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// False once the engine thread has exited or been joined.
    pub fn is_alive(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Lets a running schedule and in-flight hand-offs finish, then joins the
    /// engine thread. Events produced on the way stay readable.
    pub fn shutdown(&mut self) {
        self.send(EngineCommand::Shutdown);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                scout_error!("Engine thread panicked");
            }
        }
    }

    fn send(&self, command: EngineCommand) {
        if self.cmd_tx.send(command).is_err() {
            scout_warn!("Engine is not running; command dropped");
        }
    }
}

impl Drop for EngineHandle {
    fn drop(&mut self) {
        if self.worker.is_some() {
            self.shutdown();
        }
    }
}

struct Worker {
    navigator: Arc<dyn Navigator>,
    analytics: Arc<dyn AnalyticsSink>,
    event_tx: std_mpsc::Sender<EngineEvent>,
    scheduler: Scheduler,
    rng: StdRng,
    tasks: JoinSet<()>,
    /// Scheduled jobs only hand their open over; the navigation itself runs
    /// as a task so a slow browser launch never stalls the loop.
    due_tx: mpsc::UnboundedSender<PlannedOpen>,
    due_rx: mpsc::UnboundedReceiver<PlannedOpen>,
}

impl Worker {
    async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<EngineCommand>) {
        loop {
            let deadline = self.scheduler.deadline();
            tokio::select! {
                command = cmd_rx.recv() => match command {
                    Some(EngineCommand::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_scheduled();
                }
                Some(_) = self.tasks.join_next(), if !self.tasks.is_empty() => {}
            }
        }

        while let Some(deadline) = self.scheduler.deadline() {
            sleep_until(deadline).await;
            self.fire_scheduled();
        }
        while self.tasks.join_next().await.is_some() {}
        scout_debug!("Engine stopped");
    }

    fn handle(&mut self, command: EngineCommand) {
        match command {
            EngineCommand::Open(open) => self.spawn_open(open),
            EngineCommand::Schedule { opens, throttle } => self.schedule(opens, throttle),
            EngineCommand::Stop => {
                if let Err(err) = self.scheduler.stop() {
                    self.reject(err);
                }
            }
            EngineCommand::Resume => {
                if let Err(err) = self.scheduler.start() {
                    self.reject(err);
                }
            }
            EngineCommand::Reset => self.scheduler.reset(),
            EngineCommand::HandOff { handoff, grace } => {
                let navigator = self.navigator.clone();
                let event_tx = self.event_tx.clone();
                self.tasks.spawn(async move {
                    let event = match perform_handoff(navigator.as_ref(), &handoff, grace).await {
                        Ok(()) => EngineEvent::HandOffCompleted {
                            navigate_to: handoff.navigate_to.clone(),
                        },
                        Err(err) => EngineEvent::Blocked {
                            url: err
                                .url()
                                .unwrap_or(&handoff.handoff_address)
                                .to_string(),
                        },
                    };
                    let _ = event_tx.send(event);
                });
            }
            EngineCommand::Track(event) => {
                let analytics = self.analytics.clone();
                self.tasks.spawn(async move {
                    if let Err(err) = analytics.track(&event).await {
                        scout_warn!("Analytics event {} not delivered: {}", event.action, err);
                    }
                });
            }
            EngineCommand::Shutdown => {}
        }
    }

    fn schedule(&mut self, opens: Vec<PlannedOpen>, throttle: Duration) {
        self.scheduler.reset();
        for open in opens {
            let delay = jittered_delay(throttle, &mut self.rng);
            let due_tx = self.due_tx.clone();
            let queued = self.scheduler.enqueue(
                move || {
                    let _ = due_tx.send(open);
                },
                delay,
            );
            if let Err(err) = queued {
                self.reject(err);
                return;
            }
        }
        if let Err(err) = self.scheduler.start() {
            self.reject(err);
        }
    }

    fn fire_scheduled(&mut self) {
        if let Some(job_id) = self.scheduler.fire() {
            while let Ok(open) = self.due_rx.try_recv() {
                self.spawn_open(open);
            }
            self.emit(EngineEvent::JobFired {
                job_id,
                remaining: self.scheduler.len(),
            });
            if !self.scheduler.is_running() {
                self.emit(EngineEvent::ScheduleIdle);
            }
        }
    }

    fn spawn_open(&mut self, open: PlannedOpen) {
        let navigator = self.navigator.clone();
        let event_tx = self.event_tx.clone();
        self.tasks
            .spawn(async move { open_and_report(navigator.as_ref(), &event_tx, open).await });
    }

    fn reject(&self, err: scout_core::QueueError) {
        scout_warn!("Schedule command rejected: {}", err);
        self.emit(EngineEvent::ScheduleRejected(err));
    }

    fn emit(&self, event: EngineEvent) {
        let _ = self.event_tx.send(event);
    }
}

async fn open_and_report(
    navigator: &dyn Navigator,
    event_tx: &std_mpsc::Sender<EngineEvent>,
    open: PlannedOpen,
) {
    let target = WindowTarget::Marketplace(open.target);
    let event = match navigator.open_new_context(&open.url, &target).await {
        Ok(()) => EngineEvent::Opened {
            target,
            url: open.url,
        },
        Err(err) => {
            scout_warn!("Could not open {}: {}", open.url, err);
            EngineEvent::Blocked { url: open.url }
        }
    };
    let _ = event_tx.send(event);
}
