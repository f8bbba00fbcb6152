use std::sync::Arc;
use std::time::Duration;

use scout_core::{Effect, Msg};
use scout_engine::{AnalyticsSink, EngineEvent, EngineHandle, EngineSettings, Navigator};
use scout_logging::{scout_debug, scout_info, scout_warn};

/// Carries core effects out through the engine and turns engine events back
/// into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(navigator: Arc<dyn Navigator>, analytics: Arc<dyn AnalyticsSink>) -> Self {
        let engine = EngineHandle::new(navigator, analytics, EngineSettings::default());
        Self { engine }
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::OpenUrl(open) => {
                    scout_debug!("OpenUrl target={} url={}", open.target, open.url);
                    self.engine.open(open);
                }
                Effect::ScheduleOpens { opens, throttle } => {
                    scout_info!(
                        "Scheduling {} opens about {} ms apart",
                        opens.len(),
                        throttle.as_millis()
                    );
                    self.engine.schedule(opens, throttle);
                }
                Effect::StopSchedule => self.engine.stop_schedule(),
                Effect::ResumeSchedule => self.engine.resume_schedule(),
                Effect::ResetSchedule => self.engine.reset_schedule(),
                Effect::HandOff { handoff, grace } => {
                    scout_debug!(
                        "HandOff navigate_to={} remaining={}",
                        handoff.navigate_to,
                        handoff.remaining
                    );
                    self.engine.hand_off(handoff, grace);
                }
                // The terminal has no address bar; the view carries the address.
                Effect::ReplaceAddress { address } => {
                    scout_debug!("Address replaced with {}", address);
                }
                Effect::Track(event) => self.engine.track(event),
                Effect::SubmitSubscription(subscriber) => {
                    scout_info!(
                        "Subscription received for {} {} <{}>",
                        subscriber.first_name,
                        subscriber.last_name,
                        subscriber.email
                    );
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine event.
    pub fn poll(&self, timeout: Duration) -> Option<Msg> {
        self.engine.recv_timeout(timeout).map(map_event)
    }

    pub fn is_alive(&self) -> bool {
        self.engine.is_alive()
    }

    /// Lets in-flight work finish and returns the messages it produced.
    pub fn finish(&mut self) -> Vec<Msg> {
        self.engine.shutdown();
        std::iter::from_fn(|| self.engine.try_recv())
            .map(map_event)
            .collect()
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Opened { url, .. } => Msg::UrlOpened { url },
        EngineEvent::Blocked { url } => Msg::NavigationBlocked { url },
        EngineEvent::JobFired { job_id, remaining } => {
            scout_debug!("Job {} fired, {} remaining", job_id, remaining);
            Msg::ScheduleProgress { remaining }
        }
        EngineEvent::ScheduleIdle => Msg::ScheduleFinished,
        EngineEvent::HandOffCompleted { navigate_to } => Msg::HandOffCompleted { navigate_to },
        // A rejected stop or resume means the engine's queue is already idle.
        EngineEvent::ScheduleRejected(err) => {
            scout_warn!("Engine rejected a schedule command: {}", err);
            Msg::ScheduleFinished
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scout_core::{MarketplaceId, PlannedOpen, QueueError};
    use scout_engine::{LogSink, RecordingNavigator, WindowTarget};

    #[test]
    fn maps_engine_events_to_messages() {
        assert_eq!(
            map_event(EngineEvent::Opened {
                target: WindowTarget::Marketplace(MarketplaceId::Ebay),
                url: "https://e.example".into(),
            }),
            Msg::UrlOpened {
                url: "https://e.example".into()
            }
        );
        assert_eq!(
            map_event(EngineEvent::ScheduleRejected(QueueError::InvalidState(
                "queue is not started"
            ))),
            Msg::ScheduleFinished
        );
        assert_eq!(map_event(EngineEvent::ScheduleIdle), Msg::ScheduleFinished);
    }

    #[test]
    fn open_effects_reach_the_navigator() {
        let navigator = RecordingNavigator::new();
        let mut runner = EffectRunner::new(Arc::new(navigator.clone()), Arc::new(LogSink));

        runner.enqueue(vec![
            Effect::OpenUrl(PlannedOpen {
                target: MarketplaceId::Mercari,
                url: "https://m.example".into(),
            }),
            Effect::ReplaceAddress {
                address: "https://flipscoutly.com/".into(),
            },
        ]);
        let msgs = runner.finish();

        assert_eq!(
            msgs,
            vec![Msg::UrlOpened {
                url: "https://m.example".into()
            }]
        );
        assert_eq!(navigator.navigations().len(), 1);
    }
}
