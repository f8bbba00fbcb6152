use std::time::Duration;

use scout_core::{DelayQueue, QueueError};

fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

/// Drives the queue to completion, returning actions in firing order and the
/// delays that were requested.
fn drain<A>(queue: &mut DelayQueue<A>) -> (Vec<A>, Vec<Duration>) {
    let mut fired = Vec::new();
    let mut delays = Vec::new();
    let mut timer = queue.start().unwrap();
    loop {
        delays.push(timer.delay);
        let step = queue.timer_elapsed(timer.token).unwrap();
        fired.push(step.action);
        match step.next {
            Some(next) => timer = next,
            None => break,
        }
    }
    (fired, delays)
}

#[test]
fn runs_every_job_once_in_order_then_idles() {
    let mut queue = DelayQueue::new();
    for (name, delay) in [("a", 30), ("b", 10), ("c", 20)] {
        queue.enqueue(name, ms(delay)).unwrap();
    }

    let (fired, delays) = drain(&mut queue);

    assert_eq!(fired, vec!["a", "b", "c"]);
    assert_eq!(delays, vec![ms(30), ms(10), ms(20)]);
    assert!(!queue.is_running());
    assert!(queue.is_empty());
}

#[test]
fn enqueue_and_dequeue_fail_while_running() {
    let mut queue = DelayQueue::new();
    let id = queue.enqueue("a", ms(1)).unwrap();
    queue.enqueue("b", ms(1)).unwrap();
    queue.start().unwrap();

    assert!(matches!(
        queue.enqueue("c", ms(1)),
        Err(QueueError::InvalidState(_))
    ));
    assert!(matches!(queue.dequeue(id), Err(QueueError::InvalidState(_))));
}

#[test]
fn start_fails_when_empty_or_running() {
    let mut queue: DelayQueue<()> = DelayQueue::new();
    assert!(matches!(queue.start(), Err(QueueError::InvalidState(_))));

    queue.enqueue((), ms(1)).unwrap();
    queue.start().unwrap();
    assert!(matches!(queue.start(), Err(QueueError::InvalidState(_))));
}

#[test]
fn dequeue_removes_by_identity() {
    let mut queue = DelayQueue::new();
    queue.enqueue("a", ms(1)).unwrap();
    let b = queue.enqueue("b", ms(1)).unwrap();
    queue.enqueue("c", ms(1)).unwrap();

    assert_eq!(queue.dequeue(b).unwrap(), "b");
    assert_eq!(queue.dequeue(b).unwrap_err(), QueueError::NotFound(b));

    let (fired, _) = drain(&mut queue);
    assert_eq!(fired, vec!["a", "c"]);
}

#[test]
fn stop_requires_running_and_keeps_jobs() {
    let mut queue = DelayQueue::new();
    assert!(matches!(queue.stop(), Err(QueueError::InvalidState(_))));

    queue.enqueue("a", ms(1)).unwrap();
    queue.enqueue("b", ms(1)).unwrap();
    let timer = queue.start().unwrap();
    queue.stop().unwrap();

    assert!(!queue.is_running());
    assert_eq!(queue.len(), 2);
    assert!(queue.timer_elapsed(timer.token).is_none());

    // Idle again, so the queue accepts work before resuming.
    queue.enqueue("c", ms(1)).unwrap();
    let (fired, _) = drain(&mut queue);
    assert_eq!(fired, vec!["a", "b", "c"]);
}

#[test]
fn reset_always_returns_to_idle_and_empty() {
    let mut idle: DelayQueue<&str> = DelayQueue::new();
    idle.reset();
    assert!(!idle.is_running());
    assert!(idle.is_empty());

    let mut running = DelayQueue::new();
    running.enqueue("a", ms(1)).unwrap();
    running.enqueue("b", ms(1)).unwrap();
    let timer = running.start().unwrap();
    running.reset();

    assert!(!running.is_running());
    assert_eq!(running.len(), 0);
    assert!(running.timer_elapsed(timer.token).is_none());
}

#[test]
fn no_job_fires_twice() {
    let mut queue = DelayQueue::new();
    queue.enqueue(1, ms(1)).unwrap();
    let timer = queue.start().unwrap();

    assert!(queue.timer_elapsed(timer.token).is_some());
    assert!(queue.timer_elapsed(timer.token).is_none());
}
