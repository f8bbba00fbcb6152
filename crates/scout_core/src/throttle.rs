use std::time::Duration;

use rand::Rng;

/// Relative spread applied around a requested delay.
pub const JITTER_RATIO: f64 = 0.1;

/// Draws a delay uniformly from `[target - 10%, target + 10%]`, rounded up to
/// whole milliseconds. A zero target stays zero.
pub fn jittered_delay<R: Rng + ?Sized>(target: Duration, rng: &mut R) -> Duration {
    if target.is_zero() {
        return Duration::ZERO;
    }
    let target_ms = target.as_secs_f64() * 1000.0;
    let spread = target_ms * JITTER_RATIO;
    let drawn = rng.gen_range((target_ms - spread)..=(target_ms + spread));
    Duration::from_millis(drawn.ceil() as u64)
}
