use std::time::Duration;

use ao_domain::tool_spec::BackoffStrategy;
use rand::Rng;

/// Delay before attempt `n` (1-indexed), per §4.2's backoff table.
///
/// Jitter is sampled from `rand::thread_rng()` synchronously, never held
/// across an `.await`, so it needs no locking to stay safe under concurrent
/// tasks (§5).
pub fn delay_for_attempt(
    strategy: BackoffStrategy,
    base: Duration,
    n: u32,
    jitter_factor: f64,
) -> Duration {
    match strategy {
        BackoffStrategy::None => Duration::ZERO,
        BackoffStrategy::Linear => base * n,
        BackoffStrategy::Exponential => exponential(base, n),
        BackoffStrategy::ExponentialWithJitter => {
            let d = exponential(base, n);
            let jitter_ms = d.as_secs_f64() * jitter_factor * 1000.0;
            let sampled = rand::thread_rng().gen_range(-jitter_ms..=jitter_ms);
            let total_ms = (d.as_secs_f64() * 1000.0 + sampled).max(0.0);
            Duration::from_millis(total_ms as u64)
        }
    }
}

fn exponential(base: Duration, n: u32) -> Duration {
    let exponent = n.saturating_sub(1);
    base * 2u32.saturating_pow(exponent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_strategy_has_no_delay() {
        assert_eq!(
            delay_for_attempt(BackoffStrategy::None, Duration::from_millis(100), 3, 0.0),
            Duration::ZERO
        );
    }

    #[test]
    fn linear_scales_with_attempt() {
        let base = Duration::from_millis(10);
        assert_eq!(delay_for_attempt(BackoffStrategy::Linear, base, 3, 0.0), base * 3);
    }

    #[test]
    fn exponential_doubles_per_attempt() {
        let base = Duration::from_millis(10);
        assert_eq!(delay_for_attempt(BackoffStrategy::Exponential, base, 1, 0.0), base);
        assert_eq!(delay_for_attempt(BackoffStrategy::Exponential, base, 2, 0.0), base * 2);
        assert_eq!(delay_for_attempt(BackoffStrategy::Exponential, base, 3, 0.0), base * 4);
    }

    #[test]
    fn jitter_stays_within_configured_band() {
        let base = Duration::from_millis(100);
        let d = exponential(base, 3).as_secs_f64() * 1000.0;
        for _ in 0..50 {
            let sampled = delay_for_attempt(BackoffStrategy::ExponentialWithJitter, base, 3, 0.25);
            let ms = sampled.as_secs_f64() * 1000.0;
            assert!(ms >= (d * 0.75) - 1.0 && ms <= (d * 1.25) + 1.0, "{ms} out of band around {d}");
        }
    }
}
