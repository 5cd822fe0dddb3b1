/// Lets a call through at most once per interval; calls inside the cooldown
/// are dropped, not queued.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval_ms: f64,
    last_accepted: Option<f64>,
}

impl Throttle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: f64::from(interval_ms),
            last_accepted: None,
        }
    }

    /// A clock that stepped backwards reopens the gate instead of stalling it.
    pub fn try_acquire(&mut self, now_ms: f64) -> bool {
        let cooling = self
            .last_accepted
            .is_some_and(|last| now_ms >= last && now_ms < last + self.interval_ms);
        if cooling {
            return false;
        }

        self.last_accepted = Some(now_ms);
        true
    }
}

/// Wraps `callback` so it runs at most once per `interval_ms`, reading time from `clock`.
pub fn throttle<A>(
    interval_ms: u32,
    clock: impl Fn() -> f64,
    mut callback: impl FnMut(A),
) -> impl FnMut(A) {
    let mut gate = Throttle::new(interval_ms);
    move |arg| {
        if gate.try_acquire(clock()) {
            callback(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{cell::Cell, rc::Rc};

    #[test]
    fn burst_inside_window_runs_once_then_again_after_cooldown() {
        let now = Rc::new(Cell::new(0.0));
        let runs = Rc::new(Cell::new(0));

        let mut throttled = {
            let now = Rc::clone(&now);
            let runs = Rc::clone(&runs);
            throttle(50, move || now.get(), move |()| runs.set(runs.get() + 1))
        };

        for step in 0..10 {
            now.set(f64::from(step));
            throttled(());
        }
        assert_eq!(runs.get(), 1);

        now.set(60.0);
        throttled(());
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn call_exactly_at_interval_boundary_passes() {
        let mut gate = Throttle::new(16);

        assert!(gate.try_acquire(100.0));
        assert!(!gate.try_acquire(115.9));
        assert!(gate.try_acquire(116.0));
    }

    #[test]
    fn clock_stepping_backwards_does_not_stall_the_gate() {
        let mut gate = Throttle::new(50);
        assert!(gate.try_acquire(1_000_000.0));

        let accepted = (0..100)
            .map(|step| 400_000.0 + f64::from(step) * 60.0)
            .filter(|now| gate.try_acquire(*now))
            .count();
        assert_eq!(accepted, 100);
        assert!(!gate.try_acquire(400_000.0 + 99.0 * 60.0 + 10.0));
    }

    #[test]
    fn dropped_calls_do_not_extend_the_cooldown() {
        let mut gate = Throttle::new(50);

        assert!(gate.try_acquire(0.0));
        assert!(!gate.try_acquire(30.0));
        assert!(!gate.try_acquire(49.0));
        assert!(gate.try_acquire(50.0));
    }
}
