//! Virtual-clock environment.
//!
//! Time only moves when a test advances it or the runtime sleeps, so every
//! timeout in the lock screen fires at an exact, reproducible instant.

use std::{
    ops::{Add, Sub},
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

use lockscreen_core::env::Environment;

/// Instant on the virtual clock, measured from simulation start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// Simulation start.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Time since simulation start.
    pub fn elapsed(self) -> Duration {
        self.0
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

/// Simulation environment with a shared virtual clock.
///
/// Clones share the clock, so a test can keep a handle and advance time
/// while the runtime owns another.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    clock: Arc<Mutex<Duration>>,
}

impl SimEnv {
    /// Create an environment at [`SimInstant::ZERO`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, duration: Duration) {
        let mut clock = self.clock.lock().unwrap_or_else(PoisonError::into_inner);
        *clock += duration;
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> Self::Instant {
        SimInstant(*self.clock.lock().unwrap_or_else(PoisonError::into_inner))
    }

    /// Advances the virtual clock instead of waiting, once awaited.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        let clock = Arc::clone(&self.clock);
        async move {
            let mut clock = clock.lock().unwrap_or_else(PoisonError::into_inner);
            *clock += duration;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let env = SimEnv::new();
        let handle = env.clone();

        handle.advance(Duration::from_secs(3));

        assert_eq!(env.now(), SimInstant::ZERO + Duration::from_secs(3));
    }

    #[tokio::test]
    async fn sleep_advances_without_waiting() {
        let env = SimEnv::new();
        let start = env.now();

        env.sleep(Duration::from_millis(250)).await;

        assert_eq!(env.now() - start, Duration::from_millis(250));
    }

    #[test]
    fn dropped_sleep_leaves_clock_alone() {
        let env = SimEnv::new();

        drop(env.sleep(Duration::from_secs(1)));

        assert_eq!(env.now(), SimInstant::ZERO);
    }

    #[test]
    fn earlier_minus_later_saturates() {
        let later = SimInstant::ZERO + Duration::from_secs(1);
        assert_eq!(SimInstant::ZERO - later, Duration::ZERO);
    }
}
