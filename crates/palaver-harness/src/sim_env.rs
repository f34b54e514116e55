//! Seeded virtual environment.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use palaver_core::Environment;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Wall-clock origin of simulated time. Arbitrary but fixed, so message
/// timestamps are stable across runs.
const SIM_EPOCH_MS: u64 = 1_690_000_000_000;

/// A point in virtual time: the offset from simulation start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SimInstant(Duration);

impl std::ops::Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0 + rhs)
    }
}

impl std::ops::Sub<SimInstant> for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: SimInstant) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

#[derive(Debug)]
struct Inner {
    elapsed: Duration,
    rng: ChaCha8Rng,
}

/// Virtual clock plus seeded RNG.
///
/// Clones share one clock and one RNG stream, so a session and the test
/// driving it observe the same timeline. Time only moves when
/// [`advance`](SimEnv::advance) is called (or a simulated sleep elapses).
#[derive(Debug, Clone)]
pub struct SimEnv {
    inner: Arc<Mutex<Inner>>,
}

impl SimEnv {
    /// Create a virtual environment from a seed.
    ///
    /// Identical seeds produce identical random sequences, and therefore
    /// identical reply delays and presence histories.
    pub fn with_seed(seed: u64) -> Self {
        let inner = Inner { elapsed: Duration::ZERO, rng: ChaCha8Rng::seed_from_u64(seed) };
        Self { inner: Arc::new(Mutex::new(inner)) }
    }

    /// Move virtual time forward.
    pub fn advance(&self, delta: Duration) {
        self.lock().elapsed += delta;
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(self.lock().elapsed)
    }

    fn unix_millis(&self) -> u64 {
        SIM_EPOCH_MS + self.lock().elapsed.as_millis() as u64
    }

    fn sleep(&self, duration: Duration) -> impl Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }

    fn random_bytes(&self, buffer: &mut [u8]) {
        self.lock().rng.fill_bytes(buffer);
    }
}
