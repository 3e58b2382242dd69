use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Circuit state for provider upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Breaker thresholds and timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    pub failure_threshold: u32,
    pub open_timeout: Duration,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            open_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug)]
enum Circuit {
    Closed { consecutive_failures: u32 },
    Open { since: Instant },
    HalfOpen,
}

/// Thread-safe circuit breaker guarding repeated upstream failures.
///
/// A batch fetch walks many symbols against one host; once the host is dead,
/// the breaker turns the remaining calls into immediate failures instead of
/// waiting out a timeout per symbol.
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    circuit: Mutex<Circuit>,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

impl CircuitBreaker {
    pub fn new(config: CircuitBreakerConfig) -> Self {
        Self {
            config,
            circuit: Mutex::new(Circuit::Closed {
                consecutive_failures: 0,
            }),
        }
    }

    pub fn allow_request(&self) -> bool {
        let mut circuit = self.circuit.lock().expect("breaker lock is not poisoned");
        match *circuit {
            Circuit::Closed { .. } | Circuit::HalfOpen => true,
            Circuit::Open { since } => {
                if since.elapsed() >= self.config.open_timeout {
                    *circuit = Circuit::HalfOpen;
                    true
                } else {
                    false
                }
            }
        }
    }

    pub fn record_success(&self) {
        let mut circuit = self.circuit.lock().expect("breaker lock is not poisoned");
        *circuit = Circuit::Closed {
            consecutive_failures: 0,
        };
    }

    pub fn record_failure(&self) {
        let mut circuit = self.circuit.lock().expect("breaker lock is not poisoned");
        *circuit = match *circuit {
            Circuit::Closed {
                consecutive_failures,
            } => {
                let failures = consecutive_failures.saturating_add(1);
                if failures >= self.config.failure_threshold {
                    Circuit::Open {
                        since: Instant::now(),
                    }
                } else {
                    Circuit::Closed {
                        consecutive_failures: failures,
                    }
                }
            }
            // A failed probe re-opens immediately.
            Circuit::HalfOpen | Circuit::Open { .. } => Circuit::Open {
                since: Instant::now(),
            },
        };
    }

    pub fn state(&self) -> CircuitState {
        let circuit = self.circuit.lock().expect("breaker lock is not poisoned");
        match *circuit {
            Circuit::Closed { .. } => CircuitState::Closed,
            Circuit::Open { .. } => CircuitState::Open,
            Circuit::HalfOpen => CircuitState::HalfOpen,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_after_threshold_failures() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 2,
            open_timeout: Duration::from_millis(10),
        });

        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Closed);
        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
        assert!(!breaker.allow_request());
    }

    #[test]
    fn probes_after_open_timeout_then_closes_on_success() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            open_timeout: Duration::from_millis(1),
        });

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);

        std::thread::sleep(Duration::from_millis(2));
        assert!(breaker.allow_request());
        assert_eq!(breaker.state(), CircuitState::HalfOpen);

        breaker.record_success();
        assert_eq!(breaker.state(), CircuitState::Closed);
    }

    #[test]
    fn failed_probe_reopens() {
        let breaker = CircuitBreaker::new(CircuitBreakerConfig {
            failure_threshold: 1,
            open_timeout: Duration::from_millis(1),
        });

        breaker.record_failure();
        std::thread::sleep(Duration::from_millis(2));
        assert!(breaker.allow_request());

        breaker.record_failure();
        assert_eq!(breaker.state(), CircuitState::Open);
    }
}
