//! Session-scoped pizza counter.
//!
//! One `PizzaCounter` exists per session scope and tracks how many pizzas were
//! sold in it. The count only moves through [`PizzaCounter::increment`]; there
//! is no setter and no way to construct a counter at a non-zero value.
//!
//! Overflow policy: the counter saturates at `u64::MAX`. Once saturated,
//! further increments are no-ops that still return `u64::MAX`.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::scope::ScopeFactory;

/// Pizzas sold today, for one session scope.
#[derive(Debug, Default)]
pub struct PizzaCounter {
    sold_today: AtomicU64,
}

impl PizzaCounter {
    pub fn new() -> Self {
        Self {
            sold_today: AtomicU64::new(0),
        }
    }

    /// Record one sale and return the count after it.
    ///
    /// Lock-free read-modify-write: concurrent callers on the same instance
    /// never lose an update.
    pub fn increment(&self) -> u64 {
        match self
            .sold_today
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_add(1))
        {
            Ok(prev) => prev + 1,
            Err(saturated) => {
                tracing::warn!(count = saturated, "pizza counter saturated; increment ignored");
                saturated
            }
        }
    }

    /// Current count.
    pub fn current_value(&self) -> u64 {
        self.sold_today.load(Ordering::Acquire)
    }

    pub fn is_saturated(&self) -> bool {
        self.current_value() == u64::MAX
    }

    #[cfg(test)]
    fn starting_at(n: u64) -> Self {
        Self {
            sold_today: AtomicU64::new(n),
        }
    }
}

/// Produces a fresh zeroed [`PizzaCounter`] for every new scope.
#[derive(Debug, Default, Clone, Copy)]
pub struct PizzaCounterFactory;

impl ScopeFactory for PizzaCounterFactory {
    type Service = PizzaCounter;

    fn create(&self) -> PizzaCounter {
        PizzaCounter::new()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn saturates_at_max() {
        let c = PizzaCounter::starting_at(u64::MAX - 1);
        assert!(!c.is_saturated());

        assert_eq!(c.increment(), u64::MAX);
        assert!(c.is_saturated());

        assert_eq!(c.increment(), u64::MAX);
        assert_eq!(c.increment(), u64::MAX);
        assert_eq!(c.current_value(), u64::MAX);
    }

    #[test]
    fn saturated_counter_survives_concurrent_increments() {
        let c = std::sync::Arc::new(PizzaCounter::starting_at(u64::MAX - 3));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = std::sync::Arc::clone(&c);
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        c.increment();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(c.current_value(), u64::MAX);
    }

    #[test]
    fn increment_returns_new_value() {
        let c = PizzaCounter::new();
        assert_eq!(c.increment(), 1);
        assert_eq!(c.increment(), 2);
        assert_eq!(c.current_value(), 2);
    }
}
