//! Observable market quote.

use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A live, observable market quote.
///
/// Cheaply clonable handle to a shared value. Every mutation bumps a
/// monotone version counter; consumers that cache results derived from a
/// set of quotes (a bootstrapped curve, say) record the versions they were
/// built from and rebuild when any differs. This replaces implicit global
/// observables with an explicit subscription.
///
/// Quote updates and dependent rebuilds must be serialized per consumer
/// (single-writer discipline); concurrent readers of an already built
/// result are fine.
///
/// # Example
///
/// ```rust
/// use pillar_core::types::Quote;
///
/// let quote = Quote::new(0.045);
/// let v0 = quote.version();
/// quote.set_value(0.046);
/// assert!(quote.version() > v0);
/// assert_eq!(quote.value(), 0.046);
/// ```
#[derive(Clone)]
pub struct Quote {
    inner: Arc<RwLock<QuoteInner>>,
}

struct QuoteInner {
    value: f64,
    version: u64,
}

impl Quote {
    /// Creates a quote with an initial value.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(QuoteInner { value, version: 0 })),
        }
    }

    /// Returns the current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.inner.read().value
    }

    /// Sets a new value, bumping the version.
    pub fn set_value(&self, value: f64) {
        let mut inner = self.inner.write();
        inner.value = value;
        inner.version += 1;
    }

    /// Returns the mutation counter.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.read().version
    }
}

impl fmt::Debug for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Quote")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}
