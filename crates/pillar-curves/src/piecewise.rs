//! Quote-observing curve that rebuilds lazily on read.

use std::sync::Arc;

use parking_lot::RwLock;
use pillar_core::types::Date;

use crate::bootstrap::{build_curve, BootstrapConfig};
use crate::error::CurveResult;
use crate::helpers::RateHelper;
use crate::term_structure::TermStructure;

/// A bootstrapped curve that tracks its input quotes.
///
/// Holds the helper set and rebuilds the underlying [`TermStructure`]
/// synchronously on the first read after any contributing quote changes.
/// Staleness is detected through the quotes' version counters, so a
/// `set_value` back to the same number still triggers a rebuild.
///
/// The built curve is immutable and handed out as an `Arc`, so readers
/// keep a consistent snapshot even while a rebuild replaces the cache.
/// Builds are serialized through the write lock; concurrent readers of a
/// fresh cache share the read lock.
pub struct PiecewiseCurve {
    reference_date: Date,
    helpers: Vec<Box<dyn RateHelper>>,
    config: BootstrapConfig,
    cache: RwLock<Option<CachedBuild>>,
}

struct CachedBuild {
    curve: Arc<TermStructure>,
    /// Quote versions observed when the curve was built, helper-ordered.
    versions: Vec<u64>,
}

impl PiecewiseCurve {
    /// Creates a lazily built curve over the given helpers.
    ///
    /// Nothing is built until the first read.
    #[must_use]
    pub fn new(
        reference_date: Date,
        helpers: Vec<Box<dyn RateHelper>>,
        config: BootstrapConfig,
    ) -> Self {
        Self {
            reference_date,
            helpers,
            config,
            cache: RwLock::new(None),
        }
    }

    /// The curve's anchor date.
    #[must_use]
    pub fn reference_date(&self) -> Date {
        self.reference_date
    }

    /// Whether the cached build no longer reflects the current quotes.
    ///
    /// Also true when the curve has never been built.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        let cache = self.cache.read();
        match cache.as_ref() {
            Some(build) => build.versions != self.current_versions(),
            None => true,
        }
    }

    /// The current term structure, rebuilding first if any quote moved.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap failures; the stale cache is discarded, so a
    /// later read retries the build.
    pub fn term_structure(&self) -> CurveResult<Arc<TermStructure>> {
        let versions = self.current_versions();

        {
            let cache = self.cache.read();
            if let Some(build) = cache.as_ref() {
                if build.versions == versions {
                    return Ok(Arc::clone(&build.curve));
                }
            }
        }

        let mut cache = self.cache.write();
        // Another writer may have rebuilt while we waited for the lock.
        if let Some(build) = cache.as_ref() {
            if build.versions == self.current_versions() {
                return Ok(Arc::clone(&build.curve));
            }
        }

        *cache = None;
        let versions = self.current_versions();
        let curve = Arc::new(build_curve(
            self.reference_date,
            &self.helpers,
            &self.config,
        )?);
        log::debug!(
            "rebuilt curve at {} from {} helpers",
            self.reference_date,
            self.helpers.len()
        );
        *cache = Some(CachedBuild {
            curve: Arc::clone(&curve),
            versions,
        });
        Ok(curve)
    }

    /// Discount factor for a date off the (possibly rebuilt) curve.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap failures.
    pub fn discount_factor(&self, date: Date) -> CurveResult<f64> {
        Ok(self.term_structure()?.discount_factor(date))
    }

    fn current_versions(&self) -> Vec<u64> {
        self.helpers.iter().map(|h| h.quote_version()).collect()
    }
}

impl std::fmt::Debug for PiecewiseCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PiecewiseCurve")
            .field("reference_date", &self.reference_date)
            .field("helpers", &self.helpers.len())
            .field("built", &self.cache.read().is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::DepositRateHelper;
    use approx::assert_relative_eq;
    use pillar_core::daycounts::DayCountConvention;
    use pillar_core::types::Quote;

    fn setup() -> (PiecewiseCurve, Quote, Date) {
        let reference = Date::from_ymd(2026, 1, 15).unwrap();
        let end = reference.add_months(6).unwrap();
        let quote = Quote::new(0.05);
        let helper =
            DepositRateHelper::new(quote.clone(), reference, end, DayCountConvention::Act360)
                .unwrap();
        let curve = PiecewiseCurve::new(
            reference,
            vec![Box::new(helper)],
            BootstrapConfig::default(),
        );
        (curve, quote, end)
    }

    #[test]
    fn builds_on_first_read() {
        let (curve, _quote, end) = setup();
        assert!(curve.is_stale());

        let df = curve.discount_factor(end).unwrap();
        assert!(df < 1.0);
        assert!(!curve.is_stale());
    }

    #[test]
    fn quote_update_invalidates_and_rebuilds() {
        let (curve, quote, end) = setup();

        let df_before = curve.discount_factor(end).unwrap();

        quote.set_value(0.06);
        assert!(curve.is_stale());

        let df_after = curve.discount_factor(end).unwrap();
        assert!(df_after < df_before);
        assert!(!curve.is_stale());
    }

    #[test]
    fn unchanged_quotes_reuse_the_cached_build() {
        let (curve, _quote, end) = setup();

        let first = curve.term_structure().unwrap();
        let second = curve.term_structure().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_relative_eq!(
            first.discount_factor(end),
            second.discount_factor(end),
            epsilon = 1e-15
        );
    }

    #[test]
    fn rewriting_the_same_value_still_rebuilds() {
        let (curve, quote, _end) = setup();

        let first = curve.term_structure().unwrap();
        quote.set_value(0.05);
        assert!(curve.is_stale());

        let second = curve.term_structure().unwrap();
        assert!(!Arc::ptr_eq(&first, &second));
    }
}
