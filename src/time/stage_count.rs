//! Number of RKL stages needed for a stable cycle.

use super::RklOrder;
use crate::error::{Result, RklError};

/// Smallest-safe stage count for a cycle of `ratio = dt / dt_par`.
///
/// The count is `1 + floor(root)` where `root` solves `s² + s = 2 ratio`
/// (first order) or `s² + s - 2 = 4 ratio` (second order). The quadratic
/// formula is evaluated in its rationalised form, so it stays accurate for
/// large ratios. When the root is an exact integer `n` the count is `n + 1`.
///
/// # Errors
/// [`RklError::InvalidInput`] if `ratio` is not a positive finite number.
///
/// # Example
///
/// ```
/// use rkl_rs::time::{stage_count, RklOrder};
///
/// // dt = 1 with dt_par = 0.005
/// assert_eq!(stage_count(200.0, RklOrder::Second).unwrap(), 28);
/// assert_eq!(stage_count(200.0, RklOrder::First).unwrap(), 20);
/// ```
pub fn stage_count(ratio: f64, order: RklOrder) -> Result<usize> {
    if !(ratio > 0.0) || !ratio.is_finite() {
        return Err(RklError::InvalidInput(format!(
            "stage estimate needs a positive finite dt ratio, got {}",
            ratio
        )));
    }

    let root = match order {
        RklOrder::First => 4.0 * ratio / (1.0 + (1.0 + 2.0 * 4.0 * ratio).sqrt()),
        RklOrder::Second => {
            4.0 * (1.0 + 2.0 * ratio) / (1.0 + (3.0 * 3.0 + 4.0 * 4.0 * ratio).sqrt())
        }
    };

    Ok(1 + root.floor() as usize)
}
