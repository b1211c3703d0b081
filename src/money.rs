// 💵 Money Helpers - Cent rounding and comparison
// All monetary amounts are f64 dollars, normalized to 2 decimal places

// ============================================================================
// CONSTANTS
// ============================================================================

/// Tolerance for comparing monetary values (half a cent)
pub const CENT_EPSILON: f64 = 0.005;

/// Guard against binary float drift when an amount sits exactly on a
/// half-cent boundary (e.g. 19.995 * 100 == 1999.4999999999998)
const ROUND_GUARD: f64 = 1e-9;

// ============================================================================
// ROUNDING
// ============================================================================

/// Round a dollar amount to the nearest cent, half-up.
///
/// Half-up means exactly-half cents round toward positive infinity,
/// so 19.995 → 20.00 and 0.005 → 0.01, while 0.004999 → 0.00.
///
/// Example:
/// ```
/// use split_ledger::money::to_nearest_cent;
///
/// assert_eq!(to_nearest_cent(19.995), 20.00);
/// assert_eq!(to_nearest_cent(0.004999), 0.0);
/// ```
pub fn to_nearest_cent(amount: f64) -> f64 {
    let cents = amount * 100.0;
    (cents + 0.5 + ROUND_GUARD).floor() / 100.0
}

/// Check whether two monetary values are the same cent amount
pub fn same_amount(a: f64, b: f64) -> bool {
    (a - b).abs() < CENT_EPSILON
}

// ============================================================================
// TESTS
// ============================================================================
