//! Format predicates and numeric helpers shared by the validators.

/// True when `code` is `min..=max` characters drawn from `A-Z` and `0-9`.
fn is_upper_alnum(code: &str, min: usize, max: usize) -> bool {
    let bytes = code.as_bytes();
    (min..=max).contains(&bytes.len())
        && bytes
            .iter()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

/// Fare basis codes: 4-15 uppercase alphanumerics.
pub fn is_fare_basis_code(code: &str) -> bool {
    is_upper_alnum(code, 4, 15)
}

/// Fare rule codes: 2-4 uppercase alphanumerics.
pub fn is_fare_rule_code(code: &str) -> bool {
    is_upper_alnum(code, 2, 4)
}

/// ISO 4217 shape: exactly three uppercase ASCII letters.
pub fn is_currency_code(code: &str) -> bool {
    code.len() == 3 && code.bytes().all(|b| b.is_ascii_uppercase())
}

/// Whether two amounts differ by more than `tolerance`.
pub fn amounts_differ(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() > tolerance
}
