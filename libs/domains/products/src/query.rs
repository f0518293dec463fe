//! Query-string parsing for the product listing.
//!
//! Numeric bounds are read the lenient way browsers and form posts expect:
//! the longest numeric prefix wins (`"12abc"` is 12) and a value with no
//! numeric prefix is kept as [`QueryBound::Unparsable`], which matches nothing.

use serde::Deserialize;
use utoipa::IntoParams;

/// Raw `GET /products` query parameters
#[derive(Debug, Clone, Default, PartialEq, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// Case-insensitive substring of the product name
    pub name: Option<String>,
    /// Inclusive lower bound on price
    pub min_price: Option<String>,
    /// Inclusive upper bound on price
    pub max_price: Option<String>,
    /// Inclusive lower bound on quantity
    pub min_quantity: Option<String>,
    /// Inclusive upper bound on quantity
    pub max_quantity: Option<String>,
}

/// One side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryBound<T> {
    Value(T),
    /// Supplied but not a number
    Unparsable,
}

/// Conjunctive product filter; `None` fields impose no constraint
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilter {
    pub name: Option<String>,
    pub min_price: Option<QueryBound<f64>>,
    pub max_price: Option<QueryBound<f64>>,
    pub min_quantity: Option<QueryBound<i64>>,
    pub max_quantity: Option<QueryBound<i64>>,
}

impl ProductFilter {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<ProductQuery> for ProductFilter {
    fn from(query: ProductQuery) -> Self {
        Self {
            name: non_empty(query.name),
            min_price: non_empty(query.min_price).map(|s| float_bound(&s)),
            max_price: non_empty(query.max_price).map(|s| float_bound(&s)),
            min_quantity: non_empty(query.min_quantity).map(|s| int_bound(&s)),
            max_quantity: non_empty(query.max_quantity).map(|s| int_bound(&s)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

fn float_bound(raw: &str) -> QueryBound<f64> {
    parse_float_prefix(raw).map_or(QueryBound::Unparsable, QueryBound::Value)
}

fn int_bound(raw: &str) -> QueryBound<i64> {
    parse_int_prefix(raw).map_or(QueryBound::Unparsable, QueryBound::Value)
}

/// Parses the longest decimal floating-point prefix of `raw`.
///
/// Leading whitespace is skipped; `Infinity` with an optional sign is
/// accepted. Returns `None` when no digits start the string.
pub fn parse_float_prefix(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Parses the longest base-10 integer prefix of `raw` (`"0x10"` reads as 0), saturating at the
/// `i64` range. Returns `None` when no digits start the string.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let (negative, start) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };

    let digits = count_digits(&bytes[start..]);
    if digits == 0 {
        return None;
    }

    let value = bytes[start..start + digits]
        .iter()
        .fold(0i64, |acc, d| {
            let digit = i64::from(d - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(digit)
            } else {
                acc.saturating_mul(10).saturating_add(digit)
            }
        });

    Some(value)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
