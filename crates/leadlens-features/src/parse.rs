//! Parsers for the free-text company size and revenue fields, plus the
//! ordinal bucket scores derived from them.
//!
//! All parsers are total: anything unparsable degrades to zero rather than
//! erroring, per the deriver's missing-data policy.

use regex::Regex;

/// Parses a free-text company size into a single employee count.
///
/// `"5,001-10,000 employees"` → 7500 (mean of the range), `"201-500"` → 350,
/// `"10,000+"` → 10000, `"250"` → 250, anything else → 0.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn parse_size_to_number(size_str: &str) -> i64 {
    let s = size_str
        .to_lowercase()
        .replace("employees", "")
        .replace("employee", "")
        .replace(',', "")
        .trim()
        .to_owned();
    if s.is_empty() {
        return 0;
    }

    if let Some((a, b)) = s.split_once('-') {
        return match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
            (Ok(lo), Ok(hi)) => ((lo + hi) / 2.0) as i64,
            _ => 0,
        };
    }

    if let Some(n) = s.strip_suffix('+') {
        return n.trim().parse::<f64>().map_or(0, |v| v as i64);
    }

    s.parse::<f64>().map_or(0, |v| v as i64)
}

/// Parses free-text annual revenue into millions of dollars.
///
/// `"$261.9 Million"` → 261.9, `"$1.3 Billion"` → 1300.0, `"50M"` → 50.0,
/// `"120"` → 120.0 (unitless input is assumed already in millions),
/// anything unparsable → 0.0.
pub(crate) fn parse_revenue_millions(revenue_str: &str) -> f64 {
    let s = revenue_str.replace(',', "").replace('$', "");
    let re = Regex::new(r"(?i)([0-9]+(?:\.[0-9]+)?)\s*(billion|million|b|m)?\b")
        .expect("valid revenue regex");

    let Some(caps) = re.captures(&s) else {
        return 0.0;
    };
    let Ok(value) = caps[1].parse::<f64>() else {
        return 0.0;
    };

    match caps.get(2).map(|unit| unit.as_str().to_lowercase()) {
        Some(unit) if unit.starts_with('b') => value * 1000.0,
        // "million"/"m" and unitless both mean millions.
        _ => value,
    }
}

/// Ordinal company-size bucket: 0 for unknown, then 50/200/500/1000
/// thresholds, capped at 5.
pub(crate) fn size_score(size_numeric: i64) -> i64 {
    match size_numeric {
        i64::MIN..=0 => 0,
        1..=50 => 1,
        51..=200 => 2,
        201..=500 => 3,
        501..=1000 => 4,
        _ => 5,
    }
}

/// Ordinal revenue category with thresholds at 20/50/100/500 millions.
pub(crate) fn revenue_category(revenue_millions: f64) -> i64 {
    if revenue_millions < 20.0 {
        0
    } else if revenue_millions < 50.0 {
        1
    } else if revenue_millions < 100.0 {
        2
    } else if revenue_millions < 500.0 {
        3
    } else {
        4
    }
}

/// Ordinal revenue bucket like [`revenue_category`], but distinguishing
/// "no revenue signal" (0) from "under 20M" (1).
pub(crate) fn revenue_score(revenue_millions: f64) -> i64 {
    if revenue_millions <= 0.0 {
        0
    } else {
        revenue_category(revenue_millions) + 1
    }
}

/// Ordinal recency bucket: more recent activity scores higher.
pub(crate) fn activity_score(activity_days: f64) -> i64 {
    if activity_days <= 7.0 {
        5
    } else if activity_days <= 30.0 {
        4
    } else if activity_days <= 60.0 {
        3
    } else if activity_days <= 120.0 {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_range_collapses_to_mean() {
        assert_eq!(parse_size_to_number("201-500 employees"), 350);
        assert_eq!(parse_size_to_number("5,001-10,000 employees"), 7500);
        assert_eq!(parse_size_to_number("51-200"), 125);
    }

    #[test]
    fn size_plus_form_yields_lower_bound() {
        assert_eq!(parse_size_to_number("10,000+"), 10000);
        assert_eq!(parse_size_to_number("5000+ employees"), 5000);
    }

    #[test]
    fn size_bare_number() {
        assert_eq!(parse_size_to_number("250"), 250);
        assert_eq!(parse_size_to_number("1,000"), 1000);
    }

    #[test]
    fn size_unparsable_is_zero() {
        assert_eq!(parse_size_to_number(""), 0);
        assert_eq!(parse_size_to_number("abc"), 0);
        assert_eq!(parse_size_to_number("many-people"), 0);
    }

    #[test]
    fn revenue_million_forms() {
        assert!((parse_revenue_millions("$261.9 Million") - 261.9).abs() < 1e-9);
        assert!((parse_revenue_millions("50M") - 50.0).abs() < 1e-9);
        assert!((parse_revenue_millions("128.9 million") - 128.9).abs() < 1e-9);
    }

    #[test]
    fn revenue_billion_converts_to_millions() {
        assert!((parse_revenue_millions("$1.3 Billion") - 1300.0).abs() < 1e-9);
        assert!((parse_revenue_millions("1B") - 1000.0).abs() < 1e-9);
    }

    #[test]
    fn revenue_unitless_is_already_millions() {
        assert!((parse_revenue_millions("120") - 120.0).abs() < 1e-9);
    }

    #[test]
    fn revenue_unparsable_is_zero() {
        assert_eq!(parse_revenue_millions(""), 0.0);
        assert_eq!(parse_revenue_millions("confidential"), 0.0);
    }

    #[test]
    fn size_score_buckets() {
        assert_eq!(size_score(0), 0);
        assert_eq!(size_score(-5), 0);
        assert_eq!(size_score(50), 1);
        assert_eq!(size_score(200), 2);
        assert_eq!(size_score(500), 3);
        assert_eq!(size_score(1000), 4);
        assert_eq!(size_score(1001), 5);
        assert_eq!(size_score(50_000), 5);
    }

    #[test]
    fn revenue_category_buckets() {
        assert_eq!(revenue_category(0.0), 0);
        assert_eq!(revenue_category(19.9), 0);
        assert_eq!(revenue_category(20.0), 1);
        assert_eq!(revenue_category(99.9), 2);
        assert_eq!(revenue_category(261.9), 3);
        assert_eq!(revenue_category(1300.0), 4);
    }

    #[test]
    fn revenue_score_distinguishes_missing_from_small() {
        assert_eq!(revenue_score(0.0), 0);
        assert_eq!(revenue_score(5.0), 1);
        assert_eq!(revenue_score(1300.0), 5);
    }

    #[test]
    fn activity_score_buckets() {
        assert_eq!(activity_score(0.0), 5);
        assert_eq!(activity_score(7.0), 5);
        assert_eq!(activity_score(30.0), 4);
        assert_eq!(activity_score(60.0), 3);
        assert_eq!(activity_score(120.0), 2);
        assert_eq!(activity_score(180.0), 1);
    }
}
