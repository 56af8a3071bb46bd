//! Scraped-text parsers: large-unit prices, floor strings, short dates.

use chrono::NaiveDate;

/// Parse a large-unit price string into 만원. `"4억 5,000"` → `45000`.
///
/// The part before `억` is multiplied by 10,000; the remainder is
/// comma-stripped and added. A blank remainder contributes zero, and
/// anything unparseable yields zero rather than an error.
pub fn parse_price(raw: &str) -> i64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0;
    }

    let clean = |s: &str| -> Option<i64> {
        let digits: String = s.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
        if digits.is_empty() {
            Some(0)
        } else {
            digits.parse().ok()
        }
    };

    match text.split_once('억') {
        Some((eok, rest)) => {
            let Some(eok) = clean(eok) else { return 0 };
            let Some(rest) = clean(rest) else { return 0 };
            eok * 10_000 + rest
        }
        None => clean(text).unwrap_or(0),
    }
}

/// Parse `"15/25층"` into `(floor, total_floors)`. Either side may be blank.
pub fn parse_floor(raw: &str) -> (Option<i32>, Option<i32>) {
    let text = raw.trim().replace('층', "");
    if text.is_empty() {
        return (None, None);
    }
    match text.split_once('/') {
        Some((floor, total)) => (floor.trim().parse().ok(), total.trim().parse().ok()),
        None => (text.trim().parse().ok(), None),
    }
}

/// First four digits of a `yyyymmdd`-style approval date.
pub fn parse_built_year(raw: &str) -> Option<i32> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).take(4).collect();
    if digits.len() == 4 {
        digits.parse().ok()
    } else {
        None
    }
}

/// Listing confirm dates arrive as `yy.mm.dd` or `yymmdd`.
pub fn parse_confirm_date(raw: &str) -> Option<NaiveDate> {
    let clean: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if clean.len() != 6 {
        return None;
    }
    NaiveDate::parse_from_str(&clean, "%y%m%d").ok()
}

/// Exclusive area in pyeong, rounded to one decimal.
pub fn to_pyeong(sqm: f64) -> f64 {
    (sqm * 0.3025 * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_with_eok_and_remainder() {
        assert_eq!(parse_price("4억 5,000"), 45000);
        assert_eq!(parse_price("6억 5,000"), 65000);
        assert_eq!(parse_price("1억"), 10000);
        assert_eq!(parse_price("억 500"), 500);
    }

    #[test]
    fn price_without_eok() {
        assert_eq!(parse_price("38,000"), 38000);
        assert_eq!(parse_price(""), 0);
        assert_eq!(parse_price("협의"), 0);
    }

    #[test]
    fn floor_variants() {
        assert_eq!(parse_floor("15/25층"), (Some(15), Some(25)));
        assert_eq!(parse_floor("3층"), (Some(3), None));
        assert_eq!(parse_floor("/25"), (None, Some(25)));
        assert_eq!(parse_floor(""), (None, None));
        assert_eq!(parse_floor("고/25"), (None, Some(25)));
    }

    #[test]
    fn built_year_from_approval_date() {
        assert_eq!(parse_built_year("20031120"), Some(2003));
        assert_eq!(parse_built_year("1995.03"), Some(1995));
        assert_eq!(parse_built_year(""), None);
    }

    #[test]
    fn confirm_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        assert_eq!(parse_confirm_date("25.03.14"), Some(expected));
        assert_eq!(parse_confirm_date("250314"), Some(expected));
        assert_eq!(parse_confirm_date("2025-03-14"), None);
    }

    #[test]
    fn pyeong_rounding() {
        assert_eq!(to_pyeong(84.9), 25.7);
        assert_eq!(to_pyeong(59.8), 18.1);
    }
}
