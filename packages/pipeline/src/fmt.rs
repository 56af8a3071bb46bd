//! Number formatting for Korean report strings.

/// Thousands grouping: `45000` → `"45,000"`.
pub fn comma(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if n < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// 만원 amount rendered in 억원 with one decimal: `45000` → `"4.5"`.
pub fn eok(man_won: i64) -> String {
    format!("{:.1}", man_won as f64 / 10_000.0)
}
