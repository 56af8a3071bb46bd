//! Weighted listing scoring.
//!
//! Six categories, 100 points total. Each category computes a 0.0..=1.0
//! fraction of its weight; missing data lands mid-range rather than at
//! zero so a sparse listing is not buried under fully-described ones.

use chrono::Datelike;

use domain::{Listing, ScoreBreakdown, ScoreResult, UserCriteria};

const WEIGHT_PRICE: f64 = 25.0;
const WEIGHT_SIZE: f64 = 15.0;
const WEIGHT_COMPLEX: f64 = 20.0;
const WEIGHT_LOCATION: f64 = 20.0;
const WEIGHT_OPTIONS: f64 = 10.0;
const WEIGHT_CONDITION: f64 = 10.0;

const POSITIVE_KEYWORDS: [&str; 5] = ["올수리", "풀옵션", "깨끗", "신축", "리모델링"];
const NEGATIVE_KEYWORDS: [&str; 3] = ["급매", "협의", "현상태"];

pub fn evaluate(listing: &Listing, criteria: &UserCriteria) -> ScoreResult {
    let breakdown = vec![
        price_score(listing, criteria),
        size_score(listing, criteria),
        complex_score(listing),
        location_score(listing, criteria),
        options_score(listing),
        condition_score(listing),
    ];
    let total = (breakdown.iter().map(|b| b.score).sum::<f64>() * 10.0).round() / 10.0;

    ScoreResult {
        listing_id: listing.id.clone(),
        total,
        rank: None,
        breakdown,
    }
}

fn entry(category: &str, fraction: f64, max: f64, reason: String) -> ScoreBreakdown {
    let fraction = fraction.clamp(0.0, 1.0);
    ScoreBreakdown {
        category: category.to_string(),
        score: (fraction * max * 10.0).round() / 10.0,
        max_score: max,
        reason,
    }
}

/// Deposit against budget: the deeper under the ceiling, the better.
fn price_score(listing: &Listing, criteria: &UserCriteria) -> ScoreBreakdown {
    let (fraction, reason) = match (listing.deposit, criteria.max_deposit) {
        (Some(deposit), Some(max)) if max > 0 => {
            let ratio = deposit as f64 / max as f64;
            let fraction = if ratio <= 0.7 {
                1.0
            } else if ratio <= 0.85 {
                0.9
            } else if ratio <= 1.0 {
                0.7
            } else {
                0.3
            };
            (fraction, format!("예산 대비 {:.0}%", ratio * 100.0))
        }
        _ => (0.5, "가격 또는 예산 정보 없음".to_string()),
    };
    entry("가격", fraction, WEIGHT_PRICE, reason)
}

fn size_score(listing: &Listing, criteria: &UserCriteria) -> ScoreBreakdown {
    let (fraction, reason) = match listing.area_sqm {
        None => (0.5, "면적 정보 없음".to_string()),
        Some(area) => {
            let below_min = criteria.min_area_sqm.is_some_and(|min| area < min);
            let above_max = criteria.max_area_sqm.is_some_and(|max| area > max);
            if below_min {
                (0.3, format!("전용 {area}㎡, 희망보다 좁음"))
            } else if above_max {
                (0.5, format!("전용 {area}㎡, 희망보다 넓음"))
            } else {
                (1.0, format!("전용 {area}㎡, 희망 범위"))
            }
        }
    };
    entry("면적", fraction, WEIGHT_SIZE, reason)
}

/// Households, age, and parking ratio, each a sub-fraction of the weight.
fn complex_score(listing: &Listing) -> ScoreBreakdown {
    let mut fraction = 0.0;
    let mut notes: Vec<String> = Vec::new();

    match listing.households {
        Some(h) if h >= 1500 => {
            fraction += 0.4;
            notes.push(format!("대단지 {h}세대"));
        }
        Some(h) if h >= 1000 => {
            fraction += 0.35;
            notes.push(format!("{h}세대"));
        }
        Some(h) if h >= 500 => {
            fraction += 0.25;
            notes.push(format!("{h}세대"));
        }
        Some(h) => {
            fraction += 0.1;
            notes.push(format!("소단지 {h}세대"));
        }
        None => {
            fraction += 0.15;
            notes.push("세대수 정보 없음".to_string());
        }
    }

    match listing.built_year {
        Some(year) => {
            let age = (chrono::Local::now().year() - year).max(0);
            let sub = if age <= 5 {
                0.3
            } else if age <= 10 {
                0.25
            } else if age <= 20 {
                0.15
            } else {
                0.05
            };
            fraction += sub;
            notes.push(format!("{age}년차"));
        }
        None => notes.push("준공연도 정보 없음".to_string()),
    }

    match listing.parking_per_household {
        Some(p) if p >= 1.5 => {
            fraction += 0.3;
            notes.push(format!("주차 {p:.1}대/세대"));
        }
        Some(p) if p >= 1.0 => {
            fraction += 0.2;
            notes.push(format!("주차 {p:.1}대/세대"));
        }
        Some(p) => {
            fraction += 0.1;
            notes.push(format!("주차 {p:.1}대/세대"));
        }
        None => fraction += 0.1,
    }

    entry("단지", fraction, WEIGHT_COMPLEX, notes.join(", "))
}

/// Base half for any located listing; the other half for landing in one
/// of the requested regions.
fn location_score(listing: &Listing, criteria: &UserCriteria) -> ScoreBreakdown {
    let mut fraction = 0.5;
    let mut reason = "위치 기본 점수".to_string();

    if !criteria.regions.is_empty() {
        let haystack = [
            listing.region_gu.as_deref(),
            listing.region_dong.as_deref(),
            listing.address.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ");
        if let Some(matched) = criteria.regions.iter().find(|r| haystack.contains(r.as_str())) {
            fraction += 0.5;
            reason = format!("희망 지역 {matched}");
        } else {
            reason = "희망 지역 밖".to_string();
        }
    }

    entry("위치", fraction, WEIGHT_LOCATION, reason)
}

fn options_score(listing: &Listing) -> ScoreBreakdown {
    let mut fraction = 0.0;
    let mut notes: Vec<String> = Vec::new();

    if listing.has_elevator == Some(true) {
        fraction += 0.3;
        notes.push("엘리베이터".to_string());
    }
    if !listing.options.is_empty() {
        fraction += (listing.options.len() as f64 * 0.1).min(0.5);
        notes.push(format!("옵션 {}개", listing.options.len()));
    }
    if let (Some(floor), Some(total)) = (listing.floor, listing.total_floors) {
        if total > 0 && floor > 0 {
            let ratio = floor as f64 / total as f64;
            if (0.3..=0.8).contains(&ratio) {
                fraction += 0.2;
                notes.push(format!("중간층 {floor}/{total}"));
            }
        }
    }
    if notes.is_empty() {
        notes.push("옵션 정보 없음".to_string());
    }

    entry("옵션", fraction, WEIGHT_OPTIONS, notes.join(", "))
}

/// Keyword scan over the free-text description.
fn condition_score(listing: &Listing) -> ScoreBreakdown {
    let text = listing.description.as_deref().unwrap_or("");
    let mut fraction: f64 = 0.6;
    let mut notes: Vec<String> = Vec::new();

    for kw in POSITIVE_KEYWORDS {
        if text.contains(kw) {
            fraction += 0.1;
            notes.push(kw.to_string());
        }
    }
    for kw in NEGATIVE_KEYWORDS {
        if text.contains(kw) {
            fraction -= 0.1;
            notes.push(format!("{kw}(-)"));
        }
    }

    let reason = if notes.is_empty() {
        "상태 기본 점수".to_string()
    } else {
        notes.join(", ")
    };
    entry("상태", fraction, WEIGHT_CONDITION, reason)
}
