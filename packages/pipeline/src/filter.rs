//! Rule-based hard filter.
//!
//! Predicates run in [`FilterField::ORDERED`] order, so failure lists and
//! reasons come out the same way for the same inputs every time. Missing
//! listing data is handled per field: a missing value passes a ceiling
//! check (the bound may still hold) but fails a floor check (the listing
//! cannot prove it clears the bar).

use domain::{FilterField, FilterResult, FilterStatus, Listing, UserCriteria};

use crate::fmt::comma;

pub fn evaluate(listing: &Listing, criteria: &UserCriteria) -> FilterResult {
    let mut passed = Vec::new();
    let mut failed = Vec::new();
    let mut reasons = Vec::new();

    for field in FilterField::ORDERED {
        let Some(verdict) = check(field, listing, criteria) else {
            continue; // criterion not set
        };
        match verdict {
            Ok(()) => passed.push(field),
            Err(reason) => {
                failed.push(field);
                reasons.push((field, reason));
            }
        }
    }

    let must_failed = failed.iter().any(|f| criteria.is_must(f.name()));
    let status = if must_failed {
        FilterStatus::Fail
    } else if !failed.is_empty() {
        FilterStatus::PartialPass
    } else {
        FilterStatus::Pass
    };
    tracing::debug!(listing = %listing.id, ?status, "filter verdict");

    FilterResult {
        listing_id: listing.id.clone(),
        status,
        passed,
        failed,
        reasons,
        extra_failures: Vec::new(),
    }
}

/// `None` when the criterion is not configured; otherwise pass or a
/// Korean failure reason.
fn check(
    field: FilterField,
    listing: &Listing,
    criteria: &UserCriteria,
) -> Option<std::result::Result<(), String>> {
    use FilterField::*;
    match field {
        MaxDeposit => criteria.max_deposit.map(|max| {
            ceiling(listing.deposit, max, |v| {
                format!("보증금 {}만원 > 상한 {}만원", comma(v), comma(max))
            })
        }),
        MaxMonthlyRent => criteria.max_monthly_rent.map(|max| {
            ceiling(listing.monthly_rent, max, |v| {
                format!("월세 {}만원 > 상한 {}만원", comma(v), comma(max))
            })
        }),
        MaxMaintenanceFee => criteria.max_maintenance_fee.map(|max| {
            ceiling(listing.maintenance_fee, max, |v| {
                format!("관리비 {}만원 > 상한 {}만원", comma(v), comma(max))
            })
        }),
        MinAreaSqm => criteria.min_area_sqm.map(|min| match listing.area_sqm {
            None => Err("전용면적 정보 없음".to_string()),
            Some(area) if area >= min => Ok(()),
            Some(area) => Err(format!("전용면적 {area}㎡ < 최소 {min}㎡")),
        }),
        MaxAreaSqm => criteria.max_area_sqm.map(|max| match listing.area_sqm {
            None => Ok(()),
            Some(area) if area <= max => Ok(()),
            Some(area) => Err(format!("전용면적 {area}㎡ > 최대 {max}㎡")),
        }),
        MinHouseholds => criteria.min_households.map(|min| match listing.households {
            None => Err("세대수 정보 없음".to_string()),
            Some(h) if h >= min => Ok(()),
            Some(h) => Err(format!(
                "세대수 {} < 최소 {}",
                comma(h as i64),
                comma(min as i64)
            )),
        }),
        MinBuiltYear => criteria.min_built_year.map(|min| match listing.built_year {
            None => Err("준공연도 정보 없음".to_string()),
            Some(y) if y >= min => Ok(()),
            Some(y) => Err(format!("준공연도 {y}년 < 최소 {min}년")),
        }),
        MaxBuiltYear => criteria.max_built_year.map(|max| match listing.built_year {
            None => Ok(()),
            Some(y) if y <= max => Ok(()),
            Some(y) => Err(format!("준공연도 {y}년 > 최대 {max}년")),
        }),
        MinFloor => criteria.min_floor.map(|min| match listing.floor {
            None => Err("층수 정보 없음".to_string()),
            Some(f) if f >= min => Ok(()),
            Some(f) => Err(format!("{f}층 < 최소 {min}층")),
        }),
        MaxFloor => criteria.max_floor.map(|max| match listing.floor {
            None => Ok(()),
            Some(f) if f <= max => Ok(()),
            Some(f) => Err(format!("{f}층 > 최대 {max}층")),
        }),
        RequireParking => criteria.require_parking.then(|| {
            let available = listing.has_parking == Some(true)
                || listing.parking_per_household.is_some_and(|p| p > 0.0);
            if available {
                Ok(())
            } else {
                Err("주차 불가 또는 정보 없음".to_string())
            }
        }),
        RequireElevator => criteria.require_elevator.then(|| {
            if listing.has_elevator == Some(true) {
                Ok(())
            } else {
                Err("엘리베이터 없음 또는 정보 없음".to_string())
            }
        }),
        Regions => (!criteria.regions.is_empty()).then(|| check_regions(listing, criteria)),
        PropertyTypes => {
            (!criteria.property_types.is_empty()).then(|| check_property_types(listing, criteria))
        }
    }
}

fn ceiling(
    value: Option<i64>,
    max: i64,
    reason: impl Fn(i64) -> String,
) -> std::result::Result<(), String> {
    match value {
        None => Ok(()),
        Some(v) if v <= max => Ok(()),
        Some(v) => Err(reason(v)),
    }
}

fn check_regions(listing: &Listing, criteria: &UserCriteria) -> std::result::Result<(), String> {
    let haystack = [
        listing.region_gu.as_deref(),
        listing.region_dong.as_deref(),
        listing.address.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase();

    if criteria
        .regions
        .iter()
        .any(|r| haystack.contains(&r.to_lowercase()))
    {
        Ok(())
    } else {
        Err(format!("지역 불일치 (희망: {})", criteria.regions.join(", ")))
    }
}

fn check_property_types(
    listing: &Listing,
    criteria: &UserCriteria,
) -> std::result::Result<(), String> {
    let Some(listing_type) = listing.property_type.as_deref() else {
        return Err("주택유형 정보 없음".to_string());
    };
    let listing_type = listing_type.to_lowercase();
    let matched = criteria.property_types.iter().any(|t| {
        let wanted = t.label().to_lowercase();
        listing_type.contains(&wanted) || wanted.contains(&listing_type)
    });
    if matched {
        Ok(())
    } else {
        let wanted: Vec<&str> = criteria.property_types.iter().map(|t| t.label()).collect();
        Err(format!(
            "주택유형 불일치 (희망: {}, 실제: {})",
            wanted.join(", "),
            listing_type
        ))
    }
}
