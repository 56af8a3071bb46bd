//! Report assembly: ranking, summary, and market insights.

use std::collections::HashMap;

use chrono::Utc;

use domain::{FilterStatus, ListingReport, Report};

use crate::fmt::{comma, eok};

/// Split analyzed listings into ranked and filtered-out, assign 1-based
/// ranks by descending score, and write the Korean summary lines.
///
/// The sort is stable, so equal scores keep acquisition order.
pub fn assemble(mut reports: Vec<ListingReport>) -> Report {
    let total_count = reports.len();
    if total_count == 0 {
        return Report::empty("조건에 맞는 매물을 찾지 못했습니다.");
    }

    let mut filtered_out: Vec<ListingReport> = Vec::new();
    let mut ranked: Vec<ListingReport> = Vec::new();
    for report in reports.drain(..) {
        let failed = report
            .filter
            .as_ref()
            .is_some_and(|f| f.status == FilterStatus::Fail);
        if failed {
            filtered_out.push(report);
        } else {
            ranked.push(report);
        }
    }

    ranked.sort_by(|a, b| {
        let sa = a.score.as_ref().map_or(0.0, |s| s.total);
        let sb = b.score.as_ref().map_or(0.0, |s| s.total);
        sb.partial_cmp(&sa).unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, report) in ranked.iter_mut().enumerate() {
        if let Some(score) = report.score.as_mut() {
            score.rank = Some(i as u32 + 1);
        }
    }

    let summary = summarize(total_count, &ranked, &filtered_out);
    let insights = insights(&ranked, &filtered_out);

    Report {
        created_at: Utc::now(),
        total_count,
        passed_count: ranked.len(),
        ranked,
        filtered_out,
        summary,
        insights,
    }
}

fn summarize(total: usize, ranked: &[ListingReport], filtered_out: &[ListingReport]) -> String {
    if ranked.is_empty() {
        let mut s = format!("{total}개 매물 모두 필수 조건을 통과하지 못했습니다.");
        if let Some(reason) = most_common_failure(filtered_out) {
            s.push_str(&format!(" 주요 탈락 사유: {reason}"));
        }
        return s;
    }

    let best = &ranked[0];
    let mut s = format!(
        "{total}개 매물 중 {}개가 조건에 부합합니다. '{}'이(가) {}점으로 가장 추천됩니다.",
        ranked.len(),
        best.listing.display_name(),
        best.score.as_ref().map_or(0.0, |sc| sc.total)
    );
    if !filtered_out.is_empty() {
        if let Some(reason) = most_common_failure(filtered_out) {
            s.push_str(&format!(
                " {}개는 필수 조건에서 탈락했습니다 (주요 사유: {reason}).",
                filtered_out.len()
            ));
        }
    }
    s
}

/// The filter field that rejected the most listings, by Korean reason text.
fn most_common_failure(filtered_out: &[ListingReport]) -> Option<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for report in filtered_out {
        let Some(filter) = report.filter.as_ref() else {
            continue;
        };
        for field in &filter.failed {
            *counts.entry(field.name()).or_default() += 1;
        }
        for (name, _) in &filter.extra_failures {
            *counts.entry(name.as_str()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .max_by_key(|(name, count)| (*count, std::cmp::Reverse(*name)))
        .map(|(name, count)| format!("{} ({count}건)", failure_label(name)))
}

fn failure_label(field_name: &str) -> &str {
    match field_name {
        "max_deposit" => "보증금 초과",
        "max_monthly_rent" => "월세 초과",
        "max_maintenance_fee" => "관리비 초과",
        "min_area_sqm" => "면적 미달",
        "max_area_sqm" => "면적 초과",
        "min_households" => "세대수 미달",
        "min_built_year" | "max_built_year" => "준공연도 불일치",
        "min_floor" | "max_floor" => "층수 불일치",
        "require_parking" => "주차 불가",
        "require_elevator" => "엘리베이터 없음",
        "regions" => "지역 불일치",
        "property_types" => "주택유형 불일치",
        "max_commute_minutes" => "통근 시간 초과",
        other => other,
    }
}

fn insights(ranked: &[ListingReport], filtered_out: &[ListingReport]) -> Vec<String> {
    let mut insights = Vec::new();

    let deposits: Vec<i64> = ranked
        .iter()
        .filter_map(|r| r.listing.deposit)
        .filter(|d| *d > 0)
        .collect();
    if !deposits.is_empty() {
        let avg = deposits.iter().sum::<i64>() / deposits.len() as i64;
        let min = *deposits.iter().min().unwrap_or(&0);
        insights.push(format!(
            "통과 매물 평균 보증금 {}억 ({}만원), 최저 {}억",
            eok(avg),
            comma(avg),
            eok(min)
        ));
    }

    let large_complex = ranked
        .iter()
        .filter(|r| r.listing.households.is_some_and(|h| h >= 1000))
        .count();
    if large_complex > 0 {
        insights.push(format!("1,000세대 이상 대단지 매물 {large_complex}개"));
    }

    let risky = ranked
        .iter()
        .filter(|r| r.risk.as_ref().is_some_and(|risk| risk.risk_score >= 50))
        .count();
    if risky > 0 {
        insights.push(format!(
            "위험 점수 50 이상 매물 {risky}개: 계약 전 권리관계 확인 필수"
        ));
    }

    if let Some(reason) = most_common_failure(filtered_out) {
        insights.push(format!("가장 흔한 탈락 사유: {reason}"));
    }

    if insights.is_empty() {
        insights.push("특이 사항이 없습니다.".to_string());
    }
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{FilterField, FilterResult, Listing, ListingSource, ScoreResult};

    fn report_for(id: &str, score: f64, status: FilterStatus) -> ListingReport {
        let mut listing = Listing::new(id, ListingSource::Naver);
        listing.title = Some(id.to_string());
        listing.deposit = Some(40000);
        ListingReport {
            listing,
            filter: Some(FilterResult {
                listing_id: id.to_string(),
                status,
                passed: Vec::new(),
                failed: if status == FilterStatus::Fail {
                    vec![FilterField::MaxDeposit]
                } else {
                    Vec::new()
                },
                reasons: Vec::new(),
                extra_failures: Vec::new(),
            }),
            score: Some(ScoreResult {
                listing_id: id.to_string(),
                total: score,
                rank: None,
                breakdown: Vec::new(),
            }),
            risk: None,
            questions: None,
            commute: None,
        }
    }

    #[test]
    fn empty_input_gives_the_empty_report() {
        let report = assemble(Vec::new());
        assert_eq!(report.total_count, 0);
        assert_eq!(report.insights, vec!["검색 결과가 없습니다.".to_string()]);
    }

    #[test]
    fn ranks_are_sequential_and_ties_keep_acquisition_order() {
        let reports = vec![
            report_for("A", 10.0, FilterStatus::Pass),
            report_for("B", 30.0, FilterStatus::Pass),
            report_for("C", 30.0, FilterStatus::Pass),
            report_for("D", 5.0, FilterStatus::Pass),
        ];
        let report = assemble(reports);
        let order: Vec<&str> = report
            .ranked
            .iter()
            .map(|r| r.listing.id.as_str())
            .collect();
        assert_eq!(order, vec!["B", "C", "A", "D"]);
        let ranks: Vec<u32> = report
            .ranked
            .iter()
            .map(|r| r.score.as_ref().unwrap().rank.unwrap())
            .collect();
        assert_eq!(ranks, vec![1, 2, 3, 4]);
    }

    #[test]
    fn failed_listings_are_split_out_and_counted() {
        let reports = vec![
            report_for("A", 80.0, FilterStatus::Pass),
            report_for("B", 60.0, FilterStatus::Fail),
            report_for("C", 70.0, FilterStatus::PartialPass),
        ];
        let report = assemble(reports);
        assert_eq!(report.total_count, 3);
        assert_eq!(report.passed_count, 2);
        assert_eq!(report.filtered_out.len(), 1);
        assert!(report.summary.contains("3개 매물 중 2개가 조건에 부합합니다"));
        assert!(report.summary.contains("'A'이(가) 80점으로 가장 추천됩니다"));
        assert!(report.summary.contains("보증금 초과 (1건)"));
    }

    #[test]
    fn all_failed_summary_names_the_common_reason() {
        let reports = vec![
            report_for("A", 0.0, FilterStatus::Fail),
            report_for("B", 0.0, FilterStatus::Fail),
        ];
        let report = assemble(reports);
        assert!(report.ranked.is_empty());
        assert!(report.summary.contains("모두 필수 조건을 통과하지 못했습니다"));
        assert!(report.summary.contains("보증금 초과 (2건)"));
    }

    #[test]
    fn insights_cover_deposits_and_failures() {
        let reports = vec![
            report_for("A", 80.0, FilterStatus::Pass),
            report_for("B", 60.0, FilterStatus::Fail),
        ];
        let report = assemble(reports);
        assert!(report
            .insights
            .iter()
            .any(|i| i.contains("평균 보증금 4.0억 (40,000만원)")));
        assert!(report.insights.iter().any(|i| i.contains("탈락 사유")));
    }
}
