//! Terminal rendering of the final report.

use domain::{ListingReport, Report, RiskLevel};

pub fn print_report(report: &Report) {
    println!("═══════════════════════════════════════════");
    println!(" 매물 분석 리포트 ({})", report.created_at.format("%Y-%m-%d %H:%M"));
    println!("═══════════════════════════════════════════");
    println!("{}", report.summary);
    println!();

    for entry in &report.ranked {
        print_ranked(entry);
    }

    if !report.filtered_out.is_empty() {
        println!("─── 탈락 매물 {}건 ───", report.filtered_out.len());
        for entry in &report.filtered_out {
            print_rejected(entry);
        }
        println!();
    }

    println!("─── 인사이트 ───");
    for insight in &report.insights {
        println!("• {insight}");
    }
}

fn print_ranked(entry: &ListingReport) {
    let rank = entry
        .score
        .as_ref()
        .and_then(|s| s.rank)
        .map_or_else(|| "-".to_string(), |r| r.to_string());
    let total = entry.score.as_ref().map_or(0.0, |s| s.total);

    println!("[{rank}위] {} ({total}점)", entry.listing.summary());
    if let Some(url) = &entry.listing.url {
        println!("      {url}");
    }

    if let Some(score) = &entry.score {
        let parts: Vec<String> = score
            .breakdown
            .iter()
            .map(|b| format!("{} {}/{}", b.category, b.score, b.max_score))
            .collect();
        println!("      {}", parts.join(" · "));
    }

    if let Some(risk) = &entry.risk {
        if risk.risks.is_empty() {
            println!("      위험: 없음");
        } else {
            println!("      위험 점수 {}: {}", risk.risk_score, risk.summary);
            for item in &risk.risks {
                println!("        {} [{}] {}", level_mark(item.level), item.category, item.title);
                println!("          → {}", item.check_action);
            }
        }
    }

    if let Some(commute) = &entry.commute {
        if let Some(minutes) = commute.minutes {
            println!(
                "      통근 {minutes}분 (환승 {}회)",
                commute.transfers.unwrap_or(0)
            );
        }
    }

    for note in &entry.listing.notes {
        println!("      {note}");
    }

    if let Some(questions) = &entry.questions {
        println!("      확인 질문:");
        for q in &questions.questions {
            println!("        - {q}");
        }
    }
    println!();
}

fn print_rejected(entry: &ListingReport) {
    println!("  ✗ {}", entry.listing.summary());
    if let Some(filter) = &entry.filter {
        for reason in filter.failure_reasons() {
            println!("      {reason}");
        }
    }
}

fn level_mark(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::High => "🔴",
        RiskLevel::Medium => "🟠",
        RiskLevel::Low => "🟡",
        RiskLevel::Info => "ℹ️",
    }
}
