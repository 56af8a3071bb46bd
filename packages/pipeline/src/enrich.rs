//! Price-history enrichment notes.
//!
//! Turns a [`PriceAnalysis`] into the Korean annotations appended to a
//! listing: recent jeonse/trade averages, an over/under verdict on the
//! asking deposit, and the jeonse ratio with its risk tier. The risk
//! engine later re-reads these notes, so wording here is load-bearing.

use molit_client::{PriceAnalysis, PriceEvaluation, RiskTier};

use domain::Listing;

use crate::fmt::comma;

pub fn apply(listing: &mut Listing, analysis: &PriceAnalysis, months: u32) {
    for note in price_notes(analysis, months) {
        listing.push_note(note);
    }
}

pub fn price_notes(analysis: &PriceAnalysis, months: u32) -> Vec<String> {
    let mut notes = Vec::new();

    if let Some(rent) = &analysis.rent {
        let verdict = match analysis.evaluation {
            Some(PriceEvaluation::Cheap) => " → 시세보다 저렴 ✅",
            Some(PriceEvaluation::Expensive) => " → 시세보다 비쌈 ⚠️",
            Some(PriceEvaluation::Fair) => " → 시세 수준",
            None => "",
        };
        notes.push(format!(
            "[전세 시세] 최근 {months}개월 평균: {}만원 ({}건){verdict}",
            comma(rent.avg),
            rent.count
        ));
    }

    if let Some(trade) = &analysis.trade {
        notes.push(format!(
            "[매매 시세] 최근 {months}개월 평균: {}만원 ({}건)",
            comma(trade.avg),
            trade.count
        ));
    }

    if let Some(ratio) = &analysis.jeonse_ratio {
        let emoji = match ratio.risk {
            RiskTier::Safe => "🟢",
            RiskTier::Moderate => "🟡",
            RiskTier::Caution => "🟠",
            RiskTier::HighRisk => "🔴",
        };
        let mut line = format!(
            "[전세가율] {:.1}% {emoji} {}",
            ratio.ratio,
            ratio.risk.label()
        );
        if ratio.risk == RiskTier::HighRisk {
            line.push_str(" (깡통전세 위험)");
        }
        notes.push(line);
    }

    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use molit_client::{JeonseRatioAnalysis, PriceStats};

    fn stats(avg: i64, count: usize) -> PriceStats {
        PriceStats {
            avg,
            min: avg - 2000,
            max: avg + 2000,
            count,
        }
    }

    #[test]
    fn no_data_produces_no_notes() {
        assert!(price_notes(&PriceAnalysis::default(), 6).is_empty());
    }

    #[test]
    fn rent_note_carries_verdict_and_counts() {
        let analysis = PriceAnalysis {
            rent: Some(stats(42000, 8)),
            evaluation: Some(PriceEvaluation::Cheap),
            ..Default::default()
        };
        let notes = price_notes(&analysis, 6);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0], "[전세 시세] 최근 6개월 평균: 42,000만원 (8건) → 시세보다 저렴 ✅");
    }

    #[test]
    fn high_ratio_note_warns_about_negative_equity() {
        let analysis = PriceAnalysis {
            trade: Some(stats(52000, 4)),
            jeonse_ratio: Some(JeonseRatioAnalysis {
                ratio: 86.5,
                risk: RiskTier::HighRisk,
                avg_trade_price: 52000,
                avg_rent_deposit: 43000,
                current_deposit: 45000,
                trade_count: 4,
                rent_count: 9,
            }),
            ..Default::default()
        };
        let notes = price_notes(&analysis, 6);
        assert_eq!(notes[0], "[매매 시세] 최근 6개월 평균: 52,000만원 (4건)");
        assert_eq!(notes[1], "[전세가율] 86.5% 🔴 위험 (깡통전세 위험)");
    }

    #[test]
    fn notes_append_to_listing_without_touching_description() {
        use domain::ListingSource;
        let mut listing = Listing::new("naver_1", ListingSource::Naver);
        listing.description = Some("원본 설명".to_string());
        let analysis = PriceAnalysis {
            rent: Some(stats(40000, 3)),
            evaluation: Some(PriceEvaluation::Fair),
            ..Default::default()
        };
        apply(&mut listing, &analysis, 6);
        assert_eq!(listing.description.as_deref(), Some("원본 설명"));
        assert_eq!(listing.notes.len(), 1);
        assert!(listing.notes[0].contains("시세 수준"));
    }
}
