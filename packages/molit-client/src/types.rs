use std::collections::HashMap;

/// One `<item>` from the transaction-price API, kept as tag→text.
///
/// The API has shipped two generations of tag names (`aptNm` vs `아파트`);
/// the accessors check both so callers never care which vintage answered.
#[derive(Debug, Clone, Default)]
pub struct PriceRecord(pub HashMap<String, String>);

impl PriceRecord {
    fn first_of(&self, tags: &[&str]) -> Option<&str> {
        tags.iter()
            .filter_map(|t| self.0.get(*t))
            .map(String::as_str)
            .find(|v| !v.is_empty())
    }

    pub fn complex_name(&self) -> &str {
        self.first_of(&["aptNm", "아파트"]).unwrap_or("")
    }

    pub fn area_sqm(&self) -> Option<f64> {
        self.first_of(&["excluUseAr", "전용면적"])?.parse().ok()
    }

    /// Rent rows only. `true` when the monthly component is zero or blank,
    /// i.e. a pure jeonse transaction.
    pub fn is_pure_jeonse(&self) -> bool {
        matches!(
            self.first_of(&["monthlyRent", "월세금액"]).map(str::trim),
            None | Some("") | Some("0")
        )
    }

    /// Deposit in 만원, comma-stripped. Zero when absent or unparseable.
    pub fn deposit(&self) -> i64 {
        parse_amount(self.first_of(&["deposit", "보증금액"]))
    }

    /// Sale amount in 만원, comma-stripped. Trade rows only.
    pub fn deal_amount(&self) -> i64 {
        parse_amount(self.first_of(&["dealAmount", "거래금액"]))
    }
}

fn parse_amount(raw: Option<&str>) -> i64 {
    let Some(raw) = raw else { return 0 };
    let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != ',').collect();
    digits.parse().unwrap_or(0)
}

/// Aggregate over matching transactions, amounts in 만원.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceStats {
    pub avg: i64,
    pub min: i64,
    pub max: i64,
    pub count: usize,
}

/// How the asking deposit compares to recent jeonse transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceEvaluation {
    Cheap,
    Fair,
    Expensive,
}

impl PriceEvaluation {
    pub fn label(self) -> &'static str {
        match self {
            PriceEvaluation::Cheap => "저렴",
            PriceEvaluation::Fair => "적정",
            PriceEvaluation::Expensive => "비쌈",
        }
    }
}

/// Jeonse-ratio risk buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskTier {
    Safe,
    Moderate,
    Caution,
    HighRisk,
}

impl RiskTier {
    pub fn label(self) -> &'static str {
        match self {
            RiskTier::Safe => "안전",
            RiskTier::Moderate => "보통",
            RiskTier::Caution => "주의",
            RiskTier::HighRisk => "위험",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JeonseRatioAnalysis {
    /// `deposit / avg trade price * 100`, one decimal.
    pub ratio: f64,
    pub risk: RiskTier,
    pub avg_trade_price: i64,
    pub avg_rent_deposit: i64,
    pub current_deposit: i64,
    pub trade_count: usize,
    pub rent_count: usize,
}

/// Combined output of [`MolitClient::price_analysis`].
///
/// Every part is optional: no matching transactions means no verdict, never
/// a reassuring default.
///
/// [`MolitClient::price_analysis`]: crate::client::MolitClient::price_analysis
#[derive(Debug, Clone, Default)]
pub struct PriceAnalysis {
    pub rent: Option<PriceStats>,
    pub trade: Option<PriceStats>,
    pub evaluation: Option<PriceEvaluation>,
    pub jeonse_ratio: Option<JeonseRatioAnalysis>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> PriceRecord {
        PriceRecord(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn accessors_cover_both_tag_generations() {
        let new_style = record(&[("aptNm", "목동신시가지1"), ("excluUseAr", "65.34")]);
        assert_eq!(new_style.complex_name(), "목동신시가지1");
        assert_eq!(new_style.area_sqm(), Some(65.34));

        let old_style = record(&[("아파트", "목동신시가지1"), ("전용면적", "65.34")]);
        assert_eq!(old_style.complex_name(), "목동신시가지1");
        assert_eq!(old_style.area_sqm(), Some(65.34));
    }

    #[test]
    fn pure_jeonse_detection() {
        assert!(record(&[("monthlyRent", "0")]).is_pure_jeonse());
        assert!(record(&[("monthlyRent", "")]).is_pure_jeonse());
        assert!(record(&[]).is_pure_jeonse());
        assert!(!record(&[("월세금액", "120")]).is_pure_jeonse());
    }

    #[test]
    fn amounts_strip_commas() {
        assert_eq!(record(&[("deposit", "45,000")]).deposit(), 45000);
        assert_eq!(record(&[("거래금액", " 62,500 ")]).deal_amount(), 62500);
        assert_eq!(record(&[("deposit", "협의")]).deposit(), 0);
    }
}
