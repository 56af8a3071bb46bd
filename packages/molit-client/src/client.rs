//! Transaction-price client with a per-region in-memory cache.
//!
//! One pipeline run analyzes many listings from the same handful of
//! districts, so the raw records for a district are fetched once
//! ([`MolitClient::preload_region`]) and every per-complex question is
//! answered from memory. Without an API key the client still constructs;
//! every lookup just comes back empty.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate};

use crate::types::{
    JeonseRatioAnalysis, PriceAnalysis, PriceEvaluation, PriceRecord, PriceStats, RiskTier,
};
use crate::xml::parse_price_xml;

const APT_RENT_PATH: &str = "/RTMSDataSvcAptRent/getRTMSDataSvcAptRent";
const APT_TRADE_PATH: &str = "/RTMSDataSvcAptTrade/getRTMSDataSvcAptTrade";

/// ±5㎡ window when matching transactions to a listing's area.
const AREA_TOLERANCE_SQM: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct MolitConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for MolitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "http://apis.data.go.kr/1613000".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl MolitConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("DATA_GO_KR_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if let Ok(url) = std::env::var("DATA_GO_KR_BASE_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

#[derive(Debug, Default)]
struct RegionPrices {
    rent: Arc<Vec<PriceRecord>>,
    trade: Arc<Vec<PriceRecord>>,
}

pub struct MolitClient {
    http: reqwest::Client,
    config: MolitConfig,
    cache: tokio::sync::Mutex<HashMap<String, RegionPrices>>,
}

impl MolitClient {
    pub fn new(config: MolitConfig) -> Result<Self, reqwest::Error> {
        if config.api_key.is_none() {
            tracing::warn!("no price API key configured; price history will be empty");
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            http,
            config,
            cache: tokio::sync::Mutex::new(HashMap::new()),
        })
    }

    /// Fetch and cache rent + trade records for a district. Idempotent:
    /// a district already in the cache is not fetched again.
    pub async fn preload_region(&self, sigungu_code: &str, months: u32) {
        {
            let cache = self.cache.lock().await;
            if cache.contains_key(sigungu_code) {
                return;
            }
        }
        tracing::info!(region = %sigungu_code, months, "preloading transaction prices");
        let rent = self.fetch_recent(sigungu_code, months, APT_RENT_PATH).await;
        let trade = self.fetch_recent(sigungu_code, months, APT_TRADE_PATH).await;
        tracing::info!(
            region = %sigungu_code,
            rent = rent.len(),
            trade = trade.len(),
            "price records preloaded"
        );
        let mut cache = self.cache.lock().await;
        cache.insert(
            sigungu_code.to_string(),
            RegionPrices {
                rent: Arc::new(rent),
                trade: Arc::new(trade),
            },
        );
    }

    async fn rent_records(&self, sigungu_code: &str, months: u32) -> Arc<Vec<PriceRecord>> {
        self.preload_region(sigungu_code, months).await;
        let cache = self.cache.lock().await;
        cache
            .get(sigungu_code)
            .map(|r| Arc::clone(&r.rent))
            .unwrap_or_default()
    }

    async fn trade_records(&self, sigungu_code: &str, months: u32) -> Arc<Vec<PriceRecord>> {
        self.preload_region(sigungu_code, months).await;
        let cache = self.cache.lock().await;
        cache
            .get(sigungu_code)
            .map(|r| Arc::clone(&r.trade))
            .unwrap_or_default()
    }

    async fn fetch_recent(
        &self,
        sigungu_code: &str,
        months: u32,
        api_path: &str,
    ) -> Vec<PriceRecord> {
        let Some(api_key) = self.config.api_key.clone() else {
            return Vec::new();
        };
        let mut records = Vec::new();
        for year_month in trailing_months(Local::now().date_naive(), months) {
            tracing::debug!(region = %sigungu_code, %year_month, "fetching price month");
            let url = format!("{}{}", self.config.base_url, api_path);
            let params = [
                ("serviceKey", api_key.as_str()),
                ("LAWD_CD", sigungu_code),
                ("DEAL_YMD", &year_month),
            ];
            let resp = match self.http.get(&url).query(&params).send().await {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::error!(error = %err, "price API call failed");
                    continue;
                }
            };
            if resp.status().as_u16() != 200 {
                tracing::error!(status = resp.status().as_u16(), "price API error status");
                continue;
            }
            match resp.text().await {
                Ok(body) => records.extend(parse_price_xml(&body)),
                Err(err) => tracing::error!(error = %err, "price API body read failed"),
            }
        }
        records
    }

    /// Average jeonse deposit for one complex near one area.
    pub async fn complex_rent_avg(
        &self,
        sigungu_code: &str,
        complex_name: &str,
        area_sqm: f64,
        months: u32,
    ) -> Option<PriceStats> {
        let records = self.rent_records(sigungu_code, months).await;
        rent_stats(&records, complex_name, area_sqm)
    }

    /// Average sale price for one complex near one area.
    pub async fn complex_trade_avg(
        &self,
        sigungu_code: &str,
        complex_name: &str,
        area_sqm: f64,
        months: u32,
    ) -> Option<PriceStats> {
        let records = self.trade_records(sigungu_code, months).await;
        trade_stats(&records, complex_name, area_sqm)
    }

    /// Rent comparison, trade average, and jeonse ratio in one pass.
    pub async fn price_analysis(
        &self,
        sigungu_code: &str,
        complex_name: &str,
        area_sqm: f64,
        current_deposit: i64,
        months: u32,
    ) -> PriceAnalysis {
        let rent = self
            .complex_rent_avg(sigungu_code, complex_name, area_sqm, months)
            .await;
        let trade = self
            .complex_trade_avg(sigungu_code, complex_name, area_sqm, months)
            .await;
        assemble_analysis(rent, trade, current_deposit)
    }
}

/// Year-month strings for the current month and the `months - 1` before it.
fn trailing_months(today: NaiveDate, months: u32) -> Vec<String> {
    let mut year = today.year();
    let mut month = today.month();
    (0..months)
        .map(|_| {
            let ym = format!("{year:04}{month:02}");
            if month == 1 {
                year -= 1;
                month = 12;
            } else {
                month -= 1;
            }
            ym
        })
        .collect()
}

fn within_area(record: &PriceRecord, area_sqm: f64) -> bool {
    record
        .area_sqm()
        .is_some_and(|a| (a - area_sqm).abs() <= AREA_TOLERANCE_SQM)
}

/// Jeonse deposits for a complex: substring name match, area window, pure
/// jeonse rows only.
fn rent_stats(records: &[PriceRecord], complex_name: &str, area_sqm: f64) -> Option<PriceStats> {
    let deposits: Vec<i64> = records
        .iter()
        .filter(|r| r.complex_name().contains(complex_name))
        .filter(|r| within_area(r, area_sqm))
        .filter(|r| r.is_pure_jeonse())
        .map(|r| r.deposit())
        .filter(|d| *d > 0)
        .collect();
    stats_of(&deposits)
}

fn trade_stats(records: &[PriceRecord], complex_name: &str, area_sqm: f64) -> Option<PriceStats> {
    let prices: Vec<i64> = records
        .iter()
        .filter(|r| r.complex_name().contains(complex_name))
        .filter(|r| within_area(r, area_sqm))
        .map(|r| r.deal_amount())
        .filter(|p| *p > 0)
        .collect();
    stats_of(&prices)
}

fn stats_of(amounts: &[i64]) -> Option<PriceStats> {
    if amounts.is_empty() {
        return None;
    }
    Some(PriceStats {
        avg: amounts.iter().sum::<i64>() / amounts.len() as i64,
        min: *amounts.iter().min().unwrap_or(&0),
        max: *amounts.iter().max().unwrap_or(&0),
        count: amounts.len(),
    })
}

fn assemble_analysis(
    rent: Option<PriceStats>,
    trade: Option<PriceStats>,
    current_deposit: i64,
) -> PriceAnalysis {
    let evaluation = rent
        .filter(|r| r.avg > 0)
        .map(|r| evaluate_deposit(current_deposit, r.avg));

    let jeonse_ratio = trade.filter(|t| t.avg > 0).map(|t| {
        let ratio = (current_deposit as f64 / t.avg as f64) * 100.0;
        let ratio = (ratio * 10.0).round() / 10.0;
        JeonseRatioAnalysis {
            ratio,
            risk: risk_tier(ratio),
            avg_trade_price: t.avg,
            avg_rent_deposit: rent.map(|r| r.avg).unwrap_or(0),
            current_deposit,
            trade_count: t.count,
            rent_count: rent.map(|r| r.count).unwrap_or(0),
        }
    });

    PriceAnalysis {
        rent,
        trade,
        evaluation,
        jeonse_ratio,
    }
}

/// ±5% band around the recent jeonse average.
fn evaluate_deposit(current: i64, avg: i64) -> PriceEvaluation {
    let diff_percent = ((current - avg) as f64 / avg as f64) * 100.0;
    if diff_percent < -5.0 {
        PriceEvaluation::Cheap
    } else if diff_percent > 5.0 {
        PriceEvaluation::Expensive
    } else {
        PriceEvaluation::Fair
    }
}

fn risk_tier(ratio: f64) -> RiskTier {
    if ratio <= 60.0 {
        RiskTier::Safe
    } else if ratio <= 70.0 {
        RiskTier::Moderate
    } else if ratio <= 80.0 {
        RiskTier::Caution
    } else {
        RiskTier::HighRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn rent_record(name: &str, area: &str, deposit: &str, monthly: &str) -> PriceRecord {
        let mut fields = HashMap::new();
        fields.insert("aptNm".to_string(), name.to_string());
        fields.insert("excluUseAr".to_string(), area.to_string());
        fields.insert("deposit".to_string(), deposit.to_string());
        fields.insert("monthlyRent".to_string(), monthly.to_string());
        PriceRecord(fields)
    }

    fn trade_record(name: &str, area: &str, amount: &str) -> PriceRecord {
        let mut fields = HashMap::new();
        fields.insert("aptNm".to_string(), name.to_string());
        fields.insert("excluUseAr".to_string(), area.to_string());
        fields.insert("dealAmount".to_string(), amount.to_string());
        PriceRecord(fields)
    }

    #[test]
    fn trailing_months_crosses_year_boundary() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(trailing_months(jan, 3), vec!["202601", "202512", "202511"]);
    }

    #[test]
    fn rent_stats_filters_name_area_and_monthly() {
        let records = vec![
            rent_record("목동신시가지1", "65.3", "42,000", "0"),
            rent_record("목동신시가지1", "65.0", "44,000", "0"),
            // monthly rent: not pure jeonse
            rent_record("목동신시가지1", "65.3", "10,000", "120"),
            // area out of window
            rent_record("목동신시가지1", "84.9", "60,000", "0"),
            // different complex
            rent_record("신정뉴타운", "65.3", "38,000", "0"),
        ];
        let stats = rent_stats(&records, "목동신시가지1", 65.0).unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.avg, 43000);
        assert_eq!(stats.min, 42000);
        assert_eq!(stats.max, 44000);
    }

    #[test]
    fn missing_data_gives_none_not_zero() {
        assert!(rent_stats(&[], "목동", 65.0).is_none());
        let records = vec![trade_record("목동신시가지1", "65.3", "0")];
        assert!(trade_stats(&records, "목동신시가지1", 65.0).is_none());
    }

    #[test]
    fn risk_tier_boundaries() {
        assert_eq!(risk_tier(60.0), RiskTier::Safe);
        assert_eq!(risk_tier(60.1), RiskTier::Moderate);
        assert_eq!(risk_tier(70.0), RiskTier::Moderate);
        assert_eq!(risk_tier(80.0), RiskTier::Caution);
        assert_eq!(risk_tier(80.1), RiskTier::HighRisk);
    }

    #[test]
    fn evaluation_uses_five_percent_band() {
        assert_eq!(evaluate_deposit(40000, 43000), PriceEvaluation::Cheap);
        assert_eq!(evaluate_deposit(43000, 43000), PriceEvaluation::Fair);
        assert_eq!(evaluate_deposit(46000, 43000), PriceEvaluation::Expensive);
    }

    #[test]
    fn absent_trade_data_leaves_ratio_unknown() {
        let rent = Some(PriceStats {
            avg: 42000,
            min: 40000,
            max: 44000,
            count: 3,
        });
        let analysis = assemble_analysis(rent, None, 45000);
        assert!(analysis.jeonse_ratio.is_none());
        assert_eq!(analysis.evaluation, Some(PriceEvaluation::Expensive));
    }

    #[test]
    fn jeonse_ratio_rounds_to_one_decimal() {
        let trade = Some(PriceStats {
            avg: 62000,
            min: 60000,
            max: 65000,
            count: 4,
        });
        let analysis = assemble_analysis(None, trade, 45000);
        let ratio = analysis.jeonse_ratio.unwrap();
        assert_eq!(ratio.ratio, 72.6);
        assert_eq!(ratio.risk, RiskTier::Caution);
        assert_eq!(ratio.rent_count, 0);
    }
}
