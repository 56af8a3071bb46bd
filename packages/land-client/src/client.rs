//! Paced, block-aware client for the mobile listing endpoints.
//!
//! Every remote call goes through [`LandClient::safe_request`], which owns
//! the three safety rules of this crate: fail fast once the session is
//! blocked, sleep a randomized pacing delay behind a shared gate, and treat
//! 403/429/503 or an HTML body as a permanent block. Everything else
//! degrades quietly so one bad page never loses a whole run.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde_json::{json, Value};

use domain::regions;
use domain::{Listing, ListingSource, SearchOutcome, UserCriteria};

use crate::cache::ResponseCache;
use crate::error::{LandError, Result};
use crate::matching;
use crate::parse;
use crate::types::{
    Article, ArticleListResponse, ComplexArticleResponse, ComplexListResponse, RegionComplex,
};

const BLOCK_STATUS: [u16; 3] = [403, 429, 503];

#[derive(Debug, Clone)]
pub struct LandConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Uniform pacing delay bounds, seconds.
    pub delay_min_secs: f64,
    pub delay_max_secs: f64,
    pub max_article_pages: u32,
    pub max_directory_pages: u32,
    pub cache_dir: PathBuf,
    pub cache_ttl_hours: i64,
}

impl Default for LandConfig {
    fn default() -> Self {
        Self {
            base_url: "https://m.land.naver.com".to_string(),
            timeout: Duration::from_secs(30),
            delay_min_secs: 1.5,
            delay_max_secs: 3.0,
            max_article_pages: 5,
            max_directory_pages: 10,
            cache_dir: PathBuf::from(".cache/land"),
            cache_ttl_hours: 24,
        }
    }
}

impl LandConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("LAND_BASE_URL") {
            config.base_url = url;
        }
        if let Some(min) = env_f64("CRAWL_DELAY_MIN") {
            config.delay_min_secs = min;
        }
        if let Some(max) = env_f64("CRAWL_DELAY_MAX") {
            config.delay_max_secs = max;
        }
        if let Ok(dir) = std::env::var("CACHE_DIR") {
            config.cache_dir = PathBuf::from(dir);
        }
        if let Some(ttl) = env_i64("CACHE_TTL_HOURS") {
            config.cache_ttl_hours = ttl;
        }
        config
    }

    pub fn with_delay_range(mut self, min_secs: f64, max_secs: f64) -> Self {
        self.delay_min_secs = min_secs;
        self.delay_max_secs = max_secs;
        self
    }

    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = dir.into();
        self
    }
}

fn env_f64(name: &str) -> Option<f64> {
    std::env::var(name).ok()?.parse().ok()
}

fn env_i64(name: &str) -> Option<i64> {
    std::env::var(name).ok()?.parse().ok()
}

pub struct LandClient {
    http: reqwest::Client,
    config: LandConfig,
    cache: ResponseCache,
    blocked: AtomicBool,
    /// Serializes the pacing delay so concurrent tasks cannot burst.
    pacing: tokio::sync::Mutex<()>,
    /// Session-scoped complex directory, keyed by `cortarNo_tradeType`.
    directory: tokio::sync::Mutex<HashMap<String, Arc<Vec<RegionComplex>>>>,
}

impl LandClient {
    pub fn new(config: LandConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert("Accept", HeaderValue::from_static("*/*"));
        headers.insert(
            "Accept-Language",
            HeaderValue::from_static("ko-KR,ko;q=0.9"),
        );
        headers.insert(
            "Referer",
            HeaderValue::from_static("https://m.land.naver.com/"),
        );
        headers.insert(
            "User-Agent",
            HeaderValue::from_static(
                "Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) \
                 AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.0 \
                 Mobile/15E148 Safari/604.1",
            ),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;
        let cache = ResponseCache::new(
            &config.cache_dir,
            chrono::Duration::hours(config.cache_ttl_hours),
        )?;
        Ok(Self {
            http,
            config,
            cache,
            blocked: AtomicBool::new(false),
            pacing: tokio::sync::Mutex::new(()),
            directory: tokio::sync::Mutex::new(HashMap::new()),
        })
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn is_blocked(&self) -> bool {
        self.blocked.load(Ordering::SeqCst)
    }

    fn mark_blocked(&self) {
        self.blocked.store(true, Ordering::SeqCst);
    }

    /// One guarded GET. `Ok(None)` means "this page failed, move on";
    /// `Err(Blocked)` means "stop everything".
    async fn safe_request(&self, path: &str, params: &[(&str, String)]) -> Result<Option<Value>> {
        if self.is_blocked() {
            return Err(LandError::Blocked);
        }

        {
            let _gate = self.pacing.lock().await;
            let span = (self.config.delay_max_secs - self.config.delay_min_secs).max(0.0);
            let delay = self.config.delay_min_secs + fastrand::f64() * span;
            if delay > 0.0 {
                tracing::debug!(delay_secs = delay, "pacing delay");
                tokio::time::sleep(Duration::from_secs_f64(delay)).await;
            }
        }

        let url = format!("{}{}", self.config.base_url, path);
        let resp = match self.http.get(&url).query(params).send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "request failed");
                return Ok(None);
            }
        };

        let status = resp.status().as_u16();
        if BLOCK_STATUS.contains(&status) {
            self.mark_blocked();
            tracing::error!(status, "block detected, halting session");
            return Err(LandError::Blocked);
        }
        if status != 200 {
            tracing::warn!(status, url = %url, "unexpected status");
            return Ok(None);
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if content_type.contains("text/html") {
            // an HTML page where JSON belongs is a soft block wall
            self.mark_blocked();
            tracing::error!(url = %url, "HTML response where JSON expected, treating as block");
            return Err(LandError::Blocked);
        }

        match resp.json::<Value>().await {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                tracing::warn!(url = %url, error = %err, "response body was not JSON");
                Ok(None)
            }
        }
    }

    /// Region-wide article search. Only a source block is surfaced as its
    /// own variant; everything else collapses into `Empty` or a shorter
    /// listing set.
    pub async fn search_by_region(
        &self,
        region_code: &str,
        criteria: &UserCriteria,
        max_items: usize,
    ) -> SearchOutcome {
        match self.search_region_inner(region_code, criteria, max_items).await {
            Ok(listings) if listings.is_empty() => SearchOutcome::Empty,
            Ok(listings) => SearchOutcome::Listings(listings),
            Err(LandError::Blocked) => SearchOutcome::Blocked,
            Err(err) => {
                tracing::warn!(region = %region_code, error = %err, "search failed");
                SearchOutcome::Empty
            }
        }
    }

    async fn search_region_inner(
        &self,
        region_code: &str,
        criteria: &UserCriteria,
        max_items: usize,
    ) -> Result<Vec<Listing>> {
        let sigungu = sigungu_of(region_code);
        let Some((lat, lng)) = regions::region_center(sigungu) else {
            return Err(LandError::UnknownRegion(sigungu.to_string()));
        };

        let cache_params = search_cache_params(sigungu, criteria);
        if let Some(payload) = self.cache.get(&cache_params) {
            match serde_json::from_value::<Vec<Listing>>(payload) {
                Ok(mut listings) => {
                    tracing::info!(region = %sigungu, count = listings.len(), "using cached listings");
                    listings.truncate(max_items);
                    return Ok(listings);
                }
                Err(err) => {
                    tracing::warn!(region = %sigungu, error = %err, "cached payload unusable");
                }
            }
        }

        tracing::info!(
            region = %sigungu,
            name = regions::gu_name(sigungu).unwrap_or("?"),
            "searching region"
        );

        let trade_code = criteria.transaction_type.trade_code();
        let rlet_codes = property_type_codes(criteria).join(":");
        let delta = 0.02;

        let mut listings: Vec<Listing> = Vec::new();
        let mut sub_regions: HashSet<String> = HashSet::new();
        let mut page = 1;
        while listings.len() < max_items && page <= self.config.max_article_pages {
            let mut params: Vec<(&str, String)> = vec![
                ("rletTpCd", rlet_codes.clone()),
                ("tradTpCd", trade_code.to_string()),
                ("z", "14".to_string()),
                ("lat", lat.to_string()),
                ("lng", lng.to_string()),
                ("btm", (lat - delta).to_string()),
                ("lft", (lng - delta).to_string()),
                ("top", (lat + delta).to_string()),
                ("rgt", (lng + delta).to_string()),
                ("cortarNo", regions::cortar_no(sigungu)),
                ("page", page.to_string()),
                ("totCnt", "0".to_string()),
            ];
            if let Some(max_deposit) = criteria.max_deposit {
                params.push(("dprcMax", max_deposit.to_string()));
            }
            if let Some(min_area) = criteria.min_area_sqm {
                params.push(("spcMin", (min_area as i64).to_string()));
            }
            if let Some(max_area) = criteria.max_area_sqm {
                params.push(("spcMax", (max_area as i64).to_string()));
            }

            let Some(value) = self.safe_request("/cluster/ajax/articleList", &params).await?
            else {
                break;
            };
            let resp: ArticleListResponse = match serde_json::from_value(value) {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::warn!(page, error = %err, "article page parse failed");
                    break;
                }
            };
            if resp.code.as_deref() != Some("success") || resp.body.is_empty() {
                break;
            }

            for article in &resp.body {
                if let Some(listing) = article_to_listing(article) {
                    if let Some(cortar) = &article.cortar_no {
                        sub_regions.insert(cortar.clone());
                    }
                    listings.push(listing);
                }
            }
            tracing::info!(page, count = resp.body.len(), "article page fetched");

            if !resp.more {
                break;
            }
            page += 1;
        }

        self.enrich_with_complexes(&mut listings, &sub_regions, trade_code)
            .await?;

        if !listings.is_empty() {
            if let Ok(payload) = serde_json::to_value(&listings) {
                self.cache.set(&cache_params, payload);
            }
        }

        tracing::info!(region = %sigungu, total = listings.len(), "search complete");
        listings.truncate(max_items);
        Ok(listings)
    }

    /// Backfill complex metadata (households, buildings, built year) from
    /// the directories of every sub-region the search touched.
    async fn enrich_with_complexes(
        &self,
        listings: &mut [Listing],
        sub_regions: &HashSet<String>,
        trade_code: &str,
    ) -> Result<()> {
        if sub_regions.is_empty() || listings.is_empty() {
            return Ok(());
        }
        tracing::info!(count = sub_regions.len(), "enriching from sub-region directories");

        // deterministic fetch order
        let mut codes: Vec<&String> = sub_regions.iter().collect();
        codes.sort();

        let mut complexes: Vec<Arc<Vec<RegionComplex>>> = Vec::new();
        for cortar in codes {
            match self.complex_directory(cortar, trade_code).await {
                Ok(dir) => complexes.push(dir),
                Err(LandError::Blocked) => return Err(LandError::Blocked),
                Err(err) => {
                    tracing::warn!(cortar = %cortar, error = %err, "directory fetch failed");
                }
            }
        }

        let mut matched = 0usize;
        for listing in listings.iter_mut() {
            let name = listing.display_name().to_string();
            let hit = complexes
                .iter()
                .flat_map(|dir| dir.iter())
                .find(|c| c.name == name)
                .or_else(|| {
                    matching::find_match(
                        &name,
                        complexes
                            .iter()
                            .flat_map(|dir| dir.iter())
                            .map(|c| (c.name.as_str(), c)),
                    )
                });
            if let Some(info) = hit {
                matched += 1;
                if listing.households.is_none() {
                    listing.households = info.households;
                }
                if listing.buildings.is_none() {
                    listing.buildings = info.buildings;
                }
                if listing.built_year.is_none() {
                    listing.built_year = info.built_year;
                }
            }
        }
        tracing::info!(matched, total = listings.len(), "complex metadata matched");
        Ok(())
    }

    /// Complex directory for one legal district code, fetched once per
    /// session and cached in memory.
    pub async fn complex_directory(
        &self,
        cortar_no: &str,
        trade_code: &str,
    ) -> Result<Arc<Vec<RegionComplex>>> {
        let key = format!("{cortar_no}_{trade_code}");
        {
            let dir = self.directory.lock().await;
            if let Some(hit) = dir.get(&key) {
                return Ok(Arc::clone(hit));
            }
        }

        tracing::info!(cortar = %cortar_no, "fetching complex directory");
        let mut complexes: Vec<RegionComplex> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut page = 1;
        while page <= self.config.max_directory_pages {
            let params: Vec<(&str, String)> = vec![
                ("cortarNo", cortar_no.to_string()),
                ("rletTpCd", "APT".to_string()),
                ("tradTpCd", trade_code.to_string()),
                ("page", page.to_string()),
            ];
            let Some(value) = self.safe_request("/cluster/ajax/complexList", &params).await?
            else {
                break;
            };
            let resp: ComplexListResponse = match serde_json::from_value(value) {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::warn!(page, error = %err, "directory page parse failed");
                    break;
                }
            };
            if resp.result.is_empty() {
                break;
            }
            for entry in &resp.result {
                let Some(name) = entry.hscp_nm.clone().filter(|n| !n.is_empty()) else {
                    continue;
                };
                if !seen.insert(name.clone()) {
                    continue;
                }
                complexes.push(RegionComplex {
                    complex_no: entry.hscp_no.clone(),
                    name,
                    households: entry.tot_hseh_cnt,
                    buildings: entry.tot_dong_cnt,
                    built_year: entry
                        .use_aprv_ymd
                        .as_deref()
                        .and_then(parse::parse_built_year),
                });
            }
            tracing::info!(page, total = complexes.len(), "directory page fetched");
            if !resp.more {
                break;
            }
            page += 1;
        }

        let complexes = Arc::new(complexes);
        self.directory
            .lock()
            .await
            .insert(key, Arc::clone(&complexes));
        Ok(complexes)
    }

    /// Directory listing for a region, largest complexes first.
    pub async fn region_complexes(
        &self,
        sigungu: &str,
        trade_code: &str,
    ) -> Result<Vec<RegionComplex>> {
        let directory = self
            .complex_directory(&regions::cortar_no(sigungu_of(sigungu)), trade_code)
            .await?;
        let mut result: Vec<RegionComplex> = directory.as_ref().clone();
        result.sort_by(|a, b| b.households.unwrap_or(0).cmp(&a.households.unwrap_or(0)));
        Ok(result)
    }

    /// Articles for one named complex: directory match first, coordinate
    /// bounding-box fallback when the directory does not know the name.
    pub async fn complex_articles(
        &self,
        sigungu: &str,
        complex_name: &str,
        trade_code: &str,
    ) -> Result<Vec<Listing>> {
        let sigungu = sigungu_of(sigungu);
        let directory = self
            .complex_directory(&regions::cortar_no(sigungu), trade_code)
            .await?;

        let matched = matching::find_match(
            complex_name,
            directory.iter().map(|c| (c.name.as_str(), c)),
        );
        let Some(info) = matched else {
            tracing::warn!(complex = %complex_name, "not in directory, falling back to coordinates");
            return self
                .articles_by_coords(sigungu, complex_name, trade_code)
                .await;
        };
        let Some(complex_no) = info.complex_no.clone() else {
            return Ok(Vec::new());
        };
        tracing::info!(complex = %info.name, complex_no = %complex_no, "directory match");

        let info = info.clone();
        let mut listings = Vec::new();
        let mut page = 1;
        while page <= self.config.max_article_pages {
            let params: Vec<(&str, String)> = vec![
                ("hscpNo", complex_no.clone()),
                ("tradTpCd", trade_code.to_string()),
                ("page", page.to_string()),
            ];
            let Some(value) = self
                .safe_request("/complex/getComplexArticleList", &params)
                .await?
            else {
                break;
            };
            let resp: ComplexArticleResponse = match serde_json::from_value(value) {
                Ok(resp) => resp,
                Err(err) => {
                    tracing::warn!(page, error = %err, "complex article parse failed");
                    break;
                }
            };
            if resp.result.articles().is_empty() {
                break;
            }
            for article in resp.result.articles() {
                if let Some(listing) = complex_article_to_listing(article, &info) {
                    listings.push(listing);
                }
            }
            if !resp.result.has_more() {
                break;
            }
            page += 1;
        }
        Ok(listings)
    }

    async fn articles_by_coords(
        &self,
        sigungu: &str,
        complex_name: &str,
        trade_code: &str,
    ) -> Result<Vec<Listing>> {
        let Some((lat, lng)) = regions::region_center(sigungu) else {
            return Err(LandError::UnknownRegion(sigungu.to_string()));
        };
        let target = matching::normalize_name(complex_name);
        let delta = 0.05;

        let mut listings = Vec::new();
        for page in 1..=self.config.max_article_pages {
            let params: Vec<(&str, String)> = vec![
                ("rletTpCd", "APT".to_string()),
                ("tradTpCd", trade_code.to_string()),
                ("z", "14".to_string()),
                ("lat", lat.to_string()),
                ("lng", lng.to_string()),
                ("btm", (lat - delta).to_string()),
                ("lft", (lng - delta).to_string()),
                ("top", (lat + delta).to_string()),
                ("rgt", (lng + delta).to_string()),
                ("cortarNo", regions::cortar_no(sigungu)),
                ("page", page.to_string()),
                ("totCnt", "0".to_string()),
            ];
            let Some(value) = self.safe_request("/cluster/ajax/articleList", &params).await?
            else {
                break;
            };
            let resp: ArticleListResponse = match serde_json::from_value(value) {
                Ok(resp) => resp,
                Err(_) => break,
            };
            if resp.code.as_deref() != Some("success") || resp.body.is_empty() {
                break;
            }
            for article in &resp.body {
                let name = matching::normalize_name(article.atcl_nm.as_deref().unwrap_or(""));
                if matching::names_match(&target, &name) {
                    if let Some(listing) = article_to_listing(article) {
                        listings.push(listing);
                    }
                }
            }
            if !listings.is_empty() || !resp.more {
                break;
            }
        }
        Ok(listings)
    }
}

fn sigungu_of(region_code: &str) -> &str {
    if region_code.len() > 5 {
        &region_code[..5]
    } else {
        region_code
    }
}

fn property_type_codes(criteria: &UserCriteria) -> Vec<String> {
    if criteria.property_types.is_empty() {
        return vec!["APT".to_string()];
    }
    criteria
        .property_types
        .iter()
        .map(|pt| pt.type_code().to_string())
        .collect()
}

fn search_cache_params(sigungu: &str, criteria: &UserCriteria) -> Value {
    let mut type_codes = property_type_codes(criteria);
    type_codes.sort();
    json!({
        "region": sigungu,
        "type": criteria.transaction_type.label(),
        "property_types": type_codes.join(","),
        "max_deposit": criteria.max_deposit,
        "min_area": criteria.min_area_sqm,
    })
}

fn article_to_listing(article: &Article) -> Option<Listing> {
    let id = article.atcl_no.as_deref()?;
    let mut listing = Listing::new(format!("naver_{id}"), ListingSource::Naver);
    listing.url = Some(format!("https://m.land.naver.com/article/info/{id}"));
    listing.title = article.atcl_nm.clone();
    listing.complex_name = article.atcl_nm.clone();
    listing.region_gu = article
        .cortar_no
        .as_deref()
        .and_then(regions::gu_name)
        .map(str::to_string);
    listing.transaction_type = article.trad_tp_nm.clone();
    listing.deposit = article.prc.map(|p| p as i64).filter(|p| *p > 0);
    listing.monthly_rent = Some(article.rent_prc.map(|r| r as i64).unwrap_or(0));
    listing.area_sqm = article.spc2.filter(|v| *v > 0.0);
    listing.supply_area_sqm = article.spc1.filter(|v| *v > 0.0);
    listing.area_pyeong = listing.area_sqm.map(parse::to_pyeong);
    listing.property_type = article.rlet_tp_nm.clone();
    let (floor, total_floors) = parse::parse_floor(article.flr_info.as_deref().unwrap_or(""));
    listing.floor = floor;
    listing.total_floors = total_floors;
    listing.direction = article.direction.clone();
    listing.description = article.atcl_fetr_desc.clone();
    listing.agent_name = article.rltr_nm.clone();
    listing.latitude = article.lat;
    listing.longitude = article.lng;
    listing.listed_date = article
        .atcl_cfm_ymd
        .as_deref()
        .and_then(parse::parse_confirm_date);
    listing.options = article.tag_list.clone();
    Some(listing)
}

fn complex_article_to_listing(article: &Article, info: &RegionComplex) -> Option<Listing> {
    let id = article.atcl_no.as_deref()?;
    let mut listing = Listing::new(format!("naver_{id}"), ListingSource::Naver);
    listing.url = Some(format!("https://m.land.naver.com/article/info/{id}"));
    listing.title = Some(info.name.clone());
    listing.complex_name = Some(info.name.clone());
    listing.transaction_type = article.trad_tp_nm.clone();
    // per-complex rows carry the price as display text, not a number
    listing.deposit = article
        .prc_info
        .as_deref()
        .map(parse::parse_price)
        .filter(|p| *p > 0);
    listing.monthly_rent = Some(article.rent_prc.map(|r| r as i64).unwrap_or(0));
    listing.area_sqm = article.spc2.filter(|v| *v > 0.0);
    listing.supply_area_sqm = article.spc1.filter(|v| *v > 0.0);
    listing.area_pyeong = listing.area_sqm.map(parse::to_pyeong);
    listing.property_type = article
        .rlet_tp_nm
        .clone()
        .or_else(|| Some("아파트".to_string()));
    let (floor, total_floors) = parse::parse_floor(article.flr_info.as_deref().unwrap_or(""));
    listing.floor = floor;
    listing.total_floors = total_floors;
    listing.direction = article.direction.clone();
    listing.description = article.atcl_fetr_desc.clone();
    listing.agent_name = article.rltr_nm.clone();
    listing.households = info.households;
    listing.buildings = info.buildings;
    listing.built_year = info.built_year;
    Some(listing)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(dir: &tempfile::TempDir) -> LandClient {
        let config = LandConfig::default()
            .with_delay_range(0.0, 0.0)
            .with_cache_dir(dir.path());
        LandClient::new(config).unwrap()
    }

    #[tokio::test]
    async fn blocked_client_fails_before_io() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&dir);
        client.mark_blocked();
        let outcome = client
            .search_by_region("11470", &UserCriteria::default(), 50)
            .await;
        assert!(matches!(outcome, SearchOutcome::Blocked));
    }

    #[tokio::test]
    async fn unknown_region_is_empty_without_io() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&dir);
        let outcome = client
            .search_by_region("99999", &UserCriteria::default(), 50)
            .await;
        assert!(matches!(outcome, SearchOutcome::Empty));
        assert!(!client.is_blocked());
    }

    #[tokio::test]
    async fn unknown_region_surfaces_a_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&dir);
        let err = client
            .search_region_inner("99999", &UserCriteria::default(), 50)
            .await
            .unwrap_err();
        assert!(matches!(err, LandError::UnknownRegion(code) if code == "99999"));
    }

    #[tokio::test]
    async fn cached_search_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&dir);
        let criteria = UserCriteria::default();

        let cached = vec![Listing::new("naver_1", ListingSource::Naver)];
        let params = search_cache_params("11470", &criteria);
        client
            .cache()
            .set(&params, serde_json::to_value(&cached).unwrap());

        match client.search_by_region("1147010100", &criteria, 50).await {
            SearchOutcome::Listings(listings) => {
                assert_eq!(listings.len(), 1);
                assert_eq!(listings[0].id, "naver_1");
            }
            other => panic!("expected cached listings, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cached_search_respects_max_items() {
        let dir = tempfile::tempdir().unwrap();
        let client = test_client(&dir);
        let criteria = UserCriteria::default();
        let cached: Vec<Listing> = (0..10)
            .map(|i| Listing::new(format!("naver_{i}"), ListingSource::Naver))
            .collect();
        let params = search_cache_params("11470", &criteria);
        client
            .cache()
            .set(&params, serde_json::to_value(&cached).unwrap());

        match client.search_by_region("11470", &criteria, 3).await {
            SearchOutcome::Listings(listings) => assert_eq!(listings.len(), 3),
            other => panic!("expected listings, got {other:?}"),
        }
    }

    #[test]
    fn cache_params_are_order_insensitive_over_property_types() {
        let mut a = UserCriteria::default();
        a.property_types = vec![
            domain::PropertyType::Officetel,
            domain::PropertyType::Apartment,
        ];
        let mut b = UserCriteria::default();
        b.property_types = vec![
            domain::PropertyType::Apartment,
            domain::PropertyType::Officetel,
        ];
        assert_eq!(
            search_cache_params("11470", &a),
            search_cache_params("11470", &b)
        );
    }
}
