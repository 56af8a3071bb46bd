//! Wire payloads for the mobile listing API.
//!
//! The upstream JSON is loosely typed: ids and counts arrive as either
//! strings or numbers depending on the endpoint, so the id-ish fields go
//! through a tolerant deserializer.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

fn string_or_number<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

fn lenient_f64<'de, D>(de: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(de)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

/// Bounding-box article search response (`cluster/ajax/articleList`).
#[derive(Debug, Deserialize)]
pub struct ArticleListResponse {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub body: Vec<Article>,
    #[serde(default)]
    pub more: bool,
}

/// One article row. Shared by the bounding-box search and the per-complex
/// article list; the latter carries price in `prcInfo` instead of `prc`.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    #[serde(deserialize_with = "string_or_number")]
    pub atcl_no: Option<String>,
    pub atcl_nm: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub prc: Option<f64>,
    pub prc_info: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub rent_prc: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub spc1: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub spc2: Option<f64>,
    pub flr_info: Option<String>,
    pub trad_tp_nm: Option<String>,
    pub rlet_tp_nm: Option<String>,
    pub direction: Option<String>,
    pub atcl_fetr_desc: Option<String>,
    pub rltr_nm: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    #[serde(deserialize_with = "string_or_number")]
    pub cortar_no: Option<String>,
    pub tag_list: Vec<String>,
    pub atcl_cfm_ymd: Option<String>,
}

/// Complex directory response (`cluster/ajax/complexList`).
#[derive(Debug, Deserialize)]
pub struct ComplexListResponse {
    #[serde(default)]
    pub result: Vec<ComplexEntry>,
    #[serde(default)]
    pub more: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ComplexEntry {
    #[serde(deserialize_with = "string_or_number")]
    pub hscp_no: Option<String>,
    pub hscp_nm: Option<String>,
    pub tot_hseh_cnt: Option<u32>,
    pub tot_dong_cnt: Option<u32>,
    #[serde(deserialize_with = "string_or_number")]
    pub use_aprv_ymd: Option<String>,
}

/// Per-complex article response (`complex/getComplexArticleList`).
/// `result` is usually `{list, moreDataYn}` but some variants return a bare
/// array.
#[derive(Debug, Deserialize)]
pub struct ComplexArticleResponse {
    pub result: ComplexArticleResult,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ComplexArticleResult {
    Paged {
        #[serde(default)]
        list: Vec<Article>,
        #[serde(default, rename = "moreDataYn")]
        more_data_yn: Option<String>,
    },
    Flat(Vec<Article>),
}

impl ComplexArticleResult {
    pub fn articles(&self) -> &[Article] {
        match self {
            ComplexArticleResult::Paged { list, .. } => list,
            ComplexArticleResult::Flat(list) => list,
        }
    }

    pub fn has_more(&self) -> bool {
        match self {
            ComplexArticleResult::Paged { more_data_yn, .. } => {
                more_data_yn.as_deref() == Some("Y")
            }
            ComplexArticleResult::Flat(_) => false,
        }
    }
}

/// Directory record after parsing, the unit of complex-metadata enrichment.
#[derive(Debug, Clone)]
pub struct RegionComplex {
    pub complex_no: Option<String>,
    pub name: String,
    pub households: Option<u32>,
    pub buildings: Option<u32>,
    pub built_year: Option<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_tolerates_numeric_and_string_ids() {
        let a: Article =
            serde_json::from_str(r#"{"atclNo": 2503001234, "prc": 45000}"#).unwrap();
        assert_eq!(a.atcl_no.as_deref(), Some("2503001234"));
        assert_eq!(a.prc, Some(45000.0));

        let b: Article =
            serde_json::from_str(r#"{"atclNo": "2503001234", "spc2": "59.9"}"#).unwrap();
        assert_eq!(b.atcl_no.as_deref(), Some("2503001234"));
        assert_eq!(b.spc2, Some(59.9));
    }

    #[test]
    fn complex_article_result_handles_both_shapes() {
        let paged: ComplexArticleResponse = serde_json::from_str(
            r#"{"result": {"list": [{"atclNo": "1"}], "moreDataYn": "Y"}}"#,
        )
        .unwrap();
        assert_eq!(paged.result.articles().len(), 1);
        assert!(paged.result.has_more());

        let flat: ComplexArticleResponse =
            serde_json::from_str(r#"{"result": [{"atclNo": "1"}, {"atclNo": "2"}]}"#).unwrap();
        assert_eq!(flat.result.articles().len(), 2);
        assert!(!flat.result.has_more());
    }
}
