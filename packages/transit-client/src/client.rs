use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct TransitConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.odsay.com/v1/api".to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl TransitConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("ODSAY_API_KEY")
            .ok()
            .filter(|k| !k.is_empty());
        if let Ok(url) = std::env::var("ODSAY_BASE_URL") {
            config.base_url = url;
        }
        config
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Best recommended route between two coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitRoute {
    pub total_minutes: u32,
    pub walk_minutes: u32,
    pub transfers: u32,
    /// 지하철 / 버스 / 지하철+버스 / 기타
    pub path_kind: String,
}

#[derive(Debug, Deserialize)]
struct RouteResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    result: Option<RouteResult>,
}

#[derive(Debug, Deserialize)]
struct RouteResult {
    #[serde(default)]
    path: Vec<RoutePath>,
}

#[derive(Debug, Deserialize)]
struct RoutePath {
    #[serde(default, rename = "pathType")]
    path_type: Option<i32>,
    #[serde(default)]
    info: RouteInfo,
}

#[derive(Debug, Default, Deserialize)]
struct RouteInfo {
    #[serde(default, rename = "totalTime")]
    total_time: u32,
    /// Seconds, unlike every other duration in this payload.
    #[serde(default, rename = "totalWalk")]
    total_walk: u32,
    #[serde(default, rename = "busTransitCount")]
    bus_transit_count: u32,
    #[serde(default, rename = "subwayTransitCount")]
    subway_transit_count: u32,
}

fn path_kind(path_type: Option<i32>) -> String {
    match path_type {
        Some(1) => "지하철",
        Some(2) => "버스",
        Some(3) => "지하철+버스",
        _ => "기타",
    }
    .to_string()
}

/// Transit-route lookup. Without an API key every query answers `None`,
/// which the commute stage reads as "duration unknown".
pub struct TransitClient {
    http: reqwest::Client,
    config: TransitConfig,
}

impl TransitClient {
    pub fn new(config: TransitConfig) -> Result<Self, reqwest::Error> {
        if config.api_key.is_none() {
            tracing::warn!("no transit API key configured; commute times will be unknown");
        }
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    pub async fn transit_route(
        &self,
        start: (f64, f64),
        end: (f64, f64),
    ) -> Option<TransitRoute> {
        let api_key = self.config.api_key.as_deref()?;
        let url = format!("{}/searchPubTransPathT", self.config.base_url);
        let (start_lat, start_lng) = start;
        let (end_lat, end_lng) = end;
        let params = [
            ("apiKey", api_key.to_string()),
            ("SX", start_lng.to_string()),
            ("SY", start_lat.to_string()),
            ("EX", end_lng.to_string()),
            ("EY", end_lat.to_string()),
            // recommended-route ordering
            ("SearchType", "0".to_string()),
        ];

        let resp = match self.http.get(&url).query(&params).send().await {
            Ok(resp) => resp,
            Err(err) => {
                tracing::error!(error = %err, "transit API call failed");
                return None;
            }
        };
        if resp.status().as_u16() != 200 {
            tracing::error!(status = resp.status().as_u16(), "transit API error status");
            return None;
        }
        let payload: RouteResponse = match resp.json().await {
            Ok(payload) => payload,
            Err(err) => {
                tracing::error!(error = %err, "transit API response parse failed");
                return None;
            }
        };

        if let Some(error) = payload.error {
            tracing::error!(error = %error, "transit API returned an error");
            return None;
        }
        let best = payload.result?.path.into_iter().next()?;
        Some(TransitRoute {
            total_minutes: best.info.total_time,
            walk_minutes: best.info.total_walk / 60,
            transfers: best.info.bus_transit_count + best.info.subway_transit_count,
            path_kind: path_kind(best.path_type),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_answers_none_without_io() {
        let client = TransitClient::new(TransitConfig::default()).unwrap();
        let route = client
            .transit_route((37.5270, 126.8561), (37.5216, 126.9243))
            .await;
        assert!(route.is_none());
    }

    #[test]
    fn route_payload_parses() {
        let json = r#"{
            "result": {
                "path": [{
                    "pathType": 3,
                    "info": {
                        "totalTime": 42,
                        "totalWalk": 540,
                        "busTransitCount": 1,
                        "subwayTransitCount": 1
                    }
                }]
            }
        }"#;
        let payload: RouteResponse = serde_json::from_str(json).unwrap();
        let best = payload.result.unwrap().path.into_iter().next().unwrap();
        assert_eq!(best.info.total_time, 42);
        assert_eq!(best.info.total_walk / 60, 9);
        assert_eq!(path_kind(best.path_type), "지하철+버스");
    }

    #[test]
    fn error_key_payload_parses() {
        let json = r#"{"error": {"code": "500", "message": "ApiKeyAuthFailed"}}"#;
        let payload: RouteResponse = serde_json::from_str(json).unwrap();
        assert!(payload.error.is_some());
    }
}
