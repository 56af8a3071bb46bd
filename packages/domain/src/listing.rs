use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a listing record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingSource {
    Naver,
    Csv,
    Manual,
}

/// One rental/sale unit record.
///
/// Created during acquisition, backfilled during enrichment and
/// normalization, immutable once scoring starts. `id` is the sole join key
/// across all per-stage result maps and never changes after construction.
///
/// Monetary fields are in 만원 (10,000 KRW) units. Fields the source did not
/// provide stay `None`; later stages must handle absence explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    // Identity
    pub id: String,
    pub source: ListingSource,
    #[serde(default)]
    pub url: Option<String>,

    // Basic info
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub region_gu: Option<String>,
    #[serde(default)]
    pub region_dong: Option<String>,

    // Transaction economics
    #[serde(default)]
    pub transaction_type: Option<String>,
    #[serde(default)]
    pub deposit: Option<i64>,
    #[serde(default)]
    pub monthly_rent: Option<i64>,
    #[serde(default)]
    pub maintenance_fee: Option<i64>,

    // Area, in both customary units
    #[serde(default)]
    pub area_sqm: Option<f64>,
    #[serde(default)]
    pub area_pyeong: Option<f64>,
    #[serde(default)]
    pub supply_area_sqm: Option<f64>,

    // Building
    #[serde(default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub floor: Option<i32>,
    #[serde(default)]
    pub total_floors: Option<i32>,
    #[serde(default)]
    pub direction: Option<String>,

    // Complex metadata, possibly backfilled after acquisition
    #[serde(default)]
    pub complex_name: Option<String>,
    #[serde(default)]
    pub households: Option<u32>,
    #[serde(default)]
    pub buildings: Option<u32>,
    #[serde(default)]
    pub built_year: Option<i32>,
    #[serde(default)]
    pub parking_per_household: Option<f64>,

    // Options
    #[serde(default)]
    pub has_elevator: Option<bool>,
    #[serde(default)]
    pub has_parking: Option<bool>,
    #[serde(default)]
    pub options: Vec<String>,

    // Location
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,

    // Meta
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub agent_name: Option<String>,
    #[serde(default)]
    pub listed_date: Option<NaiveDate>,

    /// Append-only analysis annotations added by pipeline stages.
    /// Rendered to a single string only at the presentation boundary.
    #[serde(default)]
    pub notes: Vec<String>,
}

impl Listing {
    /// Minimal listing with just an id; everything else absent.
    pub fn new(id: impl Into<String>, source: ListingSource) -> Self {
        Self {
            id: id.into(),
            source,
            url: None,
            title: None,
            address: None,
            region_gu: None,
            region_dong: None,
            transaction_type: None,
            deposit: None,
            monthly_rent: None,
            maintenance_fee: None,
            area_sqm: None,
            area_pyeong: None,
            supply_area_sqm: None,
            property_type: None,
            floor: None,
            total_floors: None,
            direction: None,
            complex_name: None,
            households: None,
            buildings: None,
            built_year: None,
            parking_per_household: None,
            has_elevator: None,
            has_parking: None,
            options: Vec::new(),
            latitude: None,
            longitude: None,
            description: None,
            agent_name: None,
            listed_date: None,
            notes: Vec::new(),
        }
    }

    /// Append an analysis note. Notes are never overwritten or reordered.
    pub fn push_note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    /// Join description and notes for display.
    pub fn rendered_notes(&self) -> String {
        self.notes.join("\n")
    }

    /// Name used for complex matching and report display.
    pub fn display_name(&self) -> &str {
        self.complex_name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(&self.id)
    }

    /// One-line summary for logs and CLI output.
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(title) = &self.title {
            parts.push(title.clone());
        }
        if let (Some(tx), Some(deposit)) = (&self.transaction_type, self.deposit) {
            match self.monthly_rent {
                Some(rent) if rent > 0 => parts.push(format!("{tx} {deposit}/{rent}만")),
                _ => parts.push(format!("{tx} {deposit}만")),
            }
        }
        if let Some(pyeong) = self.area_pyeong {
            parts.push(format!("{pyeong}평"));
        }
        if let Some(floor) = self.floor {
            parts.push(format!("{floor}층"));
        }
        if parts.is_empty() {
            self.id.clone()
        } else {
            parts.join(" | ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notes_are_append_only() {
        let mut listing = Listing::new("naver_1", ListingSource::Naver);
        listing.push_note("[전세 시세] 평균 42,000만원");
        listing.push_note("[전세가율] 72.1% 주의");
        assert_eq!(listing.notes.len(), 2);
        assert!(listing.rendered_notes().starts_with("[전세 시세]"));
    }

    #[test]
    fn summary_includes_price_and_area() {
        let mut listing = Listing::new("naver_2", ListingSource::Naver);
        listing.title = Some("래미안목동".to_string());
        listing.transaction_type = Some("전세".to_string());
        listing.deposit = Some(45000);
        listing.monthly_rent = Some(0);
        listing.area_pyeong = Some(25.7);
        let summary = listing.summary();
        assert!(summary.contains("래미안목동"));
        assert!(summary.contains("45000만"));
        assert!(summary.contains("25.7평"));
    }
}
