use serde::{Deserialize, Serialize};

use crate::results::FilterField;

/// Must-condition name for the commute bound. Not a [`FilterField`]: the
/// commute stage owns it, the filter engine never sees it.
///
/// [`FilterField`]: crate::results::FilterField
pub const MUST_COMMUTE: &str = "max_commute_minutes";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "전세")]
    Jeonse,
    #[serde(rename = "월세")]
    Monthly,
    #[serde(rename = "매매")]
    Sale,
}

impl TransactionType {
    /// Trade type code used by the listing API.
    pub fn trade_code(self) -> &'static str {
        match self {
            TransactionType::Sale => "A1",
            TransactionType::Jeonse => "B1",
            TransactionType::Monthly => "B2",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TransactionType::Jeonse => "전세",
            TransactionType::Monthly => "월세",
            TransactionType::Sale => "매매",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyType {
    #[serde(rename = "아파트")]
    Apartment,
    #[serde(rename = "오피스텔")]
    Officetel,
    #[serde(rename = "빌라")]
    Villa,
}

impl PropertyType {
    /// Property type code used by the listing API.
    pub fn type_code(self) -> &'static str {
        match self {
            PropertyType::Apartment => "APT",
            PropertyType::Officetel => "OPST",
            PropertyType::Villa => "VL",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PropertyType::Apartment => "아파트",
            PropertyType::Officetel => "오피스텔",
            PropertyType::Villa => "빌라",
        }
    }
}

/// Immutable snapshot of the user's search preferences.
///
/// Every bound is optional; only set bounds participate in filtering.
/// `must_conditions` names the bounds whose failure hard-rejects a listing;
/// everything else only affects the score. Unrecognized names in
/// `must_conditions` are silently ignored by the filter stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCriteria {
    #[serde(default = "default_transaction_type")]
    pub transaction_type: TransactionType,

    // Budget
    #[serde(default)]
    pub max_deposit: Option<i64>,
    #[serde(default)]
    pub max_monthly_rent: Option<i64>,
    #[serde(default)]
    pub max_maintenance_fee: Option<i64>,

    // Location
    #[serde(default)]
    pub regions: Vec<String>,
    #[serde(default)]
    pub commute_destination: Option<String>,
    #[serde(default)]
    pub max_commute_minutes: Option<u32>,

    // Property
    #[serde(default = "default_property_types")]
    pub property_types: Vec<PropertyType>,
    #[serde(default)]
    pub min_area_sqm: Option<f64>,
    #[serde(default)]
    pub max_area_sqm: Option<f64>,
    #[serde(default)]
    pub min_households: Option<u32>,
    #[serde(default)]
    pub min_built_year: Option<i32>,
    #[serde(default)]
    pub max_built_year: Option<i32>,

    // Options
    #[serde(default)]
    pub require_parking: bool,
    #[serde(default)]
    pub require_elevator: bool,
    #[serde(default)]
    pub min_floor: Option<i32>,
    #[serde(default)]
    pub max_floor: Option<i32>,

    /// Field names whose failure hard-rejects a listing.
    #[serde(default)]
    pub must_conditions: Vec<String>,
}

impl Default for UserCriteria {
    fn default() -> Self {
        Self {
            transaction_type: TransactionType::Jeonse,
            max_deposit: None,
            max_monthly_rent: None,
            max_maintenance_fee: None,
            regions: Vec::new(),
            commute_destination: None,
            max_commute_minutes: None,
            property_types: vec![PropertyType::Apartment],
            min_area_sqm: None,
            max_area_sqm: None,
            min_households: None,
            min_built_year: None,
            max_built_year: None,
            require_parking: false,
            require_elevator: false,
            min_floor: None,
            max_floor: None,
            must_conditions: Vec::new(),
        }
    }
}

impl UserCriteria {
    pub fn is_must(&self, name: &str) -> bool {
        self.must_conditions.iter().any(|c| c == name)
    }

    /// Copy with the commute must-condition removed, for filter pass 1
    /// (commute durations do not exist yet at that point).
    pub fn without_commute_must(&self) -> Self {
        let mut copy = self.clone();
        copy.must_conditions.retain(|c| c != MUST_COMMUTE);
        copy
    }

    /// `must_conditions` entries that name neither a filter field nor the
    /// commute bound. The engines ignore them, so a typo like
    /// `"max_deopsit"` silently weakens the search; callers should warn.
    pub fn unknown_must_conditions(&self) -> Vec<&str> {
        self.must_conditions
            .iter()
            .map(String::as_str)
            .filter(|name| *name != MUST_COMMUTE && FilterField::from_name(name).is_none())
            .collect()
    }
}

fn default_transaction_type() -> TransactionType {
    TransactionType::Jeonse
}

fn default_property_types() -> Vec<PropertyType> {
    vec![PropertyType::Apartment]
}
