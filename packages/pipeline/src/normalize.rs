//! Listing normalization: unit backfill and field cleanup before filtering.

use std::sync::OnceLock;

use regex::Regex;

use domain::Listing;

const SQM_PER_PYEONG: f64 = 3.305785;
const PYEONG_PER_SQM: f64 = 0.3025;

fn gu_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([가-힣]+구)").expect("valid regex"))
}

fn dong_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([가-힣]+동)").expect("valid regex"))
}

/// Normalize one listing in place.
///
/// Fills whichever of area_sqm/area_pyeong is missing from the other,
/// extracts 구/동 from the address when absent, and standardizes the
/// property type to its Korean display form. Present values are never
/// overwritten.
pub fn normalize(listing: &mut Listing) {
    match (listing.area_sqm, listing.area_pyeong) {
        (Some(sqm), None) => listing.area_pyeong = Some(round1(sqm * PYEONG_PER_SQM)),
        (None, Some(pyeong)) => listing.area_sqm = Some(round1(pyeong * SQM_PER_PYEONG)),
        _ => {}
    }

    if let Some(address) = listing.address.as_deref() {
        if listing.region_gu.is_none() {
            if let Some(m) = gu_pattern().find(address) {
                listing.region_gu = Some(m.as_str().to_string());
            }
        }
        if listing.region_dong.is_none() {
            if let Some(m) = dong_pattern().find(address) {
                listing.region_dong = Some(m.as_str().to_string());
            }
        }
    }

    if let Some(raw) = listing.property_type.as_deref() {
        if let Some(standard) = standard_property_type(raw) {
            if standard != raw {
                listing.property_type = Some(standard.to_string());
            }
        }
    }
}

fn standard_property_type(raw: &str) -> Option<&'static str> {
    let key = raw.trim().to_lowercase();
    let standard = match key.as_str() {
        "apt" | "아파트" => "아파트",
        "opst" | "오피스텔" => "오피스텔",
        "vl" | "빌라" | "다세대" | "빌라/다세대" | "연립" => "빌라",
        "단독" | "단독주택" | "다가구" => "단독/다가구",
        _ => return None,
    };
    Some(standard)
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::ListingSource;

    #[test]
    fn backfills_pyeong_from_sqm() {
        let mut l = Listing::new("naver_1", ListingSource::Naver);
        l.area_sqm = Some(84.9);
        normalize(&mut l);
        assert_eq!(l.area_pyeong, Some(25.7));
    }

    #[test]
    fn backfills_sqm_from_pyeong() {
        let mut l = Listing::new("naver_2", ListingSource::Naver);
        l.area_pyeong = Some(25.0);
        normalize(&mut l);
        assert_eq!(l.area_sqm, Some(82.6));
    }

    #[test]
    fn leaves_both_areas_alone_when_present() {
        let mut l = Listing::new("naver_3", ListingSource::Naver);
        l.area_sqm = Some(59.0);
        l.area_pyeong = Some(18.0);
        normalize(&mut l);
        assert_eq!(l.area_sqm, Some(59.0));
        assert_eq!(l.area_pyeong, Some(18.0));
    }

    #[test]
    fn extracts_gu_and_dong_from_address() {
        let mut l = Listing::new("naver_4", ListingSource::Naver);
        l.address = Some("서울특별시 양천구 목동 917-9".to_string());
        normalize(&mut l);
        assert_eq!(l.region_gu.as_deref(), Some("양천구"));
        assert_eq!(l.region_dong.as_deref(), Some("목동"));
    }

    #[test]
    fn keeps_existing_region_over_address() {
        let mut l = Listing::new("naver_5", ListingSource::Naver);
        l.region_gu = Some("강서구".to_string());
        l.address = Some("서울 양천구 신정동".to_string());
        normalize(&mut l);
        assert_eq!(l.region_gu.as_deref(), Some("강서구"));
        assert_eq!(l.region_dong.as_deref(), Some("신정동"));
    }

    #[test]
    fn standardizes_property_type_codes() {
        for (raw, standard) in [("APT", "아파트"), ("OPST", "오피스텔"), ("다세대", "빌라")] {
            let mut l = Listing::new("naver_6", ListingSource::Naver);
            l.property_type = Some(raw.to_string());
            normalize(&mut l);
            assert_eq!(l.property_type.as_deref(), Some(standard));
        }
    }

    #[test]
    fn unknown_property_type_is_kept_verbatim() {
        let mut l = Listing::new("naver_7", ListingSource::Naver);
        l.property_type = Some("상가주택".to_string());
        normalize(&mut l);
        assert_eq!(l.property_type.as_deref(), Some("상가주택"));
    }
}
