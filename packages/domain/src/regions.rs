//! Sigungu code tables for Seoul and the Gyeonggi commuter belt.
//!
//! A sigungu code is the first five digits of the ten-digit legal district
//! (법정동) code. The listing API takes the full ten-digit form with a
//! `00000` suffix; the price-history API takes the five-digit form.

/// Seoul district name to sigungu code.
const SEOUL_GU: [(&str, &str); 25] = [
    ("종로구", "11110"),
    ("중구", "11140"),
    ("용산구", "11170"),
    ("성동구", "11200"),
    ("광진구", "11215"),
    ("동대문구", "11230"),
    ("중랑구", "11260"),
    ("성북구", "11290"),
    ("강북구", "11305"),
    ("도봉구", "11320"),
    ("노원구", "11350"),
    ("은평구", "11380"),
    ("서대문구", "11410"),
    ("마포구", "11440"),
    ("양천구", "11470"),
    ("강서구", "11500"),
    ("구로구", "11530"),
    ("금천구", "11545"),
    ("영등포구", "11560"),
    ("동작구", "11590"),
    ("관악구", "11620"),
    ("서초구", "11650"),
    ("강남구", "11680"),
    ("송파구", "11710"),
    ("강동구", "11740"),
];

/// Gyeonggi names and common aliases to sigungu code. Checked before the
/// Seoul table so that names like "광주시" resolve to Gyeonggi.
const GYEONGGI: [(&str, &str); 44] = [
    ("성남시 수정구", "41131"),
    ("성남시 중원구", "41133"),
    ("성남시 분당구", "41135"),
    ("분당구", "41135"),
    ("분당", "41135"),
    ("수원시 장안구", "41111"),
    ("수원시 권선구", "41113"),
    ("수원시 팔달구", "41115"),
    ("수원시 영통구", "41117"),
    ("영통구", "41117"),
    ("용인시 처인구", "41461"),
    ("용인시 기흥구", "41463"),
    ("용인시 수지구", "41465"),
    ("수지구", "41465"),
    ("기흥구", "41463"),
    ("고양시 덕양구", "41281"),
    ("고양시 일산동구", "41285"),
    ("고양시 일산서구", "41287"),
    ("일산동구", "41285"),
    ("일산서구", "41287"),
    ("일산", "41285"),
    ("안양시 만안구", "41171"),
    ("안양시 동안구", "41173"),
    ("동안구", "41173"),
    ("만안구", "41171"),
    ("평촌", "41173"),
    ("부천시", "41190"),
    ("광명시", "41210"),
    ("안산시 상록구", "41271"),
    ("안산시 단원구", "41273"),
    ("화성시", "41590"),
    ("동탄", "41590"),
    ("평택시", "41220"),
    ("시흥시", "41390"),
    ("김포시", "41570"),
    ("광주시", "41610"),
    ("하남시", "41450"),
    ("구리시", "41310"),
    ("남양주시", "41360"),
    ("의정부시", "41150"),
    ("파주시", "41480"),
    ("과천시", "41290"),
    ("의왕시", "41430"),
    ("군포시", "41410"),
];

/// Approximate district centers, used as map query anchors when a listing
/// search needs a coordinate window.
const REGION_CENTERS: [(&str, f64, f64); 57] = [
    ("11110", 37.5735, 126.9788),
    ("11140", 37.5641, 126.9979),
    ("11170", 37.5384, 126.9654),
    ("11200", 37.5634, 127.0369),
    ("11215", 37.5385, 127.0823),
    ("11230", 37.5744, 127.0396),
    ("11260", 37.6063, 127.0926),
    ("11290", 37.5894, 127.0167),
    ("11305", 37.6396, 127.0257),
    ("11320", 37.6688, 127.0472),
    ("11350", 37.6542, 127.0568),
    ("11380", 37.6027, 126.9291),
    ("11410", 37.5791, 126.9368),
    ("11440", 37.5538, 126.9084),
    ("11470", 37.5270, 126.8561),
    ("11500", 37.5509, 126.8495),
    ("11530", 37.4954, 126.8581),
    ("11545", 37.4569, 126.8958),
    ("11560", 37.5263, 126.8963),
    ("11590", 37.5124, 126.9393),
    ("11620", 37.4784, 126.9516),
    ("11650", 37.4837, 127.0324),
    ("11680", 37.5172, 127.0473),
    ("11710", 37.5145, 127.1059),
    ("11740", 37.5301, 127.1238),
    ("41111", 37.3030, 127.0100),
    ("41113", 37.2574, 126.9716),
    ("41115", 37.2850, 127.0200),
    ("41117", 37.2596, 127.0465),
    ("41131", 37.4380, 127.1378),
    ("41133", 37.4321, 127.1193),
    ("41135", 37.3825, 127.1152),
    ("41150", 37.7381, 127.0337),
    ("41171", 37.3943, 126.9320),
    ("41173", 37.3897, 126.9533),
    ("41190", 37.5034, 126.7660),
    ("41210", 37.4786, 126.8644),
    ("41220", 36.9908, 127.0858),
    ("41271", 37.3180, 126.8468),
    ("41273", 37.3188, 126.8105),
    ("41281", 37.6376, 126.8320),
    ("41285", 37.6586, 126.7742),
    ("41287", 37.6759, 126.7511),
    ("41290", 37.4292, 126.9876),
    ("41310", 37.5943, 127.1295),
    ("41360", 37.6360, 127.2165),
    ("41390", 37.3800, 126.8028),
    ("41410", 37.3617, 126.9352),
    ("41430", 37.3449, 126.9685),
    ("41450", 37.5393, 127.2148),
    ("41461", 37.2342, 127.2016),
    ("41463", 37.2803, 127.1148),
    ("41465", 37.3221, 127.0979),
    ("41480", 37.7600, 126.7800),
    ("41570", 37.6152, 126.7156),
    ("41590", 37.1995, 127.0985),
    ("41610", 37.4095, 127.2550),
];

/// Resolve a user-facing region name to its five-digit sigungu code.
///
/// Gyeonggi aliases win over Seoul; a bare name without the `구` suffix is
/// retried with the suffix appended. Unknown names yield `None`.
pub fn sigungu_code(region_name: &str) -> Option<&'static str> {
    let name = region_name.trim();
    if let Some(&(_, code)) = GYEONGGI.iter().find(|(n, _)| *n == name) {
        return Some(code);
    }
    if let Some(&(_, code)) = SEOUL_GU.iter().find(|(n, _)| *n == name) {
        return Some(code);
    }
    if !name.ends_with('구') && !name.ends_with('시') {
        let suffixed = format!("{name}구");
        if let Some(&(_, code)) = SEOUL_GU.iter().find(|(n, _)| *n == suffixed) {
            return Some(code);
        }
    }
    None
}

/// Resolve region names to codes, dropping (and logging is the caller's
/// job) any that are unknown. Order follows the input.
pub fn sigungu_codes(regions: &[String]) -> Vec<&'static str> {
    regions
        .iter()
        .filter_map(|r| sigungu_code(r))
        .collect()
}

/// Seoul district name for a sigungu code or a longer legal district code.
pub fn gu_name(code: &str) -> Option<&'static str> {
    let sigungu = if code.len() > 5 { &code[..5] } else { code };
    SEOUL_GU
        .iter()
        .find(|(_, c)| *c == sigungu)
        .map(|&(name, _)| name)
}

/// `(lat, lng)` center for a sigungu code, when known.
pub fn region_center(code: &str) -> Option<(f64, f64)> {
    let sigungu = if code.len() > 5 { &code[..5] } else { code };
    REGION_CENTERS
        .iter()
        .find(|(c, _, _)| *c == sigungu)
        .map(|&(_, lat, lng)| (lat, lng))
}

/// Ten-digit legal district code for a five-digit sigungu code.
pub fn cortar_no(sigungu: &str) -> String {
    format!("{sigungu}00000")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_seoul_gu_with_and_without_suffix() {
        assert_eq!(sigungu_code("양천구"), Some("11470"));
        assert_eq!(sigungu_code("양천"), Some("11470"));
        assert_eq!(sigungu_code("강서구"), Some("11500"));
    }

    #[test]
    fn gyeonggi_aliases_win_over_seoul() {
        // 광주시 must resolve to Gyeonggi Gwangju, not a Seoul district.
        assert_eq!(sigungu_code("광주시"), Some("41610"));
        assert_eq!(sigungu_code("분당"), Some("41135"));
    }

    #[test]
    fn unknown_regions_are_dropped() {
        assert_eq!(sigungu_code("부산 해운대구"), None);
        let codes = sigungu_codes(&["강서구".to_string(), "없는동네".to_string()]);
        assert_eq!(codes, vec!["11500"]);
    }

    #[test]
    fn code_to_name_accepts_long_codes() {
        assert_eq!(gu_name("1147010100"), Some("양천구"));
        assert_eq!(gu_name("11470"), Some("양천구"));
        assert_eq!(gu_name("99999"), None);
    }

    #[test]
    fn centers_cover_every_seoul_gu() {
        for (_, code) in SEOUL_GU {
            assert!(region_center(code).is_some(), "missing center for {code}");
        }
    }

    #[test]
    fn centers_cover_every_gyeonggi_alias() {
        // a resolvable region name with no map anchor would make searches
        // silently come back empty
        for (name, code) in GYEONGGI {
            assert!(region_center(code).is_some(), "missing center for {name}");
        }
    }
}
