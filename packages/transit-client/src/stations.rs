//! Coordinates for the subway stations users name as commute destinations.

const STATIONS: [(&str, f64, f64); 30] = [
    // business districts
    ("여의도역", 37.5216, 126.9243),
    ("강남역", 37.4979, 127.0276),
    ("삼성역", 37.5089, 127.0631),
    ("선릉역", 37.5046, 127.0486),
    ("역삼역", 37.5007, 127.0365),
    ("교대역", 37.4934, 127.0145),
    ("서초역", 37.4916, 127.0077),
    ("시청역", 37.5652, 126.9772),
    ("광화문역", 37.5709, 126.9768),
    ("종각역", 37.5700, 126.9830),
    ("을지로입구역", 37.5660, 126.9822),
    ("충정로역", 37.5597, 126.9636),
    ("홍대입구역", 37.5571, 126.9239),
    ("합정역", 37.5498, 126.9139),
    ("영등포구청역", 37.5257, 126.8963),
    ("당산역", 37.5347, 126.9023),
    ("신도림역", 37.5089, 126.8913),
    ("가산디지털단지역", 37.4816, 126.8826),
    ("구로디지털단지역", 37.4852, 126.9015),
    ("판교역", 37.3947, 127.1112),
    ("정자역", 37.3662, 127.1085),
    // transfer hubs and residential anchors
    ("서울역", 37.5547, 126.9707),
    ("용산역", 37.5299, 126.9648),
    ("왕십리역", 37.5614, 127.0378),
    ("건대입구역", 37.5404, 127.0696),
    ("잠실역", 37.5133, 127.1001),
    ("천호역", 37.5388, 127.1236),
    ("목동역", 37.5274, 126.8754),
    ("발산역", 37.5581, 126.8378),
    ("마곡역", 37.5621, 126.8256),
];

/// `(lat, lng)` for a station name; the `역` suffix is optional.
pub fn station_coords(name: &str) -> Option<(f64, f64)> {
    let name = name.trim();
    let lookup = |n: &str| {
        STATIONS
            .iter()
            .find(|(station, _, _)| *station == n)
            .map(|&(_, lat, lng)| (lat, lng))
    };
    if name.ends_with('역') {
        lookup(name)
    } else {
        lookup(&format!("{name}역"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn suffix_is_optional() {
        assert_eq!(station_coords("여의도"), station_coords("여의도역"));
        assert!(station_coords("강남").is_some());
    }

    #[test]
    fn unknown_station_is_none() {
        assert!(station_coords("부산역").is_none());
        assert!(station_coords("").is_none());
    }
}
