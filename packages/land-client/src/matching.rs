//! Fuzzy complex-name matching.
//!
//! Listing titles and the complex directory rarely agree on exact names
//! ("래미안 목동" vs "래미안목동아파트"), so matching runs over a
//! normalized form and accepts substring containment either way, or a
//! shared prefix of at least four characters. Comparisons are per `char`,
//! so multi-byte Hangul counts one character each.

/// Strip whitespace, `-`, `_` and lowercase.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Match two already-normalized names.
pub fn names_match(a: &str, b: &str) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    if a == b || a.contains(b) || b.contains(a) {
        return true;
    }
    common_prefix_chars(a, b) >= 4
}

fn common_prefix_chars(a: &str, b: &str) -> usize {
    a.chars()
        .zip(b.chars())
        .take_while(|(x, y)| x == y)
        .count()
}

/// First entry in `candidates` whose name fuzzily matches `name`.
pub fn find_match<'a, T>(
    name: &str,
    candidates: impl IntoIterator<Item = (&'a str, T)>,
) -> Option<T> {
    let target = normalize_name(name);
    if target.is_empty() {
        return None;
    }
    candidates
        .into_iter()
        .find(|(candidate, _)| names_match(&target, &normalize_name(candidate)))
        .map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_strips_separators_and_case() {
        assert_eq!(normalize_name("래미안 목동-1단지"), "래미안목동1단지");
        assert_eq!(normalize_name("Xi_Tower A"), "xitowera");
    }

    #[test]
    fn substring_matches_either_direction() {
        assert!(names_match("래미안목동", "래미안목동아파트"));
        assert!(names_match("래미안목동아파트", "래미안목동"));
    }

    #[test]
    fn four_char_hangul_prefix_matches() {
        // differs after the fourth character, shares a 4-char prefix
        assert!(names_match("목동신시가지1차", "목동신시가지7단지"));
        assert!(!names_match("목동1차", "목운2차"));
    }

    #[test]
    fn short_or_empty_names_never_match() {
        assert!(!names_match("", "래미안"));
        assert!(!names_match("목동", "신정동"));
    }

    #[test]
    fn find_match_returns_first_hit() {
        let candidates = vec![("신정뉴타운", 1), ("래미안 목동", 2), ("래미안목동2차", 3)];
        assert_eq!(find_match("래미안목동", candidates), Some(2));
    }
}
