//! Risk detection over listing text and structure.
//!
//! Text rules scan the description, title, and analysis notes for phrases
//! that signal legal or physical trouble; structural rules look at the
//! numbers themselves. Every finding carries a concrete follow-up action
//! the user can take before contracting.

use chrono::Datelike;
use regex::Regex;

use domain::{Listing, RiskItem, RiskLevel, RiskResult};

struct TextRule {
    pattern: Regex,
    category: &'static str,
    level: RiskLevel,
    title: &'static str,
    check_action: &'static str,
}

/// (pattern, category, level, title, check action)
const TEXT_RULES: [(&str, &str, RiskLevel, &str, &str); 16] = [
    (
        r"보증보험\s*(가입\s*)?불가",
        "보증금 안전",
        RiskLevel::High,
        "보증보험 가입 불가",
        "HUG/SGI 전세보증보험 가입 가능 여부를 직접 조회하세요",
    ),
    (
        r"법인\s*(소유|명의)",
        "권리관계",
        RiskLevel::Medium,
        "법인 소유 매물",
        "법인 등기부등본과 임대인 체납 여부를 확인하세요",
    ),
    (
        r"근저당|담보|저당",
        "권리관계",
        RiskLevel::High,
        "근저당 설정 가능성",
        "등기부등본 을구에서 근저당 설정액과 말소 조건을 확인하세요",
    ),
    (
        r"선순위|후순위|채권",
        "권리관계",
        RiskLevel::High,
        "선순위 채권 존재 가능성",
        "선순위 보증금과 채권 총액이 매매가 대비 얼마인지 확인하세요",
    ),
    (
        r"경매|압류|가압류|가처분",
        "권리관계",
        RiskLevel::High,
        "경매·압류 관련 이력",
        "등기부등본 갑구의 경매·압류 기록과 말소 여부를 확인하세요",
    ),
    (
        r"급매",
        "거래 조건",
        RiskLevel::Medium,
        "급매물",
        "급매 사유를 중개인에게 확인하세요",
    ),
    (
        r"협의",
        "거래 조건",
        RiskLevel::Low,
        "조건 협의 필요",
        "협의 대상이 가격인지 입주 시기인지 명확히 하세요",
    ),
    (
        r"단기\s*계약",
        "거래 조건",
        RiskLevel::Medium,
        "단기계약 조건",
        "계약 기간과 갱신 조건을 계약서에 명시하세요",
    ),
    (
        r"누수|습기|곰팡이|결로",
        "주거 환경",
        RiskLevel::High,
        "누수·곰팡이 우려",
        "현장 방문 시 천장 모서리와 창틀의 얼룩을 직접 확인하세요",
    ),
    (
        r"소음",
        "주거 환경",
        RiskLevel::Medium,
        "소음 우려",
        "낮과 밤 각각 방문해 도로·층간 소음을 확인하세요",
    ),
    (
        r"현\s*상태",
        "거래 조건",
        RiskLevel::Medium,
        "현상태 인수 조건",
        "수리 범위와 비용 부담 주체를 계약 전에 합의하세요",
    ),
    (
        r"즉시\s*입주",
        "입주 조건",
        RiskLevel::Info,
        "즉시입주 가능",
        "공실 기간이 길었다면 사유를 확인하세요",
    ),
    (
        r"입주\s*협의",
        "입주 조건",
        RiskLevel::Low,
        "입주시기 협의",
        "입주 가능일을 계약서에 날짜로 명시하세요",
    ),
    (
        r"전세가율[^%]*(8[0-9]|9[0-9])(\.\d+)?\s*%",
        "보증금 안전",
        RiskLevel::High,
        "전세가율 위험 수준",
        "매매 시세를 재확인하고 보증보험 가입을 전제로 계약하세요",
    ),
    (
        r"전세가율[^%]*(7[0-9])(\.\d+)?\s*%",
        "보증금 안전",
        RiskLevel::Medium,
        "전세가율 주의 수준",
        "전세보증보험 가입 가능 여부를 확인하세요",
    ),
    (
        r"깡통전세",
        "보증금 안전",
        RiskLevel::High,
        "깡통전세 위험",
        "보증금이 매매 시세를 넘지 않는지 확인하고 계약을 재고하세요",
    ),
];

const SCORE_HIGH: u32 = 25;
const SCORE_MEDIUM: u32 = 15;
const SCORE_LOW: u32 = 5;
const SCORE_CAP: u32 = 100;

pub struct RiskEngine {
    rules: Vec<TextRule>,
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl RiskEngine {
    pub fn new() -> Self {
        let rules = TEXT_RULES
            .iter()
            .map(|&(pattern, category, level, title, check_action)| TextRule {
                // constant table, a bad pattern is a programming error
                pattern: Regex::new(pattern).expect("valid risk pattern"),
                category,
                level,
                title,
                check_action,
            })
            .collect();
        Self { rules }
    }

    pub fn evaluate(&self, listing: &Listing) -> RiskResult {
        let text = scan_text(listing);
        let mut risks: Vec<RiskItem> = Vec::new();

        for rule in &self.rules {
            if let Some(m) = rule.pattern.find(&text) {
                risks.push(RiskItem {
                    category: rule.category.to_string(),
                    level: rule.level,
                    title: rule.title.to_string(),
                    description: extract_context(&text, m.start(), m.end()),
                    check_action: rule.check_action.to_string(),
                    source: Some(m.as_str().to_string()),
                });
            }
        }
        risks.extend(structural_risks(listing));

        // first occurrence wins on (category, title)
        let mut seen: Vec<(String, String)> = Vec::new();
        risks.retain(|r| {
            let key = (r.category.clone(), r.title.clone());
            if seen.contains(&key) {
                false
            } else {
                seen.push(key);
                true
            }
        });

        let risk_score = risks
            .iter()
            .map(|r| match r.level {
                RiskLevel::High => SCORE_HIGH,
                RiskLevel::Medium => SCORE_MEDIUM,
                RiskLevel::Low => SCORE_LOW,
                RiskLevel::Info => 0,
            })
            .sum::<u32>()
            .min(SCORE_CAP);

        let summary = summarize(&risks);
        RiskResult {
            listing_id: listing.id.clone(),
            risk_score,
            risks,
            summary,
        }
    }
}

fn scan_text(listing: &Listing) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(d) = listing.description.as_deref() {
        parts.push(d);
    }
    if let Some(t) = listing.title.as_deref() {
        parts.push(t);
    }
    parts.extend(listing.notes.iter().map(String::as_str));
    parts.join(" ")
}

/// Up to 20 chars of context either side of the match, on char boundaries.
fn extract_context(text: &str, start: usize, end: usize) -> String {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let match_start_idx = chars.iter().position(|(i, _)| *i >= start).unwrap_or(0);
    let match_end_idx = chars
        .iter()
        .position(|(i, _)| *i >= end)
        .unwrap_or(chars.len());
    let from = match_start_idx.saturating_sub(20);
    let to = (match_end_idx + 20).min(chars.len());
    let snippet: String = chars[from..to].iter().map(|(_, c)| c).collect();
    format!("\"...{}...\"", snippet.trim())
}

fn structural_item(
    category: &str,
    level: RiskLevel,
    title: &str,
    description: String,
    check_action: &str,
) -> RiskItem {
    RiskItem {
        category: category.to_string(),
        level,
        title: title.to_string(),
        description,
        check_action: check_action.to_string(),
        source: None,
    }
}

fn structural_risks(listing: &Listing) -> Vec<RiskItem> {
    let mut risks = Vec::new();

    if let Some(h) = listing.households {
        if h < 100 {
            risks.push(structural_item(
                "단지 규모",
                RiskLevel::Medium,
                "소규모 단지",
                format!("{h}세대. 시세 형성과 환금성이 불리할 수 있습니다"),
                "동일 단지의 최근 거래 빈도를 확인하세요",
            ));
        }
    }
    if let Some(year) = listing.built_year {
        let age = chrono::Local::now().year() - year;
        if age > 30 {
            risks.push(structural_item(
                "건물 상태",
                RiskLevel::Medium,
                "노후 건물",
                format!("준공 {year}년, {age}년차"),
                "배관·누수 이력과 재건축 추진 여부를 확인하세요",
            ));
        }
    }
    if listing.floor == Some(1) {
        risks.push(structural_item(
            "주거 환경",
            RiskLevel::Low,
            "1층 매물",
            "방범과 사생활 노출에 불리할 수 있습니다".to_string(),
            "방범창 설치 여부와 CCTV 위치를 확인하세요",
        ));
    }
    if let (Some(floor), Some(total)) = (listing.floor, listing.total_floors) {
        if floor == total && total > 1 {
            risks.push(structural_item(
                "주거 환경",
                RiskLevel::Low,
                "최상층",
                format!("{floor}/{total}층. 여름철 더위와 결로 가능성"),
                "옥상 방수 상태와 단열을 확인하세요",
            ));
        }
    }
    if let Some(p) = listing.parking_per_household {
        if p < 0.5 {
            risks.push(structural_item(
                "단지 규모",
                RiskLevel::Medium,
                "주차 부족",
                format!("세대당 {p:.1}대"),
                "야간 방문으로 실제 주차 상황을 확인하세요",
            ));
        }
    }

    risks
}

fn summarize(risks: &[RiskItem]) -> String {
    let high = risks.iter().filter(|r| r.level == RiskLevel::High).count();
    let medium = risks.iter().filter(|r| r.level == RiskLevel::Medium).count();

    if high == 0 && medium == 0 {
        return "특이 위험 요소가 발견되지 않았습니다.".to_string();
    }

    // deposit-safety findings lead the summary when present
    let top = risks
        .iter()
        .filter(|r| r.level == RiskLevel::High)
        .max_by_key(|r| r.category == "보증금 안전")
        .or_else(|| risks.iter().find(|r| r.level == RiskLevel::Medium));

    match top {
        Some(item) => format!(
            "위험 요소 {}건 (높음 {high}건, 중간 {medium}건). 최우선 확인: {}",
            risks.len(),
            item.title
        ),
        None => format!("위험 요소 {}건", risks.len()),
    }
}
