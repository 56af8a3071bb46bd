//! Pre-viewing question list, built from what the listing does not say
//! and from the risks it does.

use chrono::Datelike;

use domain::{Listing, QuestionResult, RiskLevel, RiskResult};

const BASE_QUESTIONS: [&str; 5] = [
    "등기부등본을 미리 확인할 수 있을까요? (근저당·압류 여부)",
    "관리비에 어떤 항목이 포함되나요?",
    "입주 가능일은 언제인가요?",
    "전세보증보험 가입이 가능한 매물인가요?",
    "최근에 수리하거나 교체한 부분이 있나요?",
];

const HIGH_DEPOSIT_MAN_WON: i64 = 40_000;
const OLD_BUILDING_YEARS: i32 = 20;

pub fn generate(listing: &Listing, risk: Option<&RiskResult>) -> QuestionResult {
    let mut questions: Vec<String> = Vec::new();
    let mut reasons: Vec<(String, String)> = Vec::new();

    for q in BASE_QUESTIONS {
        push(&mut questions, &mut reasons, q.to_string(), "기본 확인 사항");
    }

    // gaps in the listing itself
    if listing.households.is_none() {
        push(
            &mut questions,
            &mut reasons,
            "단지 세대수가 어떻게 되나요?".to_string(),
            "세대수 정보 없음",
        );
    }
    if listing.has_parking.is_none() && listing.parking_per_household.is_none() {
        push(
            &mut questions,
            &mut reasons,
            "주차는 세대당 몇 대까지 가능한가요?".to_string(),
            "주차 정보 없음",
        );
    }
    if let Some(year) = listing.built_year {
        if chrono::Local::now().year() - year >= OLD_BUILDING_YEARS {
            push(
                &mut questions,
                &mut reasons,
                format!("배관이나 누수 문제는 없었나요? (준공 {year}년)"),
                "준공 20년 이상",
            );
        }
    }
    match listing.floor {
        Some(1) => push(
            &mut questions,
            &mut reasons,
            "방범창이나 보안 시설이 설치되어 있나요?".to_string(),
            "1층 매물",
        ),
        Some(f) if f <= 0 => push(
            &mut questions,
            &mut reasons,
            "채광과 습기 상태는 어떤가요?".to_string(),
            "반지하 매물",
        ),
        _ => {}
    }
    if let (Some(floor), Some(total)) = (listing.floor, listing.total_floors) {
        if floor == total && total > 1 {
            push(
                &mut questions,
                &mut reasons,
                "옥상 방수와 단열 상태는 어떤가요?".to_string(),
                "최상층 매물",
            );
        }
    }
    if listing.deposit.is_some_and(|d| d >= HIGH_DEPOSIT_MAN_WON) {
        push(
            &mut questions,
            &mut reasons,
            "보증금 일부를 월세로 전환할 수 있나요?".to_string(),
            "고액 보증금",
        );
    }

    // property-type specifics
    match listing.property_type.as_deref() {
        Some("오피스텔") => push(
            &mut questions,
            &mut reasons,
            "주거용으로 전입신고가 가능한가요?".to_string(),
            "오피스텔",
        ),
        Some(t) if t.contains("빌라") || t.contains("다세대") => push(
            &mut questions,
            &mut reasons,
            "건물 전체의 선순위 보증금 규모를 알 수 있을까요?".to_string(),
            "빌라/다세대",
        ),
        _ => {}
    }

    // follow-ups on detected risks
    if let Some(risk) = risk {
        for item in &risk.risks {
            if matches!(item.level, RiskLevel::High | RiskLevel::Medium) {
                push(
                    &mut questions,
                    &mut reasons,
                    format!("{}와 관련해서 상태가 어떤가요?", item.title),
                    "위험 요소 후속 확인",
                );
            }
        }
    }

    QuestionResult {
        listing_id: listing.id.clone(),
        questions,
        reasons,
    }
}

/// Append unless the exact question text is already present.
fn push(
    questions: &mut Vec<String>,
    reasons: &mut Vec<(String, String)>,
    question: String,
    why: &str,
) {
    if !questions.contains(&question) {
        reasons.push((question.clone(), why.to_string()));
        questions.push(question);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{ListingSource, RiskItem};

    fn listing() -> Listing {
        let mut l = Listing::new("naver_1", ListingSource::Naver);
        l.households = Some(1200);
        l.parking_per_household = Some(1.2);
        l.built_year = Some(2018);
        l.floor = Some(5);
        l.total_floors = Some(20);
        l.deposit = Some(30000);
        l.property_type = Some("아파트".to_string());
        l
    }

    #[test]
    fn well_described_listing_gets_only_base_questions() {
        let result = generate(&listing(), None);
        assert_eq!(result.questions.len(), BASE_QUESTIONS.len());
        assert_eq!(result.reasons.len(), result.questions.len());
    }

    #[test]
    fn missing_fields_add_targeted_questions() {
        let mut l = listing();
        l.households = None;
        l.parking_per_household = None;
        let result = generate(&l, None);
        assert!(result.questions.iter().any(|q| q.contains("세대수")));
        assert!(result.questions.iter().any(|q| q.contains("주차")));
    }

    #[test]
    fn old_building_and_high_deposit_trigger_questions() {
        let mut l = listing();
        l.built_year = Some(chrono::Local::now().year() - 25);
        l.deposit = Some(52000);
        let result = generate(&l, None);
        assert!(result.questions.iter().any(|q| q.contains("배관이나 누수")));
        assert!(result.questions.iter().any(|q| q.contains("월세로 전환")));
    }

    #[test]
    fn floor_extremes_each_get_a_question() {
        let mut first = listing();
        first.floor = Some(1);
        assert!(generate(&first, None)
            .questions
            .iter()
            .any(|q| q.contains("방범창")));

        let mut top = listing();
        top.floor = Some(20);
        assert!(generate(&top, None)
            .questions
            .iter()
            .any(|q| q.contains("옥상 방수")));

        let mut basement = listing();
        basement.floor = Some(-1);
        assert!(generate(&basement, None)
            .questions
            .iter()
            .any(|q| q.contains("채광과 습기")));
    }

    #[test]
    fn officetel_gets_move_in_registration_question() {
        let mut l = listing();
        l.property_type = Some("오피스텔".to_string());
        assert!(generate(&l, None)
            .questions
            .iter()
            .any(|q| q.contains("전입신고")));
    }

    #[test]
    fn high_and_medium_risks_produce_followups_info_does_not() {
        let risk = RiskResult {
            listing_id: "naver_1".to_string(),
            risk_score: 40,
            risks: vec![
                RiskItem {
                    category: "권리관계".to_string(),
                    level: RiskLevel::High,
                    title: "근저당 설정 가능성".to_string(),
                    description: String::new(),
                    check_action: String::new(),
                    source: None,
                },
                RiskItem {
                    category: "입주 조건".to_string(),
                    level: RiskLevel::Info,
                    title: "즉시입주 가능".to_string(),
                    description: String::new(),
                    check_action: String::new(),
                    source: None,
                },
            ],
            summary: String::new(),
        };
        let result = generate(&listing(), Some(&risk));
        assert!(result
            .questions
            .contains(&"근저당 설정 가능성와 관련해서 상태가 어떤가요?".to_string()));
        assert!(!result.questions.iter().any(|q| q.contains("즉시입주")));
    }

    #[test]
    fn duplicate_questions_are_not_repeated() {
        let mut l = listing();
        l.households = None;
        let before = generate(&l, None).questions.len();
        // running twice over the same inputs yields the same set
        let again = generate(&l, None).questions.len();
        assert_eq!(before, again);
    }
}
