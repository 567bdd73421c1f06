//! Prompt frames and fixed fallback strings.
//!
//! The Korean strings are part of the observable contract with the
//! storefront and must stay byte-for-byte stable.

/// Instruct-style vision prompt asking for a pure-JSON product record.
pub const VISION_ANALYSIS_PROMPT: &str = r#"
<|system|>
당신은 한국의 쇼핑몰 상품 분석 AI입니다.
입력된 이미지를 시각적으로 분석하여 JSON 데이터로 반환하는 것이 유일한 임무입니다.
잡담, 인사, 마크다운(```json)을 절대 포함하지 마십시오. 오직 순수 JSON 문자열만 출력하십시오.

[분석 가이드]
1. 상품명: 이미지의 시각적 특징을 반영한 매력적인 한글 상품명.
2. 카테고리: Fashion, Food, Electronics, Automobile, Etc 중 하나.
3. 설명: 고객을 설득하는 4~8문장의 한글 설명 (계절감, 소재, 맛, 분위기, 추천 스타일링 포함).
4. 가격: 상품에 어울리는 현실적인 원화(KRW) 가격 (숫자만).

[출력 예시]
{"name": "상품명", "category": "카테고리", "description": "설명", "price": 10000}
<|user|>
이 이미지를 분석해서 JSON을 생성해.
<|assistant|>
"#;

/// Description used when the model output had none (or a too-short one).
pub const DESCRIPTION_FALLBACK: &str =
    "AI가 이미지를 분석하여 추천하는 상품입니다. 매력적인 스타일과 뛰어난 품질을 자랑합니다.";

/// Description used when the analysis pipeline failed outright.
pub const FAILURE_DESCRIPTION: &str =
    "이미지 분석에 실패했습니다. 관리자 모드에서 정보를 수정해주세요.";

/// Answer returned when text generation fails or comes back empty.
pub const ANSWER_FALLBACK: &str = "죄송합니다. AI 응답을 생성할 수 없습니다.";

/// Frame a free-form prompt as a Korean question/answer exchange.
pub fn answer_prompt(prompt: &str) -> String {
    format!("질문: {}\n답변 (한국어):", prompt)
}
