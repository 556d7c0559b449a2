//! Robust response parsing (§4.6 step "Response parsing (robust)").

use serde::Deserialize;

use super::error::LlmError;
use crate::orchestrator::types::EvaluationPayload;

#[derive(Deserialize)]
struct RawEvaluation {
    score: f32,
    explanation: String,
    #[serde(default)]
    keyword_matches: Vec<String>,
    completeness: f32,
    relevance: f32,
    accuracy: f32,
}

/// Parses a raw LLM completion into an [`EvaluationPayload`].
///
/// Steps, in order: trim; strip a leading `<think>...</think>` reasoning
/// block some models emit; extract the substring spanning the first `{` to
/// the last `}`; JSON-decode; clamp numeric fields into `[0, 1]` and drop
/// keyword matches the quiz didn't offer.
pub fn parse_response(raw: &str, keywords: &[String]) -> Result<EvaluationPayload, LlmError> {
    let trimmed = raw.trim();
    let without_think = strip_think_block(trimmed);
    let json_slice = extract_json_object(without_think).ok_or_else(|| LlmError::MalformedResponse {
        reason: "no JSON object found in LLM response".to_string(),
    })?;

    let raw_evaluation: RawEvaluation =
        serde_json::from_str(json_slice).map_err(|e| LlmError::MalformedResponse {
            reason: e.to_string(),
        })?;

    let mut payload = EvaluationPayload {
        score: raw_evaluation.score,
        explanation: raw_evaluation.explanation,
        keyword_matches: raw_evaluation.keyword_matches,
        completeness: raw_evaluation.completeness,
        relevance: raw_evaluation.relevance,
        accuracy: raw_evaluation.accuracy,
        model_answer: None,
    };

    payload.clamp_scores();
    payload.retain_allowed_keywords(keywords);

    Ok(payload)
}

fn strip_think_block(text: &str) -> &str {
    const OPEN: &str = "<think>";
    const CLOSE: &str = "</think>";

    if let Some(open_idx) = text.find(OPEN) {
        if let Some(close_idx) = text.find(CLOSE) {
            if close_idx > open_idx {
                let after = close_idx + CLOSE.len();
                return text[after..].trim_start();
            }
        }
    }
    text
}

fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keywords() -> Vec<String> {
        vec!["pointer".to_string(), "heap".to_string()]
    }

    #[test]
    fn parses_a_clean_json_response() {
        let raw = r#"{"score":0.9,"explanation":"good","keyword_matches":["pointer"],"completeness":0.9,"relevance":0.9,"accuracy":0.9}"#;
        let payload = parse_response(raw, &keywords()).unwrap();
        assert_eq!(payload.score, 0.9);
        assert_eq!(payload.keyword_matches, vec!["pointer".to_string()]);
    }

    #[test]
    fn strips_leading_think_block() {
        let raw = "<think>reasoning...</think>\n{\"score\":0.5,\"explanation\":\"x\",\"keyword_matches\":[],\"completeness\":0.5,\"relevance\":0.5,\"accuracy\":0.5}";
        let payload = parse_response(raw, &keywords()).unwrap();
        assert_eq!(payload.score, 0.5);
    }

    #[test]
    fn extracts_json_from_surrounding_prose() {
        let raw = "Sure, here is the evaluation: {\"score\":1.0,\"explanation\":\"x\",\"keyword_matches\":[],\"completeness\":1.0,\"relevance\":1.0,\"accuracy\":1.0} Hope that helps!";
        let payload = parse_response(raw, &keywords()).unwrap();
        assert_eq!(payload.score, 1.0);
    }

    #[test]
    fn clamps_out_of_range_scores() {
        let raw = r#"{"score":1.5,"explanation":"x","keyword_matches":[],"completeness":-0.3,"relevance":2.0,"accuracy":0.5}"#;
        let payload = parse_response(raw, &keywords()).unwrap();
        assert_eq!(payload.score, 1.0);
        assert_eq!(payload.completeness, 0.0);
        assert_eq!(payload.relevance, 1.0);
    }

    #[test]
    fn drops_keyword_matches_not_in_the_input_set() {
        let raw = r#"{"score":0.5,"explanation":"x","keyword_matches":["pointer","nonsense"],"completeness":0.5,"relevance":0.5,"accuracy":0.5}"#;
        let payload = parse_response(raw, &keywords()).unwrap();
        assert_eq!(payload.keyword_matches, vec!["pointer".to_string()]);
    }

    #[test]
    fn fails_when_no_json_object_is_present() {
        let result = parse_response("no json here at all", &keywords());
        assert!(result.is_err());
    }

    #[test]
    fn fails_on_malformed_json() {
        let result = parse_response("{not valid json}", &keywords());
        assert!(result.is_err());
    }
}
