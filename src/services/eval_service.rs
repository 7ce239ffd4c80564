use crate::error::{Error, Result};
use crate::models::evaluation::{Evaluation, Recommendation};
use crate::models::response::Response;
use crate::services::gateway_service::{GenerationOptions, ModelGateway};
use crate::services::question_service::QUESTION_COUNT;
use crate::utils::text;
use serde_json::Value as JsonValue;
use std::fmt::Write;
use std::time::Duration;
use tracing::warn;

#[derive(Clone)]
pub struct EvalService {
    gateway: ModelGateway,
}

impl EvalService {
    pub fn new(gateway: ModelGateway) -> Self {
        Self { gateway }
    }

    /// Evaluate a full transcript. Never fails outward: any gateway or parse
    /// failure degrades to the deterministic heuristic so the candidate
    /// always receives a complete evaluation.
    pub async fn evaluate(&self, responses: &[Response]) -> Evaluation {
        if responses.is_empty() {
            return heuristic_evaluation(responses);
        }

        let prompt = build_evaluation_prompt(responses);
        let options = GenerationOptions {
            temperature: 0.3,
            max_output_tokens: 1500,
            top_p: Some(0.8),
            timeout: Duration::from_secs(30),
        };

        match self.gateway.generate(&prompt, &options).await {
            Ok(raw) => match parse_evaluation(&raw) {
                Ok(evaluation) => evaluation,
                Err(err) => {
                    warn!(error = %err, "Evaluation output rejected, using basic evaluation");
                    heuristic_evaluation(responses)
                }
            },
            Err(err) => {
                warn!(error = %err, "Evaluation request failed, using basic evaluation");
                heuristic_evaluation(responses)
            }
        }
    }
}

fn build_evaluation_prompt(responses: &[Response]) -> String {
    let mut transcript = String::new();
    for (i, r) in responses.iter().enumerate() {
        let _ = write!(
            transcript,
            "\nQuestion {}: {}\nCategory: {}\nAnswer: {}\nTime taken: {:.1} seconds\n---\n",
            i + 1,
            r.question,
            r.category,
            r.answer,
            r.time_taken
        );
    }

    format!(
        r#"Evaluate this SDE intern interview based on the following responses:

{transcript}

Provide evaluation in this EXACT JSON format (no additional text):
{{
    "technical_score": 75,
    "communication_score": 80,
    "problem_solving_score": 70,
    "behavioral_score": 85,
    "overall_score": 78,
    "strengths": ["Clear explanations", "Good examples", "Structured thinking"],
    "improvements": ["More technical depth needed", "Consider edge cases"],
    "detailed_feedback": "Comprehensive paragraph about performance and potential...",
    "recommendation": "Conditional Hire"
}}

Scoring criteria (0-100):
- Technical: Accuracy, depth, proper terminology, understanding of concepts
- Communication: Clarity, structure, completeness of explanations
- Problem-solving: Logical approach, creativity, systematic methodology
- Behavioral: Relevant examples, self-awareness, cultural fit, growth mindset

Recommendation options: "Strong Hire", "Hire", "Conditional Hire", "Hold", "No Hire"

Be fair but thorough for intern-level expectations. Consider this is an entry-level position."#
    )
}

/// Parse the model's scoring object. Every numeric score is clamped to
/// 0..=100; absent text fields are backfilled with fixed defaults.
pub fn parse_evaluation(raw: &str) -> Result<Evaluation> {
    let cleaned = text::strip_code_fences(raw);
    let json_str = text::extract_json_object(cleaned)
        .ok_or_else(|| Error::MalformedOutput("no JSON object found in model output".into()))?;

    let value: JsonValue = serde_json::from_str(json_str)
        .map_err(|err| Error::MalformedOutput(format!("invalid JSON: {}", err)))?;
    let obj = value
        .as_object()
        .ok_or_else(|| Error::MalformedOutput("model output is not a JSON object".into()))?;

    let score = |key: &str| -> i32 {
        let raw = obj
            .get(key)
            .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)))
            .unwrap_or(0);
        clamp_score(raw)
    };

    let string_list = |key: &str| -> Option<Vec<String>> {
        let items: Vec<String> = obj
            .get(key)?
            .as_array()?
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect();
        if items.is_empty() {
            None
        } else {
            Some(items)
        }
    };

    Ok(Evaluation {
        technical_score: score("technical_score"),
        communication_score: score("communication_score"),
        problem_solving_score: score("problem_solving_score"),
        behavioral_score: score("behavioral_score"),
        overall_score: score("overall_score"),
        strengths: string_list("strengths")
            .unwrap_or_else(|| vec!["Completed all questions".to_string()]),
        improvements: string_list("improvements")
            .unwrap_or_else(|| vec!["Continue learning and practicing".to_string()]),
        detailed_feedback: obj
            .get("detailed_feedback")
            .and_then(|v| v.as_str())
            .unwrap_or("Candidate completed the interview process.")
            .to_string(),
        recommendation: obj
            .get("recommendation")
            .and_then(|v| v.as_str())
            .map(Recommendation::parse_or_default)
            .unwrap_or(Recommendation::UnderReview),
    })
}

fn clamp_score(value: i64) -> i32 {
    value.clamp(0, 100) as i32
}

/// Deterministic safety net scored from simple transcript statistics. Must
/// never panic and always produce a complete record.
pub fn heuristic_evaluation(responses: &[Response]) -> Evaluation {
    let base = if responses.is_empty() {
        50
    } else {
        let n = responses.len() as f64;
        let avg_length =
            responses.iter().map(|r| r.answer.chars().count() as f64).sum::<f64>() / n;
        let avg_time = responses.iter().map(|r| r.time_taken).sum::<f64>() / n;

        let length_score = (avg_length / 15.0).clamp(30.0, 100.0);
        let time_score = if (30.0..=150.0).contains(&avg_time) {
            100.0
        } else {
            70.0
        };
        let completion_score = responses.len() as f64 / QUESTION_COUNT as f64 * 100.0;

        ((length_score + time_score + completion_score) / 3.0).round() as i32
    };

    Evaluation {
        technical_score: (base - 5).clamp(40, 100),
        communication_score: base.clamp(45, 100),
        problem_solving_score: (base - 10).clamp(35, 100),
        behavioral_score: (base + 5).clamp(50, 100),
        overall_score: base.clamp(0, 100),
        strengths: vec![
            "Completed the interview process".to_string(),
            "Engaged with all questions".to_string(),
            "Showed up and participated".to_string(),
        ],
        improvements: vec![
            "Could provide more detailed technical explanations".to_string(),
            "Practice explaining complex concepts clearly".to_string(),
            "Consider providing specific examples".to_string(),
        ],
        detailed_feedback: format!(
            "Candidate participated in the full interview process with an overall performance \
             score of {}/100. This basic evaluation was generated due to AI evaluation system \
             limitations. The candidate showed engagement and completed all required questions \
             within the allotted time frame.",
            base
        ),
        recommendation: if base >= 60 {
            Recommendation::ConditionalHire
        } else {
            Recommendation::Hold
        },
    }
}
