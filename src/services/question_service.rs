use crate::error::{Error, Result};
use crate::models::question::{Difficulty, Question, QuestionCategory};
use crate::services::gateway_service::{GenerationOptions, ModelGateway};
use crate::utils::text;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tracing::{info, warn};

/// A session always runs exactly this many questions.
pub const QUESTION_COUNT: usize = 6;

#[derive(Clone)]
pub struct QuestionService {
    gateway: ModelGateway,
}

impl QuestionService {
    pub fn new(gateway: ModelGateway) -> Self {
        Self { gateway }
    }

    /// Generate the six interview questions for a candidate. Never fails
    /// outward: any gateway or parse failure falls back to the static set so
    /// the candidate-facing flow always gets exactly six questions.
    pub async fn generate_questions(&self, background: &str) -> Vec<Question> {
        let prompt = build_question_prompt(background);
        let options = GenerationOptions {
            temperature: 0.7,
            max_output_tokens: 2500,
            top_p: Some(0.9),
            timeout: Duration::from_secs(45),
        };

        match self.gateway.generate(&prompt, &options).await {
            Ok(raw) => match parse_questions(&raw) {
                Ok(questions) => {
                    info!(count = questions.len(), "Generated personalized questions");
                    questions
                }
                Err(err) => {
                    warn!(error = %err, "Model output rejected, using fallback questions");
                    fallback_questions()
                }
            },
            Err(err) => {
                warn!(error = %err, "Question generation failed, using fallback questions");
                fallback_questions()
            }
        }
    }
}

fn build_question_prompt(background: &str) -> String {
    format!(
        r#"Generate exactly 6 interview questions for a Software Development Engineer Intern position.

Candidate background: {background}

Requirements:
- 3 Technical questions (data structures, algorithms, programming concepts)
- 2 Problem-solving questions (debugging, system design, analytical thinking)
- 1 Behavioral question (experience, motivation, challenges)
- Questions should be intern-level appropriate
- Mix of Easy (2), Medium (3), Hard (1) difficulty

Return ONLY a valid JSON array with this exact structure:
[
    {{
        "id": 1,
        "text": "Question text here",
        "category": "Technical",
        "difficulty": "Easy"
    }},
    {{
        "id": 2,
        "text": "Question text here",
        "category": "Technical",
        "difficulty": "Medium"
    }}
]

Do not include any other text, explanations, or markdown formatting."#
    )
}

/// Parse and validate loosely-structured model output into exactly six
/// questions, renumbered 1..=6 in input order. Any model-supplied `id` is
/// discarded: ids are positional, the ordering and count guarantee matters
/// more than id fidelity.
pub fn parse_questions(raw: &str) -> Result<Vec<Question>> {
    let cleaned = text::strip_code_fences(raw);
    let json_str = text::extract_json_array(cleaned)
        .ok_or_else(|| Error::MalformedOutput("no JSON array found in model output".into()))?;

    let data: JsonValue = serde_json::from_str(json_str)
        .map_err(|err| Error::MalformedOutput(format!("invalid JSON: {}", err)))?;
    let items = data
        .as_array()
        .ok_or_else(|| Error::MalformedOutput("model output is not a JSON array".into()))?;

    if items.len() < QUESTION_COUNT {
        return Err(Error::MalformedOutput(format!(
            "expected {} questions, got {}",
            QUESTION_COUNT,
            items.len()
        )));
    }

    let mut questions = Vec::with_capacity(QUESTION_COUNT);
    for item in items.iter().take(QUESTION_COUNT) {
        let obj = item
            .as_object()
            .ok_or_else(|| Error::MalformedOutput("question entry is not an object".into()))?;

        let question_text = obj
            .get("text")
            .and_then(|v| v.as_str())
            .unwrap_or("")
            .trim()
            .to_string();
        if question_text.is_empty() {
            continue;
        }

        let category = obj
            .get("category")
            .and_then(|v| v.as_str())
            .map(QuestionCategory::parse_or_default)
            .unwrap_or(QuestionCategory::Technical);
        let difficulty = obj
            .get("difficulty")
            .and_then(|v| v.as_str())
            .map(Difficulty::parse_or_default)
            .unwrap_or(Difficulty::Medium);

        questions.push(Question {
            id: questions.len() as i32 + 1,
            text: question_text,
            category,
            difficulty,
        });
    }

    if questions.len() < QUESTION_COUNT {
        return Err(Error::MalformedOutput(format!(
            "only {} questions had usable text",
            questions.len()
        )));
    }

    Ok(questions)
}

/// Fixed fallback set used whenever AI generation fails or is skipped.
pub fn fallback_questions() -> Vec<Question> {
    vec![
        Question::new(
            1,
            "Explain the difference between an array and a linked list. When would you use each data structure?",
            QuestionCategory::Technical,
            Difficulty::Medium,
        ),
        Question::new(
            2,
            "What is time complexity (Big O notation)? Calculate the time complexity of searching through a 2D array using nested loops.",
            QuestionCategory::Technical,
            Difficulty::Easy,
        ),
        Question::new(
            3,
            "You're debugging a web application that takes 30 seconds to load. Walk me through your debugging process step by step.",
            QuestionCategory::ProblemSolving,
            Difficulty::Medium,
        ),
        Question::new(
            4,
            "Design a basic real-time chat application. What main components and technologies would you need? Consider scalability for 1000+ users.",
            QuestionCategory::ProblemSolving,
            Difficulty::Hard,
        ),
        Question::new(
            5,
            "Describe a challenging coding project you worked on. What obstacles did you face and how did you overcome them?",
            QuestionCategory::Behavioral,
            Difficulty::Medium,
        ),
        Question::new(
            6,
            "What's the difference between SQL and NoSQL databases? Give an example of when you'd use each.",
            QuestionCategory::Technical,
            Difficulty::Easy,
        ),
    ]
}
