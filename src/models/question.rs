use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default)]
    pub id: i32,
    pub text: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
}

impl Question {
    pub fn new(id: i32, text: &str, category: QuestionCategory, difficulty: Difficulty) -> Self {
        Self {
            id,
            text: text.to_string(),
            category,
            difficulty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuestionCategory {
    Technical,
    #[serde(rename = "Problem-Solving")]
    ProblemSolving,
    Behavioral,
}

impl QuestionCategory {
    /// Lenient parse for model-supplied category strings. Unknown values
    /// default to `Technical`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "Problem-Solving" | "Problem Solving" => QuestionCategory::ProblemSolving,
            "Behavioral" => QuestionCategory::Behavioral,
            _ => QuestionCategory::Technical,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionCategory::Technical => "Technical",
            QuestionCategory::ProblemSolving => "Problem-Solving",
            QuestionCategory::Behavioral => "Behavioral",
        }
    }
}

impl std::fmt::Display for QuestionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Lenient parse for model-supplied difficulty strings. Unknown values
    /// default to `Medium`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "Easy" => Difficulty::Easy,
            "Hard" => Difficulty::Hard,
            _ => Difficulty::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
