use serde::{Deserialize, Serialize};

/// Scored evaluation of a full interview. All score fields are clamped to
/// 0..=100 before this struct is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub technical_score: i32,
    pub communication_score: i32,
    pub problem_solving_score: i32,
    pub behavioral_score: i32,
    pub overall_score: i32,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub detailed_feedback: String,
    pub recommendation: Recommendation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    #[serde(rename = "Strong Hire")]
    StrongHire,
    Hire,
    #[serde(rename = "Conditional Hire")]
    ConditionalHire,
    Hold,
    #[serde(rename = "No Hire")]
    NoHire,
    #[serde(rename = "Under Review")]
    UnderReview,
}

impl Recommendation {
    /// Lenient parse for model-supplied recommendation strings. Unknown
    /// values default to `Under Review`.
    pub fn parse_or_default(raw: &str) -> Self {
        match raw.trim() {
            "Strong Hire" => Recommendation::StrongHire,
            "Hire" => Recommendation::Hire,
            "Conditional Hire" => Recommendation::ConditionalHire,
            "Hold" => Recommendation::Hold,
            "No Hire" => Recommendation::NoHire,
            _ => Recommendation::UnderReview,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Recommendation::StrongHire => "Strong Hire",
            Recommendation::Hire => "Hire",
            Recommendation::ConditionalHire => "Conditional Hire",
            Recommendation::Hold => "Hold",
            Recommendation::NoHire => "No Hire",
            Recommendation::UnderReview => "Under Review",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
