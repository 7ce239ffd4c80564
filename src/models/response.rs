use serde::{Deserialize, Serialize};

/// One answered question. `question` and `category` are snapshots of the
/// question at answer time; `time_taken` is in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub question_id: i32,
    pub question: String,
    pub category: String,
    pub answer: String,
    pub time_taken: f64,
}
