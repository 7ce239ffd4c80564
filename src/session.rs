use crate::error::{Error, Result};
use crate::models::question::Question;
use crate::models::response::Response;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::info;

/// Advisory per-question budget. The state machine never enforces it; the
/// presentation layer renders a countdown and offers an explicit auto-submit
/// once it expires.
pub const QUESTION_TIME_LIMIT_SECS: u64 = 180;

pub const TIME_EXPIRED_PLACEHOLDER: &str = "No response provided (time expired)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    Interview,
    Results,
}

/// Single-interview session state: setup -> interview -> results.
///
/// All state is explicit and owned by this value; operations mutate it in
/// place under single-threaded discipline. There is no persistence: losing
/// the value loses the session.
#[derive(Debug)]
pub struct Session {
    phase: Phase,
    candidate_name: String,
    questions: Vec<Question>,
    responses: Vec<Response>,
    current_question: usize,
    start_time: Option<DateTime<Utc>>,
    question_start: Option<Instant>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            phase: Phase::Setup,
            candidate_name: String::new(),
            questions: Vec::new(),
            responses: Vec::new(),
            current_question: 0,
            start_time: None,
            question_start: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn candidate_name(&self) -> &str {
        &self.candidate_name
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn responses(&self) -> &[Response] {
        &self.responses
    }

    pub fn current_index(&self) -> usize {
        self.current_question
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_question)
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.start_time
    }

    /// setup -> interview. Requires a candidate name and a non-empty
    /// question set (AI-generated or fallback).
    pub fn begin_interview(&mut self, name: &str, questions: Vec<Question>) -> Result<()> {
        if self.phase != Phase::Setup {
            return Err(Error::Validation("interview already started".into()));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation(
                "Please enter your name to continue.".into(),
            ));
        }
        if questions.is_empty() {
            return Err(Error::Validation("no questions available".into()));
        }

        self.candidate_name = name.to_string();
        self.questions = questions;
        self.current_question = 0;
        self.phase = Phase::Interview;
        self.start_time = Some(Utc::now());
        self.question_start = Some(Instant::now());
        info!(candidate = %self.candidate_name, "Interview started");
        Ok(())
    }

    /// Seconds left on the advisory countdown for the current question.
    pub fn remaining_seconds(&self) -> f64 {
        (QUESTION_TIME_LIMIT_SECS as f64 - self.elapsed_on_question()).max(0.0)
    }

    pub fn time_expired(&self) -> bool {
        self.remaining_seconds() <= 0.0
    }

    /// Submit the current answer and advance. Blank answers are rejected;
    /// the candidate must either answer or explicitly confirm expiry via
    /// `submit_expired`.
    pub fn submit_answer(&mut self, answer: &str) -> Result<()> {
        self.ensure_interview()?;
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::Validation(
                "Please provide an answer before proceeding.".into(),
            ));
        }
        self.upsert_response(answer.to_string());
        self.advance();
        Ok(())
    }

    /// Explicit post-expiry confirmation: stores whatever was typed, or the
    /// placeholder if nothing was, and advances.
    pub fn submit_expired(&mut self, answer: &str) -> Result<()> {
        self.ensure_interview()?;
        let answer = answer.trim();
        let stored = if answer.is_empty() {
            TIME_EXPIRED_PLACEHOLDER.to_string()
        } else {
            answer.to_string()
        };
        self.upsert_response(stored);
        self.advance();
        Ok(())
    }

    /// Go back one question, saving the current (possibly partial) answer
    /// without validation when it is non-blank.
    pub fn go_previous(&mut self, answer: &str) -> Result<()> {
        self.ensure_interview()?;
        if self.current_question == 0 {
            return Err(Error::Validation("already at the first question".into()));
        }
        let answer = answer.trim();
        if !answer.is_empty() {
            self.upsert_response(answer.to_string());
        }
        self.current_question -= 1;
        self.question_start = Some(Instant::now());
        Ok(())
    }

    /// results -> setup (or abandon from anywhere). Clears all session data;
    /// gateway connectivity state lives outside the session and survives.
    pub fn reset(&mut self) {
        *self = Session::new();
    }

    fn ensure_interview(&self) -> Result<()> {
        if self.phase != Phase::Interview {
            return Err(Error::Validation("no interview in progress".into()));
        }
        Ok(())
    }

    fn elapsed_on_question(&self) -> f64 {
        self.question_start
            .map(|start| start.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }

    /// Insert-or-replace keyed by question_id: re-visiting a question
    /// overwrites its response rather than appending a duplicate.
    fn upsert_response(&mut self, answer: String) {
        let question = &self.questions[self.current_question];
        let response = Response {
            question_id: question.id,
            question: question.text.clone(),
            category: question.category.to_string(),
            answer,
            time_taken: self.elapsed_on_question(),
        };
        match self
            .responses
            .iter_mut()
            .find(|r| r.question_id == response.question_id)
        {
            Some(existing) => *existing = response,
            None => self.responses.push(response),
        }
    }

    fn advance(&mut self) {
        self.current_question += 1;
        self.question_start = Some(Instant::now());
        if self.current_question >= self.questions.len() {
            self.phase = Phase::Results;
            info!(
                responses = self.responses.len(),
                "Interview complete, moving to results"
            );
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::question_service::fallback_questions;

    fn interview_session() -> Session {
        let mut session = Session::new();
        session
            .begin_interview("Ada Lovelace", fallback_questions())
            .unwrap();
        session
    }

    #[test]
    fn starts_in_setup() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Setup);
        assert_eq!(session.current_index(), 0);
        assert!(session.responses().is_empty());
    }

    #[test]
    fn begin_interview_rejects_blank_name() {
        let mut session = Session::new();
        assert!(session.begin_interview("   ", fallback_questions()).is_err());
        assert_eq!(session.phase(), Phase::Setup);
    }

    #[test]
    fn begin_interview_rejects_empty_question_set() {
        let mut session = Session::new();
        assert!(session.begin_interview("Ada", Vec::new()).is_err());
    }

    #[test]
    fn begin_interview_trims_name_and_starts_clock() {
        let mut session = Session::new();
        session
            .begin_interview("  Ada Lovelace  ", fallback_questions())
            .unwrap();
        assert_eq!(session.candidate_name(), "Ada Lovelace");
        assert_eq!(session.phase(), Phase::Interview);
        assert!(session.started_at().is_some());
        assert!(session.remaining_seconds() > 170.0);
    }

    #[test]
    fn rejects_blank_answers_without_advancing() {
        let mut session = interview_session();
        assert!(session.submit_answer("   ").is_err());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.phase(), Phase::Interview);
        assert!(session.responses().is_empty());
    }

    #[test]
    fn six_valid_submissions_reach_results_exactly_once() {
        let mut session = interview_session();
        for i in 0..6 {
            assert_eq!(session.phase(), Phase::Interview);
            session.submit_answer(&format!("Answer {}", i)).unwrap();
        }
        assert_eq!(session.phase(), Phase::Results);
        assert_eq!(session.current_index(), 6);
        assert_eq!(session.responses().len(), 6);
        // no further submissions once in results
        assert!(session.submit_answer("extra").is_err());
    }

    #[test]
    fn revisiting_a_question_overwrites_in_place() {
        let mut session = interview_session();
        session.submit_answer("first attempt").unwrap();
        session.go_previous("").unwrap();
        assert_eq!(session.current_index(), 0);
        session.submit_answer("second attempt").unwrap();

        assert_eq!(session.responses().len(), 1);
        assert_eq!(session.responses()[0].answer, "second attempt");
        assert_eq!(session.responses()[0].question_id, 1);
    }

    #[test]
    fn previous_saves_partial_answer_without_validation() {
        let mut session = interview_session();
        session.submit_answer("answer one").unwrap();
        session.go_previous("half-typed draft").unwrap();

        // draft for question 2 was saved even though it was never submitted
        assert_eq!(session.responses().len(), 2);
        let draft = session
            .responses()
            .iter()
            .find(|r| r.question_id == 2)
            .unwrap();
        assert_eq!(draft.answer, "half-typed draft");
    }

    #[test]
    fn previous_rejected_at_first_question() {
        let mut session = interview_session();
        assert!(session.go_previous("anything").is_err());
        assert!(session.responses().is_empty());
    }

    #[test]
    fn expired_submission_stores_placeholder() {
        let mut session = interview_session();
        session.submit_expired("").unwrap();
        assert_eq!(session.responses()[0].answer, TIME_EXPIRED_PLACEHOLDER);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn expired_submission_keeps_typed_text() {
        let mut session = interview_session();
        session.submit_expired("got this far before the buzzer").unwrap();
        assert_eq!(
            session.responses()[0].answer,
            "got this far before the buzzer"
        );
    }

    #[test]
    fn responses_snapshot_question_fields() {
        let mut session = interview_session();
        session.submit_answer("an answer").unwrap();
        let response = &session.responses()[0];
        assert_eq!(response.question, session.questions()[0].text);
        assert_eq!(response.category, "Technical");
        assert!(response.time_taken >= 0.0);
    }

    #[test]
    fn reset_returns_to_setup() {
        let mut session = interview_session();
        session.submit_answer("an answer").unwrap();
        session.reset();
        assert_eq!(session.phase(), Phase::Setup);
        assert!(session.responses().is_empty());
        assert!(session.questions().is_empty());
        assert_eq!(session.candidate_name(), "");
    }
}
