use ai_interviewer::models::evaluation::Recommendation;
use ai_interviewer::services::eval_service::heuristic_evaluation;
use ai_interviewer::services::question_service::{fallback_questions, parse_questions};
use ai_interviewer::services::report_service::ReportService;
use ai_interviewer::session::{Phase, Session};
use chrono::Utc;

#[test]
fn full_interview_flow_with_fallbacks() {
    // Setup: fallback questions stand in for the AI path, exactly as they
    // would after a gateway failure.
    let questions = fallback_questions();
    assert_eq!(questions.len(), 6);

    let mut session = Session::new();
    session
        .begin_interview("Ada Lovelace", questions)
        .expect("begin interview");
    assert_eq!(session.phase(), Phase::Interview);

    // Blank answers are rejected without advancing.
    assert!(session.submit_answer("   ").is_err());
    assert_eq!(session.current_index(), 0);

    // Walk the whole interview, revisiting one question along the way.
    session
        .submit_answer("Arrays are contiguous blocks; linked lists chain nodes via pointers.")
        .expect("answer 1");
    session.go_previous("").expect("go back");
    session
        .submit_answer("Arrays give O(1) indexing; linked lists give O(1) insertion at the head.")
        .expect("revised answer 1");
    assert_eq!(session.responses().len(), 1, "revisit must upsert, not append");

    for i in 2..=6 {
        session
            .submit_answer(&format!(
                "Detailed response to question {} covering the main tradeoffs and an example.",
                i
            ))
            .expect("answer");
    }

    assert_eq!(session.phase(), Phase::Results);
    assert_eq!(session.responses().len(), 6);
    let ids: Vec<i32> = session.responses().iter().map(|r| r.question_id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);

    // Evaluation: heuristic path, as after an AI evaluation failure.
    let evaluation = heuristic_evaluation(session.responses());
    for score in [
        evaluation.technical_score,
        evaluation.communication_score,
        evaluation.problem_solving_score,
        evaluation.behavioral_score,
        evaluation.overall_score,
    ] {
        assert!((0..=100).contains(&score));
    }
    assert!(matches!(
        evaluation.recommendation,
        Recommendation::ConditionalHire | Recommendation::Hold
    ));

    // Report round-trip: every score, strength, improvement, and the
    // candidate name appear verbatim.
    let now = Utc::now();
    let report =
        ReportService::generate_report(session.candidate_name(), &evaluation, session.responses(), now);
    assert!(report.contains("Ada Lovelace"));
    assert!(report.contains(&format!("{}/100", evaluation.overall_score)));
    for strength in &evaluation.strengths {
        assert!(report.contains(strength));
    }
    for improvement in &evaluation.improvements {
        assert!(report.contains(improvement));
    }
    for response in session.responses() {
        assert!(report.contains(&response.answer));
    }

    let file_name = ReportService::report_file_name(session.candidate_name(), now);
    assert!(file_name.starts_with("Interview_Report_Ada_Lovelace_"));
    assert!(file_name.ends_with(".txt"));

    // Reset discards everything; a new interview can start.
    session.reset();
    assert_eq!(session.phase(), Phase::Setup);
    assert!(session.responses().is_empty());
}

#[test]
fn ai_question_path_feeds_the_session() {
    // Well-formed model output (with fences, commentary, and bogus ids)
    // drives the same session flow as the fallback set.
    let raw = r#"Sure! Here are the questions:
```json
[
    {"id": 42, "text": "What is a hash map?", "category": "Technical", "difficulty": "Easy"},
    {"id": 42, "text": "Explain recursion.", "category": "Technical", "difficulty": "Medium"},
    {"id": 7, "text": "Describe REST vs RPC.", "category": "Technical", "difficulty": "Medium"},
    {"id": 0, "text": "Debug a slow endpoint.", "category": "Problem-Solving", "difficulty": "Medium"},
    {"id": -3, "text": "Design a URL shortener.", "category": "Problem-Solving", "difficulty": "Hard"},
    {"id": 9, "text": "Tell me about a team conflict.", "category": "Behavioral", "difficulty": "Easy"}
]
```"#;
    let questions = parse_questions(raw).expect("parse");
    assert_eq!(
        questions.iter().map(|q| q.id).collect::<Vec<_>>(),
        vec![1, 2, 3, 4, 5, 6]
    );

    let mut session = Session::new();
    session.begin_interview("Grace Hopper", questions).unwrap();
    for _ in 0..6 {
        session.submit_answer("A reasonable, complete answer.").unwrap();
    }
    assert_eq!(session.phase(), Phase::Results);
}
