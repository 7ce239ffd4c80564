use crate::models::evaluation::Evaluation;
use crate::models::response::Response;
use crate::services::question_service::QUESTION_COUNT;
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub struct ReportService;

impl ReportService {
    /// Render the downloadable plain-text report: candidate, timestamp,
    /// per-category scores, recommendation, strengths/improvements, detailed
    /// feedback, and the full per-question transcript with time taken.
    pub fn generate_report(
        candidate_name: &str,
        evaluation: &Evaluation,
        responses: &[Response],
        generated_at: DateTime<Utc>,
    ) -> String {
        let mut report = String::new();

        let _ = writeln!(report, "==============================================");
        let _ = writeln!(report, "            AI INTERVIEW REPORT");
        let _ = writeln!(report, "       Software Development Engineer Intern");
        let _ = writeln!(report, "==============================================");
        let _ = writeln!(report);
        let _ = writeln!(report, "Candidate: {}", candidate_name);
        let _ = writeln!(report, "Date: {}", generated_at.format("%Y-%m-%d %H:%M UTC"));
        let _ = writeln!(report);

        let _ = writeln!(report, "PERFORMANCE SUMMARY");
        let _ = writeln!(report, "-------------------");
        let _ = writeln!(report, "Technical Knowledge:  {}/100", evaluation.technical_score);
        let _ = writeln!(report, "Communication:        {}/100", evaluation.communication_score);
        let _ = writeln!(report, "Problem Solving:      {}/100", evaluation.problem_solving_score);
        let _ = writeln!(report, "Behavioral Fit:       {}/100", evaluation.behavioral_score);
        let _ = writeln!(report, "Overall Score:        {}/100", evaluation.overall_score);
        let _ = writeln!(report);
        let _ = writeln!(report, "Recommendation: {}", evaluation.recommendation);
        let _ = writeln!(report);

        let _ = writeln!(report, "KEY STRENGTHS");
        let _ = writeln!(report, "-------------");
        for strength in &evaluation.strengths {
            let _ = writeln!(report, "- {}", strength);
        }
        let _ = writeln!(report);

        let _ = writeln!(report, "AREAS FOR IMPROVEMENT");
        let _ = writeln!(report, "---------------------");
        for improvement in &evaluation.improvements {
            let _ = writeln!(report, "- {}", improvement);
        }
        let _ = writeln!(report);

        let _ = writeln!(report, "DETAILED FEEDBACK");
        let _ = writeln!(report, "-----------------");
        let _ = writeln!(report, "{}", evaluation.detailed_feedback);
        let _ = writeln!(report);

        let total_time: f64 = responses.iter().map(|r| r.time_taken).sum();
        let avg_time = if responses.is_empty() {
            0.0
        } else {
            total_time / responses.len() as f64
        };
        let _ = writeln!(report, "INTERVIEW STATISTICS");
        let _ = writeln!(report, "--------------------");
        let _ = writeln!(
            report,
            "Total time: {}m {}s",
            total_time as u64 / 60,
            total_time as u64 % 60
        );
        let _ = writeln!(
            report,
            "Average per question: {}m {}s",
            avg_time as u64 / 60,
            avg_time as u64 % 60
        );
        let _ = writeln!(
            report,
            "Questions completed: {}/{}",
            responses.len(),
            QUESTION_COUNT
        );
        let _ = writeln!(report);

        let _ = writeln!(report, "INTERVIEW TRANSCRIPT");
        let _ = writeln!(report, "--------------------");
        for response in responses {
            let _ = writeln!(
                report,
                "Question {} ({}): {}",
                response.question_id, response.category, response.question
            );
            let _ = writeln!(report, "Time taken: {:.1} seconds", response.time_taken);
            let _ = writeln!(report, "Answer: {}", response.answer);
            let _ = writeln!(report, "---");
        }

        report
    }

    /// File name embedding the candidate name and a `YYYYMMDD_HHMM`
    /// timestamp. Whitespace and path separators in the name are normalized
    /// so the name stays a single path component.
    pub fn report_file_name(candidate_name: &str, now: DateTime<Utc>) -> String {
        let safe_name: String = candidate_name
            .trim()
            .chars()
            .map(|c| {
                if c.is_whitespace() || c == '/' || c == '\\' {
                    '_'
                } else {
                    c
                }
            })
            .collect();
        format!(
            "Interview_Report_{}_{}.txt",
            safe_name,
            now.format("%Y%m%d_%H%M")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::evaluation::Recommendation;
    use chrono::TimeZone;

    fn sample_evaluation() -> Evaluation {
        Evaluation {
            technical_score: 72,
            communication_score: 77,
            problem_solving_score: 67,
            behavioral_score: 82,
            overall_score: 77,
            strengths: vec!["Clear explanations".to_string(), "Good examples".to_string()],
            improvements: vec!["More technical depth needed".to_string()],
            detailed_feedback: "Solid intern-level performance overall.".to_string(),
            recommendation: Recommendation::ConditionalHire,
        }
    }

    fn sample_responses() -> Vec<Response> {
        vec![
            Response {
                question_id: 1,
                question: "Explain arrays vs linked lists.".to_string(),
                category: "Technical".to_string(),
                answer: "Arrays are contiguous; linked lists are node-based.".to_string(),
                time_taken: 61.5,
            },
            Response {
                question_id: 2,
                question: "Design a chat application.".to_string(),
                category: "Problem-Solving".to_string(),
                answer: "WebSockets plus a message queue.".to_string(),
                time_taken: 120.0,
            },
        ]
    }

    #[test]
    fn report_contains_every_score_and_string_verbatim() {
        let evaluation = sample_evaluation();
        let responses = sample_responses();
        let report = ReportService::generate_report(
            "Ada Lovelace",
            &evaluation,
            &responses,
            Utc::now(),
        );

        assert!(report.contains("Ada Lovelace"));
        assert!(report.contains("72/100"));
        assert!(report.contains("77/100"));
        assert!(report.contains("67/100"));
        assert!(report.contains("82/100"));
        assert!(report.contains("Conditional Hire"));
        for strength in &evaluation.strengths {
            assert!(report.contains(strength));
        }
        for improvement in &evaluation.improvements {
            assert!(report.contains(improvement));
        }
        assert!(report.contains(&evaluation.detailed_feedback));
        for response in &responses {
            assert!(report.contains(&response.question));
            assert!(report.contains(&response.answer));
        }
        assert!(report.contains("Time taken: 61.5 seconds"));
        assert!(report.contains("Questions completed: 2/6"));
    }

    #[test]
    fn file_name_embeds_candidate_and_timestamp() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 14, 5, 0).unwrap();
        assert_eq!(
            ReportService::report_file_name("Ada Lovelace", now),
            "Interview_Report_Ada_Lovelace_20260824_1405.txt"
        );
    }

    #[test]
    fn file_name_neutralizes_path_separators() {
        let now = Utc.with_ymd_and_hms(2026, 8, 24, 14, 5, 0).unwrap();
        assert_eq!(
            ReportService::report_file_name("../etc/Ada", now),
            "Interview_Report_.._etc_Ada_20260824_1405.txt"
        );
        assert_eq!(
            ReportService::report_file_name(r"Ada\Lovelace", now),
            "Interview_Report_Ada_Lovelace_20260824_1405.txt"
        );
    }
}
