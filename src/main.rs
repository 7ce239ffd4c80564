use ai_interviewer::config::{get_config, init_config};
use ai_interviewer::models::evaluation::Evaluation;
use ai_interviewer::services::gateway_service::ModelGateway;
use ai_interviewer::services::question_service;
use ai_interviewer::services::report_service::ReportService;
use ai_interviewer::session::{Phase, Session, QUESTION_TIME_LIMIT_SECS};
use ai_interviewer::AppState;
use std::io::{self, BufRead, Write};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    init_config()?;
    let config = get_config();

    println!("AI Interviewer - SDE Intern Role");
    println!("6 questions: 3 Technical, 2 Problem-Solving, 1 Behavioral.");
    println!(
        "Advisory limit of {} seconds per question.\n",
        QUESTION_TIME_LIMIT_SECS
    );

    if std::env::args().any(|arg| arg == "--test-connection") {
        return run_connection_test(&config.gemini_api_key).await;
    }

    let state = AppState::connect(config.gemini_api_key.clone()).await?;
    println!("Connected to model: {}\n", state.gateway.model());

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let name = prompt_line(&mut lines, "Full name: ")?;
    let background = prompt_line(
        &mut lines,
        "Programming background (optional, Enter to skip): ",
    )?;
    let use_samples = prompt_line(&mut lines, "Generate personalized questions? [Y/n] ")?
        .trim()
        .eq_ignore_ascii_case("n");

    let questions = if use_samples {
        println!("Using sample questions.");
        question_service::fallback_questions()
    } else {
        println!("Generating personalized questions...");
        state.question_service.generate_questions(&background).await
    };

    let mut session = Session::new();
    session.begin_interview(&name, questions)?;

    while session.phase() == Phase::Interview {
        let question = match session.current_question() {
            Some(q) => q.clone(),
            None => break,
        };
        let number = session.current_index() + 1;
        let total = session.questions().len();

        println!("\nQuestion {} of {} [{} / {}]", number, total, question.category, question.difficulty);
        println!("{}", question.text);
        println!("(type your answer; '/prev' to revisit the previous question)");

        let answer = prompt_line(&mut lines, "> ")?;

        if answer.trim() == "/prev" {
            if let Err(err) = session.go_previous("") {
                println!("{}", err);
            }
            continue;
        }

        let result = if session.time_expired() && answer.trim().is_empty() {
            let confirm = prompt_line(&mut lines, "Time expired. Submit without an answer? [y/N] ")?;
            if confirm.trim().eq_ignore_ascii_case("y") {
                session.submit_expired(&answer)
            } else {
                continue;
            }
        } else {
            session.submit_answer(&answer)
        };

        if let Err(err) = result {
            println!("{}", err);
        }
    }

    println!("\nAnalyzing your responses...");
    let evaluation = state.eval_service.evaluate(session.responses()).await;
    print_results(&evaluation);

    let now = chrono::Utc::now();
    let report = ReportService::generate_report(
        session.candidate_name(),
        &evaluation,
        session.responses(),
        now,
    );
    let file_name = ReportService::report_file_name(session.candidate_name(), now);
    let path = std::path::Path::new(&config.report_dir).join(file_name);
    std::fs::write(&path, report)?;
    info!(path = %path.display(), "Report written");
    println!("\nFull report saved to {}", path.display());

    Ok(())
}

async fn run_connection_test(api_key: &str) -> anyhow::Result<()> {
    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(60))
        .build()?;
    match ModelGateway::test_connection(&client, api_key).await {
        Ok(test) => {
            for line in &test.logs {
                println!("{}", line);
            }
            println!("\nAPI connection successful. Using model: {}", test.model);
            println!("Response: {}", test.reply);
            Ok(())
        }
        Err(err) => {
            println!("API test failed: {}", err);
            Err(err.into())
        }
    }
}

fn prompt_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> anyhow::Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?),
        None => anyhow::bail!("input closed"),
    }
}

fn print_results(evaluation: &Evaluation) {
    println!("\n================ INTERVIEW RESULTS ================");
    println!("Overall Score:        {}/100", evaluation.overall_score);
    println!("Technical Knowledge:  {}/100", evaluation.technical_score);
    println!("Communication:        {}/100", evaluation.communication_score);
    println!("Problem Solving:      {}/100", evaluation.problem_solving_score);
    println!("Behavioral Fit:       {}/100", evaluation.behavioral_score);
    println!("\nRecommendation: {}", evaluation.recommendation);

    println!("\nKey strengths:");
    for strength in &evaluation.strengths {
        println!("  - {}", strength);
    }
    println!("\nAreas for improvement:");
    for improvement in &evaluation.improvements {
        println!("  - {}", improvement);
    }
    println!("\nDetailed feedback:\n{}", evaluation.detailed_feedback);
}
