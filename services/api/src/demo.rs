use clap::Args;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;

use leadfunnel::config::FunnelConfig;
use leadfunnel::error::AppError;
use leadfunnel::funnel::{DeliveryOutcome, LeadSubmission, QuestionCatalog, ScoringRole};

use crate::infra::build_funnel_service;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Path to a JSON file mapping question ids to answers
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Contact name attached to the scored submission
    #[arg(long, default_value = "CLI User")]
    pub(crate) name: String,
    /// Contact email attached to the scored submission
    #[arg(long, default_value = "cli@example.com")]
    pub(crate) email: String,
    /// Practice location (optional unless required by configuration)
    #[arg(long, default_value = "")]
    pub(crate) location: String,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Answer every best-practice question no instead of yes
    #[arg(long)]
    pub(crate) all_no: bool,
    /// Print the rendered plain-text document in full
    #[arg(long)]
    pub(crate) show_document: bool,
}

pub(crate) async fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs {
        answers,
        name,
        email,
        location,
    } = args;

    let raw = std::fs::read_to_string(&answers)?;
    let parsed: BTreeMap<String, Value> = serde_json::from_str(&raw)?;

    let mut config = FunnelConfig::from_env()?;
    if location.trim().is_empty() {
        config.location_required = false;
    }

    let service = build_funnel_service(config);
    let receipt = service
        .submit(LeadSubmission {
            name,
            email,
            location,
            consent: true,
            answers: parsed,
        })
        .await
        .map_err(AppError::Funnel)?;

    println!("{}", receipt.report.title);
    println!("{}", receipt.report.score_line);
    println!("\nRecommendations:");
    for insight in &receipt.report.insights {
        println!("- {insight}");
    }
    println!("\n{}", receipt.report.next_step);

    Ok(())
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        all_no,
        show_document,
    } = args;

    println!("Readiness scorecard demo");

    let catalog = QuestionCatalog::standard();
    let mut answers: BTreeMap<String, Value> = catalog
        .best_practices()
        .map(|definition| {
            let reply = if all_no { "no" } else { "yes" };
            (definition.id.as_str().to_string(), Value::from(reply))
        })
        .collect();
    answers.insert("current_automation".to_string(), Value::from(3));
    answers.insert("desired_automation".to_string(), Value::from(9));
    answers.insert(
        "desired_outcome".to_string(),
        Value::from("Reduce no-shows"),
    );

    println!(
        "Submitting {} answers ({} scored best practices)",
        answers.len(),
        catalog.best_practice_count()
    );

    let mut config = FunnelConfig::from_env()?;
    if config.mail_sender.is_none() {
        config.mail_sender = Some("reports@demo.example".to_string());
    }
    let service = build_funnel_service(config);

    let receipt = service
        .submit(LeadSubmission {
            name: "Demo Practice".to_string(),
            email: "owner@demo.example".to_string(),
            location: "Springfield".to_string(),
            consent: true,
            answers,
        })
        .await
        .map_err(AppError::Funnel)?;

    println!("\n{}", receipt.report.score_line);
    println!("Record: {}", receipt.record_id);
    println!("Persisted: {}", receipt.persisted);
    match &receipt.delivery {
        DeliveryOutcome::Sent => println!("Delivery: emailed to owner@demo.example"),
        DeliveryOutcome::NotConfigured => {
            println!("Delivery: mail not configured, report kept for download")
        }
        DeliveryOutcome::Failed { reason } => println!("Delivery failed: {reason}"),
    }

    println!("\nTop recommendations:");
    for insight in &receipt.report.top_insights {
        println!("- {insight}");
    }

    println!("\nAnswer breakdown:");
    for answer in &receipt.report.answers {
        let role = catalog
            .questions()
            .iter()
            .find(|definition| definition.id.as_str() == answer.question_id)
            .map(|definition| definition.role);
        let marker = match role {
            Some(ScoringRole::BestPractice) => "scored",
            Some(_) => "context",
            None => "unknown",
        };
        println!("- [{marker}] {}: {}", answer.label, answer.answer);
    }

    if show_document {
        let rendered = service
            .document(&receipt.record_id)
            .map_err(AppError::Funnel)?;
        match String::from_utf8(rendered.bytes) {
            Ok(text) => println!("\nRendered document ({}):\n{text}", rendered.filename),
            Err(_) => println!("\nRendered document is not valid UTF-8"),
        }
    }

    Ok(())
}
