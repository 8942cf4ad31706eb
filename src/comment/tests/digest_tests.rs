//! Tests for the analysis digest.

use crate::analysis::domain::{AnalysisResult, Level};
use crate::analysis::services::HeuristicAnalyzer;
use crate::comment::services::CommentSynthesizer;
use crate::ticket::domain::TicketTask;
use rstest::{fixture, rstest};

#[fixture]
fn task() -> TicketTask {
    TicketTask::new("PROJ-1", "Quarterly report export").expect("valid task")
}

#[rstest]
fn heuristic_digest_mentions_ticket_and_method(task: TicketTask) {
    let analysis = HeuristicAnalyzer.analyze(&task);

    let digest = CommentSynthesizer
        .digest(&task, &analysis)
        .expect("digest renders");

    assert!(digest.starts_with("*Information Gathering Summary*\n\n"));
    assert!(digest.contains("I've analyzed ticket PROJ-1: \"Quarterly report export\""));
    assert!(digest.contains("*Key Themes:*\n- Task\n"));
    assert!(digest.contains("*Risk Assessment:* Medium\n*Priority:* Medium\n"));
    assert!(digest.contains("*Requirements:*\n- Gather more detailed information"));
    assert!(!digest.contains("*Recommended Priority:*"));
    assert!(digest.ends_with("Enable LLM for more detailed analysis._"));
}

#[rstest]
fn differing_recommendation_is_shown(task: TicketTask) {
    let analysis = AnalysisResult {
        key_themes: vec!["problem".to_owned()],
        risk_level: Level::High,
        priority: Level::Low,
        suggestion: "Escalate".to_owned(),
        requirements: Vec::new(),
        technical_analysis: String::new(),
        business_impact: String::new(),
        next_steps: String::new(),
        recommended_priority: Some(Level::High),
        recommended_components: vec!["reports".to_owned()],
        recommended_labels: Vec::new(),
        confidence: 0.9,
        llm_used: true,
    };

    let digest = CommentSynthesizer
        .digest(&task, &analysis)
        .expect("digest renders");

    assert!(digest.contains("*Recommended Priority:* High"));
    assert!(digest.contains("*Recommended Components:*\n- reports\n"));
    assert!(!digest.contains("*Requirements:*"));
    assert!(!digest.contains("*Recommended Labels:*"));
    assert!(digest.ends_with("_This analysis was generated with AI assistance._"));
}
