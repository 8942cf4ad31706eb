//! Deterministic prompt construction for LLM analysis.

use crate::ticket::domain::TicketTask;

/// Metadata values longer than this are left out of the prompt.
pub const MAX_PROMPT_VALUE_LEN: usize = 500;

const PREAMBLE: &str = "You are an expert in analyzing information and providing insights.\n\
You're currently working with a ticket tracking system. Please analyze the following information:\n\n";

const RESPONSE_CONTRACT: &str = r#"
Please provide a comprehensive analysis in JSON format with the following fields:
{
  "keyThemes": ["theme1", "theme2", ...],
  "riskLevel": "high|medium|low",
  "priority": "high|medium|low",
  "suggestion": "Your main suggestion for handling this ticket",
  "requirements": ["requirement1", "requirement2", ...],
  "technicalAnalysis": "Detailed technical analysis of the issue",
  "businessImpact": "Impact on business operations",
  "nextSteps": "Recommended next steps for handling this ticket",
  "recommendedPriority": "high|medium|low",
  "recommendedComponents": ["component1", "component2", ...],
  "recommendedLabels": ["label1", "label2", ...]
}

Ensure your analysis is concise but comprehensive, covering both technical and business aspects.
"#;

/// Builds the analysis prompt for a task.
///
/// The output depends only on the task: metadata is iterated in key order.
#[must_use]
pub fn build_prompt(task: &TicketTask) -> String {
    let mut prompt = String::from(PREAMBLE);
    push_line(&mut prompt, "Item ID", task.ticket_id());
    push_line(&mut prompt, "Summary", task.summary());
    if !task.description().trim().is_empty() {
        push_line(&mut prompt, "Description", task.description());
    }

    prompt.push_str("\nAdditional Information:\n");
    let labels = task.labels().join(", ");
    let known = [
        ("Status", task.status()),
        ("Priority", task.priority()),
        ("Reporter", task.reporter()),
        ("Assignee", task.assignee()),
        ("Labels", labels.as_str()),
    ];
    for (name, value) in known {
        if !value.trim().is_empty() {
            push_line(&mut prompt, name, value);
        }
    }

    for (key, value) in task.metadata() {
        if !is_prompt_worthy(key, value) {
            continue;
        }
        match key.strip_prefix("change_") {
            Some(field) => push_line(&mut prompt, &format!("Changed {}", capitalize(field)), value),
            None => push_line(&mut prompt, &capitalize(key), value),
        }
    }

    prompt.push_str(RESPONSE_CONTRACT);
    prompt
}

fn is_prompt_worthy(key: &str, value: &str) -> bool {
    !key.to_ascii_lowercase().contains("description")
        && !key.starts_with("raw_")
        && value.chars().count() <= MAX_PROMPT_VALUE_LEN
}

fn push_line(prompt: &mut String, name: &str, value: &str) {
    prompt.push_str(name);
    prompt.push_str(": ");
    prompt.push_str(value);
    prompt.push('\n');
}

/// Upper-cases the first character.
pub(crate) fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}
