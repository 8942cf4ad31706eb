//! Then steps for ticket analysis BDD scenarios.

use super::world::TicketAnalysisWorld;
use eyre::WrapErr;
use rstest_bdd_macros::then;
use ticket_lens::{
    analysis::domain::{AnalysisResult, Level},
    pipeline::domain::TaskStatus,
};

fn analysis(world: &TicketAnalysisWorld) -> Result<&AnalysisResult, eyre::Report> {
    match &world.outcome()?.result {
        Ok(info) => Ok(&info.analysis_result),
        Err(err) => Err(eyre::eyre!("run failed: {err}")),
    }
}

#[then("the run completes")]
fn run_completes(world: &TicketAnalysisWorld) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    if outcome.run.status() != TaskStatus::Completed {
        return Err(eyre::eyre!(
            "expected completed run, found {} ({:?})",
            outcome.run.status(),
            outcome.result
        ));
    }
    let states = world
        .sink
        .states(outcome.run.id())
        .wrap_err("read reported states")?;
    if states.last() != Some(&TaskStatus::Completed) {
        return Err(eyre::eyre!("sink did not see completion: {states:?}"));
    }
    Ok(())
}

#[then(r#"the risk level is "{level}""#)]
fn risk_level_is(world: &TicketAnalysisWorld, level: String) -> Result<(), eyre::Report> {
    let actual = analysis(world)?.risk_level;
    if actual != Level::normalize(&level) {
        return Err(eyre::eyre!("expected risk level {level}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the priority is "{level}""#)]
fn priority_is(world: &TicketAnalysisWorld, level: String) -> Result<(), eyre::Report> {
    let actual = analysis(world)?.priority;
    if actual != Level::normalize(&level) {
        return Err(eyre::eyre!("expected priority {level}, found {actual}"));
    }
    Ok(())
}

#[then(r#"the key themes are "{themes}""#)]
fn key_themes_are(world: &TicketAnalysisWorld, themes: String) -> Result<(), eyre::Report> {
    let expected: Vec<&str> = themes.split(',').map(str::trim).collect();
    let actual = &analysis(world)?.key_themes;
    if *actual != expected {
        return Err(eyre::eyre!("expected themes {expected:?}, found {actual:?}"));
    }
    Ok(())
}

#[then("the analysis is marked as LLM generated")]
fn marked_llm_generated(world: &TicketAnalysisWorld) -> Result<(), eyre::Report> {
    if !analysis(world)?.llm_used {
        return Err(eyre::eyre!("expected an LLM-generated analysis"));
    }
    Ok(())
}

#[then("the analysis is marked as heuristic")]
fn marked_heuristic(world: &TicketAnalysisWorld) -> Result<(), eyre::Report> {
    if analysis(world)?.llm_used {
        return Err(eyre::eyre!("expected a heuristic analysis"));
    }
    Ok(())
}

#[then(r#"the posted comment contains "{text}""#)]
fn comment_contains(world: &TicketAnalysisWorld, text: String) -> Result<(), eyre::Report> {
    let comments = world.store.comments().wrap_err("read posted comments")?;
    let [comment] = comments.as_slice() else {
        return Err(eyre::eyre!("expected one comment, found {}", comments.len()));
    };
    if !comment.body.contains(&text) {
        return Err(eyre::eyre!("comment lacks {text:?}:\n{}", comment.body));
    }
    Ok(())
}

#[then(r#"the run fails at stage "{stage}""#)]
fn run_fails_at(world: &TicketAnalysisWorld, stage: String) -> Result<(), eyre::Report> {
    let outcome = world.outcome()?;
    let Err(err) = &outcome.result else {
        return Err(eyre::eyre!("expected a failed run"));
    };
    if outcome.run.status() != TaskStatus::Failed || err.stage().as_str() != stage {
        return Err(eyre::eyre!(
            "expected failure at {stage}, found {} at {}",
            outcome.run.status(),
            err.stage()
        ));
    }
    Ok(())
}

#[then("no comment is posted")]
fn no_comment(world: &TicketAnalysisWorld) -> Result<(), eyre::Report> {
    let comments = world.store.comments().wrap_err("read posted comments")?;
    if !comments.is_empty() {
        return Err(eyre::eyre!("expected no comments, found {}", comments.len()));
    }
    Ok(())
}
