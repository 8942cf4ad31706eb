//! Given steps for ticket analysis BDD scenarios.

use super::world::TicketAnalysisWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use ticket_lens::{analysis::adapters::memory::ScriptedLlmClient, ticket::domain::Ticket};

#[given(r#"the ticket store holds "{key}" titled "{summary}""#)]
fn store_holds_ticket(
    world: &mut TicketAnalysisWorld,
    key: String,
    summary: String,
) -> Result<(), eyre::Report> {
    world
        .store
        .insert(Ticket::new(key, summary))
        .wrap_err("seed ticket store")?;
    Ok(())
}

#[given("no LLM is configured")]
fn no_llm(world: &mut TicketAnalysisWorld) {
    world.llm = None;
}

#[given("the LLM replies with '{response}'")]
fn llm_replies(world: &mut TicketAnalysisWorld, response: String) {
    world.llm = Some(ScriptedLlmClient::replying(response));
}
