//! Thread-safe in-memory ticket store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::ticket::{
    domain::{CommentRef, Ticket},
    ports::{TicketStore, TicketStoreError, TicketStoreResult},
};

/// A comment recorded by [`InMemoryTicketStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedComment {
    /// Ticket the comment was posted on.
    pub ticket_id: String,
    /// Comment body.
    pub body: String,
    /// Reference returned to the caller.
    pub reference: CommentRef,
}

/// In-memory ticket store keyed by ticket key.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTicketStore {
    state: Arc<RwLock<InMemoryTicketState>>,
}

#[derive(Debug, Default)]
struct InMemoryTicketState {
    tickets: HashMap<String, Ticket>,
    comments: Vec<PostedComment>,
}

impl InMemoryTicketStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with tickets.
    #[must_use]
    pub fn with_tickets(tickets: impl IntoIterator<Item = Ticket>) -> Self {
        let state = InMemoryTicketState {
            tickets: tickets
                .into_iter()
                .map(|ticket| (ticket.key.clone(), ticket))
                .collect(),
            comments: Vec::new(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Inserts or replaces a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`TicketStoreError::Unavailable`] when the lock is poisoned.
    pub fn insert(&self, ticket: Ticket) -> TicketStoreResult<()> {
        let mut state = self.state.write().map_err(|err| {
            TicketStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state.tickets.insert(ticket.key.clone(), ticket);
        Ok(())
    }

    /// Returns every comment posted so far, in posting order.
    ///
    /// # Errors
    ///
    /// Returns [`TicketStoreError::Unavailable`] when the lock is poisoned.
    pub fn comments(&self) -> TicketStoreResult<Vec<PostedComment>> {
        let state = self.state.read().map_err(|err| {
            TicketStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.comments.clone())
    }
}

#[async_trait]
impl TicketStore for InMemoryTicketStore {
    async fn get_ticket(&self, ticket_id: &str) -> TicketStoreResult<Ticket> {
        let state = self.state.read().map_err(|err| {
            TicketStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        state
            .tickets
            .get(ticket_id)
            .cloned()
            .ok_or_else(|| TicketStoreError::NotFound(ticket_id.to_owned()))
    }

    async fn post_comment(&self, ticket_id: &str, body: &str) -> TicketStoreResult<CommentRef> {
        let mut state = self.state.write().map_err(|err| {
            TicketStoreError::unavailable(std::io::Error::other(err.to_string()))
        })?;
        if !state.tickets.contains_key(ticket_id) {
            return Err(TicketStoreError::NotFound(ticket_id.to_owned()));
        }
        let id = (state.comments.len() + 1).to_string();
        let reference = CommentRef {
            url: format!("memory://tickets/{ticket_id}?focusedCommentId={id}"),
            id,
        };
        state.comments.push(PostedComment {
            ticket_id: ticket_id.to_owned(),
            body: body.to_owned(),
            reference: reference.clone(),
        });
        Ok(reference)
    }
}
