//! Encoding and tolerant decoding of ticket tasks across the process boundary.
//!
//! Producer and consumer evolve independently, so decoding does not assume
//! one canonical envelope. See [`TaskDecoder`] for the strategy order.

mod decoder;
mod encoder;
mod error;
mod strategy;

pub use decoder::TaskDecoder;
pub use encoder::{CONTENT_TYPE_KEY, JSON_CONTENT_TYPE, TaskEncoder, WireShape, json_part};
pub use error::{DecodeError, EncodeError};
pub use strategy::{
    AliasedStrategy, DESCRIPTION_ALIASES, DecodeStrategy, ID_ALIASES, LegacyNestedStrategy,
    SUMMARY_ALIASES, StringEncodedStrategy, StructuredStrategy,
};
