//! Comment rendering services.

mod synthesizer;
mod templates;

pub use synthesizer::{CATEGORIES, CommentSynthesizer, OTHER_SECTION_TITLE};
