//! The business Q&A assistant — local pattern matching over stored data.
//!
//! No language model anywhere: a fixed, ordered list of Hebrew keyword
//! rules maps a question to one database aggregation and renders the
//! result as a Hebrew sentence. Deterministic by construction.

mod engine;
mod extract;
mod lexicon;
mod messages;

pub use engine::{answer, RULES};
pub use messages::{example_questions, format_shekels, MessageTemplates};
