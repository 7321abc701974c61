//! Daily plan pipeline: context, prompt, untrusted draft, validation.

pub mod context;
pub mod draft;
pub mod prompt;
pub mod validate;

pub use context::{PlanningContext, TopicSets, effective_budget};
pub use draft::{DraftItem, PlanDraft, SuggestionDraft};
pub use validate::validate;
