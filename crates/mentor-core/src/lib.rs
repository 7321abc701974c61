//! Daily study-plan generation.
//!
//! Planning context and validation live in [`plan`], the generative
//! service and its retry policy in [`drafting`], and [`orchestrator`] ties
//! them to a [`store::Store`].

pub mod drafting;
pub mod orchestrator;
pub mod plan;
pub mod store;
pub mod syllabus;
