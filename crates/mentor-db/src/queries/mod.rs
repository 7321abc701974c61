//! Query functions, one module per table.

pub mod plans;
pub mod profile;
pub mod subjects;
pub mod topics;
