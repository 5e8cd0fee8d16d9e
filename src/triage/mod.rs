//! Pure decision stages: they only see measurements and labels, never pixels.

pub mod comparison;
pub mod risk;
pub mod treatment;

pub use comparison::{PreviousRecord, compare};
pub use risk::aggregate;
pub use treatment::{plan, summary_message};
