//! Workflow services spanning multiple entities.

pub mod decision;

pub use decision::DecisionService;
