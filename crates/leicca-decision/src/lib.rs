//! # LEICCA Decision
//!
//! Basel III counterparty-credit-risk classification: jurisdiction-specific
//! decision-tree panels (`panel`) and the traversal engine that walks them
//! (`engine`).

pub mod engine;
pub mod error;
pub mod panel;

pub use engine::DecisionEngine;
pub use error::DecisionError;
pub use panel::{Node, Outcome, Panel, SelectOption};
