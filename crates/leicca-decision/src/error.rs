//! Typed failure kinds for panel loading and traversal (§4.3, §7 error catalogue).

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    #[error("no panel found for jurisdiction or id: {0}")]
    PanelNotFound(String),
    #[error("node not found: {0}")]
    NodeNotFound(String),
    #[error("invalid terminal node {0}: not an end node, or end node missing an outcome")]
    InvalidTerminal(String),
}
