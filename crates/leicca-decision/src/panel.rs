//! Decision-tree panel and node types (§3 Decision-Tree Panel).

use serde::{Deserialize, Serialize};

/// `select` node's option: an id the caller answers with, a label for
/// display, and the node to advance to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectOption {
    pub id: String,
    pub label: String,
    pub next_node_id: String,
}

/// Terminal classification outcome carried by an `end` node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub classification: String,
    pub category: String,
    pub description: String,
    pub success: bool,
}

/// A tagged decision-tree node. Tag field is `nodeType`; variant names
/// lowercase to match the JSON bundle (`start`, `select`, `question`,
/// `screenshot`, `end`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "nodeType", rename_all = "camelCase")]
pub enum Node {
    Start {
        id: String,
        continue_target: String,
    },
    Select {
        id: String,
        select_options: Vec<SelectOption>,
    },
    Question {
        id: String,
        yes_target: String,
        no_target: String,
        text: String,
    },
    Screenshot {
        id: String,
        continue_target: String,
    },
    End {
        id: String,
        outcome: Outcome,
    },
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Start { id, .. }
            | Node::Select { id, .. }
            | Node::Question { id, .. }
            | Node::Screenshot { id, .. }
            | Node::End { id, .. } => id,
        }
    }

    pub fn node_type(&self) -> &'static str {
        match self {
            Node::Start { .. } => "start",
            Node::Select { .. } => "select",
            Node::Question { .. } => "question",
            Node::Screenshot { .. } => "screenshot",
            Node::End { .. } => "end",
        }
    }

    /// Human-readable text captured into the decision path: the question
    /// prompt, the terminal classification, or (for nodes without prose)
    /// the node's own id.
    pub fn node_text(&self) -> String {
        match self {
            Node::Question { text, .. } => text.clone(),
            Node::End { outcome, .. } => outcome.classification.clone(),
            _ => self.id().to_string(),
        }
    }

    /// All node ids this node declares as a successor, regardless of which
    /// `answer` selects them. Used by the load-time invariant validator.
    pub fn declared_successors(&self) -> Vec<&str> {
        match self {
            Node::Start { continue_target, .. } | Node::Screenshot { continue_target, .. } => {
                vec![continue_target.as_str()]
            }
            Node::Question { yes_target, no_target, .. } => vec![yes_target.as_str(), no_target.as_str()],
            Node::Select { select_options, .. } => {
                select_options.iter().map(|o| o.next_node_id.as_str()).collect()
            }
            Node::End { .. } => vec![],
        }
    }

    /// `nextNodeId(node, answer)` (§4.3): advance traversal given the
    /// caller's answer. `None` means the answer was unrecognized, or this is
    /// an `end` node (always terminal).
    pub fn next_node_id(&self, answer: &str) -> Option<String> {
        match self {
            Node::Question { yes_target, no_target, .. } => match answer {
                "yes" => Some(yes_target.clone()),
                "no" => Some(no_target.clone()),
                _ => None,
            },
            Node::Select { select_options, .. } => select_options
                .iter()
                .find(|opt| opt.id == answer)
                .map(|opt| opt.next_node_id.clone()),
            Node::Start { continue_target, .. } | Node::Screenshot { continue_target, .. } => {
                Some(continue_target.clone())
            }
            Node::End { .. } => None,
        }
    }
}

/// A jurisdiction-specific decision tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Panel {
    pub id: String,
    pub country: String,
    pub country_name: String,
    pub panel: String,
    pub jurisdiction_codes: Vec<String>,
    pub start_node_id: String,
    pub nodes: Vec<Node>,
}

impl Panel {
    pub fn node(&self, node_id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id() == node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_node_advances_on_yes_or_no() {
        let node = Node::Question {
            id: "Q1".to_string(),
            yes_target: "Q2".to_string(),
            no_target: "END_NO".to_string(),
            text: "Is the entity incorporated?".to_string(),
        };
        assert_eq!(node.next_node_id("yes").as_deref(), Some("Q2"));
        assert_eq!(node.next_node_id("no").as_deref(), Some("END_NO"));
        assert_eq!(node.next_node_id("maybe"), None);
    }

    #[test]
    fn select_node_advances_on_known_option_only() {
        let node = Node::Select {
            id: "S1".to_string(),
            select_options: vec![SelectOption {
                id: "company".to_string(),
                label: "Company".to_string(),
                next_node_id: "Q1".to_string(),
            }],
        };
        assert_eq!(node.next_node_id("company").as_deref(), Some("Q1"));
        assert_eq!(node.next_node_id("trust"), None);
    }

    #[test]
    fn start_and_screenshot_ignore_answer() {
        let start = Node::Start {
            id: "start".to_string(),
            continue_target: "S1".to_string(),
        };
        assert_eq!(start.next_node_id("anything").as_deref(), Some("S1"));
    }

    #[test]
    fn end_node_is_always_terminal() {
        let end = Node::End {
            id: "END1".to_string(),
            outcome: Outcome {
                classification: "Company".to_string(),
                category: "cat".to_string(),
                description: "desc".to_string(),
                success: true,
            },
        };
        assert_eq!(end.next_node_id("yes"), None);
    }

    #[test]
    fn node_json_roundtrips_with_tagged_node_type() {
        let json = r#"{"nodeType":"question","id":"Q1","yesTarget":"Q2","noTarget":"END","text":"?"}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.node_type(), "question");
        assert_eq!(node.id(), "Q1");
    }
}
