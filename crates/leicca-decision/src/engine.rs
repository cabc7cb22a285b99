//! DecisionEngine (§4.3): loads panels, finds panels by jurisdiction, and
//! drives node traversal.

use std::collections::HashMap;

use leicca_core::types::{ClassificationResult, DecisionPathEntry};

use crate::error::DecisionError;
use crate::panel::{Node, Panel};

/// Holds every loaded panel, indexed by id and by (upper-cased) jurisdiction
/// code.
pub struct DecisionEngine {
    panels_by_id: HashMap<String, Panel>,
    panels_by_jurisdiction: HashMap<String, String>,
}

impl DecisionEngine {
    /// Load panels from a static bundle, running the optional invariant
    /// validator over each one (every non-`end` node's declared successors
    /// must exist in the same panel).
    pub fn load(panels: Vec<Panel>) -> Result<Self, DecisionError> {
        let mut panels_by_id = HashMap::new();
        let mut panels_by_jurisdiction = HashMap::new();

        for panel in panels {
            validate_panel(&panel)?;
            for code in &panel.jurisdiction_codes {
                panels_by_jurisdiction
                    .entry(code.to_uppercase())
                    .or_insert_with(|| panel.id.clone());
            }
            panels_by_id.insert(panel.id.clone(), panel);
        }

        Ok(Self {
            panels_by_id,
            panels_by_jurisdiction,
        })
    }

    /// Case-insensitive match against any panel's `jurisdictionCodes`;
    /// returns the first match, `None` if none.
    pub fn find_panel_by_jurisdiction(&self, code: &str) -> Option<&Panel> {
        self.panels_by_jurisdiction
            .get(&code.to_uppercase())
            .and_then(|id| self.panels_by_id.get(id))
    }

    pub fn panel(&self, id: &str) -> Option<&Panel> {
        self.panels_by_id.get(id)
    }

    /// The node whose id equals `panel.startNodeId`; must exist and be a
    /// `start` node.
    pub fn get_start_node<'a>(&self, panel: &'a Panel) -> Result<&'a Node, DecisionError> {
        let node = panel
            .node(&panel.start_node_id)
            .ok_or_else(|| DecisionError::NodeNotFound(panel.start_node_id.clone()))?;
        if node.node_type() != "start" {
            return Err(DecisionError::InvalidTerminal(node.id().to_string()));
        }
        Ok(node)
    }

    pub fn get_node<'a>(&self, panel: &'a Panel, node_id: &str) -> Result<&'a Node, DecisionError> {
        panel
            .node(node_id)
            .ok_or_else(|| DecisionError::NodeNotFound(node_id.to_string()))
    }

    pub fn next_node_id(&self, node: &Node, answer: &str) -> Option<String> {
        node.next_node_id(answer)
    }

    /// Precondition: `end_node` must be an `End` node. A violation is a
    /// programming error — callers drive traversal themselves and should
    /// never reach this with anything else.
    pub fn build_classification_result(
        &self,
        panel: &Panel,
        end_node: &Node,
        path: Vec<DecisionPathEntry>,
    ) -> Result<ClassificationResult, DecisionError> {
        let Node::End { outcome, .. } = end_node else {
            return Err(DecisionError::InvalidTerminal(end_node.id().to_string()));
        };

        Ok(ClassificationResult {
            panel_id: panel.id.clone(),
            classification: outcome.classification.clone(),
            category: outcome.category.clone(),
            description: outcome.description.clone(),
            success: outcome.success,
            decision_path: path,
        })
    }
}

/// Every non-`end` reachable node's declared successors must exist in the
/// same panel; an `end` node never declares successors by construction.
fn validate_panel(panel: &Panel) -> Result<(), DecisionError> {
    for node in &panel.nodes {
        for successor in node.declared_successors() {
            if panel.node(successor).is_none() {
                return Err(DecisionError::NodeNotFound(successor.to_string()));
            }
        }
    }
    Ok(())
}
