//! Classify command - walk a Basel III decision panel to classify a legal
//! entity by jurisdiction.
//!
//! Usage:
//! ```bash
//! leicca classify --panels panels.json --jurisdiction ENW
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;

use leicca_core::types::DecisionPathEntry;
use leicca_decision::{DecisionEngine, Node, Panel};

use crate::print_success;

/// Arguments for the classify command
#[derive(Args)]
pub struct ClassifyArgs {
    /// Path to a JSON array of decision panels
    #[arg(long, short = 'p', value_name = "FILE")]
    panels: PathBuf,

    /// Jurisdiction code to classify against (e.g. ENW, GB-ENG)
    #[arg(long, short = 'j')]
    jurisdiction: String,

    /// Answer every question non-interactively with this value (testing)
    #[arg(long)]
    answer: Option<Vec<String>>,
}

/// Run the classify command
pub async fn run(args: ClassifyArgs) -> Result<()> {
    println!("{}", "LEICCA Basel III Classification".bold().cyan());
    println!("{}", "═".repeat(40).cyan());
    println!();

    let content = std::fs::read_to_string(&args.panels)
        .with_context(|| format!("failed to read panel bundle: {}", args.panels.display()))?;
    let panels: Vec<Panel> = serde_json::from_str(&content).with_context(|| "panel bundle is not a valid JSON array")?;

    let engine = DecisionEngine::load(panels).with_context(|| "panel bundle failed invariant validation")?;
    let panel = engine
        .find_panel_by_jurisdiction(&args.jurisdiction)
        .with_context(|| format!("no panel covers jurisdiction {}", args.jurisdiction))?;

    println!("  {} {} ({})", "Panel:".dimmed(), panel.panel, panel.country_name);
    println!();

    let mut node = engine.get_start_node(panel)?;
    let mut path = Vec::new();
    let mut scripted = args.answer.unwrap_or_default().into_iter();

    let end = loop {
        let answer = match node {
            Node::Start { .. } | Node::Screenshot { .. } => "continue".to_string(),
            Node::Question { text, .. } => prompt_or_scripted(&mut scripted, text, &["yes", "no"])?,
            Node::Select { select_options, .. } => {
                let options: Vec<&str> = select_options.iter().map(|o| o.label.as_str()).collect();
                let ids: Vec<&str> = select_options.iter().map(|o| o.id.as_str()).collect();
                for (i, (label, id)) in options.iter().zip(ids.iter()).enumerate() {
                    println!("    {}. {} [{}]", i + 1, label, id.yellow());
                }
                prompt_or_scripted(&mut scripted, "choose an option id", &ids)?
            }
            Node::End { .. } => break node,
        };

        let node_text = node.node_text();
        let node_id = node.id().to_string();
        let next_id = engine
            .next_node_id(node, &answer)
            .with_context(|| format!("'{answer}' is not a recognized answer at node {node_id}"))?;

        path.push(DecisionPathEntry { node_id, node_text, answer });
        node = engine.get_node(panel, &next_id)?;
    };

    let result = engine.build_classification_result(panel, end, path)?;

    println!();
    println!("{}", "Classification:".bold());
    println!("  {} {}", "Category:".dimmed(), result.category);
    println!("  {} {}", "Classification:".dimmed(), result.classification);
    println!("  {} {}", "Description:".dimmed(), result.description);
    println!();

    if result.success {
        print_success("entity classified");
    } else {
        println!("{}", "✗ entity out of scope for this panel".red().bold());
    }

    println!();
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

/// Consume the next scripted answer if one was supplied via `--answer`,
/// otherwise prompt on stdin. `choices` is shown only as a hint.
fn prompt_or_scripted(scripted: &mut impl Iterator<Item = String>, prompt: &str, choices: &[&str]) -> Result<String> {
    if let Some(answer) = scripted.next() {
        return Ok(answer);
    }

    print!("  {} [{}]: ", prompt.bold(), choices.join("/").dimmed());
    std::io::stdout().flush().ok();

    let mut line = String::new();
    std::io::stdin().read_line(&mut line).with_context(|| "failed to read answer from stdin")?;
    let answer = line.trim().to_string();
    if answer.is_empty() {
        bail!("no answer provided for '{prompt}'");
    }
    Ok(answer)
}
