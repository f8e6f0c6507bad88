//! Document flow: project -> emitter -> document type -> indice.
//!
//! Shaped for a Sankey diagram: numbered nodes and weighted links between them.

use core_types::{Dimension, EnrichedSubmission};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlowStage {
    Project,
    Emitter,
    DocumentType,
    Indice,
}

impl FlowStage {
    pub const ALL: [FlowStage; 4] = [
        FlowStage::Project,
        FlowStage::Emitter,
        FlowStage::DocumentType,
        FlowStage::Indice,
    ];

    fn dimension(self) -> Dimension {
        match self {
            FlowStage::Project => Dimension::Project,
            FlowStage::Emitter => Dimension::Emitter,
            FlowStage::DocumentType => Dimension::DocumentType,
            FlowStage::Indice => Dimension::Indice,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: usize,
    pub stage: FlowStage,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowLink {
    pub source: usize,
    pub target: usize,
    /// Number of submissions following this link.
    pub value: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentFlow {
    pub nodes: Vec<FlowNode>,
    pub links: Vec<FlowLink>,
}

impl DocumentFlow {
    pub fn node(&self, id: usize) -> Option<&FlowNode> {
        self.nodes.get(id)
    }
}

/// Builds the flow graph of a project.
///
/// Indice nodes carry the indice's share of all rows, e.g. `"B (25.00%)"`. A
/// missing indice is its own `""` indice, so every row reaches the last stage.
/// A node is identified by its stage and label, so the same text in two
/// columns gives two nodes. Links are aggregated and kept in order of first
/// appearance, hop by hop.
pub fn document_flow(rows: &[EnrichedSubmission]) -> DocumentFlow {
    let indice_labels = indice_share_labels(rows);
    let label_of = |stage: FlowStage, row: &EnrichedSubmission| -> Option<String> {
        match stage {
            FlowStage::Indice => indice_labels.get(indice_of(row)).cloned(),
            _ => stage.dimension().value(&row.submission).map(str::to_string),
        }
    };

    let mut flow = DocumentFlow::default();
    let mut node_ids: HashMap<(FlowStage, String), usize> = HashMap::new();
    // Per-row node ids, indexed by stage.
    let mut row_nodes: Vec<[Option<usize>; 4]> = vec![[None; 4]; rows.len()];

    for (stage_index, stage) in FlowStage::ALL.into_iter().enumerate() {
        for (row_index, row) in rows.iter().enumerate() {
            let Some(label) = label_of(stage, row) else {
                continue;
            };
            let next_id = node_ids.len();
            let id = *node_ids.entry((stage, label.clone())).or_insert_with(|| {
                flow.nodes.push(FlowNode {
                    id: next_id,
                    stage,
                    label,
                });
                next_id
            });
            row_nodes[row_index][stage_index] = Some(id);
        }
    }

    let mut link_positions: HashMap<(usize, usize), usize> = HashMap::new();
    for hop in 0..FlowStage::ALL.len() - 1 {
        for nodes in &row_nodes {
            let (Some(source), Some(target)) = (nodes[hop], nodes[hop + 1]) else {
                continue;
            };
            match link_positions.get(&(source, target)) {
                Some(&position) => flow.links[position].value += 1,
                None => {
                    link_positions.insert((source, target), flow.links.len());
                    flow.links.push(FlowLink {
                        source,
                        target,
                        value: 1,
                    });
                }
            }
        }
    }

    flow
}

fn indice_of(row: &EnrichedSubmission) -> &str {
    row.submission.indice.as_deref().unwrap_or("")
}

/// Maps each indice to `"{indice} ({share:.2}%)"`.
fn indice_share_labels(rows: &[EnrichedSubmission]) -> HashMap<&str, String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for indice in rows.iter().map(indice_of) {
        *counts.entry(indice).or_insert(0) += 1;
    }
    let total: usize = counts.values().sum();

    counts
        .into_iter()
        .map(|(indice, count)| {
            let share = count as f64 / total as f64 * 100.0;
            (indice, format!("{indice} ({share:.2}%)"))
        })
        .collect()
}
