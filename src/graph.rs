//! This module turns a transition table into a node/edge view that a renderer can draw.
//!
//! Every `(state, symbol)` rule becomes a label `read/write,D` on the edge between its state and
//! its next state. Rules that connect the same pair of states share one edge. Nodes and edges
//! come out sorted, so the same program always produces the same graph.

use crate::types::{Program, TakenTransition, Transition, TuringMachineError};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A state in the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateNode {
    pub id: String,
    pub initial: bool,
    pub accepting: bool,
}

/// All rules leading from `source` to `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateEdge {
    /// `"{source}-{target}"`, unique within a graph.
    pub id: String,
    pub source: String,
    pub target: String,
    /// One `read/write,D` label per rule, ordered by the symbol read.
    pub labels: Vec<String>,
}

impl StateEdge {
    /// Returns all labels joined into one multi-line label.
    pub fn label(&self) -> String {
        self.labels.join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateGraph {
    pub nodes: Vec<StateNode>,
    pub edges: Vec<StateEdge>,
}

impl StateGraph {
    /// Returns the node with the given state id.
    pub fn node(&self, id: &str) -> Option<&StateNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Locates the edge the machine used for `taken`, so it can be highlighted.
    pub fn edge_for(&self, taken: &TakenTransition) -> Option<&StateEdge> {
        let label = transition_label(taken.read, &taken.transition);
        self.edges.iter().find(|edge| {
            edge.source == taken.from
                && edge.target == taken.transition.next_state
                && edge.labels.contains(&label)
        })
    }

    /// Serializes the graph as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, TuringMachineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Formats one rule as `read/write,D`.
pub fn transition_label(read: char, transition: &Transition) -> String {
    format!(
        "{}/{},{}",
        read,
        transition.write,
        transition.direction.symbol()
    )
}

/// Builds the graph of `program`.
///
/// Nodes cover every state that has rules, every state some rule moves into, and the initial
/// state, even when it has no rules.
pub fn graph(program: &Program) -> StateGraph {
    let mut states: BTreeSet<&str> = BTreeSet::new();
    states.insert(program.initial_state.as_str());

    let mut edges: BTreeMap<(&str, &str), BTreeMap<char, String>> = BTreeMap::new();
    for (from, transitions) in program.rules.iter() {
        states.insert(from.as_str());
        for (&read, transition) in transitions {
            states.insert(transition.next_state.as_str());
            edges
                .entry((from.as_str(), transition.next_state.as_str()))
                .or_default()
                .insert(read, transition_label(read, transition));
        }
    }

    let nodes = states
        .into_iter()
        .map(|id| StateNode {
            id: id.to_string(),
            initial: id == program.initial_state,
            accepting: program.is_accepting(id),
        })
        .collect();

    let edges = edges
        .into_iter()
        .map(|((source, target), labels)| StateEdge {
            id: format!("{}-{}", source, target),
            source: source.to_string(),
            target: target.to_string(),
            labels: labels.into_values().collect(),
        })
        .collect();

    StateGraph { nodes, edges }
}
