//! Attribute resolution over an ancestor chain.
//!
//! A chain is ordered nearest-first: the node itself, then its parent, grandparent, etc.
//! Only truthy values count as present (see [Document::is_truthy]).

use std::fmt;
use std::str::FromStr;

use tracing::instrument;

use crate::types::{Document, Mapping};

/// How the candidate-key list and the ancestor chain nest during resolution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolutionOrder {
  /// Chain-major: the nearest node holding any truthy candidate wins; within a node,
  /// candidates are tried in declared order.
  #[default]
  NearestNode,
  /// Key-major: the first candidate found anywhere in the chain wins; each candidate
  /// scans the chain nearest-first.
  CandidateFirst,
}

impl fmt::Display for ResolutionOrder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ResolutionOrder::NearestNode => write!(f, "nearest-node"),
      ResolutionOrder::CandidateFirst => write!(f, "candidate-first"),
    }
  }
}

impl FromStr for ResolutionOrder {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "nearest-node" | "nearest_node" | "node" => Ok(ResolutionOrder::NearestNode),
      "candidate-first" | "candidate_first" | "candidate" => Ok(ResolutionOrder::CandidateFirst),
      other => Err(format!(
        "unknown resolution order '{}' (expected nearest-node or candidate-first)",
        other
      )),
    }
  }
}

/// Returns the value of `key` in `node` if it is present and truthy.
pub(crate) fn truthy_value<'a>(node: &'a Mapping, key: &str) -> Option<&'a Document> {
  node.get(key).filter(|v| v.is_truthy())
}

/// Resolves the first truthy value for `candidates` along `chain`.
#[instrument(level = "trace", skip(chain))]
pub fn resolve<'a>(
  chain: &[&'a Mapping],
  candidates: &[String],
  order: ResolutionOrder,
) -> Option<&'a Document> {
  match order {
    ResolutionOrder::NearestNode => chain.iter().copied().find_map(|node| {
      candidates
        .iter()
        .find_map(|key| truthy_value(node, key))
    }),
    ResolutionOrder::CandidateFirst => candidates.iter().find_map(|key| {
      chain
        .iter()
        .copied()
        .find_map(|node| truthy_value(node, key))
    }),
  }
}
