use std::fmt;

use serde::Serialize;

use crate::token::LayerKind;

// Recoverable problems found in the input. None of them stops a paragraph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "kind")]
pub enum Anomaly {
    DuplicateTokenId {
        layer: LayerKind,
        id: String,
    },
    // token has neither a higher link nor a deletion
    MissingLink {
        layer: LayerKind,
        id: String,
    },
    LinkAndDeletion {
        layer: LayerKind,
        id: String,
    },
    MissingMorph {
        layer: LayerKind,
        id: String,
    },
    MultipleEdges {
        layer: LayerKind,
        id: String,
        count: usize,
    },
    UnexpectedParagraphEdge {
        layer: LayerKind,
        paragraph_id: String,
    },
    TokenOutsideSentence {
        id: String,
    },
    DanglingLink {
        layer: LayerKind,
        id: String,
        target: String,
    },
    UnresolvedSentences {
        layer: LayerKind,
    },
    UnhandledToken {
        id: String,
    },
    SkippedCorrection {
        id: String,
    },
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::DuplicateTokenId { layer, id } => {
                write!(f, "duplicate token id {} in layer {}", id, layer)
            }
            Anomaly::MissingLink { layer, id } => {
                write!(f, "token {} in layer {} has no higher link nor deletion", id, layer)
            }
            Anomaly::LinkAndDeletion { layer, id } => write!(
                f,
                "token {} in layer {} is both linked and deleted, using the deletion",
                id, layer
            ),
            Anomaly::MissingMorph { layer, id } => {
                write!(f, "skipping token {} in layer {} with no lex tag", id, layer)
            }
            Anomaly::MultipleEdges { layer, id, count } => write!(
                f,
                "token {} in layer {} contains {} edges, combining their errors",
                id, layer, count
            ),
            Anomaly::UnexpectedParagraphEdge {
                layer,
                paragraph_id,
            } => write!(
                f,
                "unexpected non-deletion edge directly under paragraph {} in layer {}",
                paragraph_id, layer
            ),
            Anomaly::TokenOutsideSentence { id } => {
                write!(f, "skipping token {} outside of any sentence", id)
            }
            Anomaly::DanglingLink { layer, id, target } => write!(
                f,
                "token {} in layer {} links to unknown token {}",
                id, layer, target
            ),
            Anomaly::UnresolvedSentences { layer } => {
                write!(f, "no sentence id could be resolved in layer {}", layer)
            }
            Anomaly::UnhandledToken { id } => write!(f, "unhandled case for token {}", id),
            Anomaly::SkippedCorrection { id } => {
                write!(f, "skipping correction of token {} deleted in layer b", id)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    anomalies: Vec<Anomaly>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, anomaly: Anomaly) {
        tracing::warn!("{}", anomaly);
        self.anomalies.push(anomaly);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.anomalies.extend(other.anomalies);
    }

    pub fn anomalies(&self) -> &[Anomaly] {
        &self.anomalies
    }

    pub fn len(&self) -> usize {
        self.anomalies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Anomaly) -> bool,
    {
        self.anomalies.iter().filter(|a| predicate(a)).count()
    }
}
