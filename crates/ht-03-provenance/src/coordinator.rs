//! Step coordination: which stage comes next, and the scannable token the
//! next-stage actor uses to address their submission.
//!
//! Token generation is pure: no ledger calls, no batch mutation. Rendering
//! the token into an image is the artifact renderer's job, not ours.

use serde::{Deserialize, Serialize};

use shared_types::{Batch, Stage};

/// Label attached to a token, naming the step it addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TokenKind {
    /// Token for a collection submission.
    Collection,
    /// Token for a quality attestation.
    Quality,
    /// Token for a processing custody transfer.
    Processing,
    /// Token on the finished product.
    FinalProduct,
}

impl TokenKind {
    /// Kebab-case label used in filenames and responses.
    pub fn label(&self) -> &'static str {
        match self {
            TokenKind::Collection => "collection",
            TokenKind::Quality => "quality",
            TokenKind::Processing => "processing",
            TokenKind::FinalProduct => "final-product",
        }
    }
}

impl From<Stage> for TokenKind {
    fn from(stage: Stage) -> Self {
        match stage {
            Stage::Collection => TokenKind::Collection,
            Stage::Quality => TokenKind::Quality,
            Stage::Processing => TokenKind::Processing,
            Stage::Manufacturing => TokenKind::FinalProduct,
        }
    }
}

/// Machine-scannable token accompanying the next stage's submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepToken {
    /// Batch the token addresses.
    pub batch_id: String,
    /// Scannable content (the batch identifier).
    pub content: String,
    /// Which step the token is for.
    pub kind: TokenKind,
}

/// First stage not yet complete, `None` when the batch is terminal.
pub fn next_stage(batch: &Batch) -> Option<Stage> {
    Stage::ALL.into_iter().find(|stage| !batch.has_stage(*stage))
}

/// Deterministic token for the given batch and step.
pub fn token_for(batch_id: &str, stage: Stage) -> StepToken {
    StepToken {
        batch_id: batch_id.to_string(),
        content: batch_id.to_string(),
        kind: TokenKind::from(stage),
    }
}
