//! Upload batching types and outcome.

use crate::error::{Error, Result};
use crate::material::{MaterialItem, MaterialKind};
use serde::{Deserialize, Serialize};

/// Body of one `PATCH .../materials` request: the batch's items grouped by
/// kind, each entry in `"{package}@{version}"` form. Input order is preserved
/// within each group.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchPayload {
    pub blocks: Vec<String>,
    pub scaffolds: Vec<String>,
    pub components: Vec<String>,
}

impl BatchPayload {
    /// Group one batch of items into the wire shape.
    pub fn from_items(items: &[MaterialItem]) -> Self {
        let specs = |kind: MaterialKind| {
            items
                .iter()
                .filter(|item| item.kind == kind)
                .map(MaterialItem::spec)
                .collect()
        };
        Self {
            blocks: specs(MaterialKind::Block),
            scaffolds: specs(MaterialKind::Scaffold),
            components: specs(MaterialKind::Component),
        }
    }

    /// Total entries across all three groups.
    pub fn len(&self) -> usize {
        self.blocks.len() + self.scaffolds.len() + self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One rejected item from the registry's failure report. The wire field for
/// the package name is `npm`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFailure {
    #[serde(rename = "npm")]
    pub package: String,
    pub reason: String,
}

/// Final result of a sync invocation.
///
/// The pipeline never returns a mixed state: on the Ok path this is always
/// `{succeeded: true, failures: []}`, and failures travel inside
/// [`Error::BatchUploadFailed`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOutcome {
    pub succeeded: bool,
    pub failures: Vec<ItemFailure>,
}

impl UploadOutcome {
    /// The outcome of a fully successful upload.
    pub fn success() -> Self {
        Self {
            succeeded: true,
            failures: Vec::new(),
        }
    }
}

/// Partition items into consecutive batches of `batch_size`; the final batch
/// may be shorter. Rejects a batch size of 0.
pub fn plan_batches(items: &[MaterialItem], batch_size: usize) -> Result<Vec<&[MaterialItem]>> {
    if batch_size == 0 {
        return Err(Error::InvalidBatchSize { size: batch_size });
    }
    Ok(items.chunks(batch_size).collect())
}
