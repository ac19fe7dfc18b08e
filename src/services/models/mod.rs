//! Static Kie.ai model catalog.

use crate::types::{ImageModel, ModelInfo, ModelKind};

/// Lists catalog entries, optionally restricted to one kind.
pub fn list_models(kind: Option<ModelKind>) -> Vec<ModelInfo> {
    ImageModel::ALL
        .into_iter()
        .map(ImageModel::info)
        .filter(|info| kind.map_or(true, |k| info.kind == k))
        .collect()
}
