use serde::{Deserialize, Serialize};

/// An image stored on the external host, referenced by its host-side id and public URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetRef {
    pub public_id: String,
    pub url: String,
}
