//! Node identifiers shared between the gesture core and the node registry

use slotmap::{new_key_type, Key};

new_key_type! {
    /// Identifies a node in the host's node registry.
    ///
    /// Recognizers and event targets refer to the node they are attached to
    /// by id only; resolving the id is always a lookup into the registry.
    pub struct NodeId;
}

impl NodeId {
    /// Convert to a raw u64 representation
    pub fn to_raw(self) -> u64 {
        self.data().as_ffi()
    }

    /// Create from a raw u64 representation produced by [`NodeId::to_raw`]
    pub fn from_raw(raw: u64) -> Self {
        Self::from(slotmap::KeyData::from_ffi(raw))
    }
}
