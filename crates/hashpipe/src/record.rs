use crate::digest;

/// An identifier paired with the digest of the value it was created from.
///
/// Records are immutable: once built they are only ever moved through the
/// queue and read back from the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Record {
    id: u64,
    digest: String,
}

impl Record {
    /// Builds a record by hashing `value` with [`digest`].
    pub fn new(id: u64, value: &str) -> Self {
        Self::from_parts(id, digest(value))
    }

    /// Builds a record from an already computed digest.
    pub const fn from_parts(id: u64, digest: String) -> Self {
        Self { id, digest }
    }

    pub const fn id(&self) -> u64 {
        self.id
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Consumes the record, returning its digest.
    pub fn into_digest(self) -> String {
        self.digest
    }
}
