//! Entity contract shared by every stored record type.

/// A domain record keyed by a unique string id.
///
/// Identity is id-based: two values with the same id refer to the same
/// record even when other fields differ. Ids are set at construction and
/// never mutated afterwards.
pub trait Entity: Clone + Send + Sync + 'static {
    /// The unique identifier of this record. May be empty on
    /// not-yet-validated input; `create` rejects that case.
    fn id(&self) -> &str;
}
