use crate::domain::material::MaterialId;

/// Alias for `Result<T, EngineError>`.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised while configuring or restoring a world.
///
/// The per-tick hot path never returns these to callers; failures inside a
/// tick are logged and counted in [`crate::TickStats`] instead.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Registering another material would overflow the `u8` id space.
    #[error("cannot register \"{name}\": material id space exhausted ({max} ids)")]
    MaterialIdSpaceExhausted { name: String, max: usize },

    /// A material with this name is already registered.
    #[error("material already registered: \"{0}\"")]
    DuplicateMaterial(String),

    /// A name did not resolve to a registered material.
    #[error("unknown material: \"{0}\"")]
    UnknownMaterial(String),

    /// A raw id (from a snapshot or a caller) is not registered.
    #[error("invalid material id: {0}")]
    InvalidMaterialId(MaterialId),

    /// A snapshot array does not match the grid it claims to describe.
    #[error("snapshot field `{field}` has {actual} entries, expected {expected}")]
    SnapshotMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON content (bundle, config, snapshot) failed to parse.
    #[error("content parse error: {0}")]
    Content(#[from] serde_json::Error),
}
