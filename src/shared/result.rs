/// Crate-wide Result alias backed by `anyhow::Error`.
///
/// Typed errors (`GateError`, `RegistryError`) are converted into it with `?`
/// and can be recovered with `downcast_ref` where a caller needs the variant.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
