/// Policy check core - domain model and pure domain services
///
/// Nothing in here performs I/O; registry data, download counts and the
/// prior approval record are handed in by the application layer.
pub mod domain;
pub mod services;
