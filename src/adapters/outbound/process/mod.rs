/// Process adapters for probing local tooling
mod node_version_probe;

pub use node_version_probe::NodeVersionProbe;
