pub mod approval_record;
pub mod node_advisory;
pub mod package;
pub mod policy;
pub mod registry_record;
pub mod warning;

pub use approval_record::{ApprovalRecord, APPROVAL_RECORD_FORMAT_VERSION};
pub use node_advisory::NodeAdvisory;
pub use package::{Dependency, PackageName, Version};
pub use policy::Policy;
pub use registry_record::{
    RegistryRecord, VersionMeta, LIFECYCLE_SCRIPTS, REGISTRY_RECORD_FORMAT_VERSION,
};
pub use warning::{Warning, WarningIdentity, WarningKind};
