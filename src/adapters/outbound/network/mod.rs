/// Network adapters for external API calls
mod caching_registry_client;
mod node_advisory_client;
mod npm_downloads_client;
mod npm_registry_client;
mod popularity_cache;

pub use caching_registry_client::CachingRegistryRepository;
pub use node_advisory_client::{NodeAdvisoryCache, NodeSecurityWgClient};
pub use npm_downloads_client::NpmDownloadsClient;
pub use npm_registry_client::NpmRegistryClient;
pub use popularity_cache::PopularityCache;
