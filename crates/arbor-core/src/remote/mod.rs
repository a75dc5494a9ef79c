//! Remote resource listing.
//!
//! # Module Structure
//!
//! - `page`: cursor pagination ([`fetch_all`]) and natural-key de-duplication
//! - `cache`: per-key cache of fully fetched lists with cascading invalidation
//! - `tracked`: the de-duplicated list of resources a user has added
//! - `provider`: backend/provider traits and the generic cached provider
//! - `result`: the success-flag envelope handed to host collaborators

mod cache;
mod page;
mod provider;
mod result;
mod tracked;

pub use cache::{CacheEntry, CacheKey, RemoteListCache};
pub use page::{NaturalKey, Page, dedup_by_key, fetch_all, fetch_all_unique};
pub use provider::{
    CachedResourceProvider, ListScope, ResourceBackend, ResourceDetails, ResourceItem,
    ResourceProvider,
};
pub use result::MethodResult;
pub use tracked::TrackedResources;
