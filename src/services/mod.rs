// src/services/mod.rs

//! External collaborators: upstream fetching and deep-link resolution.

mod deep_link;
mod fetcher;

pub use deep_link::{DeepLinkResolver, LinkKind};
pub use fetcher::{HttpListingSource, ListingSource};
