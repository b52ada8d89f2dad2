//! URL handling module for Repo-Scout
//!
//! This module turns the hrefs found on search pages into canonical
//! repository URLs and provides the set that deduplicates them between the
//! search and enrich phases.

mod link_set;
mod normalize;

// Re-export main items
pub use link_set::RepoLinkSet;
pub use normalize::resolve_repo_href;
