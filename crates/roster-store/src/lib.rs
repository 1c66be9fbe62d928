//! Client-side state for the member management screen.
//!
//! [`CollectionStore`] owns the in-memory copy of one collection and runs
//! every mutation against an [`EntityGateway`](roster_core::gateway::EntityGateway)
//! with a fixed recovery policy. [`BrowseState`] holds the search text and
//! page number the list view renders with.

mod browse;
mod notice;
mod store;

pub use browse::BrowseState;
pub use notice::{Notice, Notices, Tone};
pub use store::{CollectionStore, Outcome, Page};
