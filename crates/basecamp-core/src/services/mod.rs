//! Services - board operations built on the ports.

pub mod activity;
pub mod badge;
pub mod board;
pub mod composer;
pub mod donation;
pub mod post_store;
pub mod query;
pub mod views;
pub mod vote;

#[cfg(test)]
pub(crate) mod testing;

pub use activity::AuthorActivity;
pub use badge::{BadgeOutcome, BadgeService};
pub use board::{Board, BoardConfig, Facets};
pub use composer::{AttachmentUpload, PostComposer, PostDraft};
pub use donation::{DEFAULT_DONATION_AMOUNT, DonationReceipt, DonationService, parse_ether};
pub use post_store::{PostStore, PostWriter};
pub use query::{BoardQuery, Facet, PostPage, SortKey, run_query};
pub use views::{ViewCounter, ViewRegistration};
pub use vote::{VoteOutcome, VoteTracker, cast_vote};
