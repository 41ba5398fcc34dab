//! Domain entities - the core business objects.

mod address;
mod category;
pub mod content;
pub mod network;
mod post;
pub mod seed;
mod vote;

pub use address::{Address, InvalidAddress};
pub use category::{CATEGORIES, Category, find_category};
pub use post::{Attachment, AttachmentKind, DATE_FORMAT, Post, PostId};
pub use vote::Vote;
