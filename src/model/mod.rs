//! Domain model for triaged course content
//!
//! # Components
//!
//! - `ContentItem`: one content unit with its three link buckets
//! - `ContentType`: the tool area a descriptor belongs to
//! - `Link` / `LinkCategory`: one extracted reference and its final bucket

mod item;
mod link;

pub use item::{sort_by_hard_links, ContentItem, ContentType, ItemSource, NOT_DEPLOYED};
pub use link::{Link, LinkCategory, NON_ASCII_IN_LINK, NOT_FOUND_IN_COLLECTION};
