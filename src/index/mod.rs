//! Derived content indexes: categories, headings, pagination, related posts
//!
//! Everything here is a single pass over the immutable post collection,
//! computed once per build and handed to the generator read-only.

mod categories;
mod headings;
mod pagination;
mod related;

pub use categories::{category_index, posts_in_category};
pub use headings::extract_headings;
pub use pagination::{paginate, PageSlice};
pub use related::related_posts;
