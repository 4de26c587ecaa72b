//! Domain entities - the core business objects.

mod page;
mod post;

pub use page::Page;
pub use post::{DATE_FORMAT, Post, PostDraft, PostId, READ_CHARS_PER_MINUTE, read_time_label};
