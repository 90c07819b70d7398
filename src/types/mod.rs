// ABOUTME: Validated domain types shared by the hook and the executor.
// ABOUTME: Tag names and normalized repository locations.

mod repository_url;
mod tag_name;

pub use repository_url::RepositoryUrl;
pub use tag_name::{TagName, TagNameError};
