// ABOUTME: Command module aggregator for the tagdeploy CLI.
// ABOUTME: Re-exports the post-commit and build-tag handlers.

mod build_tag;
mod post_commit;

pub use build_tag::build_tag;
pub use post_commit::post_commit;
