//! CLI command implementations.

pub mod init;
pub mod post;
pub mod sitemap;

pub use init::init_project;
pub use post::{create_post, PostArgs};
pub use sitemap::regenerate_sitemap;
