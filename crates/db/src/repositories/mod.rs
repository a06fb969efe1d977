//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that take
//! `&mut PgConnection` as the first argument, so callers decide whether the
//! statement runs inside a transaction.

pub mod article_repo;
pub mod video_repo;

pub use article_repo::ArticleRepo;
pub use video_repo::VideoRepo;
