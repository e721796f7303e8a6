mod build;
mod rss;

pub use build::{BuildError, BuildResult, FeedBuilder};
