pub mod http;
pub mod metadata;
pub mod providers;
pub mod recommendations;

pub use metadata::MetadataFetcher;
