pub mod catalog;
pub mod sessions;

pub use catalog::Catalog;
pub use sessions::SessionStore;
