pub mod link_service;
pub mod page_service;

pub use link_service::LinkRewriter;
pub use page_service::PageStore;
