pub mod page_outcome;
pub mod page_request;
pub mod tag;
