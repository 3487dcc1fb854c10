pub mod draft;
pub mod records;
pub mod requests;
pub mod responses;
