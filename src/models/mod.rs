//! Data models for Bookshelf

pub mod book;
pub mod claims;

// Re-export commonly used types
pub use book::{Book, BookCandidate};
pub use claims::{BookClaims, Rights};
