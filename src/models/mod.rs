//! Data models for LocalLib

pub mod author;
pub mod book;
pub mod book_instance;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorSummary};
pub use book::{Book, BookDetails, BookSummary, Genre};
pub use book_instance::{BookInstance, InstanceStatus, LoanedInstance};
pub use user::{User, UserClaims};
