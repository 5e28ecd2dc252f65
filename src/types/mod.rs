//! Core types for the question-answering pipeline

pub mod document;
pub mod response;

pub use document::{Chunk, Document, FileType};
pub use response::{Answer, Citation};
