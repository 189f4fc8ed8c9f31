//! Upload Service client
//!
//! Posts multipart forms to the remote service:
//! - POST /upload - the assembled recording
//! - POST /upload_book - the prerequisite document

pub mod client;
pub mod messages;

pub use client::{content_type_for, BookFile, HttpUploadClient, Recording, UploadService};
pub use messages::{BookUploadResponse, UploadResponse};
