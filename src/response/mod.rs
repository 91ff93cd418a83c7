//! Response handling module - Base64 / data URI helpers and file storage

pub mod base64;
pub mod file;
