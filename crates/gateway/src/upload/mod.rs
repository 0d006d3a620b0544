//! Upload — multipart log uploads handed to the reviewer pipeline.

pub mod route;
