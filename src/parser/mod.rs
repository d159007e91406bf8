//! Input parsing for request templates.
//!
//! Currently this covers the free-form header block a user types alongside a
//! request: one `Key: Value` pair per line.

mod headers;

pub use headers::parse_headers;
