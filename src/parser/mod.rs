//! Message parsing: header decoding, MIME part trees, body extraction and HTML conversion.

pub mod header;
pub mod html;
pub mod mime;
