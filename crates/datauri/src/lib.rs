//! Parsing of `data:` URIs into a MIME type, a still-encoded payload, and a
//! freshly generated filename whose suffix is derived from the MIME type.

pub mod decode;
pub mod error;
pub mod parser;
pub mod suffix;

pub use error::DataUriError;
pub use parser::{DataUriParser, GeneratedFilename, ParseResult, ParsedDataUri};
pub use suffix::DataUriSuffixParser;
