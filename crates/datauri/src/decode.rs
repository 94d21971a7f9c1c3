use base64::Engine;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use percent_encoding::percent_decode_str;

use crate::error::DataUriError;
use crate::parser::ParsedDataUri;

impl ParsedDataUri {
    /// Whether the parameters declare a base64 payload.
    #[must_use]
    pub fn is_base64(&self) -> bool {
        self.parameters
            .split(';')
            .any(|param| param.trim().eq_ignore_ascii_case("base64"))
    }

    /// Decode the payload into raw bytes.
    ///
    /// Base64 payloads may contain whitespace and may omit padding. Other
    /// payloads are percent-decoded.
    pub fn decode(&self) -> Result<Vec<u8>, DataUriError> {
        if !self.is_base64() {
            return Ok(percent_decode_str(&self.data).collect());
        }

        // Some producers percent-encode the base64 alphabet ('+', '/', '=').
        let unescaped: Vec<u8> = percent_decode_str(&self.data).collect();
        let compact: Vec<u8> = unescaped
            .into_iter()
            .filter(|b| !b.is_ascii_whitespace())
            .collect();

        let engine = if compact.len() % 4 == 0 {
            &STANDARD
        } else {
            &STANDARD_NO_PAD
        };
        engine
            .decode(&compact)
            .map_err(|e| DataUriError::Decode(e.to_string()))
    }
}
