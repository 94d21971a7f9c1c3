use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::suffix::DataUriSuffixParser;

/// Compiled regex for `data:[<type>/<subtype>][;<params>],<payload>`.
///
/// Captures five groups: the full MIME type, its general type, its specific
/// subtype, the raw parameter segment, and the (still encoded) payload.
static DATA_URI_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^data:(?:(([^/;,]+)/([^;,]+))?(?:;([^,]*))?)?,(.+)$")
        .expect("data uri regex is valid")
});

const GROUP_MIME_TYPE: usize = 1;
const GROUP_FILE_TYPE_GENERAL: usize = 2;
const GROUP_FILE_TYPE_SPECIFIC: usize = 3;
const GROUP_PARAMETERS: usize = 4;
const GROUP_DATA: usize = 5;

/// A generated, unique filename plus the suffix derived from the MIME type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedFilename {
    pub name: String,
    pub file_type: String,
}

impl GeneratedFilename {
    /// Generate a fresh UUID-v4 name with the given suffix.
    #[must_use]
    pub fn generate(file_type: impl Into<String>) -> Self {
        Self {
            name: Uuid::new_v4().to_string(),
            file_type: file_type.into(),
        }
    }
}

impl fmt::Display for GeneratedFilename {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.file_type.trim().is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}.{}", self.name, self.file_type)
        }
    }
}

/// A successfully matched data URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedDataUri {
    /// General MIME type, e.g. `image`. Empty when the URI has no MIME type.
    pub file_type_general: String,
    /// Specific MIME subtype, e.g. `png`.
    pub file_type_specific: String,
    /// Payload exactly as it appears after the comma.
    pub data: String,
    /// `general/specific`, or empty.
    pub mime_type: String,
    /// Raw `;`-separated parameters between the MIME type and the comma.
    pub parameters: String,
    pub filename: GeneratedFilename,
}

/// Outcome of [`DataUriParser::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ParseResult {
    Invalid,
    ParsedDataUri(ParsedDataUri),
}

impl ParseResult {
    /// Borrow the parsed URI, or `None` for [`ParseResult::Invalid`].
    #[must_use]
    pub fn as_parsed(&self) -> Option<&ParsedDataUri> {
        match self {
            Self::Invalid => None,
            Self::ParsedDataUri(parsed) => Some(parsed),
        }
    }

    #[must_use]
    pub fn into_parsed(self) -> Option<ParsedDataUri> {
        match self {
            Self::Invalid => None,
            Self::ParsedDataUri(parsed) => Some(parsed),
        }
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid)
    }
}

/// Splits `data:` URIs and names the file their payload should be saved as.
#[derive(Debug, Clone, Default)]
pub struct DataUriParser {
    suffix_parser: DataUriSuffixParser,
}

impl DataUriParser {
    #[must_use]
    pub fn new(suffix_parser: DataUriSuffixParser) -> Self {
        Self { suffix_parser }
    }

    /// Parse `url`. Every call generates a new filename, so parsing the same
    /// URI twice yields two different names.
    pub fn generate(&self, url: &str) -> ParseResult {
        let Some(caps) = DATA_URI_RE.captures(url) else {
            debug!(url_len = url.len(), "not a data uri");
            return ParseResult::Invalid;
        };

        let group = |index: usize| caps.get(index).map_or("", |m| m.as_str());

        let mime_type = group(GROUP_MIME_TYPE);
        let data = group(GROUP_DATA);

        let suffix = self.suffix_parser.parse_suffix(mime_type, url, data);
        let filename = GeneratedFilename::generate(suffix);

        debug!(
            mime_type = %mime_type,
            filename = %filename,
            "parsed data uri"
        );

        ParseResult::ParsedDataUri(ParsedDataUri {
            file_type_general: group(GROUP_FILE_TYPE_GENERAL).to_owned(),
            file_type_specific: group(GROUP_FILE_TYPE_SPECIFIC).to_owned(),
            data: data.to_owned(),
            mime_type: mime_type.to_owned(),
            parameters: group(GROUP_PARAMETERS).to_owned(),
            filename,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> DataUriParser {
        DataUriParser::new(DataUriSuffixParser::new())
    }

    fn parsed(url: &str) -> ParsedDataUri {
        parser()
            .generate(url)
            .into_parsed()
            .expect("expected a parsed data uri")
    }

    #[test]
    fn image_png_gets_png_suffix() {
        assert_eq!(parsed("data:image/png;base64,AAAA").filename.file_type, "png");
    }

    #[test]
    fn image_jpeg_gets_jpg_suffix() {
        assert_eq!(parsed("data:image/jpeg;base64,AAAA").filename.file_type, "jpg");
    }

    #[test]
    fn arbitrary_image_type_gets_no_suffix() {
        assert_eq!(parsed("data:image/foo;base64,AAAA").filename.file_type, "");
    }

    #[test]
    fn missing_mime_type_gets_no_suffix() {
        let result = parsed("data:,AAAA");
        assert_eq!(result.filename.file_type, "");
        assert_eq!(result.mime_type, "");
        assert_eq!(result.file_type_general, "");
        assert_eq!(result.file_type_specific, "");
        assert_eq!(result.data, "AAAA");
    }

    #[test]
    fn missing_mime_type_renders_without_dot() {
        let result = parsed("data:,AAAA");
        assert!(!result.filename.to_string().contains('.'));
    }

    #[test]
    fn non_image_known_type_gets_suffix() {
        assert_eq!(parsed("data:text/plain;base64,AAAA").filename.file_type, "txt");
    }

    #[test]
    fn invalid_input_is_invalid() {
        assert!(parser().generate("AAAA").is_invalid());
        assert!(parser().generate("").is_invalid());
        assert!(parser().generate("data:image/png;base64").is_invalid());
        assert!(parser().generate("data:image/png;base64,").is_invalid());
    }

    #[test]
    fn data_prefix_must_start_the_string() {
        assert!(
            parser()
                .generate("https://example.com/?q=data:,AAAA")
                .is_invalid()
        );
    }

    #[test]
    fn extracts_all_fields() {
        let result = parsed("data:image/png;base64,iVBORw0KGgo=");
        assert_eq!(result.mime_type, "image/png");
        assert_eq!(result.file_type_general, "image");
        assert_eq!(result.file_type_specific, "png");
        assert_eq!(result.parameters, "base64");
        assert_eq!(result.data, "iVBORw0KGgo=");
    }

    #[test]
    fn payload_with_slashes_and_commas_is_kept_whole() {
        let result = parsed("data:image/jpeg;base64,/9j/4AAQ,Sk+Z/w==");
        assert_eq!(result.mime_type, "image/jpeg");
        assert_eq!(result.data, "/9j/4AAQ,Sk+Z/w==");
    }

    #[test]
    fn parameters_are_not_part_of_the_mime_type() {
        let result = parsed("data:text/plain;charset=utf-8;base64,aGVsbG8=");
        assert_eq!(result.mime_type, "text/plain");
        assert_eq!(result.file_type_specific, "plain");
        assert_eq!(result.parameters, "charset=utf-8;base64");
        assert_eq!(result.filename.file_type, "txt");
    }

    // RFC 2397 makes the `;` segment optional. Patterns that require it
    // reject `data:image/png,AAAA`; this parser accepts it on purpose.
    #[test]
    fn mime_type_without_parameters_is_accepted() {
        let result = parsed("data:text/plain,hello");
        assert_eq!(result.mime_type, "text/plain");
        assert_eq!(result.parameters, "");
        assert_eq!(result.data, "hello");

        let image = parsed("data:image/png,AAAA");
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.filename.file_type, "png");
    }

    #[test]
    fn repeated_parses_share_fields_but_not_names() {
        let url = "data:image/png;base64,AAAA";
        let first = parsed(url);
        let second = parsed(url);
        assert_eq!(first.mime_type, second.mime_type);
        assert_eq!(first.file_type_general, second.file_type_general);
        assert_eq!(first.file_type_specific, second.file_type_specific);
        assert_eq!(first.data, second.data);
        assert_ne!(first.filename.name, second.filename.name);
    }

    #[test]
    fn generated_filename_display() {
        let with_suffix = GeneratedFilename {
            name: "abc".into(),
            file_type: "png".into(),
        };
        assert_eq!(with_suffix.to_string(), "abc.png");

        let blank = GeneratedFilename {
            name: "abc".into(),
            file_type: "  ".into(),
        };
        assert_eq!(blank.to_string(), "abc");
    }

    #[test]
    fn parse_result_serializes_with_tag() {
        let json = serde_json::to_value(parser().generate("AAAA")).unwrap();
        assert_eq!(json["result"], "invalid");

        let json = serde_json::to_value(parser().generate("data:image/png;base64,AAAA")).unwrap();
        assert_eq!(json["result"], "parsed_data_uri");
        assert_eq!(json["filename"]["file_type"], "png");
    }
}
