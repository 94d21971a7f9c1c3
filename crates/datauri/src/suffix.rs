use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in MIME essence to file suffix table.
static SUFFIXES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        // Images
        ("image/png", "png"),
        ("image/jpeg", "jpg"),
        ("image/jpg", "jpg"),
        ("image/pjpeg", "jpg"),
        ("image/gif", "gif"),
        ("image/webp", "webp"),
        ("image/bmp", "bmp"),
        ("image/x-ms-bmp", "bmp"),
        ("image/svg+xml", "svg"),
        ("image/x-icon", "ico"),
        ("image/vnd.microsoft.icon", "ico"),
        ("image/tiff", "tiff"),
        ("image/heic", "heic"),
        ("image/heif", "heif"),
        ("image/avif", "avif"),
        // Text
        ("text/plain", "txt"),
        ("text/html", "html"),
        ("text/css", "css"),
        ("text/csv", "csv"),
        ("text/calendar", "ics"),
        ("text/javascript", "js"),
        ("text/markdown", "md"),
        ("text/xml", "xml"),
        ("text/vcard", "vcf"),
        ("text/x-vcard", "vcf"),
        // Applications
        ("application/pdf", "pdf"),
        ("application/json", "json"),
        ("application/javascript", "js"),
        ("application/xml", "xml"),
        ("application/zip", "zip"),
        ("application/gzip", "gz"),
        ("application/x-gzip", "gz"),
        ("application/x-tar", "tar"),
        ("application/x-7z-compressed", "7z"),
        ("application/vnd.android.package-archive", "apk"),
        ("application/msword", "doc"),
        (
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "docx",
        ),
        ("application/vnd.ms-excel", "xls"),
        (
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            "xlsx",
        ),
        ("application/vnd.ms-powerpoint", "ppt"),
        (
            "application/vnd.openxmlformats-officedocument.presentationml.presentation",
            "pptx",
        ),
        ("application/rtf", "rtf"),
        ("application/epub+zip", "epub"),
        // Audio
        ("audio/mpeg", "mp3"),
        ("audio/mp4", "m4a"),
        ("audio/aac", "aac"),
        ("audio/ogg", "ogg"),
        ("audio/wav", "wav"),
        ("audio/x-wav", "wav"),
        ("audio/webm", "weba"),
        ("audio/flac", "flac"),
        // Video
        ("video/mp4", "mp4"),
        ("video/webm", "webm"),
        ("video/ogg", "ogv"),
        ("video/quicktime", "mov"),
        ("video/x-msvideo", "avi"),
        ("video/3gpp", "3gp"),
    ])
});

/// Base64 prefixes of well-known file signatures.
const BASE64_SIGNATURES: &[(&str, &str)] = &[
    ("JVBERi0", "pdf"),
    ("iVBORw0KGgo", "png"),
    ("/9j/", "jpg"),
    ("R0lGODdh", "gif"),
    ("R0lGODlh", "gif"),
    ("UEsDBB", "zip"),
];

const OCTET_STREAM: &str = "application/octet-stream";

/// Maps a MIME type to the file suffix appended to generated filenames.
///
/// Lookup is case-insensitive and ignores MIME parameters. Unknown types map
/// to an empty suffix. Extra entries can be layered over the built-in table
/// with [`with_overrides`](Self::with_overrides); overrides win.
#[derive(Debug, Clone, Default)]
pub struct DataUriSuffixParser {
    overrides: HashMap<String, String>,
}

impl DataUriSuffixParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layer extra `mime type -> suffix` entries over the built-in table.
    #[must_use]
    pub fn with_overrides<I, K, V>(mut self, overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        for (mime, suffix) in overrides {
            let suffix: String = suffix.into();
            self.overrides
                .insert(essence(mime.as_ref()), suffix.trim_start_matches('.').to_owned());
        }
        self
    }

    /// Return the suffix (without a leading dot) for `mime_type`, or an empty
    /// string when no suffix is known.
    ///
    /// For `application/octet-stream` with a base64 payload, the payload's
    /// leading bytes are matched against a few common file signatures.
    pub fn parse_suffix(&self, mime_type: &str, url: &str, data: &str) -> String {
        let essence = essence(mime_type);
        if essence.is_empty() {
            return String::new();
        }

        if let Some(suffix) = self.overrides.get(&essence) {
            return suffix.clone();
        }

        if let Some(suffix) = SUFFIXES.get(essence.as_str()) {
            return (*suffix).to_owned();
        }

        if essence == OCTET_STREAM && declares_base64(url) {
            return sniff_base64_signature(data)
                .map(str::to_owned)
                .unwrap_or_default();
        }

        String::new()
    }
}

/// Lower-cased `type/subtype` with any parameters removed.
fn essence(mime_type: &str) -> String {
    mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn declares_base64(url: &str) -> bool {
    url.split_once(',').is_some_and(|(header, _)| {
        header
            .split(';')
            .skip(1)
            .any(|param| param.trim().eq_ignore_ascii_case("base64"))
    })
}

fn sniff_base64_signature(data: &str) -> Option<&'static str> {
    BASE64_SIGNATURES
        .iter()
        .find(|(prefix, _)| data.starts_with(prefix))
        .map(|(_, suffix)| *suffix)
}
