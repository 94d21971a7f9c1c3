use std::process::ExitCode;

use clap::Args;
use harbor_datauri::{DataUriParser, ParseResult};

use crate::OutputFormat;

#[derive(Args, Debug)]
pub struct ParseArgs {
    /// The `data:` URI to parse.
    pub uri: String,
}

/// Print the parse result; an invalid URI exits with failure.
pub fn run(
    parser: &DataUriParser,
    args: &ParseArgs,
    format: &OutputFormat,
) -> anyhow::Result<ExitCode> {
    let result = parser.generate(&args.uri);
    println!("{}", render(&result, format)?);

    if result.is_invalid() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn render(result: &ParseResult, format: &OutputFormat) -> anyhow::Result<String> {
    let parsed = match (format, result) {
        (OutputFormat::Json, _) => return Ok(serde_json::to_string_pretty(result)?),
        (OutputFormat::Text, ParseResult::Invalid) => {
            return Ok("Not a valid data URI.".to_owned());
        }
        (OutputFormat::Text, ParseResult::ParsedDataUri(parsed)) => parsed,
    };

    let mime = if parsed.mime_type.is_empty() {
        "(none)"
    } else {
        &parsed.mime_type
    };
    let mut lines = vec![format!("MIME type:  {mime}")];
    if !parsed.parameters.is_empty() {
        lines.push(format!("Parameters: {}", parsed.parameters));
    }
    lines.push(format!("Base64:     {}", parsed.is_base64()));
    lines.push(format!("Filename:   {}", parsed.filename));
    lines.push(format!("Payload:    {} chars", parsed.data.len()));
    Ok(lines.join("\n"))
}
