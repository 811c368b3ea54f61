use std::io::{self, Read};
use std::path::Path;

use mannsum_engine::codec;

use crate::CliError;

/// Read display text from `path`, or stdin when `path` is `None` or `-`.
///
/// Line endings are normalized to `\n` and a single trailing newline (the
/// one every text file ends with) is dropped so it does not count as an
/// extra empty line.
pub fn read_text(path: Option<&Path>) -> Result<String, CliError> {
    let bytes = match path {
        Some(p) if p != Path::new("-") => std::fs::read(p)
            .map_err(|e| CliError::io(format!("cannot read {}: {}", p.display(), e)))?,
        _ => {
            let mut buf = Vec::new();
            io::stdin()
                .read_to_end(&mut buf)
                .map_err(|e| CliError::io(format!("cannot read stdin: {}", e)))?;
            buf
        }
    };

    let text = String::from_utf8(bytes)
        .map_err(|_| CliError::encoding("input is not valid UTF-8"))?;
    Ok(clean_text(&text))
}

/// Normalize line endings and drop one trailing newline.
pub fn clean_text(text: &str) -> String {
    let mut text = codec::normalize_newlines(text);
    if text.ends_with('\n') {
        text.pop();
    }
    text
}
