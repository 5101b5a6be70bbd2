/*!
 * Text snapshot writer for projsnap
 */

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::Local;

use crate::error::{Result, SnapError};

/// Title written on the first line of every snapshot
pub const TITLE: &str = "Project Snapshot (projsnap)";

const BANNER_WIDTH: usize = 80;
const RULE_WIDTH: usize = 50;

/// Body of a single file record
#[derive(Debug, Clone, Copy)]
pub enum RecordBody<'a> {
    /// Decoded file contents
    Content(&'a str),
    /// Fixed placeholder for content-omitted files
    Omitted(&'a str),
    /// Inline note for a file that could not be read
    ReadError(&'a io::Error),
}

/// Append-only writer for the snapshot format
pub struct SnapshotWriter<W: Write> {
    out: W,
}

impl SnapshotWriter<BufWriter<File>> {
    /// Create (or truncate) the snapshot file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path).map_err(|source| SnapError::OutputCreate {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> SnapshotWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write the title, root and timestamp block
    pub fn write_preamble(&mut self, root: &Path) -> Result<()> {
        let timestamp = Local::now().to_rfc3339();

        writeln!(self.out, "{}", TITLE)?;
        writeln!(self.out, "Project Root: {}", root.display())?;
        writeln!(self.out, "Snapshot created on: {}", timestamp)?;
        writeln!(self.out, "{}\n", "=".repeat(BANNER_WIDTH))?;
        Ok(())
    }

    /// Write one file record
    pub fn write_record(&mut self, rel_path: &str, body: RecordBody<'_>) -> Result<()> {
        writeln!(self.out, "=== FILE: {} ===", rel_path)?;
        writeln!(self.out, "{}", "-".repeat(RULE_WIDTH))?;

        match body {
            RecordBody::Content(content) | RecordBody::Omitted(content) => {
                self.out.write_all(content.as_bytes())?
            }
            RecordBody::ReadError(err) => writeln!(self.out, "[Error reading file: {}]", err)?,
        }

        write!(self.out, "\n{}\n", "-".repeat(RULE_WIDTH))?;
        writeln!(self.out, "=== END OF FILE: {} ===\n\n", rel_path)?;
        Ok(())
    }

    /// Write the closing marker and flush
    pub fn finish(mut self) -> Result<W> {
        writeln!(self.out, "{}", "=".repeat(BANNER_WIDTH))?;
        writeln!(self.out, "Snapshot Complete.")?;
        self.out.flush()?;
        Ok(self.out)
    }
}

/// Decode bytes as UTF-8, dropping invalid sequences
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::OMITTED_PLACEHOLDER;

    fn render(records: &[(&str, RecordBody<'_>)]) -> String {
        let mut writer = SnapshotWriter::new(Vec::new());
        writer.write_preamble(Path::new("/proj")).unwrap();
        for (path, body) in records {
            writer.write_record(path, *body).unwrap();
        }
        String::from_utf8(writer.finish().unwrap()).unwrap()
    }

    #[test]
    fn frames_records() {
        let out = render(&[("src/main.txt", RecordBody::Content("hello"))]);

        assert!(out.starts_with("Project Snapshot (projsnap)\nProject Root: /proj\nSnapshot created on: "));
        assert!(out.contains(&format!("{}\n\n=== FILE: src/main.txt ===\n", "=".repeat(80))));
        let expected = format!(
            "=== FILE: src/main.txt ===\n{rule}\nhello\n{rule}\n=== END OF FILE: src/main.txt ===\n\n\n",
            rule = "-".repeat(50)
        );
        assert!(out.contains(&expected));
        assert!(out.ends_with(&format!("{}\nSnapshot Complete.\n", "=".repeat(80))));
    }

    #[test]
    fn omitted_body_is_exactly_the_placeholder() {
        let out = render(&[("lib/gen.txt", RecordBody::Omitted(OMITTED_PLACEHOLDER))]);
        let expected = format!(
            "{rule}\n{}\n{rule}\n",
            OMITTED_PLACEHOLDER,
            rule = "-".repeat(50)
        );
        assert!(out.contains(&expected));
    }

    #[test]
    fn read_errors_are_noted_inline() {
        let err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let out = render(&[("locked.txt", RecordBody::ReadError(&err))]);
        assert!(out.contains("[Error reading file: denied]\n"));
        assert!(out.contains("=== END OF FILE: locked.txt ==="));
    }

    #[test]
    fn decoding_drops_invalid_bytes() {
        assert_eq!(decode_dropping_invalid(b"ab\xffcd\xe2\x82"), "abcd");
        assert_eq!(decode_dropping_invalid("héllo".as_bytes()), "héllo");
    }
}
