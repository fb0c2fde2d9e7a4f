use crate::utils::{fence_for, get_language_tag, toc_anchor};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use content_inspector::{ContentType, inspect};
use log::{debug, error};
use std::path::Path;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

/// Format of the generation timestamp in the metadata block.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// What happened to a single file section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOutcome {
    Written,
    Skipped,
}

pub struct MarkdownWriter<W: AsyncWrite + Unpin> {
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> MarkdownWriter<W> {
    pub fn new(writer: BufWriter<W>) -> Self {
        Self { writer }
    }

    pub async fn write_metadata(&mut self, generated: NaiveDateTime) -> Result<()> {
        let block = format!(
            "# File Combination Metadata\n```\nGenerated on: {}\n```\n\n",
            generated.format(TIMESTAMP_FORMAT)
        );
        self.writer
            .write_all(block.as_bytes())
            .await
            .context("Failed to write metadata")
    }

    pub async fn write_toc(&mut self, labels: &[String]) -> Result<()> {
        let mut toc = String::from("# Table of Contents\n\n");
        for label in labels {
            toc.push_str(&format!("- [{label}](#{})\n", toc_anchor(label)));
        }
        toc.push('\n');

        self.writer
            .write_all(toc.as_bytes())
            .await
            .context("Failed to write table of contents")
    }

    /// Writes the section for one file.
    ///
    /// A file whose content cannot be read as text is logged and skipped;
    /// only failures of the output itself are returned as errors.
    pub async fn write_entry(&mut self, path: &Path, label: &str) -> Result<EntryOutcome> {
        let content = match read_text(path).await {
            Ok(content) => content,
            Err(err) => {
                error!("Skipping file {label}: {err:#}");
                return Ok(EntryOutcome::Skipped);
            }
        };

        debug!("Writing file: {label}");

        let fence = fence_for(&content);
        let lang = get_language_tag(path);
        let section = format!("### {label}\n{fence}{lang}\n{content}\n{fence}\n\n");

        self.writer
            .write_all(section.as_bytes())
            .await
            .with_context(|| format!("Failed to write section for {label}"))?;

        Ok(EntryOutcome::Written)
    }

    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await.context("Failed to flush output")
    }
}

async fn read_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Unable to read file: {}", path.display()))?;

    let sample_size = std::cmp::min(8192, bytes.len());
    if inspect(&bytes[..sample_size]) == ContentType::BINARY {
        anyhow::bail!("Binary content in {}", path.display());
    }

    String::from_utf8(bytes).with_context(|| format!("Invalid UTF-8 in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn buffer() -> MarkdownWriter<Vec<u8>> {
        MarkdownWriter::new(BufWriter::new(Vec::new()))
    }

    async fn finish(mut md: MarkdownWriter<Vec<u8>>) -> anyhow::Result<String> {
        md.flush().await?;
        Ok(String::from_utf8(md.writer.into_inner())?)
    }

    #[tokio::test]
    async fn metadata_uses_fixed_timestamp_format() -> anyhow::Result<()> {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|d| d.and_hms_opt(7, 5, 1))
            .expect("valid date");

        let mut md = buffer();
        md.write_metadata(at).await?;
        assert_eq!(
            finish(md).await?,
            "# File Combination Metadata\n```\nGenerated on: 2024-03-09 07:05:01\n```\n\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn toc_links_every_label() -> anyhow::Result<()> {
        let labels = vec!["test1.py".to_string(), "my file.js".to_string()];
        let mut md = buffer();
        md.write_toc(&labels).await?;
        assert_eq!(
            finish(md).await?,
            "# Table of Contents\n\n- [test1.py](#test1py)\n- [my file.js](#my-filejs)\n\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn entry_is_fenced_with_language_tag() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("test1.py");
        fs::write(&path, "print('Hello')")?;

        let mut md = buffer();
        assert_eq!(md.write_entry(&path, "test1.py").await?, EntryOutcome::Written);
        assert_eq!(
            finish(md).await?,
            "### test1.py\n```python\nprint('Hello')\n```\n\n"
        );
        Ok(())
    }

    #[tokio::test]
    async fn embedded_fences_get_a_longer_fence() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("README.md");
        fs::write(&path, "# Example\n\n```sh\nls\n```")?;

        let mut md = buffer();
        md.write_entry(&path, "README.md").await?;
        let out = finish(md).await?;
        assert!(out.starts_with("### README.md\n````markdown\n"));
        assert!(out.ends_with("```\n````\n\n"));
        Ok(())
    }

    #[tokio::test]
    async fn unreadable_entries_are_skipped() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let binary = dir.path().join("blob.bin");
        fs::write(&binary, [0u8, 159, 146, 150, 0, 1, 2])?;
        let missing = dir.path().join("gone.txt");

        let mut md = buffer();
        assert_eq!(md.write_entry(&binary, "blob.bin").await?, EntryOutcome::Skipped);
        assert_eq!(md.write_entry(&missing, "gone.txt").await?, EntryOutcome::Skipped);
        assert!(finish(md).await?.is_empty());
        Ok(())
    }
}
