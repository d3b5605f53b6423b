//! Saving artifacts as uniquely named PNG/SVG files

use std::fmt;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use tokio::io::AsyncWriteExt;

use crate::render::RenderedArtifact;
use crate::{Config, Error, Result};

/// Which artifact(s) to save
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Svg,
    Both,
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "svg" => Ok(ExportFormat::Svg),
            "both" | "all" => Ok(ExportFormat::Both),
            _ => Err(Error::InvalidFormat(s.to_string())),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExportFormat::Png => "png",
            ExportFormat::Svg => "svg",
            ExportFormat::Both => "both",
        })
    }
}

/// Writes artifacts into a directory under `{prefix}-{unix_millis}.{ext}`
pub struct Exporter {
    dir: PathBuf,
    prefix: String,
}

impl Exporter {
    pub fn new(config: &Config) -> Self {
        Self {
            dir: config.output_dir.clone(),
            prefix: config.file_prefix.clone(),
        }
    }

    fn stem(&self) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default();
        format!("{}-{}", self.prefix, millis)
    }

    /// Save one or both artifacts, sharing a timestamp stem
    pub async fn export(&self, artifact: Option<&RenderedArtifact>, format: ExportFormat) -> Result<Vec<PathBuf>> {
        let Some(artifact) = artifact else {
            tracing::debug!("nothing to export yet");
            return Ok(Vec::new());
        };

        let stem = self.stem();
        let mut written = Vec::new();
        if matches!(format, ExportFormat::Png | ExportFormat::Both) {
            written.push(self.write_unique(&stem, "png", &artifact.png).await?);
        }
        if matches!(format, ExportFormat::Svg | ExportFormat::Both) {
            written.push(self.write_unique(&stem, "svg", artifact.svg.as_bytes()).await?);
        }
        Ok(written)
    }

    async fn write_unique(&self, stem: &str, ext: &str, data: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let mut attempt = 0u32;
        loop {
            let name = if attempt == 0 {
                format!("{}.{}", stem, ext)
            } else {
                format!("{}-{}.{}", stem, attempt, ext)
            };
            let path = self.dir.join(name);

            match tokio::fs::OpenOptions::new().write(true).create_new(true).open(&path).await {
                Ok(mut file) => {
                    file.write_all(data).await?;
                    file.flush().await?;
                    tracing::info!("saved {}", path.display());
                    return Ok(path);
                }
                Err(e) if e.kind() == ErrorKind::AlreadyExists => attempt += 1,
                Err(e) => return Err(e.into()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FormState;
    use crate::render::LogoOutcome;
    use std::path::Path;

    fn artifact() -> RenderedArtifact {
        RenderedArtifact {
            form: FormState::new("export"),
            png: vec![0x89, b'P', b'N', b'G'],
            svg: "<svg/>".to_string(),
            logo: LogoOutcome::NoLogo,
        }
    }

    fn exporter(dir: &Path) -> Exporter {
        let config = Config {
            output_dir: dir.join("out"),
            ..Config::default()
        };
        Exporter::new(&config)
    }

    #[tokio::test]
    async fn test_nothing_to_export() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        assert!(exporter.export(None, ExportFormat::Png).await.unwrap().is_empty());
        assert!(exporter.export(None, ExportFormat::Both).await.unwrap().is_empty());
        assert!(!dir.path().join("out").exists());
    }

    #[tokio::test]
    async fn test_file_names_and_contents() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let artifact = artifact();

        let paths = exporter.export(Some(&artifact), ExportFormat::Both).await.unwrap();
        assert_eq!(paths.len(), 2);

        let png_name = paths[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(png_name.starts_with("uaibit-qr-"));
        assert!(png_name.ends_with(".png"));
        let millis = png_name.trim_start_matches("uaibit-qr-").trim_end_matches(".png");
        assert!(millis.parse::<u128>().is_ok());

        assert_eq!(paths[0].file_stem(), paths[1].file_stem());
        assert_eq!(std::fs::read(&paths[0]).unwrap(), artifact.png);
        assert_eq!(std::fs::read_to_string(&paths[1]).unwrap(), artifact.svg);
    }

    #[tokio::test]
    async fn test_repeated_exports_never_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = exporter(dir.path());
        let artifact = artifact();

        let mut seen = std::collections::HashSet::new();
        for _ in 0..5 {
            let paths = exporter.export(Some(&artifact), ExportFormat::Svg).await.unwrap();
            assert_eq!(paths.len(), 1);
            assert!(seen.insert(paths[0].clone()));
        }
        assert_eq!(std::fs::read_dir(dir.path().join("out")).unwrap().count(), 5);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("PNG".parse::<ExportFormat>().unwrap(), ExportFormat::Png);
        assert_eq!("both".parse::<ExportFormat>().unwrap(), ExportFormat::Both);
        assert!("gif".parse::<ExportFormat>().is_err());
    }
}
