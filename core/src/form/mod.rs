//! Form state: an immutable snapshot of everything a generation needs

mod level;

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

pub use level::EcLevel;

use crate::color::Color;
use crate::community::CommunityDescriptor;
use crate::render::logo::sniff_mime;
use crate::{Error, Result};

/// A user-supplied logo, read fully into memory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime: String,
    #[serde(skip_serializing)]
    pub bytes: Arc<[u8]>,
}

impl UploadedImage {
    /// Wrap encoded image bytes, rejecting anything that is not an image
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let mime = sniff_mime(&bytes)
            .ok_or_else(|| Error::UnsupportedLogo(format!("{} is not an image", file_name)))?;
        Ok(Self {
            file_name,
            mime: mime.to_string(),
            bytes: bytes.into(),
        })
    }

    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        Self::from_bytes(file_name, bytes)
    }
}

/// Where the badge logo comes from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "source", rename_all = "snake_case")]
pub enum LogoSource {
    Community(CommunityDescriptor),
    Uploaded(UploadedImage),
    #[default]
    None,
}

impl LogoSource {
    pub fn is_none(&self) -> bool {
        matches!(self, LogoSource::None)
    }

    /// Short human description for status lines
    pub fn describe(&self) -> String {
        match self {
            LogoSource::Community(c) => format!(
                "community {}",
                c.label().unwrap_or("(unnamed)")
            ),
            LogoSource::Uploaded(u) => format!("upload {} ({})", u.file_name, u.mime),
            LogoSource::None => "no logo".to_string(),
        }
    }
}

/// Snapshot of the generator form
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub payload: String,
    pub logo: LogoSource,
    pub foreground: Color,
    pub background: Color,
    pub level: EcLevel,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            payload: String::new(),
            logo: LogoSource::None,
            foreground: Color::BLACK,
            background: Color::WHITE,
            level: EcLevel::default(),
        }
    }
}

impl FormState {
    pub fn new(payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ..Self::default()
        }
    }

    /// Generation is only enabled for a non-blank payload
    pub fn can_generate(&self) -> bool {
        !self.payload.trim().is_empty()
    }

    pub fn with_payload(self, payload: impl Into<String>) -> Self {
        Self {
            payload: payload.into(),
            ..self
        }
    }

    pub fn with_logo(self, logo: LogoSource) -> Self {
        Self { logo, ..self }
    }

    pub fn with_colors(self, foreground: Color, background: Color) -> Self {
        Self {
            foreground,
            background,
            ..self
        }
    }

    pub fn with_foreground(self, foreground: Color) -> Self {
        Self { foreground, ..self }
    }

    pub fn with_background(self, background: Color) -> Self {
        Self { background, ..self }
    }

    pub fn with_level(self, level: EcLevel) -> Self {
        Self { level, ..self }
    }
}
