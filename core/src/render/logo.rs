//! Logo candidates and the "first that loads" cascade

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use image::{imageops::FilterType, Rgba, RgbaImage};
use resvg::{tiny_skia, usvg};
use serde::Serialize;

use crate::constants::{FALLBACK_LOGO_NAME, FALLBACK_LOGO_SVG};
use crate::{Error, Result};

const SVG_MIME: &str = "image/svg+xml";

/// Which link of the cascade ended up drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoOutcome {
    Requested,
    Fallback,
    NoLogo,
}

/// One place a logo can be loaded from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoCandidate {
    /// `http(s)://` or `data:` URL
    Url(String),
    Path(PathBuf),
    /// Bytes already in memory, e.g. an upload
    Inline { name: String, bytes: Arc<[u8]> },
}

impl LogoCandidate {
    /// Logo compiled into the library
    pub fn bundled() -> Self {
        LogoCandidate::Inline {
            name: FALLBACK_LOGO_NAME.to_string(),
            bytes: Arc::from(FALLBACK_LOGO_SVG),
        }
    }

    /// Classify a trusted reference from the configuration: URL or local path
    pub fn from_config(reference: &str) -> Self {
        Self::from_remote(reference).unwrap_or_else(|| LogoCandidate::Path(PathBuf::from(reference.trim())))
    }

    /// Classify a reference from the remote community list
    ///
    /// Only `http(s)://` and `data:` URLs are accepted; anything else would
    /// let the list point at local files.
    pub fn from_remote(reference: &str) -> Option<Self> {
        let trimmed = reference.trim();
        let lower = trimmed.to_ascii_lowercase();
        let is_url = lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("data:");
        is_url.then(|| LogoCandidate::Url(trimmed.to_string()))
    }

    pub fn describe(&self) -> String {
        match self {
            LogoCandidate::Url(url) if url.starts_with("data:") => "inline data URL".to_string(),
            LogoCandidate::Url(url) => url.clone(),
            LogoCandidate::Path(path) => path.display().to_string(),
            LogoCandidate::Inline { name, .. } => name.clone(),
        }
    }
}

/// A decoded logo, ready for both backends
#[derive(Debug, Clone)]
pub struct LoadedLogo {
    /// Original encoded bytes, embedded as-is in vector output
    pub bytes: Arc<[u8]>,
    pub mime: &'static str,
    /// Pixels stretched to the square logo box
    pub pixels: RgbaImage,
    pub outcome: LogoOutcome,
}

impl LoadedLogo {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime, STANDARD.encode(&self.bytes))
    }
}

/// MIME type of encoded image bytes, if they are an image at all
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if let Ok(format) = image::guess_format(bytes) {
        return Some(format.to_mime_type());
    }
    looks_like_svg(bytes).then_some(SVG_MIME)
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(1024)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    text.starts_with('<') && text.contains("<svg")
}

/// Decode and scale logo bytes to a `size` x `size` box
pub fn decode_logo(bytes: &[u8], size: u32) -> Result<(RgbaImage, &'static str)> {
    let mime = sniff_mime(bytes).ok_or_else(|| Error::UnsupportedLogo("unrecognized image data".to_string()))?;

    let pixels = if mime == SVG_MIME {
        rasterize_svg(bytes, size)?
    } else {
        let decoded = image::load_from_memory(bytes)?.to_rgba8();
        image::imageops::resize(&decoded, size, size, FilterType::Lanczos3)
    };
    Ok((pixels, mime))
}

fn rasterize_svg(bytes: &[u8], size: u32) -> Result<RgbaImage> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
        .map_err(|e| Error::Image(format!("svg parse failed: {}", e)))?;
    let mut pixmap = tiny_skia::Pixmap::new(size, size)
        .ok_or_else(|| Error::Image(format!("invalid logo size {}", size)))?;

    let tree_size = tree.size();
    let transform = tiny_skia::Transform::from_scale(
        size as f32 / tree_size.width(),
        size as f32 / tree_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let mut out = RgbaImage::new(size, size);
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Ok(out)
}

fn decode_data_url(url: &str) -> Result<Vec<u8>> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| Error::UnsupportedLogo("not a data URL".to_string()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::UnsupportedLogo("data URL without payload".to_string()))?;

    if meta.ends_with(";base64") {
        STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::UnsupportedLogo(format!("bad base64: {}", e)))
    } else {
        Ok(payload.as_bytes().to_vec())
    }
}

/// Fetches and decodes logo candidates with a per-candidate timeout
pub struct LogoLoader {
    client: reqwest::Client,
    timeout: Duration,
    logo_size: u32,
}

impl LogoLoader {
    pub fn new(timeout: Duration, logo_size: u32) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
            logo_size,
        }
    }

    async fn fetch(&self, candidate: &LogoCandidate) -> Result<Arc<[u8]>> {
        match candidate {
            LogoCandidate::Url(url) if url.starts_with("data:") => Ok(decode_data_url(url)?.into()),
            LogoCandidate::Url(url) => {
                let response = self.client.get(url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::Network(format!("{} returned {}", url, status)));
                }
                Ok(response.bytes().await?.to_vec().into())
            }
            LogoCandidate::Path(path) => Ok(tokio::fs::read(path).await?.into()),
            LogoCandidate::Inline { bytes, .. } => Ok(bytes.clone()),
        }
    }

    /// Fetch and decode a single candidate
    pub async fn load(&self, candidate: &LogoCandidate, outcome: LogoOutcome) -> Result<LoadedLogo> {
        let work = async {
            let bytes = self.fetch(candidate).await?;
            let size = self.logo_size;
            let encoded = bytes.clone();
            let (pixels, mime) = tokio::task::spawn_blocking(move || decode_logo(&encoded, size))
                .await
                .map_err(|e| Error::Image(format!("decode task failed: {}", e)))??;
            Ok::<_, Error>(LoadedLogo {
                bytes,
                mime,
                pixels,
                outcome,
            })
        };

        tokio::time::timeout(self.timeout, work)
            .await
            .map_err(|_| Error::Timeout(format!("loading {}", candidate.describe())))?
    }

    /// Load the first candidate that succeeds, in order
    ///
    /// Returns `None` once every candidate has failed; failures are only
    /// logged.
    pub async fn load_first(&self, candidates: &[(LogoCandidate, LogoOutcome)]) -> Option<LoadedLogo> {
        for (candidate, outcome) in candidates {
            tracing::debug!("loading logo candidate {}", candidate.describe());
            match self.load(candidate, *outcome).await {
                Ok(logo) => return Some(logo),
                Err(e) => {
                    tracing::warn!("logo {} failed to load: {}", candidate.describe(), e);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"><rect width="10" height="10" fill="#FF0000"/></svg>"##;

    fn png_bytes(color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(8, 8, Rgba(color));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn loader() -> LogoLoader {
        LogoLoader::new(Duration::from_secs(2), 20)
    }

    #[test]
    fn test_reference_classification() {
        assert!(matches!(LogoCandidate::from_config("https://x/y.png"), LogoCandidate::Url(_)));
        assert!(matches!(LogoCandidate::from_config("data:image/png;base64,AA=="), LogoCandidate::Url(_)));
        assert!(matches!(LogoCandidate::from_config("assets/logo.svg"), LogoCandidate::Path(_)));
    }

    #[test]
    fn test_remote_references_never_become_paths() {
        assert!(matches!(LogoCandidate::from_remote(" HTTPS://x/y.png "), Some(LogoCandidate::Url(_))));
        assert!(LogoCandidate::from_remote("/home/user/.ssh/id_rsa").is_none());
        assert!(LogoCandidate::from_remote("../secret.png").is_none());
        assert!(LogoCandidate::from_remote("file:///etc/passwd").is_none());
    }

    #[tokio::test]
    async fn test_bundled_logo_decodes() {
        let logo = loader()
            .load(&LogoCandidate::bundled(), LogoOutcome::Fallback)
            .await
            .unwrap();
        assert_eq!(logo.mime, SVG_MIME);
        assert_eq!(logo.pixels.dimensions(), (20, 20));
        // opaque disc in the middle of the mark
        assert_eq!(logo.pixels.get_pixel(10, 2)[3], 255);
    }

    #[test]
    fn test_sniff_formats() {
        assert_eq!(sniff_mime(&png_bytes([0, 0, 0, 255])), Some("image/png"));
        assert_eq!(sniff_mime(SVG.as_bytes()), Some(SVG_MIME));
        assert_eq!(sniff_mime(b"plain text"), None);
    }

    #[test]
    fn test_decode_svg_fills_box() {
        let (pixels, mime) = decode_logo(SVG.as_bytes(), 20).unwrap();
        assert_eq!(mime, SVG_MIME);
        assert_eq!(pixels.dimensions(), (20, 20));
        assert_eq!(*pixels.get_pixel(10, 10), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_decode_raster_is_resized() {
        let (pixels, _) = decode_logo(&png_bytes([0, 0, 255, 255]), 20).unwrap();
        assert_eq!(pixels.dimensions(), (20, 20));
        assert_eq!(*pixels.get_pixel(5, 5), Rgba([0, 0, 255, 255]));
    }

    #[tokio::test]
    async fn test_data_url_candidate() {
        let url = format!("data:image/png;base64,{}", STANDARD.encode(png_bytes([0, 255, 0, 255])));
        let logo = loader()
            .load(&LogoCandidate::Url(url), LogoOutcome::Requested)
            .await
            .unwrap();
        assert_eq!(logo.mime, "image/png");
        assert!(logo.data_url().starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_cascade_skips_broken_candidates() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("fallback.svg");
        std::fs::write(&good, SVG).unwrap();

        let candidates = vec![
            (LogoCandidate::Path(dir.path().join("missing.png")), LogoOutcome::Requested),
            (LogoCandidate::Path(good), LogoOutcome::Fallback),
        ];
        let logo = loader().load_first(&candidates).await.unwrap();
        assert_eq!(logo.outcome, LogoOutcome::Fallback);
    }

    #[tokio::test]
    async fn test_cascade_undecodable_counts_as_failure() {
        let candidates = vec![(
            LogoCandidate::Inline {
                name: "broken".to_string(),
                bytes: Arc::from(&b"\x89PNG\r\n\x1a\ngarbage"[..]),
            },
            LogoOutcome::Requested,
        )];
        assert!(loader().load_first(&candidates).await.is_none());
    }

    #[tokio::test]
    async fn test_http_candidate_and_status_failure() {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let body = png_bytes([9, 9, 9, 255]);
        std::thread::spawn(move || {
            for req in server.incoming_requests().take(2) {
                let resp = if req.url() == "/logo.png" {
                    tiny_http::Response::from_data(body.clone())
                } else {
                    tiny_http::Response::from_data(Vec::new()).with_status_code(404)
                };
                let _ = req.respond(resp);
            }
        });

        let candidates = vec![
            (LogoCandidate::Url(format!("http://{}/gone.png", addr)), LogoOutcome::Requested),
            (LogoCandidate::Url(format!("http://{}/logo.png", addr)), LogoOutcome::Fallback),
        ];
        let logo = loader().load_first(&candidates).await.unwrap();
        assert_eq!(logo.outcome, LogoOutcome::Fallback);
        assert_eq!(*logo.pixels.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
    }
}
