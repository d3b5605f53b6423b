//! Generator session that owns the form and the current artifact

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::{mpsc, Mutex, RwLock};

use crate::community::{CommunityDescriptor, CommunityList, CommunityLoader};
use crate::export::{ExportFormat, Exporter};
use crate::form::{FormState, LogoSource, UploadedImage};
use crate::render::{LogoOutcome, RenderedArtifact, Renderer};
use crate::{Config, Result};

/// Events emitted by the studio
#[derive(Debug, Clone)]
pub enum StudioEvent {
    /// Community list finished loading (possibly empty)
    CommunitiesLoaded { count: usize, default: Option<String> },
    /// A generation pass began for this payload
    GenerationStarted { payload: String },
    /// New artifact is in place
    GenerationFinished { logo: LogoOutcome },
    /// Blank payload, nothing was rendered
    GenerationSkipped,
    /// Encoding failed; the previous artifact is kept
    GenerationFailed(String),
    /// Files written by an export
    Exported(Vec<PathBuf>),
}

/// Counts one queued or running pass until dropped, cancellation included
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Single form/artifact pair plus the collaborators that act on it
///
/// Generation requests are serialized through a FIFO gate, so each pass
/// renders its own snapshot and results land in call order.
pub struct Studio {
    renderer: Renderer,
    exporter: Exporter,
    loader: CommunityLoader,
    communities: RwLock<CommunityList>,
    form: RwLock<FormState>,
    artifact: RwLock<Option<RenderedArtifact>>,
    gate: Mutex<()>,
    in_flight: AtomicUsize,
    events: Option<mpsc::Sender<StudioEvent>>,
}

impl Studio {
    /// Create a studio with an empty form
    pub fn new(config: Config) -> Self {
        Self {
            renderer: Renderer::new(&config),
            exporter: Exporter::new(&config),
            loader: CommunityLoader::new(&config),
            communities: RwLock::new(CommunityList::default()),
            form: RwLock::new(FormState::default()),
            artifact: RwLock::new(None),
            gate: Mutex::new(()),
            in_flight: AtomicUsize::new(0),
            events: None,
        }
    }

    /// Start receiving studio events
    pub fn subscribe(&mut self) -> mpsc::Receiver<StudioEvent> {
        let (tx, rx) = mpsc::channel(64);
        self.events = Some(tx);
        rx
    }

    fn emit(&self, event: StudioEvent) {
        if let Some(tx) = &self.events {
            if tx.try_send(event).is_err() {
                tracing::debug!("studio event dropped, receiver lagging or gone");
            }
        }
    }

    /// Fetch the community list once and preselect the default logo
    pub async fn load_communities(&self) -> usize {
        let list = self.loader.load().await;
        let count = list.len();
        let default = list.default_entry().cloned();

        if let Some(community) = &default {
            let mut form = self.form.write().await;
            if form.logo.is_none() {
                *form = form.clone().with_logo(LogoSource::Community(community.clone()));
            }
        }

        self.emit(StudioEvent::CommunitiesLoaded {
            count,
            default: default.as_ref().and_then(|c| c.label().map(str::to_string)),
        });
        *self.communities.write().await = list;
        count
    }

    pub async fn communities(&self) -> CommunityList {
        self.communities.read().await.clone()
    }

    /// Current form snapshot
    pub async fn form(&self) -> FormState {
        self.form.read().await.clone()
    }

    /// Replace the form with a derived snapshot
    pub async fn update_form<F>(&self, update: F) -> FormState
    where
        F: FnOnce(FormState) -> FormState,
    {
        let mut form = self.form.write().await;
        *form = update(form.clone());
        form.clone()
    }

    /// Pick a community logo by index or label
    pub async fn select_community(&self, query: &str) -> Option<CommunityDescriptor> {
        let community = self.communities.read().await.find(query).cloned()?;
        self.update_form(|f| f.with_logo(LogoSource::Community(community.clone())))
            .await;
        Some(community)
    }

    /// Read an image file into the form as the logo
    pub async fn upload_logo(&self, path: &Path) -> Result<UploadedImage> {
        let upload = UploadedImage::from_path(path).await?;
        self.update_form(|f| f.with_logo(LogoSource::Uploaded(upload.clone())))
            .await;
        Ok(upload)
    }

    pub async fn clear_logo(&self) {
        self.update_form(|f| f.with_logo(LogoSource::None)).await;
    }

    /// Whether any generation pass is queued or running
    pub fn is_generating(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Render the current form
    pub async fn generate(&self) -> Option<RenderedArtifact> {
        let snapshot = self.form().await;
        self.generate_snapshot(snapshot).await
    }

    /// Render a given snapshot and install the result
    ///
    /// Never fails: blank payloads and encoding errors leave the current
    /// artifact untouched and are reported through events and logs.
    pub async fn generate_snapshot(&self, snapshot: FormState) -> Option<RenderedArtifact> {
        if !snapshot.can_generate() {
            self.emit(StudioEvent::GenerationSkipped);
            return None;
        }

        let _pending = InFlight::enter(&self.in_flight);
        let _turn = self.gate.lock().await;
        self.emit(StudioEvent::GenerationStarted {
            payload: snapshot.payload.clone(),
        });

        match self.renderer.render(&snapshot).await {
            Ok(Some(artifact)) => {
                *self.artifact.write().await = Some(artifact.clone());
                self.emit(StudioEvent::GenerationFinished { logo: artifact.logo });
                Some(artifact)
            }
            Ok(None) => {
                self.emit(StudioEvent::GenerationSkipped);
                None
            }
            Err(e) => {
                tracing::error!("error generating QR code: {}", e);
                self.emit(StudioEvent::GenerationFailed(e.to_string()));
                None
            }
        }
    }

    /// Most recent artifact, if any
    pub async fn artifact(&self) -> Option<RenderedArtifact> {
        self.artifact.read().await.clone()
    }

    /// Save the current artifact; empty when nothing was generated yet
    pub async fn export(&self, format: ExportFormat) -> Result<Vec<PathBuf>> {
        let artifact = self.artifact.read().await;
        let written = self.exporter.export(artifact.as_ref(), format).await?;
        if !written.is_empty() {
            self.emit(StudioEvent::Exported(written.clone()));
        }
        Ok(written)
    }
}
