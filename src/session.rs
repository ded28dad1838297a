//! # Frame Session
//!
//! A single-threaded event loop that owns one displayed surface.
//!
//! Callers talk to it through a [`SessionHandle`]: render requests and
//! pointer events go in as [`SessionEvent`]s, the current state comes out
//! through a `watch` channel. Image loads run on their own tasks and post
//! their completion back into the same queue, so a load completion and a
//! click are never handled at the same time, and every draw finishes before
//! the next event is looked at.
//!
//! ## Last request wins
//!
//! Every `Render` bumps a generation counter. A load completion carries the
//! generation it was started for; if a newer request has been issued since,
//! the completion is dropped. In-flight loads are never aborted, their
//! results are just ignored. A new request also retires the shown surface's
//! Download control, so clicks during the load hit nothing.
//!
//! The loop stops on [`SessionEvent::Shutdown`] or once every
//! [`SessionHandle`] is dropped; load tasks only hold a weak sender.

use image::RgbaImage;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::error::MarcoError;
use crate::interaction::{self, PointerEvent};
use crate::render::{Compositor, ImageLoader, RenderRequest, RenderedSurface};

/// Called when a click lands on the Download control.
pub type DownloadCallback = Box<dyn FnMut(&RenderedSurface) + Send>;

/// Messages consumed by the session loop.
#[derive(Debug)]
pub enum SessionEvent {
    /// Start rendering a new request, superseding any pending one.
    Render(RenderRequest),
    /// A source image finished loading (posted by the load task).
    ImageLoaded {
        generation: u64,
        request: RenderRequest,
        result: Result<RgbaImage, MarcoError>,
    },
    /// A click on the displayed surface.
    Pointer(PointerEvent),
    /// Stop the loop.
    Shutdown,
}

/// What the session is currently showing.
#[derive(Debug, Clone, Default)]
pub enum SessionStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// Waiting for the source image of `generation`.
    Loading { generation: u64 },
    /// A finished surface.
    Ready(Arc<RenderedSurface>),
    /// The latest request's image failed to load.
    Failed(String),
}

/// Snapshot published after every handled event.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// Latest issued generation.
    pub generation: u64,
    pub status: SessionStatus,
    /// Completions dropped because a newer request existed.
    pub discarded: u64,
    /// Clicks that fired the download callback.
    pub downloads: u64,
}

impl SessionState {
    /// The surface currently shown, if any.
    pub fn surface(&self) -> Option<&Arc<RenderedSurface>> {
        match &self.status {
            SessionStatus::Ready(surface) => Some(surface),
            _ => None,
        }
    }
}

/// Sending side of a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<SessionEvent>,
    state: watch::Receiver<SessionState>,
}

impl SessionHandle {
    /// Queue a render. Returns false if the session has stopped.
    pub fn render(&self, request: RenderRequest) -> bool {
        self.tx.send(SessionEvent::Render(request)).is_ok()
    }

    /// Queue a click. Returns false if the session has stopped.
    pub fn pointer(&self, event: PointerEvent) -> bool {
        self.tx.send(SessionEvent::Pointer(event)).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(SessionEvent::Shutdown);
    }

    /// Current state snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// A receiver for awaiting state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.clone()
    }
}

/// The loop's owned state.
pub struct FrameSession {
    compositor: Compositor,
    loader: Arc<dyn ImageLoader>,
    on_download: Option<DownloadCallback>,
    rng: StdRng,
    tx: mpsc::WeakUnboundedSender<SessionEvent>,
    rx: mpsc::UnboundedReceiver<SessionEvent>,
    state: watch::Sender<SessionState>,
    generation: u64,
    current: Option<Arc<RenderedSurface>>,
}

impl FrameSession {
    /// Start a session on the current tokio runtime.
    pub fn spawn(
        compositor: Compositor,
        loader: Arc<dyn ImageLoader>,
        on_download: Option<DownloadCallback>,
    ) -> SessionHandle {
        Self::spawn_with_rng(compositor, loader, on_download, StdRng::from_os_rng())
    }

    /// Start a session with a fixed random source (reproducible decorations).
    pub fn spawn_with_rng(
        compositor: Compositor,
        loader: Arc<dyn ImageLoader>,
        on_download: Option<DownloadCallback>,
        rng: StdRng,
    ) -> SessionHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state, state_rx) = watch::channel(SessionState::default());
        let session = FrameSession {
            compositor,
            loader,
            on_download,
            rng,
            tx: tx.downgrade(),
            rx,
            state,
            generation: 0,
            current: None,
        };
        tokio::spawn(session.run());
        SessionHandle { tx, state: state_rx }
    }

    async fn run(mut self) {
        while let Some(event) = self.rx.recv().await {
            if !self.handle(event) {
                break;
            }
        }
        tracing::debug!("frame session stopped");
    }

    /// Handle one event to completion. Returns false to stop the loop.
    fn handle(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::Render(request) => self.start_render(request),
            SessionEvent::ImageLoaded {
                generation,
                request,
                result,
            } => self.finish_render(generation, request, result),
            SessionEvent::Pointer(pointer) => self.click(pointer),
            SessionEvent::Shutdown => return false,
        }
        true
    }

    fn start_render(&mut self, request: RenderRequest) {
        self.generation += 1;
        let generation = self.generation;
        tracing::debug!(generation, frame = %request.frame_id, source = %request.source.describe(), "render requested");

        // The old control belongs to the old frame
        self.current = None;

        let loader = self.loader.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = loader.load(&request.source).await;
            // Every handle may be gone by now; nothing to do then
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(SessionEvent::ImageLoaded {
                    generation,
                    request,
                    result,
                });
            }
        });

        self.state.send_modify(|s| {
            s.generation = generation;
            s.status = SessionStatus::Loading { generation };
        });
    }

    fn finish_render(&mut self, generation: u64, request: RenderRequest, result: Result<RgbaImage, MarcoError>) {
        if generation != self.generation {
            tracing::debug!(generation, latest = self.generation, "discarding stale image load");
            self.state.send_modify(|s| s.discarded += 1);
            return;
        }

        match result {
            Ok(image) => {
                let surface = Arc::new(self.compositor.render(&request, &image, &mut self.rng));
                self.current = Some(surface.clone());
                self.state.send_modify(|s| s.status = SessionStatus::Ready(surface));
            }
            Err(e) => {
                tracing::warn!(generation, error = %e, "source image failed to load");
                // Keep no stale surface around for hit-testing
                self.current = None;
                self.state.send_modify(|s| s.status = SessionStatus::Failed(e.to_string()));
            }
        }
    }

    fn click(&mut self, pointer: PointerEvent) {
        let Some(surface) = self.current.clone() else {
            return;
        };
        let fired = match self.on_download.as_mut() {
            Some(callback) => {
                let mut fire = || callback(&*surface);
                interaction::handle_pointer_event(&pointer, &surface, Some(&mut fire))
            }
            None => interaction::handle_pointer_event(&pointer, &surface, None),
        };
        if fired {
            tracing::info!(frame = %surface.frame_id, "download requested");
            self.state.send_modify(|s| s.downloads += 1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::FrameCatalog;
    use crate::render::ImageSource;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;

    /// Loader returning blank images sized by URL, optionally waiting on a gate.
    #[derive(Default)]
    struct GatedLoader {
        sizes: HashMap<String, (u32, u32)>,
        gates: HashMap<String, Arc<Notify>>,
    }

    #[async_trait]
    impl ImageLoader for GatedLoader {
        async fn load(&self, source: &ImageSource) -> Result<RgbaImage, MarcoError> {
            let ImageSource::Url(url) = source else {
                return Err(MarcoError::Load("url only".into()));
            };
            if let Some(gate) = self.gates.get(url) {
                gate.notified().await;
            }
            let (w, h) = self
                .sizes
                .get(url)
                .copied()
                .ok_or_else(|| MarcoError::Load(format!("404 {}", url)))?;
            Ok(RgbaImage::from_pixel(w, h, image::Rgba([200, 100, 50, 255])))
        }
    }

    fn compositor() -> Compositor {
        Compositor::new(Arc::new(FrameCatalog::festive()))
    }

    fn url(u: &str) -> ImageSource {
        ImageSource::Url(u.to_string())
    }

    async fn wait_until(handle: &SessionHandle, pred: impl Fn(&SessionState) -> bool) -> SessionState {
        let mut rx = handle.subscribe();
        let state = rx.wait_for(|s| pred(s)).await.unwrap();
        state.clone()
    }

    #[tokio::test]
    async fn test_render_publishes_surface() {
        let mut loader = GatedLoader::default();
        loader.sizes.insert("a".into(), (30, 20));
        let handle = FrameSession::spawn_with_rng(compositor(), Arc::new(loader), None, StdRng::seed_from_u64(1));

        assert!(handle.render(RenderRequest::new(url("a"), "party")));
        let state = wait_until(&handle, |s| s.surface().is_some()).await;
        let surface = state.surface().unwrap();
        assert_eq!(surface.size(), (30 + 150, 20 + 150 + 40));
        assert_eq!(state.generation, 1);
        handle.shutdown();
    }

    #[tokio::test]
    async fn test_last_request_wins() {
        let gate = Arc::new(Notify::new());
        let mut loader = GatedLoader::default();
        loader.sizes.insert("slow".into(), (10, 10));
        loader.sizes.insert("fast".into(), (20, 20));
        loader.gates.insert("slow".into(), gate.clone());
        let handle = FrameSession::spawn_with_rng(compositor(), Arc::new(loader), None, StdRng::seed_from_u64(1));

        handle.render(RenderRequest::new(url("slow"), "festive"));
        handle.render(RenderRequest::new(url("fast"), "none"));

        let state = wait_until(&handle, |s| s.surface().is_some()).await;
        assert_eq!(state.surface().unwrap().frame_id, "none");

        // Let the superseded load finish; its result must be dropped
        gate.notify_one();
        let state = wait_until(&handle, |s| s.discarded == 1).await;
        let surface = state.surface().unwrap();
        assert_eq!(surface.frame_id, "none");
        assert_eq!(surface.size(), (20, 20));
        assert_eq!(state.generation, 2);
        handle.shutdown();
    }

    #[tokio::test]
    async fn test_load_failure_is_reported() {
        let handle = FrameSession::spawn(compositor(), Arc::new(GatedLoader::default()), None);
        handle.render(RenderRequest::new(url("missing"), "party"));
        let state = wait_until(&handle, |s| matches!(s.status, SessionStatus::Failed(_))).await;
        let SessionStatus::Failed(message) = state.status else {
            unreachable!()
        };
        assert!(message.contains("404"));
        handle.shutdown();
    }

    #[tokio::test]
    async fn test_click_on_control_fires_callback() {
        let mut loader = GatedLoader::default();
        loader.sizes.insert("a".into(), (200, 100));
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let callback: DownloadCallback = {
            let fired = fired.clone();
            let seen = seen.clone();
            Box::new(move |surface: &RenderedSurface| {
                fired.fetch_add(1, Ordering::SeqCst);
                seen.lock().unwrap().push(surface.frame_id.clone());
            })
        };
        let handle = FrameSession::spawn(compositor(), Arc::new(loader), Some(callback));

        handle.render(RenderRequest::new(url("a"), "celebration"));
        let state = wait_until(&handle, |s| s.surface().is_some()).await;
        let surface = state.surface().unwrap().clone();
        let region = surface.hit_region.unwrap();
        let (w, h) = surface.size();

        // Displayed at half size; aim for the middle of the control
        let event = PointerEvent::new(
            (region.x + region.width / 2.0) / 2.0,
            (region.y + region.height / 2.0) / 2.0,
            w as f32 / 2.0,
            h as f32 / 2.0,
        );
        handle.pointer(PointerEvent::new(1.0, 1.0, w as f32 / 2.0, h as f32 / 2.0));
        handle.pointer(event);

        wait_until(&handle, |s| s.downloads == 1).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), vec!["celebration".to_string()]);
        handle.shutdown();
    }

    fn counting_callback() -> (Arc<AtomicUsize>, DownloadCallback) {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let callback: DownloadCallback = Box::new(move |_: &RenderedSurface| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (fired, callback)
    }

    /// A click in the middle of `surface`'s control, displayed at native size.
    fn click_on_control(surface: &RenderedSurface) -> PointerEvent {
        let region = surface.hit_region.unwrap();
        let (w, h) = surface.size();
        PointerEvent::new(
            region.x + region.width / 2.0,
            region.y + region.height / 2.0,
            w as f32,
            h as f32,
        )
    }

    #[tokio::test]
    async fn test_click_before_render_is_ignored() {
        let (fired, callback) = counting_callback();
        let handle = FrameSession::spawn(compositor(), Arc::new(GatedLoader::default()), Some(callback));
        assert!(handle.pointer(PointerEvent::new(1.0, 1.0, 1.0, 1.0)));

        // Events are handled in order, so the click is done once this fails
        handle.render(RenderRequest::new(url("missing"), "party"));
        let state = wait_until(&handle, |s| matches!(s.status, SessionStatus::Failed(_))).await;
        assert_eq!(state.downloads, 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        handle.shutdown();
    }

    #[tokio::test]
    async fn test_old_control_is_dead_while_next_render_loads() {
        let gate = Arc::new(Notify::new());
        let mut loader = GatedLoader::default();
        loader.sizes.insert("a".into(), (200, 100));
        loader.sizes.insert("b".into(), (50, 50));
        loader.gates.insert("b".into(), gate.clone());
        let (fired, callback) = counting_callback();
        let handle = FrameSession::spawn(compositor(), Arc::new(loader), Some(callback));

        handle.render(RenderRequest::new(url("a"), "party"));
        let state = wait_until(&handle, |s| s.surface().is_some()).await;
        let old = state.surface().unwrap().clone();

        handle.render(RenderRequest::new(url("b"), "none"));
        wait_until(&handle, |s| matches!(s.status, SessionStatus::Loading { generation: 2 })).await;
        handle.pointer(click_on_control(&old));

        // The click is queued ahead of b's completion
        gate.notify_one();
        let state = wait_until(&handle, |s| s.surface().is_some()).await;
        assert_eq!(state.surface().unwrap().frame_id, "none");
        assert_eq!(state.downloads, 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);
        handle.shutdown();
    }

    #[tokio::test]
    async fn test_session_stops_when_handles_drop() {
        let gate = Arc::new(Notify::new());
        let mut loader = GatedLoader::default();
        loader.sizes.insert("a".into(), (10, 10));
        loader.gates.insert("a".into(), gate.clone());
        let loader = Arc::new(loader);
        let handle = FrameSession::spawn(compositor(), loader.clone(), None);

        // A load still in flight must not keep the loop alive
        handle.render(RenderRequest::new(url("a"), "party"));
        wait_until(&handle, |s| s.generation == 1).await;
        drop(handle);
        gate.notify_one();

        tokio::time::timeout(std::time::Duration::from_secs(5), async {
            while Arc::strong_count(&loader) > 1 {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session still holds the loader");
    }
}
