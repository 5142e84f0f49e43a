//! Background asset loading
//!
//! The typeface and every matcap texture are read and decoded on short-lived
//! loader threads. Results are handed to an [`AssetSink`], normally the winit
//! event loop proxy, so all scene mutation stays on the event-loop thread.

use std::{
    path::{Path, PathBuf},
    sync::{mpsc, Arc},
    thread::{self, JoinHandle},
};

use winit::event_loop::EventLoopProxy;

use crate::{
    config::DemoConfig,
    error::{Result, TextscapeError},
    gfx::{resources::material::TextureId, typeface::Font},
};

/// Decoded RGBA8 matcap image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatcapImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl MatcapImage {
    /// Reads and decodes an image file, converting it to RGBA8
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextscapeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("Decoded matcap {}x{} from {}", width, height, path.display());

        Ok(Self {
            rgba: rgba.into_raw(),
            width,
            height,
        })
    }
}

/// Outcome of one background load
#[derive(Debug)]
pub enum AssetEvent {
    FontLoaded(Arc<Font>),
    FontFailed(TextscapeError),
    MatcapLoaded { slot: TextureId, image: MatcapImage },
    MatcapFailed { slot: TextureId, error: TextscapeError },
}

/// User events delivered to the application's event loop
#[derive(Debug)]
pub enum DemoEvent {
    Asset(AssetEvent),
}

/// Destination for loader results
pub trait AssetSink: Clone + Send + 'static {
    fn deliver(&self, event: AssetEvent);
}

impl AssetSink for EventLoopProxy<DemoEvent> {
    fn deliver(&self, event: AssetEvent) {
        if self.send_event(DemoEvent::Asset(event)).is_err() {
            log::debug!("Event loop closed before an asset load finished");
        }
    }
}

impl AssetSink for mpsc::Sender<AssetEvent> {
    fn deliver(&self, event: AssetEvent) {
        if self.send(event).is_err() {
            log::debug!("Asset receiver dropped");
        }
    }
}

/// Loads the typeface on a background thread
pub fn spawn_font_load<S: AssetSink>(path: PathBuf, sink: S) -> JoinHandle<()> {
    thread::spawn(move || {
        let event = match Font::load(&path) {
            Ok(font) => AssetEvent::FontLoaded(Arc::new(font)),
            Err(error) => AssetEvent::FontFailed(error),
        };
        sink.deliver(event);
    })
}

/// Loads each matcap on its own background thread
///
/// The texture in `paths[i]` is delivered for slot `TextureId(i)`.
pub fn spawn_matcap_loads<S: AssetSink>(paths: Vec<PathBuf>, sink: S) -> Vec<JoinHandle<()>> {
    paths
        .into_iter()
        .enumerate()
        .map(|(index, path)| {
            let sink = sink.clone();
            thread::spawn(move || {
                let slot = TextureId(index);
                let event = match MatcapImage::load(&path) {
                    Ok(image) => AssetEvent::MatcapLoaded { slot, image },
                    Err(error) => AssetEvent::MatcapFailed { slot, error },
                };
                sink.deliver(event);
            })
        })
        .collect()
}

/// Starts every load the demo needs
pub fn start_loading<S: AssetSink>(config: &DemoConfig, sink: S) {
    log::info!(
        "Loading typeface {} and {} matcaps",
        config.font_file().display(),
        config.matcap_count()
    );
    spawn_font_load(config.font_file(), sink.clone());
    spawn_matcap_loads(config.matcap_files(), sink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::typeface::fixtures::TEST_TYPEFACE;
    use std::time::Duration;

    fn write_png(path: &Path, width: u32, height: u32) {
        let image = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        image.save(path).unwrap();
    }

    #[test]
    fn test_matcap_decodes_to_rgba() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("1.png");
        write_png(&path, 4, 2);

        let image = MatcapImage::load(&path).unwrap();
        assert_eq!((image.width, image.height), (4, 2));
        assert_eq!(image.rgba.len(), 4 * 2 * 4);
        assert_eq!(&image.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_missing_or_corrupt_image_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = MatcapImage::load(dir.path().join("nope.png"));
        assert!(matches!(missing, Err(TextscapeError::Image { .. })));

        let corrupt = dir.path().join("bad.png");
        std::fs::write(&corrupt, b"not a png").unwrap();
        assert!(matches!(
            MatcapImage::load(&corrupt),
            Err(TextscapeError::Image { .. })
        ));
    }

    #[test]
    fn test_loaders_deliver_every_result() {
        let dir = tempfile::tempdir().unwrap();
        let config = DemoConfig::default().with_assets_dir(dir.path());

        std::fs::create_dir_all(config.font_file().parent().unwrap()).unwrap();
        std::fs::write(config.font_file(), TEST_TYPEFACE).unwrap();

        let files = config.matcap_files();
        std::fs::create_dir_all(files[0].parent().unwrap()).unwrap();
        // Slot 2 is left missing
        for (i, file) in files.iter().enumerate() {
            if i != 2 {
                write_png(file, 2, 2);
            }
        }

        let (sender, receiver) = mpsc::channel();
        start_loading(&config, sender);

        let mut font_loaded = false;
        let mut loaded_slots = Vec::new();
        let mut failed_slots = Vec::new();
        for _ in 0..1 + files.len() {
            match receiver.recv_timeout(Duration::from_secs(10)).unwrap() {
                AssetEvent::FontLoaded(font) => {
                    assert_eq!(font.glyph_count(), 5);
                    font_loaded = true;
                }
                AssetEvent::FontFailed(error) => panic!("font failed: {}", error),
                AssetEvent::MatcapLoaded { slot, .. } => loaded_slots.push(slot.0),
                AssetEvent::MatcapFailed { slot, .. } => failed_slots.push(slot.0),
            }
        }

        loaded_slots.sort();
        assert!(font_loaded);
        assert_eq!(loaded_slots, vec![0, 1, 3, 4]);
        assert_eq!(failed_slots, vec![2]);
    }

    #[test]
    fn test_font_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let (sender, receiver) = mpsc::channel();
        spawn_font_load(dir.path().join("missing.json"), sender)
            .join()
            .unwrap();

        assert!(matches!(
            receiver.recv().unwrap(),
            AssetEvent::FontFailed(TextscapeError::Io { .. })
        ));
    }
}
