use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};

use image::io::Reader as ImageReader;
use rand::Rng;
use threadpool::ThreadPool;

use crate::imagery::Raster;

/// The one failure mode of a round: the photo could not be fetched or
/// decoded. The two causes are indistinguishable to the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadError(String);

impl LoadError {
    pub fn new<S: Into<String>>(reason: S) -> Self {
        Self(reason.into())
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// A finished load job, tagged with the generation of the request that
/// started it so the controller can discard superseded completions.
#[derive(Debug)]
pub struct LoadDone {
    pub generation: u64,
    pub result: Result<Raster, LoadError>,
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

/// The static list of photo sources rounds draw from.
pub struct ImagePool {
    sources: Vec<PathBuf>,
}

impl ImagePool {
    /// Build the pool from explicit paths plus everything that looks like an
    /// image inside `pool_dir`. An empty pool is a configuration error.
    pub fn from_sources(paths: &[String], pool_dir: Option<&str>) -> Result<Self, String> {
        let mut sources: Vec<PathBuf> = paths.iter().map(PathBuf::from).collect();

        if let Some(dir) = pool_dir {
            let entries = std::fs::read_dir(dir)
                .map_err(|err| format!("Can't read image pool directory '{}': {}", dir, err))?;
            let mut found = entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.extension()
                        .and_then(|ext| ext.to_str())
                        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                        .unwrap_or(false)
                })
                .collect::<Vec<_>>();
            found.sort();
            sources.append(&mut found);
        }

        if sources.is_empty() {
            Err("The image pool is empty; pass image files or --pool-dir.".into())
        } else {
            Ok(Self { sources })
        }
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Uniform-random pick; each retry draws a fresh source.
    pub fn pick(&self) -> &Path {
        let index = rand::thread_rng().gen_range(0..self.sources.len());
        &self.sources[index]
    }
}

/// Runs load jobs off the event loop. Jobs are never cancelled; a stale
/// completion is delivered anyway and dropped by the game's generation
/// check.
pub struct Loader {
    workers: ThreadPool,
    tx: Sender<LoadDone>,
    rx: Receiver<LoadDone>,
    width: u32,
    height: u32,
}

impl Loader {
    pub fn new(width: u32, height: u32) -> Self {
        let (tx, rx) = channel();
        Self {
            workers: ThreadPool::new(2),
            tx,
            rx,
            width,
            height,
        }
    }

    /// Start decoding `source` in the background. The result arrives on the
    /// channel polled by [`Loader::try_recv`].
    pub fn request(&self, generation: u64, source: &Path) {
        let tx = self.tx.clone();
        let source = source.to_path_buf();
        let (width, height) = (self.width, self.height);
        self.workers.execute(move || {
            let result = load_raster(&source, width, height);
            // The receiver is gone during shutdown; nothing to deliver to.
            let _ = tx.send(LoadDone { generation, result });
        });
    }

    pub fn try_recv(&self) -> Option<LoadDone> {
        self.rx.try_recv().ok()
    }
}

fn load_raster(source: &Path, width: u32, height: u32) -> Result<Raster, LoadError> {
    let img = ImageReader::open(source)
        .map_err(|err| LoadError::new(format!("{}: {}", source.display(), err)))?
        .decode()
        .map_err(|err| LoadError::new(format!("{}: {}", source.display(), err)))?;
    Ok(Raster::drawn_from(&img, width, height))
}

#[cfg(test)]
mod test {
    use super::*;
    use std::time::Duration;

    fn temp_png(name: &str) -> PathBuf {
        let path = std::env::temp_dir().join(name);
        image::DynamicImage::new_rgb8(16, 12)
            .save(&path)
            .expect("Unable to write test image");
        path
    }

    #[test]
    fn test_pool_refuses_to_be_empty() {
        assert!(ImagePool::from_sources(&[], None).is_err());
    }

    #[test]
    fn test_pool_pick_draws_from_the_list() {
        let pool = ImagePool::from_sources(&["a.png".into(), "b.png".into()], None).unwrap();
        assert_eq!(2, pool.len());
        for _ in 0..10 {
            let picked = pool.pick();
            assert!(picked == Path::new("a.png") || picked == Path::new("b.png"));
        }
    }

    #[test]
    fn test_load_raster_scales_to_game_dimensions() {
        let path = temp_png("hue_hunt_load_ok.png");
        let raster = load_raster(&path, 8, 6).unwrap();
        assert_eq!(8, raster.width());
        assert_eq!(6, raster.height());
    }

    #[test]
    fn test_load_raster_reports_missing_files() {
        let missing = std::env::temp_dir().join("hue_hunt_definitely_not_here.png");
        assert!(load_raster(&missing, 8, 6).is_err());
    }

    #[test]
    fn test_loader_delivers_tagged_completions() {
        let path = temp_png("hue_hunt_loader_roundtrip.png");
        let loader = Loader::new(4, 4);
        loader.request(7, &path);
        let done = loader
            .rx
            .recv_timeout(Duration::from_secs(10))
            .expect("load job never completed");
        assert_eq!(7, done.generation);
        assert!(done.result.is_ok());
    }
}
