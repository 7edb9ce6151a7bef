use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::executor::block_on;

use super::*;
use crate::fonts::backend::{FaceRequest, LoadedFace};
use crate::foundation::error::{ChartError, ChartResult};

#[derive(Default)]
struct MockBackend {
    families: Mutex<Vec<String>>,
    system_families: Vec<String>,
    file_family: Option<String>,
    bytes_family: Option<String>,
    width: f32,
    system_loads: AtomicUsize,
    files: Mutex<Vec<PathBuf>>,
    byte_loads: AtomicUsize,
    scan_threads: Mutex<Vec<Option<String>>>,
}

impl MockBackend {
    fn add(&self, family: &str) {
        self.families.lock().unwrap().push(family.to_owned());
    }
}

impl FontBackend for MockBackend {
    fn family_names(&self) -> Vec<String> {
        self.families.lock().unwrap().clone()
    }

    fn register_font_file(&self, path: &Path) -> ChartResult<()> {
        self.files.lock().unwrap().push(path.to_path_buf());
        match &self.file_family {
            Some(f) => {
                self.add(f);
                Ok(())
            }
            None => Err(ChartError::font("file rejected")),
        }
    }

    fn register_font_bytes(&self, _bytes: Vec<u8>) -> ChartResult<()> {
        self.byte_loads.fetch_add(1, Ordering::SeqCst);
        match &self.bytes_family {
            Some(f) => {
                self.add(f);
                Ok(())
            }
            None => Err(ChartError::font("bytes rejected")),
        }
    }

    fn load_system_fonts(&self) {
        self.system_loads.fetch_add(1, Ordering::SeqCst);
        self.scan_threads
            .lock()
            .unwrap()
            .push(std::thread::current().name().map(str::to_owned));
        for f in &self.system_families {
            self.add(f);
        }
    }

    fn resolve_face(&self, _request: &FaceRequest<'_>) -> Option<LoadedFace> {
        None
    }

    fn measure_text(&self, text: &str, _: Option<&str>, _: f32, _: u16) -> ChartResult<f32> {
        Ok(self.width * text.len() as f32)
    }
}

struct MockFetcher {
    fail_first: usize,
    calls: AtomicUsize,
}

impl FontFetcher for MockFetcher {
    fn fetch<'a>(&'a self, url: &'a str, _max: usize) -> BoxFuture<'a, ChartResult<Vec<u8>>> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        let out = if n < self.fail_first {
            Err(ChartError::font(format!("{url}: unreachable")))
        } else {
            Ok(vec![1, 2, 3])
        };
        futures::future::ready(out).boxed()
    }
}

fn offline_config(dir: &Path) -> FontProvisionConfig {
    FontProvisionConfig {
        bundled_font: dir.join("bundled.ttf"),
        os_font_paths: Vec::new(),
        fallback_urls: vec!["https://a.invalid/f.ttf".into(), "https://b.invalid/f.ttf".into()],
        ..FontProvisionConfig::default()
    }
}

#[test]
fn system_fonts_satisfy_discovery_and_prefer_configured_family() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend {
        system_families: vec!["Zapfino".into(), "DejaVu Sans".into()],
        width: 7.0,
        ..MockBackend::default()
    });
    let p = FontProvisioner::new(backend.clone(), offline_config(dir.path()));

    assert!(p.resolved_family().is_none());
    assert!(block_on(p.ensure_fonts()));
    assert_eq!(p.resolved_family().as_deref(), Some("DejaVu Sans"));

    assert!(block_on(p.ensure_fonts()));
    assert_eq!(backend.system_loads.load(Ordering::SeqCst), 1);
}

#[test]
fn failure_is_not_memoized() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend {
        width: 7.0,
        ..MockBackend::default()
    });
    let p = FontProvisioner::new(backend.clone(), offline_config(dir.path()).without_network());

    assert!(!block_on(p.ensure_fonts()));
    assert!(p.resolved_family().is_none());
    assert!(!block_on(p.ensure_fonts()));
    assert_eq!(backend.system_loads.load(Ordering::SeqCst), 2);
}

#[test]
fn existing_bundled_font_is_registered_first() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = offline_config(dir.path());
    std::fs::write(&cfg.bundled_font, b"font").unwrap();
    let backend = Arc::new(MockBackend {
        file_family: Some("Inter".into()),
        width: 7.0,
        ..MockBackend::default()
    });
    let p = FontProvisioner::new(backend.clone(), cfg.clone());

    assert!(block_on(p.ensure_fonts()));
    assert_eq!(*backend.files.lock().unwrap(), vec![cfg.bundled_font]);
    assert_eq!(p.resolved_family().as_deref(), Some("Inter"));
}

#[test]
fn os_font_probe_registers_first_existing_path_only() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.ttf");
    let b = dir.path().join("b.ttf");
    std::fs::write(&a, b"a").unwrap();
    std::fs::write(&b, b"b").unwrap();
    let cfg = FontProvisionConfig {
        os_font_paths: vec![dir.path().join("missing.ttf"), a.clone(), b],
        ..offline_config(dir.path())
    };
    let backend = Arc::new(MockBackend {
        file_family: Some("OsSans".into()),
        width: 7.0,
        ..MockBackend::default()
    });
    let p = FontProvisioner::new(backend.clone(), cfg);

    assert!(block_on(p.ensure_fonts()));
    assert_eq!(*backend.files.lock().unwrap(), vec![a]);
}

#[test]
fn download_falls_back_to_in_memory_registration() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend {
        bytes_family: Some("Downloaded".into()),
        width: 7.0,
        ..MockBackend::default()
    });
    let fetcher = Arc::new(MockFetcher {
        fail_first: 1,
        calls: AtomicUsize::new(0),
    });
    let p = FontProvisioner::new(backend.clone(), offline_config(dir.path()))
        .with_fetcher(fetcher.clone());

    assert!(block_on(p.ensure_fonts()));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    // One temp-file attempt was made and rejected before the in-memory path.
    let files = backend.files.lock().unwrap().clone();
    assert_eq!(files.len(), 1);
    for f in files {
        let _ = std::fs::remove_file(f);
    }
    assert_eq!(backend.byte_loads.load(Ordering::SeqCst), 1);
    assert_eq!(p.resolved_family().as_deref(), Some("Downloaded"));
}

#[test]
fn disabled_network_never_fetches() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend::default());
    let fetcher = Arc::new(MockFetcher {
        fail_first: 0,
        calls: AtomicUsize::new(0),
    });
    let p = FontProvisioner::new(backend, offline_config(dir.path()).without_network())
        .with_fetcher(fetcher.clone());

    assert!(!block_on(p.ensure_fonts()));
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn zero_width_measurement_fails_the_sanity_check() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend {
        system_families: vec!["Ghost".into()],
        width: 0.0,
        ..MockBackend::default()
    });
    let p = FontProvisioner::new(backend, offline_config(dir.path()));

    assert!(!block_on(p.ensure_fonts()));
    assert!(p.resolved_family().is_none());
}

#[test]
fn font_scan_runs_off_the_polling_thread() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(MockBackend {
        system_families: vec!["DejaVu Sans".into()],
        width: 7.0,
        ..MockBackend::default()
    });
    let p = FontProvisioner::new(backend.clone(), offline_config(dir.path()));

    assert!(block_on(p.ensure_fonts()));
    assert_eq!(
        *backend.scan_threads.lock().unwrap(),
        vec![Some("chartsnap-fonts".to_owned())]
    );
}
