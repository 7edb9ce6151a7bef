use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use usvg::fontdb;

use crate::fonts::layout::TextLayoutEngine;
use crate::foundation::error::{ChartError, ChartResult};

/// Face lookup parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceRequest<'a> {
    /// Preferred family; `None` asks for the generic sans-serif face.
    pub family: Option<&'a str>,
    /// CSS-style weight (100..=900).
    pub weight: u16,
}

/// Font bytes for one resolved face.
#[derive(Clone, Debug)]
pub struct LoadedFace {
    /// Family name reported by the font database.
    pub family: String,
    /// Raw font file bytes; shared across lookups of the same face.
    pub data: Arc<Vec<u8>>,
    /// Face index inside a collection file.
    pub index: u32,
}

/// Capability interface of the native font engine.
///
/// Implementations are process-wide and shared between the provisioner and the text renderer, so
/// every method takes `&self`.
pub trait FontBackend: Send + Sync {
    /// Family names of every registered face, deduplicated, in registration order.
    fn family_names(&self) -> Vec<String>;

    /// Register every face in the font file at `path`.
    fn register_font_file(&self, path: &Path) -> ChartResult<()>;

    /// Register every face in an in-memory font file.
    fn register_font_bytes(&self, bytes: Vec<u8>) -> ChartResult<()>;

    /// Scan the OS font directories.
    fn load_system_fonts(&self);

    /// Best face for `request`, falling back to any registered face.
    fn resolve_face(&self, request: &FaceRequest<'_>) -> Option<LoadedFace>;

    /// Advance width of `text` in pixels.
    fn measure_text(
        &self,
        text: &str,
        family: Option<&str>,
        size_px: f32,
        weight: u16,
    ) -> ChartResult<f32>;
}

/// [`FontBackend`] over a `fontdb` database with Parley measurement.
pub struct FontdbBackend {
    db: RwLock<fontdb::Database>,
    face_bytes: Mutex<HashMap<fontdb::ID, Arc<Vec<u8>>>>,
    layout: Mutex<TextLayoutEngine>,
}

impl Default for FontdbBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FontdbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let faces = self.db.read().map(|db| db.len()).unwrap_or(0);
        f.debug_struct("FontdbBackend")
            .field("faces", &faces)
            .finish_non_exhaustive()
    }
}

impl FontdbBackend {
    /// Empty database; nothing is loaded until a registration call.
    pub fn new() -> Self {
        Self {
            db: RwLock::new(fontdb::Database::new()),
            face_bytes: Mutex::new(HashMap::new()),
            layout: Mutex::new(TextLayoutEngine::new()),
        }
    }

    fn face_count(&self) -> usize {
        self.db.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn ensure_new_faces(&self, before: usize, what: &str) -> ChartResult<()> {
        if self.face_count() > before {
            Ok(())
        } else {
            Err(ChartError::font(format!("{what}: no usable font faces")))
        }
    }
}

impl FontBackend for FontdbBackend {
    fn family_names(&self) -> Vec<String> {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        let mut out: Vec<String> = Vec::new();
        for face in db.faces() {
            for (name, _) in &face.families {
                if !out.iter().any(|n| n == name) {
                    out.push(name.clone());
                }
            }
        }
        out
    }

    fn register_font_file(&self, path: &Path) -> ChartResult<()> {
        let before = self.face_count();
        self.db
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .load_font_file(path)
            .map_err(|e| ChartError::font(format!("load '{}': {e}", path.display())))?;
        self.ensure_new_faces(before, &path.display().to_string())
    }

    fn register_font_bytes(&self, bytes: Vec<u8>) -> ChartResult<()> {
        let before = self.face_count();
        self.db
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .load_font_data(bytes);
        self.ensure_new_faces(before, "in-memory font")
    }

    fn load_system_fonts(&self) {
        self.db
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .load_system_fonts();
    }

    fn resolve_face(&self, request: &FaceRequest<'_>) -> Option<LoadedFace> {
        let db = self.db.read().unwrap_or_else(PoisonError::into_inner);
        let mut families = Vec::with_capacity(2);
        if let Some(name) = request.family {
            families.push(fontdb::Family::Name(name));
        }
        families.push(fontdb::Family::SansSerif);
        let query = fontdb::Query {
            families: &families,
            weight: fontdb::Weight(request.weight.clamp(100, 900)),
            stretch: fontdb::Stretch::Normal,
            style: fontdb::Style::Normal,
        };
        let id = db.query(&query).or_else(|| db.faces().next().map(|f| f.id))?;
        let family = db
            .face(id)
            .and_then(|info| info.families.first())
            .map(|(name, _)| name.clone())?;

        let mut cache = self
            .face_bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let (data, index) = match cache.get(&id) {
            Some(data) => (data.clone(), db.face(id).map(|info| info.index).unwrap_or(0)),
            None => {
                let (data, index) =
                    db.with_face_data(id, |bytes, index| (Arc::new(bytes.to_vec()), index))?;
                cache.insert(id, data.clone());
                (data, index)
            }
        };
        Some(LoadedFace {
            family,
            data,
            index,
        })
    }

    fn measure_text(
        &self,
        text: &str,
        family: Option<&str>,
        size_px: f32,
        weight: u16,
    ) -> ChartResult<f32> {
        let face = self
            .resolve_face(&FaceRequest { family, weight })
            .ok_or_else(|| ChartError::font("no font face registered"))?;
        self.layout
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .measure(text, &face, size_px, weight)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fonts/backend.rs"]
mod tests;
