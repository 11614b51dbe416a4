//! In-memory generic data store

use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::{debug, info};

use crate::slide::{ImageId, Slide, SlideStream};

use super::service::DataStore;
use super::types::{AnnotationCollection, StoreError};

/// Data store keeping slides and polygons in memory for one workflow run
///
/// Slides are kept in registration order, which is also the order of the
/// main slide stream.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    slides: IndexMap<ImageId, Slide>,
    polygons: Option<AnnotationCollection>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with the given slides registered in order
    pub fn with_slides<I>(slides: I) -> Result<Self, StoreError>
    where
        I: IntoIterator<Item = Slide>,
    {
        let mut store = Self::new();
        for slide in slides {
            store.register_slide(slide)?;
        }
        Ok(store)
    }

    /// Register a slide; ids must be unique within the store
    pub fn register_slide(&mut self, slide: Slide) -> Result<(), StoreError> {
        match self.slides.entry(slide.id().clone()) {
            Entry::Occupied(entry) => Err(StoreError::DuplicateImage(entry.key().clone())),
            Entry::Vacant(entry) => {
                info!(
                    "Registered slide {} ({}x{})",
                    slide.id(),
                    slide.width(),
                    slide.height()
                );
                entry.insert(slide);
                Ok(())
            }
        }
    }

    /// Look up a registered slide
    pub fn slide(&self, id: &ImageId) -> Result<&Slide, StoreError> {
        self.slides
            .get(id)
            .ok_or_else(|| StoreError::UnknownImage(id.clone()))
    }

    pub fn contains_image(&self, id: &ImageId) -> bool {
        self.slides.contains_key(id)
    }

    /// Registered image ids in registration order
    pub fn image_ids(&self) -> impl Iterator<Item = &ImageId> {
        self.slides.keys()
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Fail with `UnknownImage` on the first id not registered
    pub(crate) fn ensure_known<'a, I>(&self, ids: I) -> Result<(), StoreError>
    where
        I: IntoIterator<Item = &'a ImageId>,
    {
        match ids.into_iter().find(|id| !self.contains_image(id)) {
            Some(id) => Err(StoreError::UnknownImage(id.clone())),
            None => Ok(()),
        }
    }
}

impl DataStore for InMemoryStore {
    fn get_main_slide_stream(&self) -> Result<SlideStream, StoreError> {
        let slides: Vec<Slide> = self.slides.values().cloned().collect();
        debug!("Opening slide stream over {} slides", slides.len());
        Ok(SlideStream::new(slides))
    }

    fn store_polygons(&mut self, polygons: AnnotationCollection) -> Result<(), StoreError> {
        self.ensure_known(polygons.keys())?;

        let total: usize = polygons.values().map(Vec::len).sum();
        if self.polygons.is_some() {
            debug!("Replacing stored polygons");
        }
        info!("Stored {} polygons over {} images", total, polygons.len());

        self.polygons = Some(polygons);
        Ok(())
    }

    fn get_polygons(&self) -> Result<&AnnotationCollection, StoreError> {
        self.polygons
            .as_ref()
            .ok_or(StoreError::NoDataStoredYet("polygons"))
    }
}
