use crate::domain::model::{GarmentRegion, GarmentSelection, ImageSource};

/// Garment choice for the current session. Last write wins; submissions read a
/// [`snapshot`](SelectionStore::snapshot) once.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    garment: Option<ImageSource>,
    region: GarmentRegion,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select_garment(&mut self, garment: ImageSource) {
        tracing::debug!("Garment selected: {:?}", garment_label(&garment));
        self.garment = Some(garment);
    }

    pub fn clear_garment(&mut self) {
        self.garment = None;
    }

    pub fn set_region(&mut self, region: GarmentRegion) {
        self.region = region;
    }

    pub fn garment(&self) -> Option<&ImageSource> {
        self.garment.as_ref()
    }

    pub fn region(&self) -> GarmentRegion {
        self.region
    }

    pub fn snapshot(&self) -> GarmentSelection {
        GarmentSelection {
            garment: self.garment.clone(),
            region: self.region,
        }
    }
}

fn garment_label(source: &ImageSource) -> String {
    match source {
        ImageSource::Bytes(bytes) => format!("<{} bytes>", bytes.len()),
        ImageSource::File(path) => path.display().to_string(),
        ImageSource::Url(url) if url.starts_with("data:") => "<data url>".to_string(),
        ImageSource::Url(url) => url.clone(),
    }
}
