use super::{locate, resolve_selection};
use crate::{
    config::Settings,
    document::Document,
    elements::{element_sub_paths, set_path_data},
    error::{Error, Result},
};
use log::{debug, warn};
use path_contours::{clip::ClipRegion, path::encode::polygons_to_path_data, polygon::Polygon};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ClipReport {
    pub clipped: usize,
    /// Targets entirely outside the clip region, left untouched.
    pub unchanged: usize,
    /// Groups, unsupported elements and invalid shapes.
    pub skipped: usize,
}

/// Clip every selected element after the first with the first selected element. Clipped
/// elements are rewritten as paths.
pub fn clip_elements(doc: &mut Document, ids: &[String], settings: &Settings) -> Result<ClipReport> {
    resolve_selection(doc, ids)?;
    let flatten = settings.flatten_options();
    let eps = settings.tolerance;

    let (clip_id, targets) = ids.split_first().ok_or(Error::NoSelection)?;
    let clip_path = locate(doc, clip_id)?;
    let clip_element = doc
        .element(&clip_path)
        .ok_or_else(|| Error::MissingElement(clip_id.clone()))?;
    let (_, clip_sub_paths) =
        element_sub_paths(clip_element, &flatten).map_err(|e| Error::InvalidClipShape {
            id: clip_id.clone(),
            reason: e.to_string(),
        })?;
    let clip_transform = clip_element.attr("transform").map(str::to_string);
    let region =
        ClipRegion::new(&clip_sub_paths, &settings.clip_options()).map_err(|source| {
            Error::Clip {
                id: clip_id.clone(),
                source,
            }
        })?;
    debug!(
        "clip region '{clip_id}' has {} segments",
        region.segments().len()
    );

    if targets.is_empty() {
        warn!("only the clip shape '{clip_id}' is selected, nothing to clip");
    }

    let mut report = ClipReport::default();
    for id in targets {
        if id == clip_id {
            continue;
        }
        let path = locate(doc, id)?;
        let Some(element) = doc.element(&path) else {
            continue;
        };
        if element.attr("transform") != clip_transform.as_deref() {
            warn!("{id}: transform differs from the clip shape, geometry is clipped untransformed");
        }

        let sub_paths = match element_sub_paths(element, &flatten) {
            Ok((_, sub_paths)) => sub_paths,
            Err(e) => {
                warn!("{e}");
                report.skipped += 1;
                continue;
            }
        };

        let clipped = region.clip_path(&sub_paths);
        if clipped.iter().all(|c| c.is_empty()) {
            warn!("{id}: clipped to nothing, will not be updated");
            report.unchanged += 1;
            continue;
        }

        let polygons: Vec<Polygon> = clipped.iter().flat_map(|c| c.to_polygons(eps)).collect();
        if let Some(element) = doc.element_mut(&path) {
            set_path_data(element, &polygons_to_path_data(&polygons));
            report.clipped += 1;
        }
    }

    Ok(report)
}
