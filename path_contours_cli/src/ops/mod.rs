//! Document level effects.
pub mod clip;
pub mod offset;

use crate::{
    document::{Document, ElementPath},
    error::{Error, Result},
};

/// Resolve every selected id before anything is modified.
fn resolve_selection(doc: &Document, ids: &[String]) -> Result<()> {
    if ids.is_empty() {
        return Err(Error::NoSelection);
    }
    for id in ids {
        doc.find(id)
            .ok_or_else(|| Error::MissingElement(id.clone()))?;
    }
    Ok(())
}

/// Path of an id resolved by [resolve_selection]. Paths shift as siblings are inserted so they
/// are looked up again right before use.
fn locate(doc: &Document, id: &str) -> Result<ElementPath> {
    doc.find(id)
        .ok_or_else(|| Error::MissingElement(id.to_string()))
}
