use super::{locate, resolve_selection};
use crate::{
    config::Settings,
    document::{Document, Element, Node},
    elements::{element_sub_paths, set_path_data},
    error::Result,
    units::{document_scale, unit_factor},
};
use log::{debug, info, warn};
use path_contours::{offset::offset_series, path::encode::polygons_to_path_data};
use std::collections::HashSet;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OffsetReport {
    /// Elements that received offsets.
    pub processed: usize,
    /// Result polygons written.
    pub polygons: usize,
    /// Elements skipped by filter, error or empty result.
    pub skipped: usize,
}

/// Offset every selected element, each independently.
pub fn offset_elements(doc: &mut Document, ids: &[String], settings: &Settings) -> Result<OffsetReport> {
    resolve_selection(doc, ids)?;

    let s = &settings.offset;
    let unit = s.unit()?;
    let factor = unit_factor(unit, document_scale(doc.root()));
    let series = s.series();
    let options = s.offset_options(settings.tolerance);
    let flatten = settings.flatten_options();
    debug!("offset distances {:?} ({unit} -> user units x{factor})", series.distances(factor));

    let mut taken: HashSet<String> = doc.ids().into_iter().map(str::to_string).collect();
    let mut report = OffsetReport::default();

    for id in ids {
        let path = locate(doc, id)?;
        let Some(source) = doc.element(&path).cloned() else {
            continue;
        };

        let (original, sub_paths) = match element_sub_paths(&source, &flatten) {
            Ok(r) => r,
            Err(e) => {
                warn!("{e}");
                report.skipped += 1;
                continue;
            }
        };

        let Some(last) = sub_paths.last() else {
            warn!("{id}: no drawable sub-paths");
            report.skipped += 1;
            continue;
        };
        if !s.path_types.accepts(last.is_closed()) {
            debug!("{id}: skipped by path type filter");
            report.skipped += 1;
            continue;
        }

        let results = offset_series(&sub_paths, &series, factor, &options)?;
        if results.is_empty() {
            warn!("{id}: offset produced no paths, element left unchanged");
            report.skipped += 1;
            continue;
        }
        report.processed += 1;
        report.polygons += results.len();

        if s.individual {
            let copies: Vec<Element> = results
                .iter()
                .enumerate()
                .map(|(n, pg)| {
                    let mut copy = source.clone();
                    set_path_data(&mut copy, &polygons_to_path_data([pg]));
                    copy.set_attr("id", Document::unique_id(&format!("{id}-{n}"), &mut taken));
                    copy
                })
                .collect();

            let inserted = if s.group {
                let mut group = Element::new(source.prefix.clone(), "g");
                group.set_attr(
                    "id",
                    Document::unique_id(&format!("g-offset-{id}"), &mut taken),
                );
                group.children = copies.into_iter().map(Node::Element).collect();
                vec![group]
            } else {
                copies
            };

            if !doc.insert_after(&path, inserted) {
                warn!("{id}: cannot add siblings to the root element");
                continue;
            }
            if !s.copy_org {
                doc.remove(&path);
            }
        } else {
            let mut data = polygons_to_path_data(&results);
            if s.copy_org {
                data.extend(&original);
            }
            if let Some(element) = doc.element_mut(&path) {
                set_path_data(element, &data);
            }
        }
        info!("{id}: {} offset paths", results.len());
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PathTypes;

    const DOC: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100"><g id="layer"><path id="sq" style="stroke:black" d="M 0,0 H 10 V 10 H 0 Z"/><path id="open" d="M 0,20 L 10,20"/></g></svg>"#;

    fn total_area(d: &str) -> f64 {
        let (data, _) = path_contours::path::PathData::parse(d);
        data.decompose(&settings().flatten_options())
            .polygons
            .iter()
            .map(|pg| pg.area().abs())
            .sum()
    }

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.offset.unit = "px".to_string();
        settings.offset.join_type = path_contours::offset::JoinType::Square;
        settings.offset.init_offset = 1.0;
        settings
    }

    #[test]
    fn individual_group_copies() {
        let mut doc = Document::parse(DOC).unwrap();
        let mut settings = settings();
        settings.offset.offset_count = 2;
        let report = offset_elements(&mut doc, &["sq".to_string()], &settings).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.polygons, 2);

        let group = doc.element(&doc.find("g-offset-sq").unwrap()).unwrap().clone();
        let ids: Vec<&str> = group.child_elements().filter_map(Element::id).collect();
        assert_eq!(ids, vec!["sq-0", "sq-1"]);
        let areas: Vec<f64> = group
            .child_elements()
            .map(|e| total_area(e.attr("d").unwrap()))
            .collect();
        assert_eq!(areas.len(), 2);
        assert!((areas[0] - 144.0).abs() < 1e-9);
        assert!((areas[1] - 196.0).abs() < 1e-9);
        let first = group.child_elements().next().unwrap();
        assert_eq!(first.attr("style"), Some("stroke:black"));
        // source kept and directly before the group
        let sq = doc.find("sq").unwrap();
        let g = doc.find("g-offset-sq").unwrap();
        assert_eq!(sq[1] + 1, g[1]);
    }

    #[test]
    fn rewrite_in_place_without_original() {
        let mut doc = Document::parse(DOC).unwrap();
        let mut settings = settings();
        settings.offset.individual = false;
        settings.offset.copy_org = false;
        offset_elements(&mut doc, &["sq".to_string()], &settings).unwrap();
        let sq = doc.element(&doc.find("sq").unwrap()).unwrap();
        assert!((total_area(sq.attr("d").unwrap()) - 144.0).abs() < 1e-9);

        let mut doc = Document::parse(DOC).unwrap();
        settings.offset.copy_org = true;
        offset_elements(&mut doc, &["sq".to_string()], &settings).unwrap();
        let sq = doc.element(&doc.find("sq").unwrap()).unwrap();
        let d = sq.attr("d").unwrap();
        assert!(d.ends_with(" M 0,0 H 10 V 10 H 0 Z"));
        assert!((total_area(d) - 244.0).abs() < 1e-9);
    }

    #[test]
    fn path_type_filter_and_removal() {
        let mut doc = Document::parse(DOC).unwrap();
        let mut settings = settings();
        settings.offset.path_types = PathTypes::ClosedPaths;
        settings.offset.group = false;
        settings.offset.copy_org = false;
        let ids = ["sq".to_string(), "open".to_string()];
        let report = offset_elements(&mut doc, &ids, &settings).unwrap();
        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert!(doc.find("sq").is_none());
        assert!(doc.find("sq-0").is_some());
        assert!(doc.find("open").is_some());
    }

    #[test]
    fn missing_id_fails_before_changes() {
        let mut doc = Document::parse(DOC).unwrap();
        let before = doc.clone();
        let ids = ["sq".to_string(), "nope".to_string()];
        assert!(offset_elements(&mut doc, &ids, &settings()).is_err());
        assert_eq!(doc, before);
        assert!(offset_elements(&mut doc, &[], &settings()).is_err());
    }
}
