use std::process::Command;

const DRAWING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" xmlns:inkscape="http://www.inkscape.org/namespaces/inkscape" width="100mm" height="100mm" viewBox="0 0 100 100">
  <g id="layer1" inkscape:label="Layer 1">
    <rect id="frame" x="-5" y="-5" width="10" height="10"/>
    <path id="x" style="stroke:#000" d="M 1,0.5 L 10,5 M -1,0.5 L -10,5 M -1,-0.5 L -10,-5 M 1,-0.5 L 10,-5"/>
    <path id="square" d="M 20,20 H 30 V 30 H 20 Z"/>
  </g>
</svg>
"#;

fn path_contours(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_path-contours");
    let output = Command::new(bin)
        .args(args)
        .output()
        .expect("run path-contours");
    assert!(
        output.status.success(),
        "path-contours failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    output
}

fn input(dir: &tempfile::TempDir) -> String {
    let path = dir.path().join("drawing.svg");
    std::fs::write(&path, DRAWING).expect("write drawing");
    path.to_string_lossy().into_owned()
}

fn attribute<'a>(xml: &'a str, id: &str, name: &str) -> Option<&'a str> {
    let start = xml.find(&format!("id=\"{id}\""))?;
    let element_start = xml[..start].rfind('<')?;
    let element_end = start + xml[start..].find('>')?;
    let element = &xml[element_start..element_end];
    let key = format!(" {name}=\"");
    let value_start = element.find(&key)? + key.len();
    let value_end = value_start + element[value_start..].find('"')?;
    Some(&element[value_start..value_end])
}

#[test]
fn clip_to_stdout() {
    let dir = tempfile::tempdir().unwrap();
    let drawing = input(&dir);
    // host style options
    let output = path_contours(&["clip", "--id=frame", "--id=x", "--tab=main", &drawing]);
    let xml = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        attribute(&xml, "x", "d"),
        Some("M 1,0.5 L 5,2.5 M -1,0.5 L -5,2.5 M -1,-0.5 L -5,-2.5 M 1,-0.5 L 5,-2.5")
    );
    assert_eq!(attribute(&xml, "x", "style"), Some("stroke:#000"));
    assert!(xml.contains("inkscape:label=\"Layer 1\""));
    // input untouched
    assert_eq!(std::fs::read_to_string(&drawing).unwrap(), DRAWING);
}

#[test]
fn clip_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let drawing = input(&dir);
    path_contours(&["clip", "--id", "frame", "--id", "square", "--in-place", &drawing]);
    let xml = std::fs::read_to_string(&drawing).unwrap();
    // entirely outside, left unchanged
    assert_eq!(attribute(&xml, "square", "d"), Some("M 20,20 H 30 V 30 H 20 Z"));
}

#[test]
fn offset_to_file_in_document_units() {
    let dir = tempfile::tempdir().unwrap();
    let drawing = input(&dir);
    let out = dir.path().join("out.svg");
    path_contours(&[
        "offset",
        "--id",
        "square",
        "--unit",
        "cm",
        "--init-offset",
        "0.1",
        "--join_type",
        "square",
        "--endtype=0",
        "--group=false",
        "--output",
        out.to_str().unwrap(),
        &drawing,
    ]);
    let xml = std::fs::read_to_string(&out).unwrap();
    assert!(attribute(&xml, "square", "d").is_some());
    let d = attribute(&xml, "square-0", "d").expect("offset path");
    // 0.1cm is 1 user unit in a mm document
    for corner in ["19,19", "31,19", "31,31", "19,31"] {
        assert!(d.contains(corner), "{d}");
    }
}

#[test]
fn config_file_settings() {
    let dir = tempfile::tempdir().unwrap();
    let drawing = input(&dir);
    let config = dir.path().join("settings.json");
    std::fs::write(
        &config,
        r#"{ "offset": { "unit": "mm", "offset_count": 2, "join_type": "square", "individual": false, "copy_org": false } }"#,
    )
    .unwrap();
    let output = path_contours(&[
        "--config",
        config.to_str().unwrap(),
        "offset",
        "--id",
        "frame",
        &drawing,
    ]);
    let xml = String::from_utf8(output.stdout).unwrap();
    // rect rewritten as a path holding both offsets
    let d = attribute(&xml, "frame", "d").expect("rewritten frame");
    assert_eq!(d.matches('M').count(), 2);
    assert!(!xml.contains("<rect"));
}

#[test]
fn out_of_range_numbers_never_reach_output() {
    let dir = tempfile::tempdir().unwrap();
    let drawing = dir.path().join("overflow.svg");
    std::fs::write(
        &drawing,
        r#"<svg xmlns="http://www.w3.org/2000/svg"><path id="p" d="M 0 0 L 1e400 0 L 10 0 L 10 10 L 0 10 z"/></svg>"#,
    )
    .unwrap();
    let output = path_contours(&["offset", "--id", "p", drawing.to_str().unwrap()]);
    let xml = String::from_utf8(output.stdout).unwrap();
    let d = attribute(&xml, "p-0", "d").expect("offset path");
    assert!(!xml.contains("inf"), "{xml}");
    assert!(d.ends_with('Z'));
}
