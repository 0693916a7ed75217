use crate::{
    cli::CommonArgs,
    document::Document,
    error::{Error, Result},
};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tempfile::NamedTempFile;

/// Where the rewritten document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

impl Destination {
    pub fn from_args(args: &CommonArgs) -> Self {
        if args.in_place {
            Destination::File(args.input.clone())
        } else if let Some(path) = &args.output {
            Destination::File(path.clone())
        } else {
            Destination::Stdout
        }
    }
}

pub fn write_document(doc: &Document, destination: &Destination) -> Result<()> {
    let xml = doc.to_xml();
    match destination {
        Destination::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(xml.as_bytes())
                .and_then(|_| stdout.flush())
                .map_err(Error::Stdout)
        }
        Destination::File(path) => write_atomic(path, xml.as_bytes()),
    }
}

/// Write through a temporary file in the destination directory, renamed over `path` only once
/// fully written. The temporary file is deleted on any error.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let write_error = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(write_error)?;
    file.write_all(bytes).map_err(write_error)?;
    file.flush().map_err(write_error)?;
    file.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_and_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.svg");
        std::fs::write(&target, "old").unwrap();
        let doc = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
        write_document(&doc, &Destination::File(target.clone())).unwrap();
        let written = std::fs::read_to_string(&target).unwrap();
        assert!(written.contains("<svg xmlns=\"http://www.w3.org/2000/svg\"/>"));
        // no temporary files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_directory_is_write_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.svg");
        let doc = Document::parse(r#"<svg xmlns="http://www.w3.org/2000/svg"/>"#).unwrap();
        let err = write_document(&doc, &Destination::File(target)).unwrap_err();
        assert_eq!(err.code(), crate::error::ErrorCode::Processing);
    }
}
