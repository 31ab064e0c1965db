//! Batch conversion of SVG directories
//!
//! Files are discovered with walkdir and converted in parallel with rayon.
//! A file that fails is logged and reported; it never stops the batch.

use crate::assets::read_svg_file;
use crate::convert::SvgConverter;
use crate::error::{Result, SvgError};
use crate::parser::XmlParser;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Per-file conversion settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOptions {
    pub pretty: bool,
    pub collapse_whitespace: bool,
}

/// Outcome of a batch run, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    /// (input, output) pairs written successfully
    pub converted: Vec<(PathBuf, PathBuf)>,
    pub failed: Vec<(PathBuf, SvgError)>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }
}

/// All files under `root` with an `svg` extension (any case), sorted
pub fn find_svg_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.path()
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        })
        .map(|e| e.path().to_path_buf())
        .collect()
}

/// Map `input_root/a/b.svg` to `output_root/a/b.json`
pub fn output_path(input_root: &Path, file: &Path, output_root: &Path) -> PathBuf {
    let relative = file.strip_prefix(input_root).unwrap_or(file);
    output_root.join(relative).with_extension("json")
}

/// Convert one file and write its JSON, creating parent directories
pub fn convert_file<P: XmlParser>(
    converter: &SvgConverter<P>,
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<()> {
    let svg = read_svg_file(input, options.collapse_whitespace)?;
    let json = converter.convert_to_json(&svg, options.pretty)?;

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(output, json)?;
    debug!(input = %input.display(), output = %output.display(), "wrote json");
    Ok(())
}

/// Convert every SVG under `input_dir` into JSON under `output_dir`
pub fn convert_all<P: XmlParser>(
    converter: &SvgConverter<P>,
    input_dir: &Path,
    output_dir: &Path,
    options: &BatchOptions,
) -> BatchReport {
    let files = find_svg_files(input_dir);
    debug!(count = files.len(), dir = %input_dir.display(), "converting directory");

    let outcomes: Vec<_> = files
        .into_par_iter()
        .map(|file| {
            let output = output_path(input_dir, &file, output_dir);
            let result = convert_file(converter, &file, &output, options);
            (file, output, result)
        })
        .collect();

    let mut report = BatchReport::default();
    for (file, output, result) in outcomes {
        match result {
            Ok(()) => report.converted.push((file, output)),
            Err(err) => {
                warn!(file = %file.display(), error = %err, "skipping file");
                report.failed.push((file, err));
            }
        }
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::StrictParser;
    use tempfile::TempDir;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_output_path() {
        let out = output_path(Path::new("/in"), Path::new("/in/icons/home.svg"), Path::new("/out"));
        assert_eq!(out, PathBuf::from("/out/icons/home.json"));
    }

    #[test]
    fn test_find_svg_files() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "a.svg", "<svg/>");
        write(dir.path(), "nested/B.SVG", "<svg/>");
        write(dir.path(), "notes.txt", "x");

        let files = find_svg_files(dir.path());
        assert_eq!(files.len(), 2);
        assert!(files.iter().any(|f| f.ends_with("nested/B.SVG")));
    }

    #[test]
    fn test_convert_all_skips_bad_files() {
        let input = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(input.path(), "ok.svg", "<svg><circle r=\"5\"/></svg>");
        write(input.path(), "sub/frag.svg", "<rect width=\"1\"/>");
        write(input.path(), "bad.svg", "<svg><g></svg>");

        let converter = SvgConverter::new(StrictParser);
        let report = convert_all(&converter, input.path(), output.path(), &BatchOptions::default());

        assert_eq!(report.total(), 3);
        assert_eq!(report.converted.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].0.ends_with("bad.svg"));
        assert_eq!(report.failed[0].1.kind(), "parse_error");

        let json = fs::read_to_string(output.path().join("sub/frag.json")).unwrap();
        assert!(json.contains(r#""tagName":"rect""#));
        assert!(!output.path().join("bad.json").exists());
    }
}
