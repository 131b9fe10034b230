//! Integration tests for the extraction pipeline, using simulated tools.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

use pdf2image::{
    Error, ExtractOptions, ExtractionReport, Extractor, OutputOrder, Result, ToolInvocation,
    ToolOutput, ToolRunner,
};
use tempfile::TempDir;

const HEADER: &str = "page   num  type   width height color comp bpc  enc interp  object ID x-ppi y-ppi size ratio\n\
--------------------------------------------------------------------------------------------\n";

/// Stands in for `pdfimages` and `convert`.
///
/// `-png` writes one file per asset, `-list` prints the canned listing and the
/// compositor writes the concatenation of image and mask.
struct FakeTools {
    listing: String,
    assets: Vec<(u32, &'static str)>,
    list_failure: Option<i32>,
    calls: RefCell<Vec<ToolInvocation>>,
}

impl FakeTools {
    fn new(rows: &[&str], assets: &[(u32, &'static str)]) -> Self {
        let mut listing = HEADER.to_string();
        for row in rows {
            listing.push_str(row);
            listing.push('\n');
        }
        Self {
            listing,
            assets: assets.to_vec(),
            list_failure: None,
            calls: RefCell::new(Vec::new()),
        }
    }

    fn failing_list(mut self, status: i32) -> Self {
        self.list_failure = Some(status);
        self
    }

    fn calls_to(&self, program: &str) -> Vec<Vec<String>> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program() == Path::new(program))
            .map(|c| c.args_lossy())
            .collect()
    }
}

impl ToolRunner for FakeTools {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());
        let args = invocation.args_lossy();

        if invocation.program() == Path::new("convert") {
            let mut merged = fs::read(&args[0])?;
            merged.extend(fs::read(&args[1])?);
            fs::write(&args[5], merged)?;
            return Ok(ToolOutput::default());
        }

        match args[0].as_str() {
            "-list" => match self.list_failure {
                Some(status) => Err(Error::ExternalProcess {
                    command: invocation.to_string(),
                    status: Some(status),
                    stdout: "partial".to_string(),
                    stderr: "Syntax Error: Couldn't read xref table".to_string(),
                }),
                None => Ok(ToolOutput::with_stdout(self.listing.clone())),
            },
            "-png" => {
                for (num, content) in &self.assets {
                    fs::write(format!("{}-{:03}.png", args[2], num), content)?;
                }
                Ok(ToolOutput::default())
            }
            other => panic!("unexpected invocation: {other}"),
        }
    }
}

fn sample_pdf(dir: &TempDir, name: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, b"%PDF-1.7\n").unwrap();
    path
}

fn dir_listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn sample_tools() -> FakeTools {
    FakeTools::new(
        &[
            "   1     0 image     100   100  rgb     3   8  image  no         1  0    72    72 1000B 10%",
            "   1     1 smask     100   100  gray    1   8  image  no         1  0    72    72  500B  5%",
            "   1     2 image      50    50  rgb     3   8  jpeg   no         2  0    72    72 2000B 20%",
        ],
        &[(0, "IMG0"), (1, "MASK1"), (2, "IMG2")],
    )
}

fn quiet() -> ExtractOptions {
    ExtractOptions::new().quiet()
}

#[test]
fn test_sample_document() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "sample.pdf");
    let extractor = Extractor::with_runner(quiet(), sample_tools());

    let report = extractor.run(&pdf).unwrap();
    let output_dir = dir.path().join("sample");

    assert_eq!(report.output_dir, output_dir);
    assert_eq!(dir_listing(&output_dir), vec!["sample-001.png", "sample-002.png"]);
    assert_eq!(
        fs::read_to_string(output_dir.join("sample-001.png")).unwrap(),
        "IMG0MASK1"
    );
    assert_eq!(
        fs::read_to_string(output_dir.join("sample-002.png")).unwrap(),
        "IMG2"
    );
    assert_eq!(report.merged_count, 1);
    assert_eq!(report.copied_count, 1);
    assert_eq!(report.removed_assets, 3);
    assert_eq!(
        report.files,
        vec![
            output_dir.join("sample-001.png"),
            output_dir.join("sample-002.png")
        ]
    );
}

#[test]
fn test_tool_invocations_in_order() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "sample.pdf");
    let extractor = Extractor::with_runner(quiet(), sample_tools());
    extractor.run(&pdf).unwrap();

    let output_dir = dir.path().join("sample");
    let calls = extractor.runner().calls.borrow();
    assert_eq!(calls.len(), 3);
    assert_eq!(
        calls[0].args_lossy(),
        vec![
            "-png".to_string(),
            pdf.to_string_lossy().into_owned(),
            output_dir.join("image").to_string_lossy().into_owned()
        ]
    );
    assert_eq!(
        calls[1].args_lossy(),
        vec!["-list".to_string(), pdf.to_string_lossy().into_owned()]
    );
    assert_eq!(calls[2].program(), Path::new("convert"));
    assert_eq!(calls[2].args_lossy()[2..5], ["-compose", "CopyOpacity", "-composite"]);
}

#[test]
fn test_masked_object_composites_once() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "masked.pdf");
    let tools = FakeTools::new(
        &[
            "1 4 smask 10 10 gray 1 8 image no 30 0 72 72 1K 1%",
            "1 3 image 10 10 rgb 3 8 image no 30 0 72 72 1K 1%",
        ],
        &[(3, "BASE"), (4, "ALPHA")],
    );
    let extractor = Extractor::with_runner(quiet(), tools);
    let report = extractor.run(&pdf).unwrap();

    let composites = extractor.runner().calls_to("convert");
    assert_eq!(composites.len(), 1);
    assert!(composites[0][0].ends_with("image-003.png"));
    assert!(composites[0][1].ends_with("image-004.png"));
    assert_eq!(report.merged_count, 1);
    assert_eq!(report.copied_count, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("masked/masked-001.png")).unwrap(),
        "BASEALPHA"
    );
}

#[test]
fn test_plain_image_is_copied() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "plain.pdf");
    let tools = FakeTools::new(
        &["1 0 image 10 10 rgb 3 8 jpeg no 8 0 72 72 1K 1%"],
        &[(0, "JPEGDATA")],
    );
    let extractor = Extractor::with_runner(quiet(), tools);
    let report = extractor.run(&pdf).unwrap();

    assert!(extractor.runner().calls_to("convert").is_empty());
    assert_eq!(report.copied_count, 1);
    assert_eq!(report.merged_count, 0);
    assert_eq!(
        fs::read_to_string(dir.path().join("plain/plain-001.png")).unwrap(),
        "JPEGDATA"
    );
}

#[test]
fn test_mask_only_object_takes_no_index() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "doc.pdf");
    let tools = FakeTools::new(
        &[
            "1 0 image 10 10 rgb 3 8 image no 1 0 72 72 1K 1%",
            "1 1 smask 10 10 gray 1 8 image no 2 0 72 72 1K 1%",
            "2 2 image 10 10 rgb 3 8 image no 3 0 72 72 1K 1%",
        ],
        &[(0, "A"), (1, "M"), (2, "C")],
    );
    let extractor = Extractor::with_runner(quiet(), tools);
    let report = extractor.run(&pdf).unwrap();

    let output_dir = dir.path().join("doc");
    assert_eq!(dir_listing(&output_dir), vec!["doc-001.png", "doc-002.png"]);
    assert_eq!(fs::read_to_string(output_dir.join("doc-002.png")).unwrap(), "C");
    assert_eq!(report.skipped_objects, vec![2]);
    assert!(extractor.runner().calls_to("convert").is_empty());
}

#[test]
fn test_irrelevant_entries_ignored() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "doc.pdf");
    let tools = FakeTools::new(
        &[
            "1 0 stencil 10 10 - 1 1 image no 1 0 72 72 1K 1%",
            "1 1 image 10 10 rgb 3 8 image no 2 0 72 72 1K 1%",
        ],
        &[(0, "S"), (1, "I")],
    );
    let report = Extractor::with_runner(quiet(), tools).run(&pdf).unwrap();

    assert_eq!(report.image_count(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("doc/doc-001.png")).unwrap(),
        "I"
    );
}

#[test]
fn test_duplicate_entries_last_wins() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "dup.pdf");
    let tools = FakeTools::new(
        &[
            "1 0 image 10 10 rgb 3 8 image no 5 0 72 72 1K 1%",
            "2 1 image 10 10 rgb 3 8 image no 5 0 72 72 1K 1%",
        ],
        &[(0, "FIRST"), (1, "SECOND")],
    );
    let report = Extractor::with_runner(quiet(), tools).run(&pdf).unwrap();

    assert_eq!(report.image_count(), 1);
    assert_eq!(
        fs::read_to_string(dir.path().join("dup/dup-001.png")).unwrap(),
        "SECOND"
    );
}

#[test]
fn test_output_order() {
    let rows = [
        "1 0 image 10 10 rgb 3 8 image no 20 0 72 72 1K 1%",
        "2 1 image 10 10 rgb 3 8 image no 7 0 72 72 1K 1%",
    ];
    let assets = [(0, "TWENTY"), (1, "SEVEN")];

    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "doc.pdf");
    let first = dir.path().join("doc/doc-001.png");

    Extractor::with_runner(quiet(), FakeTools::new(&rows, &assets))
        .run(&pdf)
        .unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "SEVEN");

    let options = quiet().with_order(OutputOrder::Inventory);
    Extractor::with_runner(options, FakeTools::new(&rows, &assets))
        .run(&pdf)
        .unwrap();
    assert_eq!(fs::read_to_string(&first).unwrap(), "TWENTY");
}

#[test]
fn test_rerun_is_identical() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "sample.pdf");
    let output_dir = dir.path().join("sample");

    let snapshot = |dir: &Path| -> Vec<(String, Vec<u8>)> {
        dir_listing(dir)
            .into_iter()
            .map(|name| {
                let data = fs::read(dir.join(&name)).unwrap();
                (name, data)
            })
            .collect()
    };

    let first = Extractor::with_runner(quiet(), sample_tools())
        .run(&pdf)
        .unwrap();
    let before = snapshot(&output_dir);
    let second = Extractor::with_runner(quiet(), sample_tools())
        .run(&pdf)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(before, snapshot(&output_dir));
}

#[test]
fn test_previous_output_is_wiped() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "sample.pdf");
    let output_dir = dir.path().join("sample");
    fs::create_dir_all(output_dir.join("old")).unwrap();
    fs::write(output_dir.join("sample-009.png"), b"stale").unwrap();
    fs::write(output_dir.join("old/notes.txt"), b"stale").unwrap();

    Extractor::with_runner(quiet(), sample_tools())
        .run(&pdf)
        .unwrap();

    assert_eq!(dir_listing(&output_dir), vec!["sample-001.png", "sample-002.png"]);
}

#[test]
fn test_listing_failure_aborts() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "broken.pdf");
    let tools = sample_tools().failing_list(2);
    let extractor = Extractor::with_runner(quiet(), tools);

    let err = extractor.run(&pdf).unwrap_err();
    match err {
        Error::ExternalProcess {
            status,
            stdout,
            stderr,
            ..
        } => {
            assert_eq!(status, Some(2));
            assert_eq!(stdout, "partial");
            assert!(stderr.contains("xref"));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    // Extraction already ran; nothing was reconstructed.
    let output_dir = dir.path().join("broken");
    assert_eq!(
        dir_listing(&output_dir),
        vec!["image-000.png", "image-001.png", "image-002.png"]
    );
    assert!(extractor.runner().calls_to("convert").is_empty());
}

#[test]
fn test_missing_asset_keeps_earlier_output() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "gap.pdf");
    let tools = FakeTools::new(
        &[
            "1 0 image 10 10 rgb 3 8 image no 1 0 72 72 1K 1%",
            "1 1 image 10 10 rgb 3 8 image no 2 0 72 72 1K 1%",
        ],
        &[(0, "ONLY")],
    );

    let err = Extractor::with_runner(quiet(), tools)
        .run(&pdf)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::MissingAsset {
            sequence: 1,
            object: 2
        }
    ));

    let output_dir = dir.path().join("gap");
    assert!(output_dir.join("gap-001.png").exists());
    assert!(output_dir.join("image-000.png").exists());
}

#[test]
fn test_malformed_listing_aborts() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "bad.pdf");
    let tools = FakeTools::new(
        &["1 zero image 10 10 rgb 3 8 image no 1 0 72 72 1K 1%"],
        &[(0, "X")],
    );

    let err = Extractor::with_runner(quiet(), tools)
        .run(&pdf)
        .unwrap_err();
    assert!(matches!(err, Error::MetadataFormat { field: "num", .. }));
}

#[test]
fn test_pdf_named_like_asset_prefix() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "image.pdf");
    let extractor = Extractor::with_runner(quiet(), sample_tools());

    let report = extractor.run(&pdf).unwrap();
    let output_dir = dir.path().join("image");

    let png = extractor.runner().calls_to("pdfimages");
    assert_eq!(png[0][2], output_dir.join("image-raw").to_string_lossy());
    assert_eq!(report.image_count(), 2);
    assert_eq!(report.removed_assets, 3);
    assert_eq!(dir_listing(&output_dir), vec!["image-001.png", "image-002.png"]);
    assert_eq!(
        fs::read_to_string(output_dir.join("image-001.png")).unwrap(),
        "IMG0MASK1"
    );
}

#[test]
fn test_report_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let pdf = sample_pdf(&dir, "mixed.pdf");
    let tools = FakeTools::new(
        &[
            "   1     0 smask     100   100  gray    1   8  image  no         4  0    72    72  500B  5%",
            "   1     1 image      50    50  rgb     3   8  jpeg   no         7  0    72    72 2000B 20%",
        ],
        &[(0, "MASK0"), (1, "IMG1")],
    );

    let report = Extractor::with_runner(quiet(), tools).run(&pdf).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["copied_count"], 1);
    assert_eq!(value["skipped_objects"], serde_json::json!([4]));
    assert_eq!(serde_json::from_str::<ExtractionReport>(&json).unwrap(), report);
}
