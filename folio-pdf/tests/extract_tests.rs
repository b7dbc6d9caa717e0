//! Text extraction and export against small PDF documents built in memory.

use folio_pdf::{
    PageText, PdfError, PdfTextExtractor, TextExtractor, default_strategies, export_markdown,
    export_text, extract_tables,
};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

/// Build a PDF with one page per entry of `pages`, each line drawn as its own
/// text object.
fn build_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let mut kids = Vec::new();
    for lines in pages {
        let mut operations = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            operations.push(Operation::new("Td", vec![72.into(), (720 - 16 * i as i64).into()]));
            operations.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        kids.push(page_id.into());
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}

#[test]
fn extracts_pages_in_order() {
    let bytes = build_pdf(&[&["The sky is blue."], &["Grass is green."], &["Water is wet."]]);

    let pages = PdfTextExtractor::new().extract_pages(&bytes).unwrap();

    assert_eq!(pages.iter().map(|p| p.number).collect::<Vec<_>>(), [1, 2, 3]);
    assert!(pages[0].text.contains("The sky is blue."));
    assert!(pages[2].text.contains("Water is wet."));

    let text = PdfTextExtractor::new().extract_text(&bytes).unwrap();
    let sky = text.find("sky").unwrap();
    let grass = text.find("Grass").unwrap();
    let water = text.find("Water").unwrap();
    assert!(sky < grass && grass < water);
}

#[test]
fn extracts_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("doc.pdf");
    std::fs::write(&path, build_pdf(&[&["Hello from a file."]])).unwrap();

    let pages = PdfTextExtractor::new().extract_file(&path).unwrap();
    assert_eq!(pages.len(), 1);
    assert!(pages[0].text.contains("Hello from a file."));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PdfTextExtractor::new().extract_file(dir.path().join("absent.pdf")).unwrap_err();
    assert!(matches!(err, PdfError::Io(_)));
    assert_eq!(err.kind(), "IoError");
}

#[test]
fn finds_tables_in_extracted_text() {
    let bytes = build_pdf(&[&[
        "Quarterly results",
        "| Quarter | Revenue |",
        "| Q1 | 10 |",
        "| Q2 | 12 |",
    ]]);
    let pages = PdfTextExtractor::new().extract_pages(&bytes).unwrap();

    let extraction = extract_tables(&default_strategies(), &pages);

    assert_eq!(extraction.strategy.as_deref(), Some("structured"));
    assert_eq!(extraction.tables.len(), 1);
    assert_eq!(extraction.tables[0].rows[0], ["Quarter", "Revenue"]);
}

#[test]
fn exports_text_and_markdown() {
    let dir = tempfile::tempdir().unwrap();
    let pages = vec![
        PageText { number: 1, text: "Introduction\n".into() },
        PageText { number: 2, text: "Results".into() },
    ];

    let txt = dir.path().join("out.txt");
    export_text("Introduction\nResults\n", &txt).unwrap();
    assert_eq!(std::fs::read_to_string(&txt).unwrap(), "Introduction\nResults\n");

    let md = dir.path().join("out.md");
    export_markdown(&pages, &md).unwrap();
    assert_eq!(
        std::fs::read_to_string(&md).unwrap(),
        "# Page 1\n\nIntroduction\n\n# Page 2\n\nResults\n"
    );
}
