use std::io::{Cursor, Read, Write};

use docx2epub::{
    ConvertOptions, Converter, CoverAsset, DocumentInput, EpubConfig, Error, SegmentStrategy,
    convert_docx_to_epub,
};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

const W_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// Build a minimal Word document from `<w:p>` elements.
fn build_docx(paragraphs: &[(&str, &str)]) -> Vec<u8> {
    let mut body = String::new();
    for (style, text) in paragraphs {
        body.push_str("<w:p>");
        if !style.is_empty() {
            body.push_str(&format!("<w:pPr><w:pStyle w:val=\"{style}\"/></w:pPr>"));
        }
        body.push_str(&format!("<w:r><w:t xml:space=\"preserve\">{text}</w:t></w:r></w:p>"));
    }
    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="{W_NS}"><w:body>{body}</w:body></w:document>"#
    );
    let styles = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="{W_NS}">
  <w:style w:type="paragraph" w:styleId="Heading1"><w:name w:val="heading 1"/></w:style>
  <w:style w:type="paragraph" w:styleId="Heading2"><w:name w:val="heading 2"/></w:style>
</w:styles>"#
    );

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(b"<Types/>").unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(document.as_bytes()).unwrap();
    zip.start_file("word/styles.xml", options).unwrap();
    zip.write_all(styles.as_bytes()).unwrap();
    zip.finish().unwrap().into_inner()
}

fn sample_docx() -> Vec<u8> {
    build_docx(&[
        ("Heading1", "Intro"),
        ("", "Hello"),
        ("Heading1", "End"),
        ("", "Bye"),
    ])
}

fn open(bytes: &[u8]) -> ZipArchive<Cursor<&[u8]>> {
    ZipArchive::new(Cursor::new(bytes)).expect("output should be a zip archive")
}

fn read_text(archive: &mut ZipArchive<Cursor<&[u8]>>, name: &str) -> String {
    let mut file = archive
        .by_name(name)
        .unwrap_or_else(|_| panic!("missing {name}"));
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    out
}

fn names(archive: &ZipArchive<Cursor<&[u8]>>) -> Vec<String> {
    archive.file_names().map(str::to_string).collect()
}

#[test]
fn test_mimetype_is_first_and_stored() {
    let epub = convert_docx_to_epub(&sample_docx(), "Roman.docx", None).unwrap();
    let mut archive = open(&epub);

    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), CompressionMethod::Stored);
    let mut bytes = Vec::new();
    first.read_to_end(&mut bytes).unwrap();
    assert_eq!(bytes, b"application/epub+zip");
}

#[test]
fn test_docx_headings_become_chapters() {
    let epub = convert_docx_to_epub(&sample_docx(), "Roman.docx", None).unwrap();
    let mut archive = open(&epub);

    let ch1 = read_text(&mut archive, "OEBPS/chapter-1.xhtml");
    assert!(ch1.contains("<h1>Intro</h1><p>Hello</p>"));
    let ch2 = read_text(&mut archive, "OEBPS/chapter-2.xhtml");
    assert!(ch2.contains("<title>End</title>"));
    assert!(ch2.contains("<h1>End</h1><p>Bye</p>"));
    assert!(!names(&archive).contains(&"OEBPS/chapter-3.xhtml".to_string()));
}

#[test]
fn test_spine_and_navigation_agree() {
    let epub = convert_docx_to_epub(&sample_docx(), "Roman.docx", None).unwrap();
    let mut archive = open(&epub);

    let opf = read_text(&mut archive, "OEBPS/content.opf");
    let spine = &opf[opf.find("<spine").unwrap()..];
    let refs: Vec<&str> = spine
        .split("idref=\"")
        .skip(1)
        .map(|s| &s[..s.find('"').unwrap()])
        .collect();
    assert_eq!(refs, vec!["toc", "chapter-1", "chapter-2"]);

    let nav = read_text(&mut archive, "OEBPS/toc.xhtml");
    let ncx = read_text(&mut archive, "OEBPS/toc.ncx");
    for (i, (id, title)) in [("chapter-1", "Intro"), ("chapter-2", "End")]
        .iter()
        .enumerate()
    {
        assert!(nav.contains(&format!("<a href=\"{id}.xhtml\">{title}</a>")));
        assert!(ncx.contains(&format!("<navPoint id=\"{id}\" playOrder=\"{}\">", i + 2)));
        assert!(ncx.contains(&format!("<content src=\"{id}.xhtml\"/>")));
    }

    let uid_start = opf.find("<dc:identifier id=\"uid\">").unwrap() + 24;
    let uid = &opf[uid_start..uid_start + opf[uid_start..].find('<').unwrap()];
    assert!(ncx.contains(&format!("<meta name=\"dtb:uid\" content=\"{uid}\"/>")));
}

#[test]
fn test_no_cover_entries_without_cover() {
    let epub = convert_docx_to_epub(&sample_docx(), "Roman.docx", None).unwrap();
    let mut archive = open(&epub);

    let all = names(&archive);
    assert!(!all.iter().any(|n| n.contains("cover")));
    let opf = read_text(&mut archive, "OEBPS/content.opf");
    let spine = &opf[opf.find("<spine").unwrap()..];
    assert!(spine.contains("<spine toc=\"ncx\">\n    <itemref idref=\"toc\"/>"));
}

#[test]
fn test_png_cover() {
    let cover = CoverAsset::new("cover.png", vec![0x89, b'P', b'N', b'G']).unwrap();
    let epub = convert_docx_to_epub(&sample_docx(), "Roman.docx", Some(&cover)).unwrap();
    let mut archive = open(&epub);

    let all = names(&archive);
    assert!(all.contains(&"OEBPS/images/cover.png".to_string()));
    assert!(all.contains(&"OEBPS/cover.xhtml".to_string()));

    let mut image = Vec::new();
    archive
        .by_name("OEBPS/images/cover.png")
        .unwrap()
        .read_to_end(&mut image)
        .unwrap();
    assert_eq!(image, vec![0x89, b'P', b'N', b'G']);

    let opf = read_text(&mut archive, "OEBPS/content.opf");
    assert!(opf.contains("media-type=\"image/png\" properties=\"cover-image\""));
    let spine = &opf[opf.find("<spine").unwrap()..];
    assert!(spine.contains("<spine toc=\"ncx\">\n    <itemref idref=\"cover\"/>"));
}

#[test]
fn test_output_is_reproducible() {
    let a = convert_docx_to_epub(&sample_docx(), "Roman.docx", None).unwrap();
    let b = convert_docx_to_epub(&sample_docx(), "Roman.docx", None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_document_without_headings() {
    let docx = build_docx(&[("", "Just text")]);
    let epub = convert_docx_to_epub(&docx, "Nota.docx", None).unwrap();
    let mut archive = open(&epub);

    let chapter = read_text(&mut archive, "OEBPS/chapter-1.xhtml");
    assert!(chapter.contains("<title>Chapter 1</title>"));
    assert!(chapter.contains("<p>Just text</p>"));
}

#[test]
fn test_pattern_strategy_on_docx() {
    let docx = build_docx(&[
        ("", "Cuvant inainte"),
        ("", "Capitolul 1"),
        ("", "Prima zi"),
        ("", "Capitolul 2"),
        ("", "A doua zi"),
    ]);
    let input = DocumentInput::new("Jurnal.docx", docx).unwrap();
    let options = ConvertOptions::new()
        .with_strategy(SegmentStrategy::Pattern)
        .with_epub_config(EpubConfig::default().with_language("ro").with_author("Ana"));

    let chapters = Converter::new()
        .with_options(options)
        .chapters(&input)
        .unwrap();
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title, "Capitolul 1");
    assert!(chapters[0].content.starts_with("<p>Cuvant inainte</p>"));
    assert_eq!(chapters[1].content, "<p>Capitolul 2</p><p>A doua zi</p>");
}

#[test]
fn test_escaped_text_survives() {
    let docx = build_docx(&[("Heading1", "Tom &amp; Jerry"), ("", "a &lt; b")]);
    let epub = convert_docx_to_epub(&docx, "Desene.docx", None).unwrap();
    let mut archive = open(&epub);

    let nav = read_text(&mut archive, "OEBPS/toc.xhtml");
    assert!(nav.contains(">Tom &amp; Jerry</a>"));
    let chapter = read_text(&mut archive, "OEBPS/chapter-1.xhtml");
    assert!(chapter.contains("<p>a &lt; b</p>"));
}

#[test]
fn test_missing_document_part() {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    zip.start_file("word/other.xml", SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<x/>").unwrap();
    let bytes = zip.finish().unwrap().into_inner();

    let err = convert_docx_to_epub(&bytes, "Gol.docx", None).unwrap_err();
    assert!(matches!(err, Error::Normalization(_)));
    assert!(err.to_string().starts_with("could not convert document"));
}
