//! XML documents that make up an EPUB package.

use crate::dom::escape_xml;
use crate::input::CoverAsset;
use crate::segment::Chapter;

const XHTML_MEDIA_TYPE: &str = "application/xhtml+xml";

pub(super) const COVER_PAGE: &str = "cover.xhtml";
pub(super) const NAV_PAGE: &str = "toc.xhtml";
pub(super) const NCX_FILE: &str = "toc.ncx";

/// Container.xml template.
pub(super) const CONTAINER_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;

const CHAPTER_CSS: &str = "    body { font-family: serif; margin: 2em; line-height: 1.6; }
    h1, h2, h3 { color: #333; }
    p { margin: 1em 0; }";

const NAV_CSS: &str = "    body { font-family: serif; margin: 2em; }
    h1 { text-align: center; }
    ol { list-style-type: none; padding: 0; }
    li { margin: 0.5em 0; }
    a { text-decoration: none; color: #000; }";

const COVER_CSS: &str = "    body { margin: 0; padding: 0; text-align: center; }
    img { max-width: 100%; max-height: 100vh; }";

/// Book-level values shared by the package documents.
pub(super) struct BookInfo<'a> {
    pub identifier: &'a str,
    pub title: &'a str,
    pub author: &'a str,
    pub language: &'a str,
    pub modified: &'a str,
    pub toc_title: &'a str,
}

struct ManifestItem {
    id: String,
    href: String,
    media_type: String,
    properties: Option<&'static str>,
}

impl ManifestItem {
    fn new(id: impl Into<String>, href: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            href: href.into(),
            media_type: media_type.into(),
            properties: None,
        }
    }

    fn with_properties(mut self, properties: &'static str) -> Self {
        self.properties = Some(properties);
        self
    }
}

/// Generate content.opf.
pub(super) fn generate_opf(
    book: &BookInfo<'_>,
    chapters: &[Chapter],
    cover: Option<&CoverAsset>,
) -> String {
    let mut manifest = vec![ManifestItem::new(
        "ncx",
        NCX_FILE,
        "application/x-dtbncx+xml",
    )];
    let mut spine_refs: Vec<&str> = Vec::new();

    if let Some(cover) = cover {
        manifest.push(
            ManifestItem::new("cover-image", cover.href(), cover.media_type())
                .with_properties("cover-image"),
        );
        manifest.push(ManifestItem::new("cover", COVER_PAGE, XHTML_MEDIA_TYPE));
        spine_refs.push("cover");
    }

    manifest.push(ManifestItem::new("toc", NAV_PAGE, XHTML_MEDIA_TYPE).with_properties("nav"));
    spine_refs.push("toc");

    for chapter in chapters {
        manifest.push(ManifestItem::new(
            chapter.id.as_str(),
            chapter.file_name(),
            XHTML_MEDIA_TYPE,
        ));
        spine_refs.push(&chapter.id);
    }

    let mut opf = String::new();
    opf.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<package version="3.0" xmlns="http://www.idpf.org/2007/opf" unique-identifier="uid">
  <metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
"#,
    );
    opf.push_str(&format!(
        "    <dc:identifier id=\"uid\">{}</dc:identifier>\n",
        escape_xml(book.identifier)
    ));
    opf.push_str(&format!(
        "    <dc:title>{}</dc:title>\n",
        escape_xml(book.title)
    ));
    opf.push_str(&format!(
        "    <dc:creator>{}</dc:creator>\n",
        escape_xml(book.author)
    ));
    opf.push_str(&format!(
        "    <dc:language>{}</dc:language>\n",
        escape_xml(book.language)
    ));
    opf.push_str(&format!(
        "    <meta property=\"dcterms:modified\">{}</meta>\n",
        escape_xml(book.modified)
    ));
    if cover.is_some() {
        opf.push_str("    <meta name=\"cover\" content=\"cover-image\"/>\n");
    }
    opf.push_str("  </metadata>\n");

    opf.push_str("  <manifest>\n");
    for item in &manifest {
        opf.push_str(&format!(
            "    <item id=\"{}\" href=\"{}\" media-type=\"{}\"",
            escape_xml(&item.id),
            escape_xml(&item.href),
            escape_xml(&item.media_type)
        ));
        if let Some(properties) = item.properties {
            opf.push_str(&format!(" properties=\"{properties}\""));
        }
        opf.push_str("/>\n");
    }
    opf.push_str("  </manifest>\n");

    opf.push_str("  <spine toc=\"ncx\">\n");
    for id in spine_refs {
        opf.push_str(&format!("    <itemref idref=\"{}\"/>\n", escape_xml(id)));
    }
    opf.push_str("  </spine>\n");

    opf.push_str("</package>\n");
    opf
}

/// Generate toc.ncx; chapter play order starts at 2.
pub(super) fn generate_ncx(book: &BookInfo<'_>, chapters: &[Chapter]) -> String {
    let mut ncx = String::new();

    ncx.push_str(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE ncx PUBLIC "-//NISO//DTD ncx 2005-1//EN" "http://www.daisy.org/z3986/2005/ncx-2005-1.dtd">
<ncx xmlns="http://www.daisy.org/z3986/2005/ncx/" version="2005-1">
  <head>
    <meta name="dtb:uid" content=""#,
    );
    ncx.push_str(&escape_xml(book.identifier));
    ncx.push_str(
        r#""/>
    <meta name="dtb:depth" content="1"/>
    <meta name="dtb:totalPageCount" content="0"/>
    <meta name="dtb:maxPageNumber" content="0"/>
  </head>
  <docTitle><text>"#,
    );
    ncx.push_str(&escape_xml(book.title));
    ncx.push_str("</text></docTitle>\n  <navMap>\n");

    for (i, chapter) in chapters.iter().enumerate() {
        ncx.push_str(&format!(
            "    <navPoint id=\"{}\" playOrder=\"{}\">\n",
            escape_xml(&chapter.id),
            i + 2
        ));
        ncx.push_str(&format!(
            "      <navLabel><text>{}</text></navLabel>\n",
            escape_xml(&chapter.title)
        ));
        ncx.push_str(&format!(
            "      <content src=\"{}\"/>\n",
            escape_xml(&chapter.file_name())
        ));
        ncx.push_str("    </navPoint>\n");
    }

    ncx.push_str("  </navMap>\n</ncx>\n");
    ncx
}

/// Generate the EPUB 3 navigation document (toc.xhtml).
pub(super) fn generate_nav(book: &BookInfo<'_>, chapters: &[Chapter]) -> String {
    let toc_title = escape_xml(book.toc_title);
    let mut items = String::new();
    for chapter in chapters {
        items.push_str(&format!(
            "      <li><a href=\"{}\">{}</a></li>\n",
            escape_xml(&chapter.file_name()),
            escape_xml(&chapter.title)
        ));
    }

    format!(
        r#"{head}
<body>
  <nav epub:type="toc" id="toc">
    <h1>{toc_title}</h1>
    <ol>
{items}    </ol>
  </nav>
</body>
</html>
"#,
        head = xhtml_head(book.language, &toc_title, NAV_CSS),
    )
}

/// Generate the cover page.
pub(super) fn generate_cover_page(book: &BookInfo<'_>, cover: &CoverAsset) -> String {
    format!(
        r#"{head}
<body>
  <img src="{src}" alt="{alt}"/>
</body>
</html>
"#,
        head = xhtml_head(book.language, "Cover", COVER_CSS),
        src = escape_xml(&cover.href()),
        alt = escape_xml(book.title),
    )
}

/// Wrap a chapter's content in an XHTML document.
pub(super) fn generate_chapter(book: &BookInfo<'_>, chapter: &Chapter) -> String {
    format!(
        r#"{head}
<body>
  {content}
</body>
</html>
"#,
        head = xhtml_head(book.language, &escape_xml(&chapter.title), CHAPTER_CSS),
        content = chapter.content,
    )
}

/// Prolog, `<html>` start tag and `<head>`. `title` must already be escaped.
fn xhtml_head(language: &str, title: &str, css: &str) -> String {
    let lang = escape_xml(language);
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE html>
<html xmlns="http://www.w3.org/1999/xhtml" xmlns:epub="http://www.idpf.org/2007/ops" xml:lang="{lang}" lang="{lang}">
<head>
  <title>{title}</title>
  <style>
{css}
  </style>
</head>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book() -> BookInfo<'static> {
        BookInfo {
            identifier: "urn:uuid:test",
            title: "Ion & Maria",
            author: "Unknown",
            language: "ro",
            modified: "2024-01-01T00:00:00Z",
            toc_title: "Contents",
        }
    }

    fn chapters() -> Vec<Chapter> {
        vec![
            Chapter::new(1, "Intro", "<h1>Intro</h1>".to_string()),
            Chapter::new(2, "<End>", "<h1>&lt;End&gt;</h1>".to_string()),
        ]
    }

    #[test]
    fn test_opf_without_cover() {
        let opf = generate_opf(&book(), &chapters(), None);

        assert!(opf.contains("<dc:title>Ion &amp; Maria</dc:title>"));
        assert!(opf.contains("<dc:creator>Unknown</dc:creator>"));
        assert!(opf.contains("<dc:language>ro</dc:language>"));
        assert!(!opf.contains("cover"));

        let spine = &opf[opf.find("<spine").unwrap()..];
        let toc = spine.find("idref=\"toc\"").unwrap();
        let ch1 = spine.find("idref=\"chapter-1\"").unwrap();
        let ch2 = spine.find("idref=\"chapter-2\"").unwrap();
        assert!(toc < ch1 && ch1 < ch2);
    }

    #[test]
    fn test_opf_with_cover() {
        let cover = CoverAsset::new("cover.png", vec![1]).unwrap();
        let opf = generate_opf(&book(), &chapters(), Some(&cover));

        assert!(opf.contains(
            "<item id=\"cover-image\" href=\"images/cover.png\" media-type=\"image/png\" properties=\"cover-image\"/>"
        ));
        assert!(opf.contains("<item id=\"cover\" href=\"cover.xhtml\""));
        assert!(opf.contains("<meta name=\"cover\" content=\"cover-image\"/>"));

        let spine = &opf[opf.find("<spine").unwrap()..];
        let first_ref = spine.find("<itemref").unwrap();
        assert!(spine[first_ref..].starts_with("<itemref idref=\"cover\"/>"));
    }

    #[test]
    fn test_ncx_play_order_starts_at_two() {
        let ncx = generate_ncx(&book(), &chapters());

        assert!(ncx.contains("<meta name=\"dtb:uid\" content=\"urn:uuid:test\"/>"));
        assert!(ncx.contains("<navPoint id=\"chapter-1\" playOrder=\"2\">"));
        assert!(ncx.contains("<navPoint id=\"chapter-2\" playOrder=\"3\">"));
        assert!(ncx.contains("<text>&lt;End&gt;</text>"));
        assert!(ncx.contains("<content src=\"chapter-2.xhtml\"/>"));
    }

    #[test]
    fn test_nav_lists_chapters_in_order() {
        let nav = generate_nav(&book(), &chapters());

        assert!(nav.contains("<nav epub:type=\"toc\" id=\"toc\">"));
        let first = nav.find("<a href=\"chapter-1.xhtml\">Intro</a>").unwrap();
        let second = nav.find("<a href=\"chapter-2.xhtml\">&lt;End&gt;</a>").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_chapter_document() {
        let doc = generate_chapter(&book(), &chapters()[1]);

        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(doc.contains("<title>&lt;End&gt;</title>"));
        assert!(doc.contains("font-family: serif"));
        assert!(doc.contains("<body>\n  <h1>&lt;End&gt;</h1>\n</body>"));
    }

    #[test]
    fn test_cover_page() {
        let cover = CoverAsset::new("photo.jpeg", vec![1]).unwrap();
        let page = generate_cover_page(&book(), &cover);
        assert!(page.contains("<img src=\"images/cover.jpeg\" alt=\"Ion &amp; Maria\"/>"));
    }
}
