use docx2epub::dom::{HtmlTree, parse_html};
use docx2epub::segment::{Chapter, SegmentStrategy, is_chapter_marker, segment, segment_tree};

#[test]
fn test_intro_and_end() {
    let chapters = segment(
        "<h1>Intro</h1><p>Hello</p><h1>End</h1><p>Bye</p>",
        SegmentStrategy::Headings,
    );

    assert_eq!(
        chapters,
        vec![
            Chapter {
                id: "chapter-1".to_string(),
                title: "Intro".to_string(),
                content: "<h1>Intro</h1><p>Hello</p>".to_string(),
            },
            Chapter {
                id: "chapter-2".to_string(),
                title: "End".to_string(),
                content: "<h1>End</h1><p>Bye</p>".to_string(),
            },
        ]
    );
}

#[test]
fn test_plain_paragraph_is_one_chapter() {
    let chapters = segment("<p>Just text</p>", SegmentStrategy::Headings);

    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].id, "chapter-1");
    assert_eq!(chapters[0].title, "Chapter 1");
    assert_eq!(chapters[0].content, "<p>Just text</p>");
}

#[test]
fn test_ids_are_dense() {
    let html: String = (1..=12)
        .map(|i| format!("<h2>Part {i}</h2><p>text {i}</p>"))
        .collect();
    let chapters = segment(&html, SegmentStrategy::Headings);

    assert_eq!(chapters.len(), 12);
    for (i, chapter) in chapters.iter().enumerate() {
        assert_eq!(chapter.id, format!("chapter-{}", i + 1));
        assert_eq!(chapter.title, format!("Part {}", i + 1));
    }
}

#[test]
fn test_nested_sections() {
    let html = "<div><h1>A</h1><p>a</p></div><div><h1>B</h1><p>b</p></div>";
    let chapters = segment(html, SegmentStrategy::Headings);

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].content, "<h1>A</h1><p>a</p>");
    assert_eq!(chapters[1].content, "<h1>B</h1><p>b</p>");
}

#[test]
fn test_void_elements_are_xml_compatible() {
    let chapters = segment(
        "<h1>Pictures</h1><p>line<br>break</p><img src=\"a.png\" alt=\"A & B\">",
        SegmentStrategy::Headings,
    );

    assert_eq!(
        chapters[0].content,
        "<h1>Pictures</h1><p>line<br/>break</p><img src=\"a.png\" alt=\"A &amp; B\"/>"
    );
}

#[test]
fn test_word_section_wrapper_keeps_everything() {
    let html = "<div class=\"WordSection1\"><p>Dedication</p><h1>One</h1><p>x</p>\
                <h1>Two</h1><p>y</p></div>";
    let chapters = segment(html, SegmentStrategy::Headings);

    let joined: String = chapters.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(joined, "<p>Dedication</p><h1>One</h1><p>x</p><h1>Two</h1><p>y</p>");

    let chapters = segment(
        "<div><p>Cuvant inainte</p><p>Capitolul 1</p><p>a</p></div>",
        SegmentStrategy::Pattern,
    );
    assert!(chapters[0].content.starts_with("<p>Cuvant inainte</p>"));
}

#[test]
fn test_pattern_markers_in_headings_and_paragraphs() {
    let html = "<h2>CAPITOLUL 1 - Inceputul</h2><p>a</p><p>Capitol 2</p><p>b</p>";
    let chapters = segment(html, SegmentStrategy::Pattern);

    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters[0].title, "CAPITOLUL 1 - Inceputul");
    assert_eq!(chapters[1].content, "<p>Capitol 2</p><p>b</p>");
}

#[test]
fn test_pattern_without_markers() {
    let chapters = segment("<h1>Titlu</h1><p>text</p>", SegmentStrategy::Pattern);

    assert_eq!(chapters.len(), 1);
    assert_eq!(chapters[0].title, "Full document");
    assert_eq!(chapters[0].content, "<h1>Titlu</h1><p>text</p>");
}

#[test]
fn test_marker_detection() {
    assert!(is_chapter_marker("Capitolul 12"));
    assert!(is_chapter_marker("  capitol 3: Iarna"));
    assert!(!is_chapter_marker("Capitolul"));
    assert!(!is_chapter_marker("Vezi Capitolul 2"));
    assert!(!is_chapter_marker("Capitolul 2b"));
}

#[test]
fn test_segment_tree_matches_segment() {
    let html = "<h1>One</h1><p>1</p><h3>Two</h3><p>2</p>";
    let dom = parse_html(html);

    assert_eq!(dom.tag_name(dom.body()), Some("body"));
    assert_eq!(
        segment_tree(&dom, SegmentStrategy::Headings),
        segment(html, SegmentStrategy::Headings)
    );
}
