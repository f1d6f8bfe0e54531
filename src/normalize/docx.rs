//! DOCX → HTML.
//!
//! A DOCX file is a ZIP archive; the body lives in `word/document.xml`,
//! paragraph style names in `word/styles.xml`, list formats in
//! `word/numbering.xml` and hyperlink targets in
//! `word/_rels/document.xml.rels`. Only the structure the segmenter and a
//! reader care about is kept: headings, paragraphs, lists, links, basic run
//! formatting, line breaks and tables. Text box content is written after
//! the paragraph that anchors it.

use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use zip::ZipArchive;
use zip::result::ZipError;

use super::{NormalizedHtml, Normalizer};
use crate::dom::{escape_text, escape_xml};
use crate::error::{Error, Result};
use crate::util::decode_text;

const DOCUMENT_PART: &str = "word/document.xml";
const STYLES_PART: &str = "word/styles.xml";
const NUMBERING_PART: &str = "word/numbering.xml";
const RELATIONSHIPS_PART: &str = "word/_rels/document.xml.rels";

const HYPERLINK_TYPE_SUFFIX: &str = "/hyperlink";

/// Reads Word (`.docx`) documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxNormalizer;

impl Normalizer for DocxNormalizer {
    fn to_html(&self, bytes: &[u8]) -> Result<NormalizedHtml> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))
            .map_err(|e| Error::Normalization(format!("not a DOCX archive: {e}")))?;

        let document = read_part(&mut archive, DOCUMENT_PART)?
            .ok_or_else(|| Error::Normalization(format!("missing {DOCUMENT_PART}")))?;

        let mut parts = Parts::default();
        if let Some(xml) = read_part(&mut archive, STYLES_PART)? {
            parts.styles = parse_styles(&xml)?;
        }
        if let Some(xml) = read_part(&mut archive, NUMBERING_PART)? {
            parts.numbering = parse_numbering(&xml)?;
        }
        if let Some(xml) = read_part(&mut archive, RELATIONSHIPS_PART)? {
            parts.links = parse_hyperlinks(&xml)?;
        }

        let normalized = document_to_html(&document, &parts)?;
        tracing::debug!(
            html_len = normalized.html.len(),
            messages = normalized.messages.len(),
            styles = parts.styles.len(),
            links = parts.links.len(),
            "normalized DOCX"
        );
        Ok(normalized)
    }
}

fn read_part<R: Read + Seek>(archive: &mut ZipArchive<R>, path: &str) -> Result<Option<String>> {
    let mut file = match archive.by_name(path) {
        Ok(file) => file,
        Err(ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(Error::Normalization(format!("{path}: {e}"))),
    };
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)
        .map_err(|e| Error::Normalization(format!("{path}: {e}")))?;
    Ok(Some(decode_text(&contents, None).into_owned()))
}

/// Everything besides the body that rendering needs.
#[derive(Debug, Default)]
struct Parts {
    /// styleId → style name.
    styles: HashMap<String, String>,
    numbering: Numbering,
    /// Relationship id → external hyperlink target.
    links: HashMap<String, String>,
}

impl Parts {
    /// List tag and zero-based nesting level for a paragraph, if it is a
    /// list item.
    fn list_for(&self, p: &Paragraph) -> Option<(&'static str, usize)> {
        match p.num_id.as_deref() {
            // numId 0 removes numbering inherited from the style.
            Some("0") => None,
            Some(num_id) => Some((self.numbering.list_tag(num_id, p.list_level), p.list_level)),
            None => {
                let style = p.style.as_deref()?;
                list_style(self.styles.get(style).map(String::as_str).unwrap_or(style))
            }
        }
    }
}

/// Parse `word/styles.xml` into a styleId → style name map.
fn parse_styles(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut styles = HashMap::new();
    let mut current_id: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if local_name(e.name().as_ref()) == b"style" => {
                current_id = attr_value(&e, b"styleId");
            }
            Ok(Event::Empty(e)) | Ok(Event::Start(e)) if local_name(e.name().as_ref()) == b"name" => {
                if let (Some(id), Some(name)) = (current_id.as_ref(), attr_value(&e, b"val")) {
                    styles.insert(id.clone(), name);
                }
            }
            Ok(Event::End(e)) if local_name(e.name().as_ref()) == b"style" => {
                current_id = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Normalization(format!("{STYLES_PART}: {e}"))),
            _ => {}
        }
    }

    Ok(styles)
}

/// Number formats from `word/numbering.xml`.
#[derive(Debug, Default)]
struct Numbering {
    /// (abstractNumId, ilvl) → numFmt.
    formats: HashMap<(String, usize), String>,
    /// numId → abstractNumId.
    instances: HashMap<String, String>,
}

impl Numbering {
    /// `ol` for numbered levels, `ul` for bullets and anything unknown.
    fn list_tag(&self, num_id: &str, level: usize) -> &'static str {
        let format = self
            .instances
            .get(num_id)
            .and_then(|abstract_id| self.formats.get(&(abstract_id.clone(), level)));
        match format.map(String::as_str) {
            None | Some("bullet" | "none") => "ul",
            Some(_) => "ol",
        }
    }
}

fn parse_numbering(xml: &str) -> Result<Numbering> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut numbering = Numbering::default();
    let mut abstract_id: Option<String> = None;
    let mut level: Option<usize> = None;
    let mut num_id: Option<String> = None;

    loop {
        let (e, is_start) = match reader.read_event() {
            Ok(Event::Start(e)) => (e, true),
            Ok(Event::Empty(e)) => (e, false),
            Ok(Event::End(e)) => {
                match local_name(e.name().as_ref()) {
                    b"abstractNum" => abstract_id = None,
                    b"lvl" => level = None,
                    b"num" => num_id = None,
                    _ => {}
                }
                continue;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Normalization(format!("{NUMBERING_PART}: {e}"))),
            _ => continue,
        };

        match local_name(e.name().as_ref()) {
            b"abstractNum" if is_start => abstract_id = attr_value(&e, b"abstractNumId"),
            b"lvl" if is_start => level = attr_value(&e, b"ilvl").and_then(|v| v.parse().ok()),
            b"numFmt" => {
                if let (Some(id), Some(level), Some(format)) =
                    (abstract_id.as_ref(), level, attr_value(&e, b"val"))
                {
                    numbering.formats.insert((id.clone(), level), format);
                }
            }
            b"num" if is_start => num_id = attr_value(&e, b"numId"),
            b"abstractNumId" => {
                if let (Some(id), Some(target)) = (num_id.as_ref(), attr_value(&e, b"val")) {
                    numbering.instances.insert(id.clone(), target);
                }
            }
            _ => {}
        }
    }

    Ok(numbering)
}

/// Parse `word/_rels/document.xml.rels` into relationship id → URL for
/// hyperlink relationships.
fn parse_hyperlinks(xml: &str) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut links = HashMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"Relationship" =>
            {
                let is_hyperlink =
                    attr_value(&e, b"Type").is_some_and(|t| t.ends_with(HYPERLINK_TYPE_SUFFIX));
                if is_hyperlink
                    && let (Some(id), Some(target)) = (attr_value(&e, b"Id"), attr_value(&e, b"Target"))
                {
                    links.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::Normalization(format!("{RELATIONSHIPS_PART}: {e}"))),
            _ => {}
        }
    }

    Ok(links)
}

/// Heading level for a paragraph style, from its display name or, failing
/// that, its id.
fn heading_level(style_id: &str, styles: &HashMap<String, String>) -> Option<u8> {
    let name = styles.get(style_id).map(String::as_str).unwrap_or(style_id);
    let name = name.to_ascii_lowercase();
    let compact: String = name.chars().filter(|c| !c.is_whitespace()).collect();

    if compact == "title" || compact == "titlu" {
        return Some(1);
    }

    ["heading", "titlu"].iter().find_map(|prefix| {
        let level: u8 = compact.strip_prefix(prefix)?.parse().ok()?;
        (1..=6).contains(&level).then_some(level)
    })
}

/// Built-in `List Bullet N` / `List Number N` styles, for paragraphs that
/// carry no explicit numbering.
fn list_style(name: &str) -> Option<(&'static str, usize)> {
    let compact: String = name
        .to_ascii_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    [("listbullet", "ul"), ("listnumber", "ol")]
        .into_iter()
        .find_map(|(prefix, tag)| {
            let rest = compact.strip_prefix(prefix)?;
            let level: usize = if rest.is_empty() { 1 } else { rest.parse().ok()? };
            (1..=9).contains(&level).then_some((tag, level - 1))
        })
}

#[derive(Debug, Default)]
struct Paragraph {
    style: Option<String>,
    num_id: Option<String>,
    list_level: usize,
    /// Open hyperlink: where its `<a>` starts and where its content starts.
    link: Option<(usize, usize)>,
    html: String,
}

#[derive(Debug, Default)]
struct Run {
    bold: bool,
    italic: bool,
    underline: bool,
    html: String,
}

impl Run {
    fn render(self) -> String {
        if self.html.is_empty() {
            return String::new();
        }
        let mut out = String::new();
        let tags: Vec<&str> = [
            (self.bold, "strong"),
            (self.italic, "em"),
            (self.underline, "u"),
        ]
        .into_iter()
        .filter_map(|(on, tag)| on.then_some(tag))
        .collect();

        for tag in &tags {
            out.push_str(&format!("<{tag}>"));
        }
        out.push_str(&self.html);
        for tag in tags.iter().rev() {
            out.push_str(&format!("</{tag}>"));
        }
        out
    }
}

/// Block-level output plus the lists currently open in it.
#[derive(Debug, Default)]
struct Block {
    html: String,
    lists: Vec<&'static str>,
}

impl Block {
    fn close_lists(&mut self) {
        while let Some(tag) = self.lists.pop() {
            self.html.push_str(&format!("</li></{tag}>"));
        }
    }

    /// Append `content` as an item of a `tag` list nested `level` deep,
    /// opening and closing lists as needed.
    fn list_item(&mut self, tag: &'static str, level: usize, content: &str) {
        while self.lists.len() > level + 1 {
            if let Some(open) = self.lists.pop() {
                self.html.push_str(&format!("</li></{open}>"));
            }
        }
        if self.lists.len() == level + 1 {
            if self.lists.last() == Some(&tag) {
                self.html.push_str("</li><li>");
                self.html.push_str(content);
                return;
            }
            if let Some(open) = self.lists.pop() {
                self.html.push_str(&format!("</li></{open}>"));
            }
        }
        while self.lists.len() < level + 1 {
            self.html.push_str(&format!("<{tag}><li>"));
            self.lists.push(tag);
        }
        self.html.push_str(content);
    }
}

/// A text box being read, with the paragraph state it interrupted.
#[derive(Debug)]
struct TextBox {
    block: Block,
    outer_paragraph: Option<Paragraph>,
    outer_run: Option<Run>,
}

/// Streaming state for `word/document.xml`.
struct BodyWriter<'a> {
    parts: &'a Parts,
    body: Block,
    text_boxes: Vec<TextBox>,
    /// Finished text boxes waiting for their anchoring paragraph to end.
    deferred: String,
    paragraph: Option<Paragraph>,
    run: Option<Run>,
    in_text: bool,
    // Paragraphs inside table cells stay plain paragraphs.
    table_depth: usize,
    // Depth inside an `mc:Fallback` copy, which repeats its `mc:Choice`.
    skip_depth: usize,
    messages: Vec<String>,
}

impl<'a> BodyWriter<'a> {
    fn new(parts: &'a Parts) -> Self {
        Self {
            parts,
            body: Block::default(),
            text_boxes: Vec::new(),
            deferred: String::new(),
            paragraph: None,
            run: None,
            in_text: false,
            table_depth: 0,
            skip_depth: 0,
            messages: Vec::new(),
        }
    }

    /// Where block-level output currently goes.
    fn block(&mut self) -> &mut Block {
        match self.text_boxes.last_mut() {
            Some(text_box) => &mut text_box.block,
            None => &mut self.body,
        }
    }

    fn start(&mut self, e: &BytesStart<'_>) {
        match local_name(e.name().as_ref()) {
            b"p" => self.paragraph = Some(Paragraph::default()),
            b"r" => self.run = Some(Run::default()),
            b"t" => self.in_text = true,
            b"Fallback" => self.skip_depth = 1,
            b"txbxContent" => {
                self.text_boxes.push(TextBox {
                    block: Block::default(),
                    outer_paragraph: self.paragraph.take(),
                    outer_run: self.run.take(),
                });
                self.in_text = false;
            }
            b"hyperlink" => self.open_link(e),
            b"tbl" => {
                self.table_depth += 1;
                let block = self.block();
                block.close_lists();
                block.html.push_str("<table>");
            }
            b"tr" if self.table_depth > 0 => self.block().html.push_str("<tr>"),
            b"tc" if self.table_depth > 0 => self.block().html.push_str("<td>"),
            b"blip" | b"imagedata" | b"object" => self.skipped_object(),
            other => self.apply_property(other, e),
        }
    }

    fn empty(&mut self, e: &BytesStart<'_>) {
        match local_name(e.name().as_ref()) {
            b"br" => {
                let is_page_break = attr_value(e, b"type").is_some_and(|t| t != "textWrapping");
                if !is_page_break && let Some(run) = self.run.as_mut() {
                    run.html.push_str("<br/>");
                }
            }
            b"tab" => {
                if let Some(run) = self.run.as_mut() {
                    run.html.push('\t');
                }
            }
            b"blip" | b"imagedata" => self.skipped_object(),
            other => self.apply_property(other, e),
        }
    }

    fn text(&mut self, text: &str) {
        if self.in_text && let Some(run) = self.run.as_mut() {
            escape_text(text, &mut run.html);
        }
    }

    fn end(&mut self, name: &[u8]) {
        match name {
            b"t" => self.in_text = false,
            b"r" => {
                if let Some(finished) = self.run.take()
                    && let Some(p) = self.paragraph.as_mut()
                {
                    p.html.push_str(&finished.render());
                }
            }
            b"hyperlink" => {
                if let Some(p) = self.paragraph.as_mut()
                    && let Some(link) = p.link.take()
                {
                    close_link(&mut p.html, link);
                }
            }
            b"p" => {
                if let Some(p) = self.paragraph.take() {
                    self.finish_paragraph(p);
                }
            }
            b"txbxContent" => {
                if let Some(mut text_box) = self.text_boxes.pop() {
                    text_box.block.close_lists();
                    self.deferred.push_str(&text_box.block.html);
                    self.paragraph = text_box.outer_paragraph;
                    self.run = text_box.outer_run;
                }
            }
            b"tc" if self.table_depth > 0 => {
                let block = self.block();
                block.close_lists();
                block.html.push_str("</td>");
            }
            b"tr" if self.table_depth > 0 => self.block().html.push_str("</tr>"),
            b"tbl" if self.table_depth > 0 => {
                self.table_depth -= 1;
                let block = self.block();
                block.close_lists();
                block.html.push_str("</table>");
            }
            _ => {}
        }
    }

    fn open_link(&mut self, e: &BytesStart<'_>) {
        let parts = self.parts;
        let href = attr_value(e, b"id").and_then(|id| parts.links.get(&id));
        if let Some(href) = href
            && let Some(p) = self.paragraph.as_mut()
            && p.link.is_none()
        {
            let start = p.html.len();
            p.html.push_str(&format!("<a href=\"{}\">", escape_xml(href)));
            p.link = Some((start, p.html.len()));
        }
    }

    fn finish_paragraph(&mut self, mut p: Paragraph) {
        if let Some(link) = p.link.take() {
            close_link(&mut p.html, link);
        }

        let parts = self.parts;
        let in_table = self.table_depth > 0;
        let deferred = std::mem::take(&mut self.deferred);
        let block = self.block();

        if !p.html.trim().is_empty() {
            let level = if in_table {
                None
            } else {
                p.style.as_deref().and_then(|s| heading_level(s, &parts.styles))
            };
            match (level, parts.list_for(&p)) {
                (Some(level), _) => {
                    block.close_lists();
                    block.html.push_str(&format!("<h{level}>{}</h{level}>", p.html));
                }
                (None, Some((tag, list_level))) => block.list_item(tag, list_level, &p.html),
                (None, None) => {
                    block.close_lists();
                    block.html.push_str(&format!("<p>{}</p>", p.html));
                }
            }
        }

        block.html.push_str(&deferred);
    }

    fn skipped_object(&mut self) {
        self.messages
            .push("embedded image or object was skipped".to_string());
    }

    /// Paragraph style, numbering and run formatting properties.
    fn apply_property(&mut self, name: &[u8], e: &BytesStart<'_>) {
        match name {
            b"pStyle" | b"numId" | b"ilvl" => {
                let Some(p) = self.paragraph.as_mut() else { return };
                let value = attr_value(e, b"val");
                match name {
                    b"pStyle" => p.style = value,
                    b"numId" => p.num_id = value,
                    _ => p.list_level = value.and_then(|v| v.parse().ok()).unwrap_or(0),
                }
            }
            b"b" | b"i" | b"u" => {
                // Only run-level properties; paragraph-mark formatting is ignored.
                let Some(run) = self.run.as_mut() else { return };
                let on = is_toggle_on(e);
                match name {
                    b"b" => run.bold = on,
                    b"i" => run.italic = on,
                    _ => run.underline = on,
                }
            }
            _ => {}
        }
    }

    fn finish(mut self) -> NormalizedHtml {
        while let Some(mut text_box) = self.text_boxes.pop() {
            text_box.block.close_lists();
            self.deferred.push_str(&text_box.block.html);
        }
        self.body.close_lists();
        self.body.html.push_str(&self.deferred);
        NormalizedHtml {
            html: self.body.html,
            messages: self.messages,
        }
    }
}

/// Close an open `<a>`, or drop it if nothing was written inside.
fn close_link(html: &mut String, (start, content_start): (usize, usize)) {
    if html.len() == content_start {
        html.truncate(start);
    } else {
        html.push_str("</a>");
    }
}

/// Convert `word/document.xml` to an HTML fragment.
fn document_to_html(xml: &str, parts: &Parts) -> Result<NormalizedHtml> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut writer = BodyWriter::new(parts);

    loop {
        let event = reader
            .read_event()
            .map_err(|e| Error::Normalization(format!("{DOCUMENT_PART}: {e}")))?;

        if writer.skip_depth > 0 {
            match event {
                Event::Start(_) => writer.skip_depth += 1,
                Event::End(_) => writer.skip_depth -= 1,
                Event::Eof => break,
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(e) => writer.start(&e),
            Event::Empty(e) => writer.empty(&e),
            Event::Text(e) => writer.text(&String::from_utf8_lossy(e.as_ref())),
            Event::GeneralRef(e) => {
                if let Some(resolved) = resolve_entity(&String::from_utf8_lossy(e.as_ref())) {
                    writer.text(&resolved);
                }
            }
            Event::End(e) => writer.end(local_name(e.name().as_ref())),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(writer.finish())
}

fn is_toggle_on(e: &BytesStart<'_>) -> bool {
    attr_value(e, b"val").is_none_or(|v| !matches!(v.as_str(), "0" | "false" | "off" | "none"))
}

fn attr_value(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    e.attributes()
        .flatten()
        .find(|a| local_name(a.key.as_ref()) == name)
        .map(|a| String::from_utf8_lossy(&a.value).into_owned())
}

/// Extract local name from namespaced XML name (e.g., "w:p" -> "p").
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}
