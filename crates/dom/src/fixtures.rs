use crate::document::Document;
use core_types::{NodeId, Rect};
use text_source::HostError;

pub const PARAGRAPH_TEXT: &str = "日本語のテキストを読む。";

/// Build `<body>` with `count` paragraphs of [`PARAGRAPH_TEXT`], each split
/// across a plain run and an `<em>` run, and return the body plus every
/// text node in document order.
pub fn make_paragraphs(count: usize) -> Result<(Document, NodeId, Vec<NodeId>), HostError> {
    let mut doc = Document::new();
    let html = doc.append_element(Document::ROOT, "html")?;
    let body = doc.append_element(html, "body")?;
    let split = PARAGRAPH_TEXT
        .char_indices()
        .nth(4)
        .map_or(PARAGRAPH_TEXT.len(), |(i, _)| i);
    let (head, tail) = PARAGRAPH_TEXT.split_at(split);

    let mut texts = Vec::with_capacity(count * 2);
    for row in 0..count {
        let p = doc.append_element(body, "p")?;
        let y = row as f32 * 20.0;
        let plain = doc.append_text(p, head)?;
        doc.set_client_rects(plain, vec![Rect::new(0.0, y, 64.0, 16.0)])?;
        let em = doc.append_element(p, "em")?;
        let emphasised = doc.append_text(em, tail)?;
        doc.set_client_rects(emphasised, vec![Rect::new(64.0, y, 128.0, 16.0)])?;
        texts.push(plain);
        texts.push(emphasised);
    }
    Ok((doc, body, texts))
}
