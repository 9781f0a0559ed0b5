//! Reference codepoint scanner over document text.
//!
//! Scans walk outward from the anchor in tree order, one node at a time, and
//! stop as soon as the count is spent. Layout-aware scans count a single line
//! break between two text runs separated by a `br` or a block edge; breaks
//! never lead or trail the text of a tree. Returned boundaries always sit in
//! a text node, except when nothing was consumed and the anchor itself is
//! returned.

use crate::document::Document;
use crate::node::NodeData;
use core_types::{BoundaryPoint, NodeId};
use text_source::{HostError, ScanOutcome};

/// Tunables of the reference scanner.
#[derive(Clone, Debug)]
pub struct ScanConfig {
    /// Elements whose edges render as line breaks in layout-aware scans.
    pub block_elements: Vec<String>,
    /// Elements whose subtrees contribute no text.
    pub skipped_elements: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        let to_vec = |names: &[&str]| -> Vec<String> {
            names.iter().map(|s| s.to_string()).collect()
        };
        Self {
            block_elements: to_vec(&[
                "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt",
                "figcaption", "figure", "footer", "h1", "h2", "h3", "h4", "h5", "h6", "header",
                "hr", "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th",
                "tr", "ul",
            ]),
            skipped_elements: to_vec(&["head", "script", "style", "template", "noscript"]),
        }
    }
}

impl ScanConfig {
    fn is_block(&self, name: &str) -> bool {
        self.block_elements.iter().any(|b| b == name)
    }

    fn is_skipped(&self, name: &str) -> bool {
        self.skipped_elements.iter().any(|s| s == name)
    }
}

#[derive(Debug)]
enum Event<'a> {
    /// A `br` or a block edge. Only layout-aware walks report these.
    Break,
    /// A non-empty text run, clipped to the walked side of the anchor.
    /// `start` is the codepoint offset of `text` inside `node`.
    Text {
        node: NodeId,
        text: &'a str,
        start: usize,
    },
}

/// `Enter` reaches a node from the walk's side; `Exit` leaves it on the
/// other side once its children are done.
#[derive(Clone, Copy, Debug)]
enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

/// Lazy tree-order walk away from an anchor, forward or backward. Never
/// leaves the anchor's tree.
struct Walk<'a> {
    doc: &'a Document,
    config: &'a ScanConfig,
    layout_aware: bool,
    forward: bool,
    head: Option<Event<'a>>,
    upcoming: Option<Step>,
}

impl<'a> Walk<'a> {
    fn new(
        doc: &'a Document,
        anchor: BoundaryPoint,
        forward: bool,
        layout_aware: bool,
    ) -> Result<Self, HostError> {
        let record = doc.record(anchor.node)?;
        let mut walk = Walk {
            doc,
            config: doc.scan_config(),
            layout_aware,
            forward,
            head: None,
            upcoming: None,
        };
        if let NodeData::Text { text } = &record.data {
            let (before, after) = split_at_char(text, anchor.offset);
            let (text, start) = if forward {
                (after, anchor.offset)
            } else {
                (before, 0)
            };
            if !text.is_empty() {
                walk.head = Some(Event::Text {
                    node: anchor.node,
                    text,
                    start,
                });
            }
            walk.upcoming = walk.beyond(anchor.node);
        } else {
            let children = &record.children;
            let child = if forward {
                children.get(anchor.offset)
            } else {
                anchor.offset.checked_sub(1).and_then(|i| children.get(i))
            };
            walk.upcoming = Some(child.map_or(Step::Exit(anchor.node), |c| Step::Enter(*c)));
        }
        Ok(walk)
    }

    /// The step after `node` and its subtree.
    fn beyond(&self, node: NodeId) -> Option<Step> {
        let parent = self.doc.parent_of(node)?;
        let index = self.doc.index_in_parent(node)?;
        let siblings = self.doc.children(parent);
        let sibling = if self.forward {
            siblings.get(index + 1)
        } else {
            index.checked_sub(1).and_then(|i| siblings.get(i))
        };
        Some(sibling.map_or(Step::Exit(parent), |s| Step::Enter(*s)))
    }

    fn is_block(&self, data: &NodeData) -> bool {
        self.layout_aware && data.element_name().is_some_and(|n| self.config.is_block(n))
    }

    fn step(&mut self, step: Step) -> Result<Option<Event<'a>>, HostError> {
        let doc = self.doc;
        let node = match step {
            Step::Exit(node) => {
                self.upcoming = self.beyond(node);
                return Ok(self.is_block(&doc.record(node)?.data).then_some(Event::Break));
            }
            Step::Enter(node) => node,
        };

        let record = doc.record(node)?;
        match &record.data {
            NodeData::Text { text } => {
                self.upcoming = self.beyond(node);
                return Ok((!text.is_empty()).then_some(Event::Text {
                    node,
                    text: text.as_str(),
                    start: 0,
                }));
            }
            NodeData::Comment { .. } => {
                self.upcoming = self.beyond(node);
                return Ok(None);
            }
            NodeData::Element { name, .. } if self.config.is_skipped(name) => {
                self.upcoming = self.beyond(node);
                return Ok(None);
            }
            NodeData::Element { name, .. } if &**name == "br" => {
                self.upcoming = self.beyond(node);
                return Ok(self.layout_aware.then_some(Event::Break));
            }
            _ => {}
        }

        let child = if self.forward {
            record.children.first()
        } else {
            record.children.last()
        };
        self.upcoming = Some(child.map_or(Step::Exit(node), |c| Step::Enter(*c)));
        Ok(self.is_block(&record.data).then_some(Event::Break))
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = Result<Event<'a>, HostError>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(head) = self.head.take() {
            return Some(Ok(head));
        }
        while let Some(step) = self.upcoming.take() {
            match self.step(step) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => {}
                Err(err) => return Some(Err(err)),
            }
        }
        None
    }
}

fn split_at_char(text: &str, offset: usize) -> (&str, &str) {
    let at = text
        .char_indices()
        .nth(offset)
        .map_or(text.len(), |(i, _)| i);
    text.split_at(at)
}

/// Anchors in comments or inside skipped subtrees have no text position.
fn check_anchor(doc: &Document, anchor: BoundaryPoint) -> Result<(), HostError> {
    let length = doc.node_length(anchor.node)?;
    if anchor.offset > length {
        return Err(HostError::IndexSize {
            node: anchor.node,
            offset: anchor.offset,
        });
    }
    if matches!(doc.data(anchor.node)?, NodeData::Comment { .. }) {
        return Err(HostError::InvalidNode(anchor.node));
    }
    let config = doc.scan_config();
    let mut current = Some(anchor.node);
    while let Some(node) = current {
        if let Some(name) = doc.data(node)?.element_name()
            && config.is_skipped(name)
        {
            return Err(HostError::InvalidNode(anchor.node));
        }
        current = doc.parent_of(node);
    }
    Ok(())
}

/// Whether a text run lies on the side of the anchor the scan moves away
/// from. Looking backward, a break first means that break already sits
/// behind the anchor and is not counted by a forward scan.
fn run_behind(
    doc: &Document,
    anchor: BoundaryPoint,
    forward: bool,
    layout_aware: bool,
) -> Result<bool, HostError> {
    for event in Walk::new(doc, anchor, !forward, layout_aware)? {
        match event? {
            Event::Text { .. } => return Ok(true),
            Event::Break if forward => return Ok(false),
            Event::Break => {}
        }
    }
    Ok(false)
}

fn emit(ch: char, force_preserve_whitespace: bool) -> char {
    match ch {
        '\t' | '\n' | '\r' if !force_preserve_whitespace => ' ',
        _ => ch,
    }
}

/// Walk `count` codepoints from `anchor` through `doc`.
pub fn scan(
    doc: &Document,
    anchor: BoundaryPoint,
    count: isize,
    force_preserve_whitespace: bool,
    layout_aware: bool,
) -> Result<ScanOutcome, HostError> {
    check_anchor(doc, anchor)?;
    let forward = count >= 0;
    let mut remaining = count.unsigned_abs();
    let mut point = anchor;
    let mut taken: Vec<char> = Vec::new();
    let mut pending_break = false;
    let mut seen_run = false;

    let mut walk = Walk::new(doc, anchor, forward, layout_aware)?;
    while remaining > 0 {
        let Some(event) = walk.next() else {
            break;
        };
        let (node, text, start) = match event? {
            Event::Break => {
                pending_break = true;
                continue;
            }
            Event::Text { node, text, start } => (node, text, start),
        };

        if std::mem::take(&mut pending_break)
            && (seen_run || run_behind(doc, anchor, forward, layout_aware)?)
        {
            taken.push('\n');
            remaining -= 1;
            let edge = if forward {
                start
            } else {
                start + text.chars().count()
            };
            point = BoundaryPoint::new(node, edge);
            if remaining == 0 {
                break;
            }
        }
        seen_run = true;

        if forward {
            let mut offset = start;
            for ch in text.chars() {
                if remaining == 0 {
                    break;
                }
                taken.push(emit(ch, force_preserve_whitespace));
                remaining -= 1;
                offset += 1;
            }
            point = BoundaryPoint::new(node, offset);
        } else {
            let mut offset = start + text.chars().count();
            for ch in text.chars().rev() {
                if remaining == 0 {
                    break;
                }
                taken.push(emit(ch, force_preserve_whitespace));
                remaining -= 1;
                offset -= 1;
            }
            point = BoundaryPoint::new(node, offset);
        }
    }
    if !forward {
        taken.reverse();
    }

    log::trace!(
        target: "dom.scan",
        "scan {count} from {anchor:?} -> {point:?}, remainder {remaining}"
    );
    Ok(ScanOutcome {
        point,
        content: taken.into_iter().collect(),
        remainder: remaining,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `<body><p>日本語</p><p>で<br>す</p></body>`
    fn sample() -> (Document, NodeId, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.append_element(Document::ROOT, "body").unwrap();
        let p1 = doc.append_element(body, "p").unwrap();
        let first = doc.append_text(p1, "日本語").unwrap();
        let p2 = doc.append_element(body, "p").unwrap();
        let second = doc.append_text(p2, "で").unwrap();
        doc.append_element(p2, "br").unwrap();
        let third = doc.append_text(p2, "す").unwrap();
        (doc, body, first, second, third)
    }

    #[test]
    fn forward_scan_without_layout_concatenates_text() {
        let (doc, _body, first, _second, third) = sample();
        let out = scan(&doc, BoundaryPoint::new(first, 1), 4, true, false).unwrap();
        assert_eq!(out.content, "本語です");
        assert_eq!(out.point, BoundaryPoint::new(third, 1));
        assert_eq!(out.remainder, 0);
    }

    #[test]
    fn layout_aware_scan_counts_line_breaks() {
        let (doc, _body, first, second, third) = sample();
        let out = scan(&doc, BoundaryPoint::new(first, 2), 3, false, true).unwrap();
        assert_eq!(out.content, "語\nで");
        assert_eq!(out.point, BoundaryPoint::new(second, 1));

        let out = scan(&doc, BoundaryPoint::new(second, 1), 2, false, true).unwrap();
        assert_eq!(out.content, "\nす");
        assert_eq!(out.point, BoundaryPoint::new(third, 1));
    }

    #[test]
    fn forward_scan_reports_remainder_at_document_end() {
        let (doc, _body, _first, _second, third) = sample();
        let out = scan(&doc, BoundaryPoint::new(third, 0), 5, true, false).unwrap();
        assert_eq!(out.content, "す");
        assert_eq!(out.point, BoundaryPoint::new(third, 1));
        assert_eq!(out.remainder, 4);
    }

    #[test]
    fn backward_scan_prepends_in_document_order() {
        let (doc, _body, first, _second, third) = sample();
        let out = scan(&doc, BoundaryPoint::new(third, 0), -3, false, true).unwrap();
        assert_eq!(out.content, "\nで\n");
        // Crossing the paragraph break lands at the end of the previous text.
        assert_eq!(out.point, BoundaryPoint::new(first, 3));
        assert_eq!(out.remainder, 0);

        let out = scan(&doc, BoundaryPoint::new(first, 1), -4, true, false).unwrap();
        assert_eq!(out.content, "日");
        assert_eq!(out.point, BoundaryPoint::new(first, 0));
        assert_eq!(out.remainder, 3);
    }

    #[test]
    fn container_anchor_starts_before_the_indexed_child() {
        let (doc, body, _first, second, _third) = sample();
        let out = scan(&doc, BoundaryPoint::new(body, 1), 1, true, false).unwrap();
        assert_eq!(out.content, "で");
        assert_eq!(out.point, BoundaryPoint::new(second, 1));
    }

    #[test]
    fn whitespace_is_spaced_unless_preserved() {
        let mut doc = Document::new();
        let text = doc.append_text(Document::ROOT, "a\tb\nc").unwrap();
        let spaced = scan(&doc, BoundaryPoint::new(text, 0), 5, false, false).unwrap();
        assert_eq!(spaced.content, "a b c");
        let kept = scan(&doc, BoundaryPoint::new(text, 0), 5, true, false).unwrap();
        assert_eq!(kept.content, "a\tb\nc");
    }

    #[test]
    fn skipped_subtrees_contribute_nothing() {
        let mut doc = Document::new();
        let body = doc.append_element(Document::ROOT, "body").unwrap();
        let a = doc.append_text(body, "a").unwrap();
        let script = doc.append_element(body, "script").unwrap();
        let code = doc.append_text(script, "var x;").unwrap();
        doc.append_text(body, "b").unwrap();

        let out = scan(&doc, BoundaryPoint::new(a, 0), 2, true, false).unwrap();
        assert_eq!(out.content, "ab");
        assert_eq!(
            scan(&doc, BoundaryPoint::new(code, 0), 1, true, false),
            Err(HostError::InvalidNode(code))
        );
    }

    #[test]
    fn block_list_comes_from_the_document_config() {
        let mut doc = Document::new();
        let body = doc.append_element(Document::ROOT, "body").unwrap();
        let left = doc.append_element(body, "span").unwrap();
        let a = doc.append_text(left, "a").unwrap();
        let right = doc.append_element(body, "span").unwrap();
        doc.append_text(right, "b").unwrap();

        let inline = scan(&doc, BoundaryPoint::new(a, 0), 3, false, true).unwrap();
        assert_eq!(inline.content, "ab");
        assert_eq!(inline.remainder, 1);

        let mut config = ScanConfig::default();
        config.block_elements.push("span".to_string());
        doc.set_scan_config(config);
        let blocks = scan(&doc, BoundaryPoint::new(a, 0), 3, false, true).unwrap();
        assert_eq!(blocks.content, "a\nb");
        assert_eq!(blocks.remainder, 0);
    }

    #[test]
    fn break_between_runs_belongs_to_the_earlier_side() {
        let (doc, body, first, second, third) = sample();
        let p1 = doc.parent_of(first).unwrap();

        // The paragraph edge after the anchor is counted going forward.
        let out = scan(&doc, BoundaryPoint::new(p1, 1), 2, false, true).unwrap();
        assert_eq!(out.content, "\nで");
        assert_eq!(out.point, BoundaryPoint::new(second, 1));

        // Between the paragraphs, the break is already behind the anchor.
        let out = scan(&doc, BoundaryPoint::new(body, 1), 2, false, true).unwrap();
        assert_eq!(out.content, "で\n");
        assert_eq!(out.point, BoundaryPoint::new(third, 0));

        let out = scan(&doc, BoundaryPoint::new(body, 1), -1, false, true).unwrap();
        assert_eq!(out.content, "\n");
        assert_eq!(out.point, BoundaryPoint::new(first, 3));
    }

    #[test]
    fn no_break_trails_the_last_run() {
        let (doc, _body, _first, _second, third) = sample();
        let out = scan(&doc, BoundaryPoint::new(third, 1), 2, false, true).unwrap();
        assert!(out.content.is_empty());
        assert_eq!(out.point, BoundaryPoint::new(third, 1));
        assert_eq!(out.remainder, 2);
    }

    #[test]
    fn comment_anchor_has_no_text_position() {
        let mut doc = Document::new();
        let note = doc.create_comment("note");
        doc.append_child(Document::ROOT, note).unwrap();
        assert_eq!(
            scan(&doc, BoundaryPoint::new(note, 0), 1, true, false),
            Err(HostError::InvalidNode(note))
        );
    }

    #[test]
    fn out_of_bounds_anchor_is_rejected() {
        let (doc, _body, first, _second, _third) = sample();
        assert_eq!(
            scan(&doc, BoundaryPoint::new(first, 4), 1, true, false),
            Err(HostError::IndexSize {
                node: first,
                offset: 4
            })
        );
    }

    #[test]
    fn zero_count_returns_the_anchor() {
        let (doc, body, _first, _second, _third) = sample();
        let anchor = BoundaryPoint::new(body, 0);
        let out = scan(&doc, anchor, 0, true, true).unwrap();
        assert_eq!(out.point, anchor);
        assert!(out.content.is_empty());
    }
}
