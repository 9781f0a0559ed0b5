#![no_main]

use dom::Document;
use libfuzzer_sys::fuzz_target;
use text_source::{BoundaryPoint, Range, RangeTextSource, TextSource};

// First byte: bit 0 selects layout-aware scanning, the rest is the scan
// length. Remaining bytes are page text, one paragraph or span per line.
fuzz_target!(|data: &[u8]| {
    let Some((&control, rest)) = data.split_first() else {
        return;
    };
    let layout_aware = control & 1 == 1;
    let length = usize::from(control >> 1);
    let text = String::from_utf8_lossy(rest);

    let mut doc = Document::new();
    let body = doc
        .append_element(Document::ROOT, "body")
        .expect("body under the document");
    let mut texts = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        let tag = if index % 3 == 0 { "p" } else { "span" };
        let parent = doc.append_element(body, tag).expect("element under body");
        texts.push(doc.append_text(parent, line).expect("text under element"));
    }
    let first = texts[0];

    let start = Range::collapsed_at(BoundaryPoint::new(first, 0));
    let mut source: TextSource = RangeTextSource::create(&doc, start)
        .expect("collapsed range")
        .into();
    let scanned = source
        .set_end_offset(&doc, length, true, layout_aware)
        .expect("scan from a text node");
    assert!(scanned <= length);
    assert_eq!(source.text().chars().count(), scanned);

    // Nothing precedes the first text node.
    let before = source
        .set_start_offset(&doc, length, layout_aware)
        .expect("scan back from a text node");
    assert_eq!(before, 0);
    assert!(source.is_connected(&doc));
});
