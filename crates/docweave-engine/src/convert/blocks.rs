use crate::markup::{HeadingLevel, MarkupNode, Tag};
use crate::ops::{BulletPreset, CharacterStyle, NamedStyle, TextRange};

use super::cursor::InsertionEngine;
use super::inline::compile_runs;
use super::normalize::normalize_text;

/// A top-level node, classified by how it is written into the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Block<'a> {
    Heading {
        level: HeadingLevel,
        node: &'a MarkupNode,
    },
    Paragraph(&'a MarkupNode),
    UnorderedList(&'a MarkupNode),
    OrderedList(&'a MarkupNode),
    /// A bare text node directly under the root.
    Text(&'a str),
    /// Any other element, flattened to its text.
    Other(&'a MarkupNode),
}

impl<'a> Block<'a> {
    pub fn classify(node: &'a MarkupNode) -> Self {
        match node {
            MarkupNode::Text(text) => Block::Text(text),
            MarkupNode::Element(element) => match element.tag {
                Tag::Heading(level) => Block::Heading { level, node },
                Tag::Paragraph => Block::Paragraph(node),
                Tag::UnorderedList => Block::UnorderedList(node),
                Tag::OrderedList => Block::OrderedList(node),
                Tag::ListItem | Tag::Strong | Tag::Anchor | Tag::Other(_) => Block::Other(node),
            },
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Block::Heading { .. } => "heading",
            Block::Paragraph(_) => "paragraph",
            Block::UnorderedList(_) => "unordered list",
            Block::OrderedList(_) => "ordered list",
            Block::Text(_) => "text",
            Block::Other(_) => "other",
        }
    }
}

/// Writes one block at the cursor.
pub fn dispatch(engine: &mut InsertionEngine, block: Block<'_>) {
    let before = engine.position();
    match block {
        Block::Heading { level, node } => heading(engine, level, node),
        Block::Paragraph(node) => paragraph(engine, node),
        Block::UnorderedList(node) => list(engine, node, BulletPreset::Disc),
        Block::OrderedList(node) => list(engine, node, BulletPreset::Numbered),
        Block::Text(text) => plain_line(engine, &normalize_text(text)),
        Block::Other(node) => plain_line(engine, &normalize_text(&node.text_content())),
    }

    if engine.position() == before {
        log::debug!("skipped empty {} block at {before}", block.kind());
    } else {
        log::debug!("{} block at {before}..{}", block.kind(), engine.position());
    }
}

/// Heading text plus newline, bold over the text, heading style over the whole line.
fn heading(engine: &mut InsertionEngine, level: HeadingLevel, node: &MarkupNode) {
    let text = normalize_text(&node.text_content());
    if text.is_empty() {
        return;
    }

    let Some(line) = engine.insert(&format!("{text}\n")) else {
        return;
    };
    let visible_end = line.start() + engine.measure(&text);
    if let Some(visible) = TextRange::new(line.start(), visible_end) {
        engine.styles().set_text_style(visible, CharacterStyle::bold());
    }
    engine
        .styles()
        .set_paragraph_style(line, NamedStyle::Heading(level));
}

/// Inline runs plus newline, normal style over the whole paragraph.
fn paragraph(engine: &mut InsertionEngine, node: &MarkupNode) {
    let Some(runs) = compile_runs(engine, node.children()) else {
        return;
    };
    let Some(newline) = engine.insert("\n") else {
        return;
    };
    engine
        .styles()
        .set_paragraph_style(runs.cover(newline), NamedStyle::Normal);
}

/// Every direct `li` becomes one line; a single bullet request spans them all.
fn list(engine: &mut InsertionEngine, node: &MarkupNode, preset: BulletPreset) {
    let mut span: Option<TextRange> = None;

    let items = node
        .children()
        .iter()
        .filter(|child| matches!(child.tag(), Some(Tag::ListItem)));
    for item in items {
        let Some(runs) = compile_runs(engine, item.children()) else {
            continue;
        };
        let Some(newline) = engine.insert("\n") else {
            continue;
        };
        let line = runs.cover(newline);
        span = Some(span.map_or(line, |span| span.cover(line)));
    }

    if let Some(span) = span {
        engine.styles().set_list_bullets(span, preset);
    }
}

/// Unstyled text followed by a newline.
fn plain_line(engine: &mut InsertionEngine, text: &str) {
    if text.is_empty() {
        return;
    }
    engine.insert(&format!("{text}\n"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertOptions;
    use crate::ops::EditOperation;
    use pretty_assertions::assert_eq;

    fn run(node: &MarkupNode) -> Vec<EditOperation> {
        let mut engine = InsertionEngine::new(&ConvertOptions::default());
        dispatch(&mut engine, Block::classify(node));
        engine.finish().into_operations()
    }

    fn li(children: Vec<MarkupNode>) -> MarkupNode {
        MarkupNode::element(Tag::ListItem, children)
    }

    fn range(start: usize, end: usize) -> TextRange {
        TextRange::new(start, end).unwrap()
    }

    #[test]
    fn heading_bolds_text_and_styles_line() {
        let node = MarkupNode::element(
            Tag::Heading(HeadingLevel::H2),
            vec![MarkupNode::text("Accra")],
        );
        assert_eq!(
            run(&node),
            vec![
                EditOperation::InsertText {
                    index: 1,
                    text: "Accra\n".to_string()
                },
                EditOperation::SetTextStyle {
                    range: range(1, 6),
                    style: CharacterStyle::bold()
                },
                EditOperation::SetParagraphStyle {
                    range: range(1, 7),
                    style: NamedStyle::Heading(HeadingLevel::H2)
                },
            ]
        );
    }

    #[test]
    fn empty_heading_is_skipped() {
        let node = MarkupNode::element(
            Tag::Heading(HeadingLevel::H1),
            vec![MarkupNode::text(" \n ")],
        );
        assert!(run(&node).is_empty());
    }

    #[test]
    fn paragraph_style_covers_runs_and_newline() {
        let node = MarkupNode::element(
            Tag::Paragraph,
            vec![
                MarkupNode::text("Visit "),
                MarkupNode::element(Tag::Strong, vec![MarkupNode::text("Kumasi")]),
                MarkupNode::text(" today."),
            ],
        );
        let ops = run(&node);
        assert_eq!(
            ops.last(),
            Some(&EditOperation::SetParagraphStyle {
                range: range(1, 21),
                style: NamedStyle::Normal
            })
        );
    }

    #[test]
    fn empty_paragraph_emits_nothing() {
        let node = MarkupNode::element(Tag::Paragraph, vec![MarkupNode::text("   ")]);
        assert!(run(&node).is_empty());
    }

    #[test]
    fn list_gets_one_bullet_request_over_all_items() {
        let node = MarkupNode::element(
            Tag::UnorderedList,
            vec![
                li(vec![MarkupNode::text("One")]),
                MarkupNode::text("\n  "),
                li(vec![MarkupNode::text("Two")]),
            ],
        );
        let ops = run(&node);
        let bullets: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, EditOperation::SetListBullets { .. }))
            .collect();
        assert_eq!(
            bullets,
            vec![&EditOperation::SetListBullets {
                range: range(1, 9),
                preset: BulletPreset::Disc
            }]
        );
    }

    #[test]
    fn ordered_list_uses_numbered_preset() {
        let node = MarkupNode::element(
            Tag::OrderedList,
            vec![li(vec![MarkupNode::text("Book")]), li(vec![MarkupNode::text("Fly")])],
        );
        assert_eq!(
            run(&node).last(),
            Some(&EditOperation::SetListBullets {
                range: range(1, 10),
                preset: BulletPreset::Numbered
            })
        );
    }

    #[test]
    fn empty_items_do_not_move_bullet_endpoints() {
        let node = MarkupNode::element(
            Tag::UnorderedList,
            vec![
                li(vec![MarkupNode::text("  ")]),
                li(vec![MarkupNode::text("One")]),
                li(vec![]),
                li(vec![MarkupNode::text("Two")]),
                li(vec![MarkupNode::text("\n")]),
            ],
        );
        let ops = run(&node);
        assert_eq!(
            ops,
            vec![
                EditOperation::InsertText {
                    index: 1,
                    text: "One".to_string()
                },
                EditOperation::InsertText {
                    index: 4,
                    text: "\n".to_string()
                },
                EditOperation::InsertText {
                    index: 5,
                    text: "Two".to_string()
                },
                EditOperation::InsertText {
                    index: 8,
                    text: "\n".to_string()
                },
                EditOperation::SetListBullets {
                    range: range(1, 9),
                    preset: BulletPreset::Disc
                },
            ]
        );
    }

    #[test]
    fn list_of_empty_items_emits_nothing() {
        let node = MarkupNode::element(Tag::OrderedList, vec![li(vec![]), li(vec![])]);
        assert!(run(&node).is_empty());
    }

    #[test]
    fn unrecognised_element_is_flattened() {
        let node = MarkupNode::element(
            Tag::Other("table".to_string()),
            vec![
                MarkupNode::element(Tag::Other("td".to_string()), vec![MarkupNode::text("Price")]),
                MarkupNode::element(Tag::Other("td".to_string()), vec![MarkupNode::text(" $20")]),
            ],
        );
        assert_eq!(
            run(&node),
            vec![EditOperation::InsertText {
                index: 1,
                text: "Price $20\n".to_string()
            }]
        );
    }

    #[test]
    fn bare_text_becomes_a_line() {
        let node = MarkupNode::text("  Akwaaba \n");
        assert_eq!(
            run(&node),
            vec![EditOperation::InsertText {
                index: 1,
                text: "Akwaaba\n".to_string()
            }]
        );
    }
}
