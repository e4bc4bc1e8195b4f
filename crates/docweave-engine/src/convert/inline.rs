use crate::markup::{MarkupNode, Tag};
use crate::ops::{CharacterStyle, TextRange};

use super::cursor::InsertionEngine;
use super::normalize::normalize_text;

/// How a child of a paragraph or list item is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InlineRun<'a> {
    Bold,
    Link { href: Option<&'a str> },
    Plain,
}

impl<'a> InlineRun<'a> {
    pub fn classify(node: &'a MarkupNode) -> Self {
        match node {
            MarkupNode::Element(element) => match element.tag {
                Tag::Strong => InlineRun::Bold,
                Tag::Anchor => InlineRun::Link {
                    href: element.attr("href"),
                },
                _ => InlineRun::Plain,
            },
            MarkupNode::Text(_) => InlineRun::Plain,
        }
    }

    fn style(&self) -> Option<CharacterStyle> {
        match self {
            InlineRun::Bold => Some(CharacterStyle::bold()),
            InlineRun::Link { href: Some(url) } => Some(CharacterStyle::link(url)),
            InlineRun::Link { href: None } | InlineRun::Plain => None,
        }
    }
}

/// Inserts the children of a paragraph or list item as inline runs.
///
/// Runs are separated by a single space, each styled over its own text only.
/// Returns the span from the first run's start to the last run's end, or
/// `None` when every child normalised to nothing. The trailing newline is the
/// caller's job.
pub fn compile_runs(engine: &mut InsertionEngine, children: &[MarkupNode]) -> Option<TextRange> {
    let mut previous_visible = false;
    let mut span: Option<TextRange> = None;

    for child in children {
        let text = normalize_text(&child.text_content());
        if text.is_empty() {
            continue;
        }

        let run = InlineRun::classify(child);
        engine.insert_separator_if_needed(previous_visible);
        let Some(range) = engine.insert(&text) else {
            continue;
        };
        if let Some(style) = run.style() {
            engine.styles().set_text_style(range, style);
        }

        previous_visible = true;
        span = Some(span.map_or(range, |span| span.cover(range)));
    }

    span
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertOptions;
    use crate::markup::Element;
    use crate::ops::EditOperation;
    use pretty_assertions::assert_eq;

    fn strong(text: &str) -> MarkupNode {
        MarkupNode::element(Tag::Strong, vec![MarkupNode::text(text)])
    }

    fn anchor(href: Option<&str>, text: &str) -> MarkupNode {
        let mut element = Element::new(Tag::Anchor).with_children(vec![MarkupNode::text(text)]);
        if let Some(href) = href {
            element = element.with_attr("href", href);
        }
        MarkupNode::Element(element)
    }

    fn compile(children: &[MarkupNode]) -> (Option<TextRange>, Vec<EditOperation>) {
        let mut engine = InsertionEngine::new(&ConvertOptions::default());
        let span = compile_runs(&mut engine, children);
        (span, engine.finish().into_operations())
    }

    #[test]
    fn separates_runs_across_tag_boundaries() {
        let (span, ops) = compile(&[
            MarkupNode::text("Visit"),
            strong("Kumasi"),
            MarkupNode::text("today."),
        ]);

        let text: String = ops
            .iter()
            .filter_map(|op| match op {
                EditOperation::InsertText { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(text, "Visit Kumasi today.");
        assert_eq!(span, TextRange::new(1, 20));
    }

    #[test]
    fn bold_range_excludes_separator() {
        let (_, ops) = compile(&[MarkupNode::text("Visit "), strong(" Kumasi ")]);
        let bold: Vec<_> = ops
            .iter()
            .filter(|op| matches!(op, EditOperation::SetTextStyle { .. }))
            .collect();
        assert_eq!(
            bold,
            vec![&EditOperation::SetTextStyle {
                range: TextRange::new(7, 13).unwrap(),
                style: CharacterStyle::bold()
            }]
        );
    }

    #[test]
    fn bold_then_link_get_a_space_and_their_own_styles() {
        let (_, ops) = compile(&[
            strong("Cape Coast"),
            anchor(Some("https://example.com/castle"), "castle tours"),
        ]);
        assert_eq!(
            ops,
            vec![
                EditOperation::InsertText {
                    index: 1,
                    text: "Cape Coast".to_string()
                },
                EditOperation::SetTextStyle {
                    range: TextRange::new(1, 11).unwrap(),
                    style: CharacterStyle::bold()
                },
                EditOperation::InsertText {
                    index: 11,
                    text: " ".to_string()
                },
                EditOperation::InsertText {
                    index: 12,
                    text: "castle tours".to_string()
                },
                EditOperation::SetTextStyle {
                    range: TextRange::new(12, 24).unwrap(),
                    style: CharacterStyle::link("https://example.com/castle")
                },
            ]
        );
    }

    #[test]
    fn link_without_href_is_plain_text() {
        let (span, ops) = compile(&[anchor(None, "Elmina")]);
        assert_eq!(span, TextRange::new(1, 7));
        assert_eq!(ops.len(), 1);
    }

    #[test]
    fn empty_children_produce_nothing() {
        let (span, ops) = compile(&[MarkupNode::text("  \n "), strong("")]);
        assert_eq!(span, None);
        assert!(ops.is_empty());
    }

    #[test]
    fn whitespace_child_does_not_trigger_separator() {
        let (_, ops) = compile(&[
            strong("Tema"),
            MarkupNode::text("  "),
            MarkupNode::text("Harbour"),
        ]);
        assert_eq!(ops.len(), 4);
        assert_eq!(
            ops[2],
            EditOperation::InsertText {
                index: 5,
                text: " ".to_string()
            }
        );
    }

    #[test]
    fn nested_markup_in_plain_child_is_flattened() {
        let em = MarkupNode::element(
            Tag::Other("em".to_string()),
            vec![MarkupNode::text("golden"), MarkupNode::text(" hour")],
        );
        let (span, ops) = compile(&[em]);
        assert_eq!(span, TextRange::new(1, 12));
        assert_eq!(
            ops,
            vec![EditOperation::InsertText {
                index: 1,
                text: "golden hour".to_string()
            }]
        );
    }
}
