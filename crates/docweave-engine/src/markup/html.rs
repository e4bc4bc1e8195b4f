use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

use super::{DOCUMENT_TAG, Element, MarkupNode, Tag};

/// Element nesting kept as structure. Anything deeper becomes one text leaf.
pub const MAX_DEPTH: usize = 128;

/// Parses an HTML string into an owned markup tree.
///
/// The HTML5 tree builder never rejects input: unclosed or misnested tags are
/// repaired the way a browser would, and fragments are wrapped in
/// `html`/`body`. Comments, doctypes and processing instructions are dropped.
/// Elements nested deeper than [`MAX_DEPTH`] are flattened into their text.
pub fn parse_html(input: &str) -> MarkupNode {
    let dom = parse_document(RcDom::default(), Default::default()).one(input);
    let children = convert_children(&dom.document, 1);
    MarkupNode::Element(
        Element::new(Tag::Other(DOCUMENT_TAG.to_string())).with_children(children),
    )
}

fn convert_children(handle: &Handle, depth: usize) -> Vec<MarkupNode> {
    handle
        .children
        .borrow()
        .iter()
        .filter_map(|child| convert_node(child, depth))
        .collect()
}

fn convert_node(handle: &Handle, depth: usize) -> Option<MarkupNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(MarkupNode::Text(contents.borrow().to_string())),
        NodeData::Element { .. } | NodeData::Document if depth >= MAX_DEPTH => {
            log::debug!("flattening markup nested deeper than {MAX_DEPTH}");
            Some(MarkupNode::Text(flatten_text(handle)))
        }
        NodeData::Element { name, attrs, .. } => {
            let attrs = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            Some(MarkupNode::Element(Element {
                tag: Tag::from_name(name.local.as_ref()),
                attrs,
                children: convert_children(handle, depth + 1),
            }))
        }
        NodeData::Document => Some(MarkupNode::Element(
            Element::new(Tag::Other(DOCUMENT_TAG.to_string()))
                .with_children(convert_children(handle, depth + 1)),
        )),
        NodeData::Doctype { .. }
        | NodeData::Comment { .. }
        | NodeData::ProcessingInstruction { .. } => None,
    }
}

/// Text of a whole subtree, walked with an explicit stack. Block elements
/// separate their text from the surrounding text with a space.
fn flatten_text(handle: &Handle) -> String {
    enum Step {
        Visit(Handle),
        Break,
    }

    let mut out = String::new();
    let mut stack = vec![Step::Visit(handle.clone())];
    while let Some(step) = stack.pop() {
        let node = match step {
            Step::Break => {
                out.push(' ');
                continue;
            }
            Step::Visit(node) => node,
        };
        let block = match &node.data {
            NodeData::Text { contents } => {
                out.push_str(&contents.borrow());
                continue;
            }
            NodeData::Element { name, .. } => Tag::from_name(name.local.as_ref()).is_block(),
            NodeData::Document => false,
            NodeData::Doctype { .. }
            | NodeData::Comment { .. }
            | NodeData::ProcessingInstruction { .. } => continue,
        };
        if block {
            stack.push(Step::Break);
        }
        stack.extend(node.children.borrow().iter().rev().cloned().map(Step::Visit));
        if block {
            stack.push(Step::Break);
        }
    }
    out
}
