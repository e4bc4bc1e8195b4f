//! # Markup Tree
//!
//! An owned, immutable tree of the markup a content generator hands back.
//!
//! ## Parsing
//!
//! - **`html`**: HTML5 tree building via html5ever, converted into [`MarkupNode`]s
//! - **[`parse_markdown`]**: Markdown is rendered to HTML with pulldown-cmark first,
//!   so both input flavours end up in the same tree shape
//!
//! ## Tag Set
//!
//! Only a fixed subset of elements is recognised (`h1`..`h4`, `p`, `ul`, `ol`,
//! `li`, `strong`, `a`). Everything else is kept as [`Tag::Other`] so the
//! converter can flatten it to text.

pub mod html;

pub use html::parse_html;

/// Name of the synthetic element wrapping a parsed document.
pub const DOCUMENT_TAG: &str = "#document";

/// Unrecognised elements that still separate the text around them.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "br", "dd", "details", "div", "dl",
    "dt", "figcaption", "figure", "footer", "form", "h5", "h6", "header", "hr", "main", "nav",
    "pre", "section", "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr",
];

/// Heading levels the converter maps onto named paragraph styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeadingLevel {
    H1,
    H2,
    H3,
    H4,
}

/// Element tag, closed over the recognised set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Tag {
    Heading(HeadingLevel),
    Paragraph,
    UnorderedList,
    OrderedList,
    ListItem,
    Strong,
    Anchor,
    /// Any other element, keyed by its lower-cased name.
    Other(String),
}

impl Tag {
    /// Classifies a tag name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Self {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "h1" => Tag::Heading(HeadingLevel::H1),
            "h2" => Tag::Heading(HeadingLevel::H2),
            "h3" => Tag::Heading(HeadingLevel::H3),
            "h4" => Tag::Heading(HeadingLevel::H4),
            "p" => Tag::Paragraph,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "strong" => Tag::Strong,
            "a" => Tag::Anchor,
            _ => Tag::Other(name),
        }
    }

    /// Whether the element starts a new line of text when flattened.
    pub fn is_block(&self) -> bool {
        match self {
            Tag::Heading(_)
            | Tag::Paragraph
            | Tag::UnorderedList
            | Tag::OrderedList
            | Tag::ListItem => true,
            Tag::Strong | Tag::Anchor => false,
            Tag::Other(name) => BLOCK_ELEMENTS.contains(&name.as_str()),
        }
    }
}

/// An element with its attributes and ordered children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: Tag,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_string(), value.to_string()));
        self
    }

    pub fn with_children(mut self, children: Vec<MarkupNode>) -> Self {
        self.children = children;
        self
    }

    /// Looks up an attribute value. Empty values are treated as missing.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.trim().is_empty())
    }
}

/// A node of the markup tree: a text leaf or an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element(Element),
}

impl MarkupNode {
    pub fn text(text: &str) -> Self {
        MarkupNode::Text(text.to_string())
    }

    /// Shorthand for an element node holding the given children.
    pub fn element(tag: Tag, children: Vec<MarkupNode>) -> Self {
        MarkupNode::Element(Element::new(tag).with_children(children))
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            MarkupNode::Text(_) => None,
        }
    }

    pub fn tag(&self) -> Option<&Tag> {
        self.as_element().map(|element| &element.tag)
    }

    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Element(element) => &element.children,
            MarkupNode::Text(_) => &[],
        }
    }

    /// Concatenates every descendant text leaf in document order.
    ///
    /// Text on either side of a block-level descendant is separated by a
    /// space, so `<div><h2>A</h2><p>B</p></div>` reads `"A B"`. Inline
    /// elements are joined as written. The result is not normalised.
    pub fn text_content(&self) -> String {
        enum Step<'a> {
            Visit(&'a MarkupNode),
            Break,
        }

        let mut out = String::new();
        let mut pending_break = false;
        let mut stack: Vec<Step<'_>> = self.children().iter().rev().map(Step::Visit).collect();
        if let MarkupNode::Text(_) = self {
            stack.push(Step::Visit(self));
        }

        while let Some(step) = stack.pop() {
            match step {
                Step::Break => pending_break = true,
                Step::Visit(MarkupNode::Text(text)) => {
                    if text.is_empty() {
                        continue;
                    }
                    if pending_break && !out.is_empty() {
                        out.push(' ');
                    }
                    pending_break = false;
                    out.push_str(text);
                }
                Step::Visit(MarkupNode::Element(element)) => {
                    let block = element.tag.is_block();
                    if block {
                        stack.push(Step::Break);
                    }
                    stack.extend(element.children.iter().rev().map(Step::Visit));
                    if block {
                        stack.push(Step::Break);
                    }
                }
            }
        }
        out
    }

    /// Finds the first `body` element, depth first.
    pub fn body(&self) -> Option<&MarkupNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let MarkupNode::Element(element) = node {
                if matches!(&element.tag, Tag::Other(name) if name == "body") {
                    return Some(node);
                }
                stack.extend(element.children.iter().rev());
            }
        }
        None
    }
}

/// Renders Markdown to HTML and parses the result.
pub fn parse_markdown(input: &str) -> MarkupNode {
    let parser = pulldown_cmark::Parser::new(input);
    let mut rendered = String::with_capacity(input.len() * 3 / 2);
    pulldown_cmark::html::push_html(&mut rendered, parser);
    parse_html(&rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("h1", Tag::Heading(HeadingLevel::H1))]
    #[case("H4", Tag::Heading(HeadingLevel::H4))]
    #[case("p", Tag::Paragraph)]
    #[case("UL", Tag::UnorderedList)]
    #[case("ol", Tag::OrderedList)]
    #[case("li", Tag::ListItem)]
    #[case("strong", Tag::Strong)]
    #[case("a", Tag::Anchor)]
    #[case("h5", Tag::Other("h5".to_string()))]
    #[case("Table", Tag::Other("table".to_string()))]
    fn classifies_tag_names(#[case] name: &str, #[case] expected: Tag) {
        assert_eq!(Tag::from_name(name), expected);
    }

    #[test]
    fn text_content_concatenates_in_order() {
        let node = MarkupNode::element(
            Tag::Paragraph,
            vec![
                MarkupNode::text("Visit "),
                MarkupNode::element(Tag::Strong, vec![MarkupNode::text("Kumasi")]),
                MarkupNode::text(" today."),
            ],
        );
        assert_eq!(node.text_content(), "Visit Kumasi today.");
    }

    #[test]
    fn empty_href_counts_as_missing() {
        let element = Element::new(Tag::Anchor).with_attr("href", "  ");
        assert_eq!(element.attr("href"), None);

        let element = Element::new(Tag::Anchor).with_attr("HREF", "https://example.com");
        assert_eq!(element.attr("href"), Some("https://example.com"));
    }

    #[test]
    fn body_lookup_falls_through_to_none() {
        let fragment = MarkupNode::element(Tag::Paragraph, vec![MarkupNode::text("hi")]);
        assert!(fragment.body().is_none());
    }

    #[rstest]
    #[case(Tag::Paragraph, true)]
    #[case(Tag::ListItem, true)]
    #[case(Tag::Other("div".to_string()), true)]
    #[case(Tag::Other("td".to_string()), true)]
    #[case(Tag::Strong, false)]
    #[case(Tag::Anchor, false)]
    #[case(Tag::Other("em".to_string()), false)]
    fn block_level_tags(#[case] tag: Tag, #[case] expected: bool) {
        assert_eq!(tag.is_block(), expected);
    }

    #[test]
    fn text_content_separates_block_descendants() {
        let node = MarkupNode::element(
            Tag::Other("div".to_string()),
            vec![
                MarkupNode::element(
                    Tag::Heading(HeadingLevel::H2),
                    vec![MarkupNode::text("Accra")],
                ),
                MarkupNode::element(Tag::Paragraph, vec![MarkupNode::text("Visit Kumasi")]),
                MarkupNode::element(
                    Tag::UnorderedList,
                    vec![MarkupNode::element(Tag::ListItem, vec![MarkupNode::text("One")])],
                ),
            ],
        );
        assert_eq!(node.text_content(), "Accra Visit Kumasi One");
    }

    #[test]
    fn text_content_joins_inline_elements_as_written() {
        let node = MarkupNode::element(
            Tag::Heading(HeadingLevel::H3),
            vec![
                MarkupNode::text("Ada"),
                MarkupNode::element(Tag::Other("em".to_string()), vec![MarkupNode::text("Foah")]),
            ],
        );
        assert_eq!(node.text_content(), "AdaFoah");
    }

    #[test]
    fn text_leaf_is_its_own_content() {
        assert_eq!(MarkupNode::text(" Tema ").text_content(), " Tema ");
    }

    #[test]
    fn markdown_renders_into_recognised_tags() {
        let root = parse_markdown("## Accra\n\nVisit **Kumasi** today.\n\n- One\n- Two\n");
        let body = root.body().expect("html5ever always synthesises a body");
        let tags: Vec<&Tag> = body
            .children()
            .iter()
            .filter_map(MarkupNode::tag)
            .collect();
        assert_eq!(
            tags,
            vec![
                &Tag::Heading(HeadingLevel::H2),
                &Tag::Paragraph,
                &Tag::UnorderedList
            ]
        );
    }
}
