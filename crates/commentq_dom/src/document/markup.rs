//! Markup loader
//!
//! Builds a `Document` from a forgiving subset of HTML: start and end tags with attributes,
//! void and self-closing elements, comments, raw text elements and text. Doctypes and processing
//! instructions are skipped. This is not the HTML5 tree construction algorithm: end tags close
//! the nearest open element with the same name and are ignored when there is none, elements that
//! are still open at the end of the input are closed implicitly.
use crate::document::document_impl::Document;
use crate::node::{RAW_TEXT_ELEMENTS, VOID_ELEMENTS};
use commentq_config::config;
use commentq_config::config_store;
use commentq_shared::errors::Error;
use commentq_shared::node::NodeId;
use commentq_shared::types::Result;
use log::debug;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Lower-case tag and attribute names
    pub lowercase_names: bool,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            lowercase_names: true,
        }
    }
}

impl MarkupOptions {
    #[must_use]
    pub fn from_config() -> Self {
        Self {
            lowercase_names: config!(bool "markup.lowercase_names"),
        }
    }
}

pub(crate) struct MarkupLoader<'a> {
    input: &'a str,
    pos: usize,
    options: MarkupOptions,
    document: Document,
    /// Elements that are currently open, innermost last
    open_elements: Vec<(NodeId, String)>,
}

impl<'a> MarkupLoader<'a> {
    pub(crate) fn new(input: &'a str, options: MarkupOptions) -> Self {
        Self {
            input,
            pos: 0,
            options,
            document: Document::new(),
            open_elements: Vec::new(),
        }
    }

    pub(crate) fn load(mut self) -> Result<Document> {
        while self.pos < self.input.len() {
            let rest = self.rest();

            if rest.starts_with("<!--") {
                self.consume_comment()?;
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.skip_declaration();
            } else if rest.starts_with("</") {
                self.consume_end_tag();
            } else if starts_start_tag(rest) {
                self.consume_start_tag()?;
            } else {
                self.consume_text()?;
            }
        }

        debug!(
            "markup: loaded {} nodes from {} bytes",
            self.document.node_count(),
            self.input.len()
        );

        Ok(self.document)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn current_parent(&self) -> NodeId {
        self.open_elements
            .last()
            .map_or(self.document.root_id(), |(node_id, _)| *node_id)
    }

    fn normalize_name(&self, name: &str) -> String {
        if self.options.lowercase_names {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    /// `<!-- value -->`. The short forms `<!-->` and `<!--->` are empty comments, an unterminated
    /// comment runs until the end of the input.
    fn consume_comment(&mut self) -> Result<()> {
        self.pos += "<!--".len();
        let rest = self.rest();

        let (value, consumed) = if rest.starts_with('>') {
            ("", 1)
        } else if rest.starts_with("->") {
            ("", 2)
        } else if let Some(end) = rest.find("-->") {
            (&rest[..end], end + "-->".len())
        } else {
            (rest, rest.len())
        };

        self.pos += consumed;
        self.document.append_comment(self.current_parent(), value)?;
        Ok(())
    }

    fn skip_declaration(&mut self) {
        let rest = self.rest();
        self.pos += rest.find('>').map_or(rest.len(), |end| end + 1);
    }

    fn consume_end_tag(&mut self) {
        self.pos += "</".len();
        let rest = self.rest();
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let name = self.normalize_name(&rest[..name_len]);
        self.skip_declaration();

        if let Some(index) = self
            .open_elements
            .iter()
            .rposition(|(_, open_name)| open_name.eq_ignore_ascii_case(&name))
        {
            self.open_elements.truncate(index);
        }
    }

    fn consume_start_tag(&mut self) -> Result<()> {
        let tag_start = self.pos;
        self.pos += 1;

        let name = self.consume_name(|c| c.is_whitespace() || c == '>' || c == '/');
        let mut attributes = HashMap::new();
        let mut self_closing = false;

        loop {
            self.skip_whitespace();
            let rest = self.rest();

            if rest.is_empty() {
                return Err(Error::Markup(format!("unterminated start tag at offset {tag_start}")).into());
            }
            if rest.starts_with('>') {
                self.pos += 1;
                break;
            }
            if rest.starts_with("/>") {
                self.pos += 2;
                self_closing = true;
                break;
            }

            let attr_name = self.consume_name(|c| c.is_whitespace() || c == '=' || c == '>' || c == '/');
            if attr_name.is_empty() {
                // stray character such as a lone '/' or '='
                self.pos += rest.chars().next().map_or(1, char::len_utf8);
                continue;
            }

            let value = self.consume_attribute_value();
            // the first occurrence of an attribute wins
            attributes.entry(attr_name).or_insert(value);
        }

        let node_id = self
            .document
            .append_element(self.current_parent(), &name, attributes)?;

        let lower_name = name.to_ascii_lowercase();
        if RAW_TEXT_ELEMENTS.contains(&lower_name.as_str()) && !self_closing {
            self.consume_raw_text(node_id, &lower_name)?;
        } else if !self_closing && !VOID_ELEMENTS.contains(&lower_name.as_str()) {
            self.open_elements.push((node_id, name));
        }

        Ok(())
    }

    fn consume_name(&mut self, is_end: impl Fn(char) -> bool) -> String {
        let rest = self.rest();
        let len = rest.find(is_end).unwrap_or(rest.len());
        self.pos += len;
        self.normalize_name(&rest[..len])
    }

    fn consume_attribute_value(&mut self) -> String {
        let before_equals = self.pos;
        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            self.pos = before_equals;
            return String::new();
        }
        self.pos += 1;
        self.skip_whitespace();

        let rest = self.rest();
        match rest.chars().next() {
            Some(quote @ ('"' | '\'')) => {
                let inner = &rest[1..];
                let end = inner.find(quote).unwrap_or(inner.len());
                self.pos += 1 + end + usize::from(end < inner.len());
                inner[..end].to_string()
            }
            Some(_) => {
                let end = rest
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(rest.len());
                self.pos += end;
                rest[..end].to_string()
            }
            None => String::new(),
        }
    }

    /// Everything up to the matching end tag is text, comments included
    fn consume_raw_text(&mut self, node_id: NodeId, name: &str) -> Result<()> {
        let rest = self.rest();
        let closing = format!("</{name}");
        let end = rest
            .to_ascii_lowercase()
            .find(&closing)
            .unwrap_or(rest.len());

        if end > 0 {
            self.document.append_text(node_id, &rest[..end])?;
        }
        self.pos += end;
        if self.pos < self.input.len() {
            self.skip_declaration();
        }

        Ok(())
    }

    fn consume_text(&mut self) -> Result<()> {
        let rest = self.rest();
        let first = rest.chars().next().map_or(1, char::len_utf8);
        // a '<' that does not start markup is part of the text
        let end = rest[first..]
            .match_indices('<')
            .map(|(index, _)| index + first)
            .find(|index| starts_markup(&rest[*index..]))
            .unwrap_or(rest.len());

        self.document.append_text(self.current_parent(), &rest[..end])?;
        self.pos += end;
        Ok(())
    }
}

fn starts_start_tag(input: &str) -> bool {
    input
        .strip_prefix('<')
        .is_some_and(|tail| tail.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn starts_markup(input: &str) -> bool {
    input.starts_with("<!") || input.starts_with("</") || input.starts_with("<?") || starts_start_tag(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeData, NodeType};
    use test_case::test_case;

    fn load(markup: &str) -> Document {
        Document::from_markup_with(markup, MarkupOptions::default()).unwrap()
    }

    fn comment_values(doc: &Document) -> Vec<String> {
        crate::TreeIterator::new(doc)
            .filter_map(|node_id| doc.node_by_id(node_id))
            .filter(|node| node.is_comment())
            .map(|node| node.value().to_string())
            .collect()
    }

    #[test]
    fn nested_elements_and_comments() {
        let doc = load(r#"<div><!-- c1 --><span><!-- c2 name="x" --></span></div>"#);

        let root_children = doc.children(doc.root_id());
        assert_eq!(root_children.len(), 1);
        let div_id = root_children[0];
        let div = doc.node_by_id(div_id).unwrap();
        assert_eq!(div.name(), Some("div"));
        assert_eq!(div.children.len(), 2);

        let c1 = doc.node_by_id(div.children[0]).unwrap();
        assert_eq!(c1.type_of(), NodeType::Comment);
        assert_eq!(c1.value(), " c1 ");

        let span = doc.node_by_id(div.children[1]).unwrap();
        assert_eq!(span.name(), Some("span"));
        let c2 = doc.node_by_id(span.children[0]).unwrap();
        assert_eq!(c2.value(), " c2 name=\"x\" ");
    }

    #[test]
    fn attributes() {
        let doc = load(r#"<input TYPE=text value='a b' disabled data-x = "1" type="other">"#);
        let input = doc.node_by_id(doc.children(doc.root_id())[0]).unwrap();

        assert_eq!(input.get_attribute("type"), Some("text"));
        assert_eq!(input.get_attribute("value"), Some("a b"));
        assert_eq!(input.get_attribute("disabled"), Some(""));
        assert_eq!(input.get_attribute("data-x"), Some("1"));
        assert!(input.children.is_empty());
    }

    #[test]
    fn keeps_case_when_asked() {
        let options = MarkupOptions {
            lowercase_names: false,
        };
        let doc = Document::from_markup_with("<Widget Name=a></Widget>", options).unwrap();
        let widget = doc.node_by_id(doc.children(doc.root_id())[0]).unwrap();

        assert_eq!(widget.name(), Some("Widget"));
        assert_eq!(widget.get_attribute("Name"), Some("a"));
    }

    #[test]
    fn void_and_self_closing_elements() {
        let doc = load("<p>a<br>b<img src=x /><x-y/>c</p>");
        let p_id = doc.children(doc.root_id())[0];
        let names: Vec<_> = doc
            .children(p_id)
            .iter()
            .filter_map(|id| doc.node_by_id(*id))
            .map(|node| match &node.data {
                NodeData::Element { name, .. } => name.clone(),
                NodeData::Text { value } => format!("#{value}"),
                _ => "?".to_string(),
            })
            .collect();

        assert_eq!(names, vec!["#a", "br", "#b", "img", "x-y", "#c"]);
    }

    #[test_case("<!---->", "" ; "empty")]
    #[test_case("<!-->", "" ; "abrupt")]
    #[test_case("<!--->", "" ; "abrupt with dash")]
    #[test_case("<!-- a -- b -->", " a -- b " ; "double dash inside")]
    #[test_case("<!-- runs to the end", " runs to the end" ; "unterminated")]
    fn comment_forms(markup: &str, expected: &str) {
        assert_eq!(comment_values(&load(markup)), vec![expected.to_string()]);
    }

    #[test]
    fn raw_text_hides_comments() {
        let doc = load("<script>var a = '<!-- not a comment -->';</SCRIPT><!-- real -->");
        assert_eq!(comment_values(&doc), vec![" real ".to_string()]);

        let script_id = doc.children(doc.root_id())[0];
        let text = doc.node_by_id(doc.children(script_id)[0]).unwrap();
        assert_eq!(text.value(), "var a = '<!-- not a comment -->';");
    }

    #[test]
    fn doctype_is_skipped_and_stray_end_tags_ignored() {
        let doc = load("<!DOCTYPE html></p><div>x</span></div>");
        let children = doc.children(doc.root_id());
        assert_eq!(children.len(), 1);
        assert_eq!(doc.node_by_id(children[0]).unwrap().name(), Some("div"));
    }

    #[test]
    fn end_tag_closes_nested_open_elements() {
        let doc = load("<div><p><b>bold</div><!-- after -->");
        let root_children = doc.children(doc.root_id());
        assert_eq!(root_children.len(), 2);
        assert!(doc.node_by_id(root_children[1]).unwrap().is_comment());
    }

    #[test]
    fn unclosed_elements_are_closed_at_end() {
        let doc = load("<ul><li><!-- a --><li><!-- b -->");
        assert_eq!(comment_values(&doc), vec![" a ", " b "]);
    }

    #[test]
    fn lone_angle_bracket_is_text() {
        let doc = load("a < b <!-- c -->");
        let children = doc.children(doc.root_id());
        assert_eq!(children.len(), 2);
        assert_eq!(doc.node_by_id(children[0]).unwrap().value(), "a < b ");
    }

    #[test]
    fn unterminated_start_tag_is_an_error() {
        let err = Document::from_markup_with("<div class=\"x\"", MarkupOptions::default()).unwrap_err();
        assert!(matches!(err.downcast_ref::<Error>(), Some(Error::Markup(_))));
    }
}
