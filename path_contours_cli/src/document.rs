//! Owned SVG element tree: loaded through `roxmltree`, edited in place and serialized back.
use crate::error::Result;
use std::{collections::HashSet, fmt::Write as _};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";
const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub prefix: Option<String>,
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Character data written back as a `<![CDATA[..]]>` section.
    CData(String),
    Comment(String),
    ProcessingInstruction { target: String, value: Option<String> },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub prefix: Option<String>,
    pub name: String,
    /// Namespace declarations made on this element (`None` prefix is the default namespace).
    pub namespaces: Vec<(Option<String>, String)>,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Node>,
}

/// Child index path from the root element to an element.
pub type ElementPath = Vec<usize>;

impl Element {
    pub fn new(prefix: Option<String>, name: impl Into<String>) -> Self {
        Element {
            prefix,
            name: name.into(),
            namespaces: Vec::new(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of an attribute without namespace prefix.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.prefix.is_none() && a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.prefix.is_none() && a.name == name)
        {
            Some(a) => a.value = value,
            None => self.attributes.push(Attribute {
                prefix: None,
                name: name.to_string(),
                value,
            }),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let i = self
            .attributes
            .iter()
            .position(|a| a.prefix.is_none() && a.name == name)?;
        Some(self.attributes.remove(i).value)
    }

    #[inline]
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    fn find_path(&self, id: &str, path: &mut ElementPath) -> bool {
        for (i, child) in self.children.iter().enumerate() {
            if let Node::Element(e) = child {
                path.push(i);
                if e.id() == Some(id) || e.find_path(id, path) {
                    return true;
                }
                path.pop();
            }
        }
        false
    }

    fn collect_ids<'a>(&'a self, ids: &mut HashSet<&'a str>) {
        if let Some(id) = self.id() {
            ids.insert(id);
        }
        for child in self.child_elements() {
            child.collect_ids(ids);
        }
    }

    fn write_to(&self, out: &mut String) {
        let qname = qualified(self.prefix.as_deref(), &self.name);
        out.push('<');
        out.push_str(&qname);
        for (prefix, uri) in &self.namespaces {
            match prefix {
                Some(p) => write_attr(out, &format!("xmlns:{p}"), uri),
                None => write_attr(out, "xmlns", uri),
            }
        }
        for a in &self.attributes {
            write_attr(out, &qualified(a.prefix.as_deref(), &a.name), &a.value);
        }

        if self.children.is_empty() {
            out.push_str("/>");
            return;
        }

        out.push('>');
        for child in &self.children {
            child.write_to(out);
        }
        let _ = write!(out, "</{qname}>");
    }
}

impl Node {
    fn write_to(&self, out: &mut String) {
        match self {
            Node::Element(e) => e.write_to(out),
            Node::Text(text) => escape_into(out, text, false),
            Node::CData(text) => {
                let _ = write!(out, "<![CDATA[{text}]]>");
            }
            Node::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            Node::ProcessingInstruction { target, value } => match value {
                Some(v) => {
                    let _ = write!(out, "<?{target} {v}?>");
                }
                None => {
                    let _ = write!(out, "<?{target}?>");
                }
            },
        }
    }
}

fn qualified(prefix: Option<&str>, name: &str) -> String {
    match prefix {
        Some(p) => format!("{p}:{name}"),
        None => name.to_string(),
    }
}

fn write_attr(out: &mut String, name: &str, value: &str) {
    let _ = write!(out, " {name}=\"");
    escape_into(out, value, true);
    out.push('"');
}

fn escape_into(out: &mut String, text: &str, attribute: bool) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\n' if attribute => out.push_str("&#10;"),
            _ => out.push(c),
        }
    }
}

/// Parsed SVG document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Comments and processing instructions before the root element.
    prolog: Vec<Node>,
    root: Element,
}

impl Document {
    pub fn parse(text: &str) -> Result<Self> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let doc = roxmltree::Document::parse_with_options(text, options)?;

        let mut prolog = Vec::new();
        for node in doc.root().children() {
            if node.is_element() {
                break;
            }
            prolog.extend(convert_node(node));
        }

        Ok(Document {
            prolog,
            root: convert_element(doc.root_element()),
        })
    }

    #[inline]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Path to the element with `id`, searched depth first.
    pub fn find(&self, id: &str) -> Option<ElementPath> {
        if self.root.id() == Some(id) {
            return Some(Vec::new());
        }
        let mut path = Vec::new();
        self.root.find_path(id, &mut path).then_some(path)
    }

    pub fn element(&self, path: &[usize]) -> Option<&Element> {
        let mut current = &self.root;
        for &i in path {
            current = match current.children.get(i)? {
                Node::Element(e) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    pub fn element_mut(&mut self, path: &[usize]) -> Option<&mut Element> {
        let mut current = &mut self.root;
        for &i in path {
            current = match current.children.get_mut(i)? {
                Node::Element(e) => e,
                _ => return None,
            };
        }
        Some(current)
    }

    /// Insert `elements` as siblings directly after the element at `path`. Returns false for the
    /// root element or a stale path.
    pub fn insert_after(&mut self, path: &[usize], elements: Vec<Element>) -> bool {
        let Some((&last, parent_path)) = path.split_last() else {
            return false;
        };
        let Some(parent) = self.element_mut(parent_path) else {
            return false;
        };
        if last >= parent.children.len() {
            return false;
        }
        let at = last + 1;
        parent
            .children
            .splice(at..at, elements.into_iter().map(Node::Element));
        true
    }

    /// Remove the element at `path`, the root cannot be removed.
    pub fn remove(&mut self, path: &[usize]) -> Option<Element> {
        let (&last, parent_path) = path.split_last()?;
        let parent = self.element_mut(parent_path)?;
        if !matches!(parent.children.get(last), Some(Node::Element(_))) {
            return None;
        }
        match parent.children.remove(last) {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Every id used in the document.
    pub fn ids(&self) -> HashSet<&str> {
        let mut ids = HashSet::new();
        self.root.collect_ids(&mut ids);
        ids
    }

    /// `base` if unused, otherwise `base` with the first free numeric suffix. The returned id is
    /// added to `taken`.
    pub fn unique_id(base: &str, taken: &mut HashSet<String>) -> String {
        let mut candidate = base.to_string();
        let mut n = 1;
        while taken.contains(&candidate) {
            candidate = format!("{base}-{n}");
            n += 1;
        }
        taken.insert(candidate.clone());
        candidate
    }

    pub fn to_xml(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>\n");
        for node in &self.prolog {
            if matches!(node, Node::ProcessingInstruction { target, .. } if target == "xml") {
                continue;
            }
            node.write_to(&mut out);
            out.push('\n');
        }
        self.root.write_to(&mut out);
        out.push('\n');
        out
    }
}

fn convert_node(node: roxmltree::Node) -> Vec<Node> {
    match node.node_type() {
        roxmltree::NodeType::Element => vec![Node::Element(convert_element(node))],
        roxmltree::NodeType::Text => node
            .text()
            .map(|t| convert_text(node, t))
            .unwrap_or_default(),
        roxmltree::NodeType::Comment => node
            .text()
            .map(|t| Node::Comment(t.to_string()))
            .into_iter()
            .collect(),
        roxmltree::NodeType::PI => node
            .pi()
            .map(|pi| Node::ProcessingInstruction {
                target: pi.target.to_string(),
                value: pi.value.map(str::to_string),
            })
            .into_iter()
            .collect(),
        roxmltree::NodeType::Root => Vec::new(),
    }
}

/// Text made only of CDATA sections and whitespace keeps its sections (`<style>` content as
/// written by editors). Any other text becomes a single escaped text node.
fn convert_text(node: roxmltree::Node, text: &str) -> Vec<Node> {
    let plain = || vec![Node::Text(text.to_string())];

    // roxmltree merges adjacent text and CDATA into one node whose range only covers the first
    // chunk, so the source extent runs up to the next sibling or the parent's end tag
    let input = node.document().input_text();
    let start = node.range().start;
    let end = match (node.next_sibling(), node.parent()) {
        (Some(next), _) => next.range().start,
        (None, Some(parent)) => {
            let range = parent.range();
            input[range.clone()]
                .rfind("</")
                .map_or(range.end, |i| range.start + i)
        }
        (None, None) => input.len(),
    };
    let Some(mut rest) = input.get(start..end) else {
        return plain();
    };
    if !rest.contains("<![CDATA[") {
        return plain();
    }

    let mut nodes = Vec::new();
    while let Some(open) = rest.find("<![CDATA[") {
        let (before, after) = rest.split_at(open);
        if !before.trim().is_empty() {
            return plain();
        }
        if !before.is_empty() {
            nodes.push(Node::Text(before.to_string()));
        }
        let body = &after["<![CDATA[".len()..];
        let Some(close) = body.find("]]>") else {
            return plain();
        };
        nodes.push(Node::CData(body[..close].to_string()));
        rest = &body[close + "]]>".len()..];
    }
    if !rest.trim().is_empty() {
        return plain();
    }
    if !rest.is_empty() {
        nodes.push(Node::Text(rest.to_string()));
    }

    nodes
}

fn namespace_list<'a>(node: Option<roxmltree::Node<'a, '_>>) -> Vec<(Option<&'a str>, &'a str)> {
    node.map(|n| {
        n.namespaces()
            .filter(|ns| ns.uri() != XML_NS)
            .map(|ns| (ns.name(), ns.uri()))
            .collect()
    })
    .unwrap_or_default()
}

fn element_prefix(node: roxmltree::Node, uri: &str) -> Option<String> {
    if node
        .namespaces()
        .any(|ns| ns.name().is_none() && ns.uri() == uri)
    {
        return None;
    }
    attribute_prefix(node, uri)
}

fn attribute_prefix(node: roxmltree::Node, uri: &str) -> Option<String> {
    if uri == XML_NS {
        return Some("xml".to_string());
    }
    node.namespaces()
        .find(|ns| ns.name().is_some() && ns.uri() == uri)
        .and_then(|ns| ns.name())
        .map(str::to_string)
}

fn convert_element(node: roxmltree::Node) -> Element {
    let tag = node.tag_name();
    let prefix = tag.namespace().and_then(|uri| element_prefix(node, uri));

    let inherited = namespace_list(node.parent_element());
    let mut namespaces: Vec<(Option<String>, String)> = namespace_list(Some(node))
        .into_iter()
        .filter(|ns| !inherited.contains(ns))
        .map(|(p, uri)| (p.map(str::to_string), uri.to_string()))
        .collect();
    // default namespace first, then by prefix
    namespaces.sort();

    let attributes = node
        .attributes()
        .map(|a| Attribute {
            prefix: a.namespace().and_then(|uri| attribute_prefix(node, uri)),
            name: a.name().to_string(),
            value: a.value().to_string(),
        })
        .collect();

    let children = node.children().flat_map(convert_node).collect();

    Element {
        prefix,
        name: tag.name().to_string(),
        namespaces,
        attributes,
        children,
    }
}
