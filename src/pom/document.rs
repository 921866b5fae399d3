use crate::error::{Result, ToolingError};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;
use quick_xml::writer::Writer;
use std::borrow::Cow;
use std::fmt::Display;
use std::fs;
use std::path::Path;

pub const POM_NAMESPACE: &str = "http://maven.apache.org/POM/4.0.0";
const UTF8_BOM: &str = "\u{feff}";

/// Index of a node inside a [`PomDocument`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Element(ElementData),
    /// Text, comments, CDATA, declarations: anything kept verbatim.
    Markup(Event<'static>),
}

#[derive(Debug, Clone)]
struct ElementData {
    start: BytesStart<'static>,
    qualified_name: String,
    local_name: String,
    namespace: Option<String>,
    self_closing: bool,
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Order-preserving XML tree of a single Maven POM.
///
/// Nodes live in a flat arena and are addressed by [`NodeId`], so the same
/// element reached through different traversals is always the same node.
/// Everything except mutated text is written back exactly as it was read.
#[derive(Debug, Clone)]
pub struct PomDocument {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    root: NodeId,
    bom: bool,
}

impl PomDocument {
    pub fn parse<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        Self::parse_str(&content).map_err(|err| match err {
            ToolingError::MalformedDocument(msg) => {
                ToolingError::MalformedDocument(format!("{}: {msg}", path.display()))
            }
            other => other,
        })
    }

    pub fn parse_str(content: &str) -> Result<Self> {
        let (content, bom) = match content.strip_prefix(UTF8_BOM) {
            Some(rest) => (rest, true),
            None => (content, false),
        };
        let mut builder = TreeBuilder::default();
        let mut reader = Reader::from_str(content);

        loop {
            let event = reader.read_event().map_err(|e| {
                malformed(format!("{e} (at byte {})", reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => builder.open_element(start.into_owned(), false)?,
                Event::Empty(start) => builder.open_element(start.into_owned(), true)?,
                Event::End(_) => builder.close_element(),
                Event::Eof => break,
                other => builder.push_markup(other.into_owned()),
            }
        }

        builder.finish(bom)
    }

    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_xml_string()?)?;
        Ok(())
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        if self.bom {
            writer.get_mut().extend_from_slice(UTF8_BOM.as_bytes());
        }
        for id in &self.top_level {
            self.write_node(&mut writer, *id)?;
        }
        String::from_utf8(writer.into_inner())
            .map_err(|e| malformed(format!("serialized document is not UTF-8: {e}")))
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Local name of an element node.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.local_name.as_str())
    }

    /// Element that directly contains `id`, if any.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// First direct child element in the POM namespace named `local_name`.
    pub fn find_child(&self, parent: NodeId, local_name: &str) -> Option<NodeId> {
        self.nodes[parent.0]
            .children
            .iter()
            .copied()
            .find(|child| self.is_pom_element(*child, local_name))
    }

    /// Every element named `local_name` below `ancestor`, in document order.
    pub fn find_descendants(&self, ancestor: NodeId, local_name: &str) -> Vec<NodeId> {
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[ancestor.0].children.iter().rev().copied().collect();

        while let Some(id) = stack.pop() {
            if self.is_pom_element(id, local_name) {
                found.push(id);
            }
            stack.extend(self.nodes[id.0].children.iter().rev().copied());
        }

        found
    }

    /// Text content directly inside an element, or `None` if it has none.
    pub fn text(&self, id: NodeId) -> Option<String> {
        let mut text = String::new();
        let mut found = false;

        for child in &self.nodes[id.0].children {
            match &self.nodes[child.0].kind {
                NodeKind::Markup(Event::Text(t)) => {
                    found = true;
                    text.push_str(&decode_text(t));
                }
                NodeKind::Markup(Event::CData(c)) => {
                    found = true;
                    text.push_str(&String::from_utf8_lossy(c));
                }
                NodeKind::Markup(Event::GeneralRef(r)) => {
                    found = true;
                    text.push_str(&decode_reference(&String::from_utf8_lossy(r)));
                }
                _ => {}
            }
        }

        found.then_some(text)
    }

    /// Replace the text content of an element, keeping any child elements.
    pub fn set_text(&mut self, id: NodeId, value: &str) {
        let old_children = std::mem::take(&mut self.nodes[id.0].children);
        let (text_nodes, kept): (Vec<NodeId>, Vec<NodeId>) = old_children
            .into_iter()
            .partition(|child| self.is_text_node(*child));

        for detached in text_nodes {
            self.nodes[detached.0].parent = None;
        }

        let text_node = self.push_node(
            NodeKind::Markup(Event::Text(BytesText::new(value).into_owned())),
            Some(id),
        );

        let node = &mut self.nodes[id.0];
        node.children.push(text_node);
        node.children.extend(kept);
        if let NodeKind::Element(el) = &mut node.kind {
            el.self_closing = false;
        }
    }

    fn element(&self, id: NodeId) -> Option<&ElementData> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            NodeKind::Markup(_) => None,
        }
    }

    fn is_pom_element(&self, id: NodeId, local_name: &str) -> bool {
        self.element(id).is_some_and(|el| {
            el.local_name == local_name && el.namespace.as_deref() == Some(POM_NAMESPACE)
        })
    }

    fn is_text_node(&self, id: NodeId) -> bool {
        matches!(
            self.nodes[id.0].kind,
            NodeKind::Markup(Event::Text(_))
                | NodeKind::Markup(Event::CData(_))
                | NodeKind::Markup(Event::GeneralRef(_))
        )
    }

    fn push_node(&mut self, kind: NodeKind, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        id
    }

    fn write_node(&self, writer: &mut Writer<Vec<u8>>, id: NodeId) -> Result<()> {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Element(el) if el.self_closing && node.children.is_empty() => writer
                .write_event(Event::Empty(el.start.borrow()))
                .map_err(write_error),
            NodeKind::Element(el) => {
                writer
                    .write_event(Event::Start(el.start.borrow()))
                    .map_err(write_error)?;
                for child in &node.children {
                    self.write_node(writer, *child)?;
                }
                writer
                    .write_event(Event::End(BytesEnd::new(el.qualified_name.as_str())))
                    .map_err(write_error)
            }
            NodeKind::Markup(event) => writer.write_event(event.borrow()).map_err(write_error),
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    top_level: Vec<NodeId>,
    open: Vec<NodeId>,
    /// Namespace bindings (prefix, uri) declared on each open element.
    scopes: Vec<Vec<(String, String)>>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn open_element(&mut self, start: BytesStart<'static>, self_closing: bool) -> Result<()> {
        let qualified_name = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| malformed(format!("element name is not UTF-8: {e}")))?
            .to_string();
        let bindings = namespace_bindings(&start)?;

        let (prefix, local_name) = match qualified_name.split_once(':') {
            Some((prefix, local)) => (prefix, local.to_string()),
            None => ("", qualified_name.clone()),
        };
        let namespace = self.resolve(prefix, &bindings);

        if self.open.is_empty() {
            if self.root.is_some() {
                return Err(malformed(format!(
                    "unexpected second root element <{qualified_name}>"
                )));
            }
            if local_name != "project" || namespace.as_deref() != Some(POM_NAMESPACE) {
                return Err(malformed(format!(
                    "root element must be <project> in namespace {POM_NAMESPACE}"
                )));
            }
        }

        let id = self.attach(NodeKind::Element(ElementData {
            start,
            qualified_name,
            local_name,
            namespace,
            self_closing,
        }));

        if self.open.is_empty() {
            self.root = Some(id);
        }

        if !self_closing {
            self.open.push(id);
            self.scopes.push(bindings);
        }
        Ok(())
    }

    fn close_element(&mut self) {
        self.open.pop();
        self.scopes.pop();
    }

    fn push_markup(&mut self, event: Event<'static>) {
        self.attach(NodeKind::Markup(event));
    }

    fn attach(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.open.last().copied();
        self.nodes.push(Node {
            kind,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(parent) => self.nodes[parent.0].children.push(id),
            None => self.top_level.push(id),
        }
        id
    }

    fn resolve(&self, prefix: &str, own: &[(String, String)]) -> Option<String> {
        own.iter()
            .chain(self.scopes.iter().rev().flatten())
            .find(|(bound, _)| bound == prefix)
            .map(|(_, uri)| uri.clone())
            .filter(|uri| !uri.is_empty())
    }

    fn finish(self, bom: bool) -> Result<PomDocument> {
        if !self.open.is_empty() {
            return Err(malformed("unexpected end of document"));
        }
        let root = self.root.ok_or_else(|| malformed("document has no root element"))?;
        Ok(PomDocument {
            nodes: self.nodes,
            top_level: self.top_level,
            root,
            bom,
        })
    }
}

fn namespace_bindings(start: &BytesStart<'_>) -> Result<Vec<(String, String)>> {
    let mut bindings = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(format!("invalid attribute: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| malformed(format!("attribute name is not UTF-8: {e}")))?;

        let prefix = if key == "xmlns" {
            ""
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            prefix
        } else {
            continue;
        };

        let raw = std::str::from_utf8(attr.value.as_ref())
            .map_err(|e| malformed(format!("namespace URI is not UTF-8: {e}")))?;
        let uri = unescape(raw).map_err(|e| malformed(format!("invalid namespace URI: {e}")))?;
        bindings.push((prefix.to_string(), uri.into_owned()));
    }

    Ok(bindings)
}

fn decode_text(text: &BytesText<'_>) -> String {
    let raw = String::from_utf8_lossy(text);
    unescape(&raw)
        .map(Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

/// Expands `&name;` for predefined and character references; anything else
/// is kept as written.
fn decode_reference(name: &str) -> String {
    unescape(&format!("&{name};"))
        .map(Cow::into_owned)
        .unwrap_or_else(|_| format!("&{name};"))
}

fn malformed(msg: impl Into<String>) -> ToolingError {
    ToolingError::MalformedDocument(msg.into())
}

fn write_error(e: impl Display) -> ToolingError {
    ToolingError::MalformedDocument(format!("failed to serialize document: {e}"))
}
