//! XML View documents
//!
//! An [`XmlDocument`] is a parsed XML view: a tree of element nodes with
//! their (prefixed) names and ordered attributes. Text content is not
//! supported, as views describe controls through elements and attributes
//! only. Documents can be queried by `id` attribute, mutated, and serialized
//! back with [`Display`](std::fmt::Display).

use crate::{error, Error};
use oakwood::{NoCookie, index, tree};
use std::fmt;
use xmlparser::{ElementEnd, StrSpan, Token, Tokenizer};

index!(LineNumber, OptionalLineNumber);

tree!(XmlNodeTree, XmlNode, XmlNodeKey, XmlNodeIndex, OptionalXmlNodeIndex, NoCookie);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct XmlAttribute {
    pub prefix: String,
    pub local: String,
    /// Unescaped value
    pub value: String,
}

impl XmlAttribute {
    fn qualified_name(&self) -> String {
        qualify(&self.prefix, &self.local)
    }

    fn is(&self, name: &str) -> bool {
        match name.split_once(':') {
            Some((prefix, local)) => self.prefix == prefix && self.local == local,
            None => self.prefix.is_empty() && self.local == name,
        }
    }
}

/// An XML element
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct XmlNode {
    pub prefix: String,
    pub local: String,
    pub attributes: Vec<XmlAttribute>,
    /// Line of the start tag in the source; unset for created elements
    pub line: OptionalLineNumber,
    parent: Option<XmlNodeKey>,
    children: Vec<XmlNodeKey>,
}

/// Elements are kept in an [`XmlNodeTree`]; the child order lives in the nodes.
pub struct XmlDocument {
    tree: XmlNodeTree,
    root: Option<XmlNodeKey>,
}

fn qualify(prefix: &str, local: &str) -> String {
    match prefix.is_empty() {
        true => String::from(local),
        false => format!("{}:{}", prefix, local),
    }
}

/// Resolves the five predefined entities and character references
fn unescape(raw: &str, line: usize) -> Result<String, Error> {
    let mut result = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let semicolon = match rest.find(';') {
            Some(i) => i,
            None => return Err(error!(Xml, "Unterminated entity in {:?} (line {})", raw, line)),
        };

        let entity = &rest[1..semicolon];
        let c = match entity {
            "amp" => '&',
            "lt" => '<',
            "gt" => '>',
            "quot" => '"',
            "apos" => '\'',
            _ => {
                let code = match (entity.strip_prefix("#x"), entity.strip_prefix('#')) {
                    (Some(hex), _) => u32::from_str_radix(hex, 16).ok(),
                    (None, Some(dec)) => dec.parse().ok(),
                    (None, None) => None,
                };

                match code.and_then(char::from_u32) {
                    Some(c) => c,
                    None => return Err(error!(Xml, "Unknown entity &{}; (line {})", entity, line)),
                }
            },
        };

        result.push(c);
        rest = &rest[semicolon + 1..];
    }

    result.push_str(rest);
    Ok(result)
}

/// Attribute value, escaped for double quotes
struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in self.0.chars() {
            match c {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\n' => f.write_str("&#10;")?,
                '\t' => f.write_str("&#9;")?,
                '\r' => f.write_str("&#13;")?,
                c => write!(f, "{}", c)?,
            }
        }
        Ok(())
    }
}

impl XmlDocument {
    /// Parses an XML view
    pub fn parse(xml: &str) -> Result<Self, Error> {
        let line = |span: StrSpan| xml[..span.start()].lines().count().max(1);

        let mut document = Self {
            tree: XmlNodeTree::new(),
            root: None,
        };
        let mut open: Vec<XmlNodeKey> = Vec::new();
        // element whose start tag is still being read
        let mut pending: Option<XmlNodeKey> = None;

        for token in Tokenizer::from(xml) {
            let token = token.map_err(|e| error!(Xml, "XML token error: {}", e))?;

            match token {
                Token::ElementStart { prefix, local, span } => {
                    if open.is_empty() && document.root.is_some() {
                        return Err(error!(Xml, "Multiple root elements (line {})", line(span)));
                    }

                    let node = document.create_element(prefix.as_str(), local.as_str());
                    document.tree[node].line = Some(line(span).into()).into();

                    match open.last() {
                        Some(parent) => document.insert_child(*parent, node, usize::MAX)?,
                        None => document.root = Some(node),
                    }

                    open.push(node);
                    pending = Some(node);
                },

                Token::Attribute { prefix, local, value, span } => {
                    let node = match pending {
                        Some(node) => node,
                        None => return Err(error!(Xml, "Unexpected attribute (line {})", line(span))),
                    };

                    let attribute = XmlAttribute {
                        prefix: prefix.as_str().into(),
                        local: local.as_str().into(),
                        value: unescape(value.as_str(), line(span))?,
                    };

                    let attributes = &mut document.tree[node].attributes;
                    if attributes.iter().any(|a| a.prefix == attribute.prefix && a.local == attribute.local) {
                        return Err(error!(Xml, "Duplicate attribute {} (line {})", attribute.qualified_name(), line(span)));
                    }

                    attributes.push(attribute);
                },

                Token::ElementEnd { end, span } => {
                    pending = None;

                    match end {
                        // ">"
                        ElementEnd::Open => (),
                        // "/>"
                        ElementEnd::Empty => {
                            open.pop();
                        },
                        // "</tag>"
                        ElementEnd::Close(prefix, local) => {
                            let node = match open.pop() {
                                Some(node) => node,
                                None => return Err(error!(Xml, "Unexpected close tag (line {})", line(span))),
                            };

                            let expected = &document.tree[node];
                            if expected.prefix != prefix.as_str() || expected.local != local.as_str() {
                                return Err(error!(
                                    Xml,
                                    "Unexpected close tag {} for {} (line {})",
                                    qualify(prefix.as_str(), local.as_str()),
                                    qualify(&expected.prefix, &expected.local),
                                    line(span),
                                ));
                            }
                        },
                    }
                },

                Token::Text { text } => {
                    let text_str = text.as_str().trim();
                    if !text_str.is_empty() {
                        return Err(error!(Xml, "Unexpected text {:?} (line {})", text_str, line(text)));
                    }
                },

                Token::Declaration { .. } | Token::Comment { .. } | Token::ProcessingInstruction { .. } => (),

                token => return Err(error!(Xml, "Unsupported XML token: {:?}", token)),
            }
        }

        if let Some(node) = open.last() {
            let line = document.line(*node).unwrap_or_default();
            return Err(error!(Xml, "Unclosed element {} (line {})", document.qualified_name(*node), line));
        }

        match document.root {
            Some(_) => Ok(document),
            None => Err(error!(Xml, "XML view appears to be empty; at least one element is required.")),
        }
    }

    pub fn root(&self) -> Option<XmlNodeKey> {
        self.root
    }

    pub fn get(&self, key: XmlNodeKey) -> Option<&XmlNode> {
        self.tree.get(key)
    }

    fn node(&self, key: XmlNodeKey) -> Result<&XmlNode, Error> {
        self.get(key).ok_or_else(|| error!(InvalidTarget, "{:?} is not an element of this document", key))
    }

    fn node_mut(&mut self, key: XmlNodeKey) -> Result<&mut XmlNode, Error> {
        self.node(key)?;
        Ok(&mut self.tree[key])
    }

    /// Source line of the start tag of a parsed element
    pub fn line(&self, key: XmlNodeKey) -> Option<usize> {
        self.get(key)?.line.get().map(usize::from)
    }

    /// Is `key` the root element or attached below it?
    pub fn is_attached(&self, key: XmlNodeKey) -> bool {
        match self.root {
            Some(root) => self.is_ancestor(root, key),
            None => false,
        }
    }

    /// Is `ancestor` equal to `key` or one of its ancestors?
    pub fn is_ancestor(&self, ancestor: XmlNodeKey, key: XmlNodeKey) -> bool {
        let mut current = self.get(key).map(|_| key);
        while let Some(key) = current {
            if key == ancestor {
                return true;
            }
            current = self.parent(key);
        }
        false
    }

    pub fn parent(&self, key: XmlNodeKey) -> Option<XmlNodeKey> {
        self.get(key)?.parent
    }

    pub fn children(&self, key: XmlNodeKey) -> &[XmlNodeKey] {
        match self.get(key) {
            Some(node) => node.children.as_slice(),
            None => &[][..],
        }
    }

    pub fn local_name(&self, key: XmlNodeKey) -> Option<&str> {
        Some(self.get(key)?.local.as_str())
    }

    pub fn prefix(&self, key: XmlNodeKey) -> Option<&str> {
        Some(self.get(key)?.prefix.as_str())
    }

    pub fn qualified_name(&self, key: XmlNodeKey) -> String {
        match self.get(key) {
            Some(node) => qualify(&node.prefix, &node.local),
            None => String::new(),
        }
    }

    /// Namespace URI of an element, resolved through `xmlns` declarations
    pub fn namespace_uri(&self, key: XmlNodeKey) -> Option<&str> {
        let prefix = self.get(key)?.prefix.as_str();
        let mut current = Some(key);
        while let Some(node) = current.and_then(|k| self.get(k)) {
            let declaration = node.attributes.iter().find(|a| match prefix.is_empty() {
                true => a.prefix.is_empty() && a.local == "xmlns",
                false => a.prefix == "xmlns" && a.local == prefix,
            });

            if let Some(declaration) = declaration {
                return Some(declaration.value.as_str());
            }

            current = node.parent;
        }
        None
    }

    /// Reads an attribute; `name` is either `local` or `prefix:local`
    pub fn attribute(&self, key: XmlNodeKey, name: &str) -> Option<&str> {
        let node = self.get(key)?;
        Some(node.attributes.iter().find(|a| a.is(name))?.value.as_str())
    }

    /// Sets (or adds) an attribute; `name` is either `local` or `prefix:local`
    pub fn set_attribute(&mut self, key: XmlNodeKey, name: &str, value: &str) -> Result<(), Error> {
        let node = self.node_mut(key)?;
        match node.attributes.iter_mut().find(|a| a.is(name)) {
            Some(attribute) => attribute.value = value.into(),
            None => {
                let (prefix, local) = name.split_once(':').unwrap_or(("", name));
                node.attributes.push(XmlAttribute {
                    prefix: prefix.into(),
                    local: local.into(),
                    value: value.into(),
                });
            },
        }
        Ok(())
    }

    /// Removes an attribute, returning its value
    pub fn remove_attribute(&mut self, key: XmlNodeKey, name: &str) -> Result<Option<String>, Error> {
        let node = self.node_mut(key)?;
        match node.attributes.iter().position(|a| a.is(name)) {
            Some(i) => Ok(Some(node.attributes.remove(i).value)),
            None => Ok(None),
        }
    }

    /// Depth-first search for the element with an `id` attribute equal to `id`, below `scope` (inclusive)
    pub fn find_by_id(&self, scope: XmlNodeKey, id: &str) -> Option<XmlNodeKey> {
        let mut stack = vec![scope];
        while let Some(key) = stack.pop() {
            if self.attribute(key, "id") == Some(id) {
                return Some(key);
            }
            stack.extend(self.children(key).iter().rev());
        }
        None
    }

    /// Creates a detached element
    pub fn create_element(&mut self, prefix: &str, local: &str) -> XmlNodeKey {
        let key = self.tree.create();
        self.tree[key] = XmlNode {
            prefix: prefix.into(),
            local: local.into(),
            ..XmlNode::default()
        };
        key
    }

    /// Inserts `child` at `index` (clamped) among the children of `parent`,
    /// detaching it from its current parent first
    pub fn insert_child(&mut self, parent: XmlNodeKey, child: XmlNodeKey, index: usize) -> Result<(), Error> {
        self.node(parent)?;
        self.node(child)?;

        if self.is_ancestor(child, parent) {
            return Err(error!(Xml, "Cannot insert {} into its own descendant", self.qualified_name(child)));
        }

        if self.root == Some(child) {
            return Err(error!(Xml, "Cannot move the root element"));
        }

        self.detach(child)?;

        let children = &mut self.node_mut(parent)?.children;
        let index = index.min(children.len());
        children.insert(index, child);
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }

    /// Detaches an element from its parent; it can be inserted again later
    pub fn detach(&mut self, key: XmlNodeKey) -> Result<(), Error> {
        if let Some(parent) = self.node_mut(key)?.parent.take() {
            self.node_mut(parent)?.children.retain(|c| *c != key);
        }
        Ok(())
    }

    /// Detaches an element and frees it with all its descendants
    ///
    /// Keys of deleted elements must not be used afterwards.
    pub fn delete(&mut self, key: XmlNodeKey) -> Result<(), Error> {
        if self.root == Some(key) {
            return Err(error!(Xml, "Cannot delete the root element"));
        }

        self.detach(key)?;

        let mut stack = vec![key];
        while let Some(key) = stack.pop() {
            stack.extend_from_slice(self.children(key));
            self.tree.delete(key);
        }

        Ok(())
    }

    fn write_node(&self, key: XmlNodeKey, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.tree[key];
        let name = qualify(&node.prefix, &node.local);

        write!(f, "<{}", name)?;
        for attribute in &node.attributes {
            write!(f, " {}=\"{}\"", attribute.qualified_name(), Escaped(&attribute.value))?;
        }

        if node.children.is_empty() {
            return f.write_str("/>");
        }

        f.write_str(">")?;
        for child in &node.children {
            self.write_node(*child, f)?;
        }
        write!(f, "</{}>", name)
    }
}

impl fmt::Display for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.root {
            Some(root) => self.write_node(root, f),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for XmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XmlDocument")
            .field("root", &self.root)
            .field("xml", &self.to_string())
            .finish()
    }
}
