use super::TreeModifier;
use crate::core::xml::{XmlDocument, XmlNodeKey};
use crate::Error;

/// Modifier for XML views
///
/// Properties are attributes. An aggregation is a child element named
/// after it, in the namespace of its parent control:
///
/// ```xml
/// <layout:SimpleForm id="SimpleForm">
///     <layout:content>
///         <Label id="Label0" text="oldLabel0" />
///     </layout:content>
/// </layout:SimpleForm>
/// ```
///
/// Control elements have upper-case local names, aggregation elements
/// lower-case ones.
#[derive(Copy, Clone, Debug, Default)]
pub struct XmlTreeModifier;

impl XmlTreeModifier {
    fn is_aggregation_node(document: &XmlDocument, key: XmlNodeKey) -> bool {
        let first = document.local_name(key).and_then(|n| n.chars().next());
        matches!(first, Some(c) if c.is_lowercase())
    }

    fn find_aggregation_node(document: &XmlDocument, parent: XmlNodeKey, name: &str) -> Option<XmlNodeKey> {
        let namespace = document.namespace_uri(parent);
        document.children(parent).iter().copied().find(|child| {
            document.local_name(*child) == Some(name) && document.namespace_uri(*child) == namespace
        })
    }
}

impl TreeModifier for XmlTreeModifier {
    type View = XmlDocument;
    type Node = XmlNodeKey;

    fn by_id(&self, document: &XmlDocument, root: XmlNodeKey, id: &str) -> Option<XmlNodeKey> {
        document.find_by_id(root, id)
    }

    fn contains(&self, document: &XmlDocument, root: XmlNodeKey, key: XmlNodeKey) -> bool {
        document.is_attached(key) && document.is_ancestor(root, key)
    }

    fn get_id(&self, document: &XmlDocument, key: XmlNodeKey) -> Option<String> {
        document.attribute(key, "id").map(String::from)
    }

    fn get_parent(&self, document: &XmlDocument, key: XmlNodeKey) -> Option<XmlNodeKey> {
        let parent = document.parent(key)?;
        match Self::is_aggregation_node(document, parent) {
            true => document.parent(parent),
            false => Some(parent),
        }
    }

    fn get_property(&self, document: &XmlDocument, key: XmlNodeKey, name: &str) -> Result<Option<String>, Error> {
        Ok(document.attribute(key, name).map(String::from))
    }

    fn set_property(&self, document: &mut XmlDocument, key: XmlNodeKey, name: &str, value: &str) -> Result<(), Error> {
        document.set_attribute(key, name, value)
    }

    fn get_aggregation(&self, document: &XmlDocument, key: XmlNodeKey, name: &str) -> Result<Vec<XmlNodeKey>, Error> {
        match Self::find_aggregation_node(document, key, name) {
            Some(aggregation) => Ok(document.children(aggregation).to_vec()),
            None => Ok(Vec::new()),
        }
    }

    fn insert_aggregation(
        &self,
        document: &mut XmlDocument,
        parent: XmlNodeKey,
        name: &str,
        child: XmlNodeKey,
        index: usize,
    ) -> Result<(), Error> {
        if let Some(aggregation) = Self::find_aggregation_node(document, parent, name) {
            return document.insert_child(aggregation, child, index);
        }

        let prefix = document.prefix(parent).unwrap_or_default().to_string();
        let aggregation = document.create_element(&prefix, name);
        let inserted = document.insert_child(parent, aggregation, usize::MAX)
            .and_then(|_| document.insert_child(aggregation, child, index));

        if inserted.is_err() {
            document.delete(aggregation)?;
        }

        inserted
    }

    fn remove_aggregation(&self, document: &mut XmlDocument, parent: XmlNodeKey, name: &str, child: XmlNodeKey) -> Result<(), Error> {
        if let Some(aggregation) = Self::find_aggregation_node(document, parent, name) {
            if document.parent(child) == Some(aggregation) {
                document.detach(child)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEW: &str = r#"<mvc:View xmlns:mvc="sap.ui.core.mvc" xmlns:layout="sap.ui.layout" xmlns="sap.m">
        <layout:VerticalLayout id="Layout">
            <layout:content>
                <Label id="Label0" text="a" />
                <Input id="Input0" />
            </layout:content>
        </layout:VerticalLayout>
        <Panel id="Panel" />
    </mvc:View>"#;

    #[test]
    fn parent_skips_aggregation_nodes() {
        let document = XmlDocument::parse(VIEW).unwrap();
        let root = document.root().unwrap();
        let modifier = XmlTreeModifier;

        let label = modifier.by_id(&document, root, "Label0").unwrap();
        let layout = modifier.by_id(&document, root, "Layout").unwrap();
        assert_eq!(modifier.get_parent(&document, label), Some(layout));
        assert_eq!(modifier.get_parent(&document, layout), Some(root));
    }

    #[test]
    fn creates_missing_aggregation_nodes() {
        let mut document = XmlDocument::parse(VIEW).unwrap();
        let root = document.root().unwrap();
        let modifier = XmlTreeModifier;

        let panel = modifier.by_id(&document, root, "Panel").unwrap();
        let input = modifier.by_id(&document, root, "Input0").unwrap();
        modifier.insert_aggregation(&mut document, panel, "content", input, 0).unwrap();

        assert_eq!(modifier.get_aggregation(&document, panel, "content").unwrap(), vec![input]);
        assert_eq!(modifier.get_parent(&document, input), Some(panel));

        let aggregation = document.parent(input).unwrap();
        assert_eq!(document.qualified_name(aggregation), "content");
        assert_eq!(document.namespace_uri(aggregation), Some("sap.m"));
    }

    #[test]
    fn failed_insert_leaves_no_aggregation_node() {
        let mut document = XmlDocument::parse(VIEW).unwrap();
        let root = document.root().unwrap();
        let modifier = XmlTreeModifier;
        let before = document.to_string();

        let layout = modifier.by_id(&document, root, "Layout").unwrap();
        let label = modifier.by_id(&document, root, "Label0").unwrap();
        assert!(modifier.insert_aggregation(&mut document, label, "tooltip", layout, 0).is_err());
        assert_eq!(document.to_string(), before);
    }
}
