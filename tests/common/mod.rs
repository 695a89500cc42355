#![allow(dead_code)]

use formflex::builtin::{input, label, title, form::simple_form};
use formflex::core::control::ControlKey;
use formflex::core::tree::ControlTree;
use formflex::core::xml::{XmlDocument, XmlNodeKey};

pub const XML_VIEW: &str = "<mvc:View xmlns:mvc='sap.ui.core.mvc' xmlns:layout='sap.ui.layout' xmlns='sap.m'>\
    <layout:SimpleForm id='SimpleForm' editable='true' title='Simple Form' class='editableForm'>\
        <layout:content>\
            <Title id='Title0' text='oldTitle' />\
            <Label id='Label0' text='oldLabel0' />\
            <Input id='Input0'/>\
            <Label id='Label1' text='oldLabel1' />\
            <Input id='Input1'/>\
        </layout:content>\
    </layout:SimpleForm>\
</mvc:View>";

/// `SimpleForm` with `Title0`, `Label0`, `Input0`, `Label1`, `Input1`
pub struct LiveForm {
    pub tree: ControlTree,
    pub simple_form: ControlKey,
}

impl LiveForm {
    pub fn key(&self, id: &str) -> ControlKey {
        self.tree.by_id(id).unwrap()
    }

    pub fn text(&self, id: &str) -> String {
        self.tree.property_text(self.key(id), "text").unwrap().to_string()
    }
}

pub fn live_form() -> LiveForm {
    let mut tree = ControlTree::new();

    let content = [
        title::with_text(&mut tree, Some("Title0"), "oldTitle").unwrap(),
        label::with_text(&mut tree, Some("Label0"), "oldLabel0").unwrap(),
        input::create(&mut tree, Some("Input0")).unwrap(),
        label::with_text(&mut tree, Some("Label1"), "oldLabel1").unwrap(),
        input::create(&mut tree, Some("Input1")).unwrap(),
    ];

    let simple_form = simple_form::with_content(&mut tree, Some("SimpleForm"), &content).unwrap();
    simple_form::set_editable(&mut tree, simple_form, true).unwrap();

    LiveForm { tree, simple_form }
}

pub struct XmlForm {
    pub document: XmlDocument,
    pub root: XmlNodeKey,
    pub simple_form: XmlNodeKey,
}

impl XmlForm {
    pub fn text(&self, id: &str) -> Option<String> {
        let node = self.document.find_by_id(self.root, id)?;
        self.document.attribute(node, "text").map(String::from)
    }
}

pub fn xml_form() -> XmlForm {
    let document = XmlDocument::parse(XML_VIEW).unwrap();
    let root = document.root().unwrap();
    let simple_form = document.find_by_id(root, "SimpleForm").unwrap();
    XmlForm { document, root, simple_form }
}
