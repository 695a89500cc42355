mod common;

use common::{live_form, xml_form};
use formflex::builtin::form::{element, container, simple_form};
use formflex::flex::{self, ChangeRecord, PropertyBag};
use formflex::flex::rename::{self, RenameKind, SpecificChangeInfo};
use formflex::modifier::{JsControlTreeModifier, Selector, TreeModifier, XmlTreeModifier};
use formflex::ErrorKind;
use pretty_assertions::assert_eq;

fn legacy_change(rename_id: &str, value: &str) -> ChangeRecord {
    ChangeRecord::parse(&format!(
        r#"{{
            "changeType": "renameLabel",
            "selector": {{ "id": "SimpleForm" }},
            "content": {{ "sRenameId": "{}" }},
            "texts": {{ "formText": {{ "value": "{}", "type": "XFLD" }} }}
        }}"#,
        rename_id, value,
    )).unwrap()
}

fn change(element_id: &str, value: &str) -> ChangeRecord {
    let mut change = ChangeRecord::new(rename::RENAME_LABEL, Selector::new("SimpleForm"));
    change.content.element_selector = Some(Selector::new(element_id));
    change.texts.form_text = Some(flex::Text {
        value: Some(value.into()),
        text_type: Some("XFLD".into()),
    });
    change
}

fn info(renamed: Option<&str>, kind: RenameKind, value: Option<&str>) -> SpecificChangeInfo {
    SpecificChangeInfo {
        renamed_element: renamed.map(Selector::new),
        change_type: kind,
        value: value.map(String::from),
    }
}

#[test]
fn renames_label_on_live_controls() {
    let mut form = live_form();
    let root = form.simple_form;
    let change = legacy_change("Label0", "newLabel0");

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut form.tree, root);
    assert!(rename::apply_change(&change, Some(root), &mut bag).unwrap());

    assert_eq!(form.text("Label0"), "newLabel0");
    assert_eq!(form.text("Label1"), "oldLabel1");
}

#[test]
fn renames_label_in_xml_view() {
    let mut form = xml_form();
    let (root, simple_form) = (form.root, form.simple_form);
    let change = legacy_change("Label0", "newLabel0");

    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut form.document, root);
    assert!(rename::apply_change(&change, Some(simple_form), &mut bag).unwrap());

    assert_eq!(form.text("Label0").as_deref(), Some("newLabel0"));
    assert_eq!(form.text("Label1").as_deref(), Some("oldLabel1"));
}

#[test]
fn renames_title_on_live_controls_and_in_xml_view() {
    let mut live = live_form();
    let root = live.simple_form;
    let mut change = change("Title0", "newTitle");
    change.change_type = Some(rename::RENAME_TITLE.into());

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut live.tree, root);
    assert!(flex::apply_change(&change, Some(root), &mut bag).unwrap());
    assert_eq!(live.text("Title0"), "newTitle");

    let mut xml = xml_form();
    let (root, simple_form) = (xml.root, xml.simple_form);
    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut xml.document, root);
    assert!(flex::apply_change(&change, Some(simple_form), &mut bag).unwrap());
    assert_eq!(xml.text("Title0").as_deref(), Some("newTitle"));
}

#[test]
fn element_selector_wins_over_legacy_id() {
    let mut form = live_form();
    let root = form.simple_form;
    let mut change = change("Label1", "newLabel1");
    change.content.rename_id = Some("Label0".into());

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut form.tree, root);
    rename::apply_change(&change, Some(root), &mut bag).unwrap();

    assert_eq!(form.text("Label0"), "oldLabel0");
    assert_eq!(form.text("Label1"), "newLabel1");
}

#[test]
fn empty_text_is_a_valid_rename() {
    let mut form = xml_form();
    let (root, simple_form) = (form.root, form.simple_form);
    let change = change("Label0", "");

    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut form.document, root);
    assert!(rename::apply_change(&change, Some(simple_form), &mut bag).unwrap());
    assert_eq!(form.text("Label0").as_deref(), Some(""));
}

#[test]
fn change_without_text_is_not_applied() {
    let mut form = live_form();
    let root = form.simple_form;
    let mut change = change("Label0", "unused");
    change.texts.form_text = None;

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut form.tree, root);
    assert!(!rename::apply_change(&change, Some(root), &mut bag).unwrap());
    assert_eq!(form.text("Label0"), "oldLabel0");
}

#[test]
fn missing_target_is_rejected_before_any_mutation() {
    let mut form = live_form();
    let root = form.simple_form;
    let label0 = form.key("Label0");
    let before = form.tree.invalidations(label0);

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut form.tree, root);
    let error = rename::apply_change(&change("Label0", "x"), None, &mut bag).unwrap_err();
    assert_eq!(error.kind, ErrorKind::InvalidTarget);

    let error = rename::apply_change(&change("NoSuchLabel", "x"), Some(root), &mut bag).unwrap_err();
    assert_eq!(error.kind, ErrorKind::InvalidTarget);

    assert_eq!(form.text("Label0"), "oldLabel0");
    assert_eq!(form.tree.invalidations(label0), before);
}

#[test]
fn control_outside_of_the_view_is_rejected() {
    let mut form = xml_form();
    let root = form.simple_form;
    let outside = form.root;

    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut form.document, root);
    let error = rename::apply_change(&change("Label0", "x"), Some(outside), &mut bag).unwrap_err();
    assert_eq!(error.kind, ErrorKind::InvalidTarget);
    assert_eq!(form.text("Label0").as_deref(), Some("oldLabel0"));
}

#[test]
fn completes_label_rename_with_the_label_id() {
    let form = live_form();
    let element = form.tree.parent(form.key("Label0")).unwrap();
    assert!(form.tree.is_a(element, element::CLASS_NAME));
    let element_id = form.tree.id(element).unwrap();

    let mut change = ChangeRecord::default();
    let info = info(Some(&*element_id), RenameKind::RenameLabel, Some("x"));
    rename::complete_change_content(&mut change, &info, &form.tree).unwrap();

    assert_eq!(change.texts.form_text.as_ref().unwrap().value.as_deref(), Some("x"));
    assert_eq!(change.texts.form_text.as_ref().unwrap().text_type.as_deref(), Some("XFLD"));
    assert_eq!(change.content.element_selector.as_ref().unwrap().id, "Label0");
    assert_eq!(change.change_type.as_deref(), Some(rename::RENAME_LABEL));
}

#[test]
fn completes_title_rename_with_the_title_id() {
    let form = live_form();
    let inner = simple_form::form(&form.tree, form.simple_form).unwrap();
    let first = formflex::builtin::form::form::form_containers(&form.tree, inner).unwrap()[0];
    assert!(form.tree.is_a(first, container::CLASS_NAME));
    let container_id = form.tree.id(first).unwrap();

    let mut change = ChangeRecord::default();
    let info = info(Some(&*container_id), RenameKind::RenameTitle, Some("newTitle"));
    rename::complete_change_content(&mut change, &info, &form.tree).unwrap();

    assert_eq!(change.content.element_selector.unwrap().id, "Title0");
}

#[test]
fn completing_keeps_unknown_ids() {
    let form = live_form();
    let mut change = ChangeRecord::default();
    let info = info(Some("Unknown"), RenameKind::RenameLabel, Some(""));
    rename::complete_change_content(&mut change, &info, &form.tree).unwrap();

    assert_eq!(change.content.element_selector.unwrap().id, "Unknown");
    assert_eq!(change.texts.form_text.unwrap().value.as_deref(), Some(""));
}

#[test]
fn completing_requires_value_then_renamed_element() {
    let form = live_form();
    let mut change = ChangeRecord::default();

    let error = rename::complete_change_content(&mut change, &info(Some("Label0"), RenameKind::RenameLabel, None), &form.tree);
    assert_eq!(error.unwrap_err().kind, ErrorKind::MissingValue);

    let error = rename::complete_change_content(&mut change, &info(None, RenameKind::RenameLabel, Some("x")), &form.tree);
    assert_eq!(error.unwrap_err().kind, ErrorKind::MissingSelector);

    let error = rename::complete_change_content(&mut change, &info(None, RenameKind::RenameLabel, None), &form.tree);
    assert_eq!(error.unwrap_err().kind, ErrorKind::MissingValue);

    assert_eq!(change, ChangeRecord::default());
}

#[test]
fn completed_change_applies_to_both_representations() {
    let mut live = live_form();
    let element = live.tree.parent(live.key("Label1")).unwrap();
    let element_id = live.tree.id(element).unwrap();

    let mut change = ChangeRecord::new(rename::RENAME_LABEL, Selector::new("SimpleForm"));
    let info = info(Some(&*element_id), RenameKind::RenameLabel, Some("Street"));
    rename::complete_change_content(&mut change, &info, &live.tree).unwrap();

    let json = change.to_json().unwrap();
    let change = ChangeRecord::parse(&json).unwrap();

    let root = live.simple_form;
    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut live.tree, root);
    let control = change.resolve_control(&bag);
    assert!(rename::apply_change(&change, control, &mut bag).unwrap());
    assert_eq!(
        JsControlTreeModifier.get_property(&live.tree, live.key("Label1"), "text").unwrap().as_deref(),
        Some("Street"),
    );

    let mut xml = xml_form();
    let root = xml.root;
    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut xml.document, root);
    let control = change.resolve_control(&bag);
    assert!(rename::apply_change(&change, control, &mut bag).unwrap());
    assert_eq!(xml.text("Label1").as_deref(), Some("Street"));
}

#[test]
fn unknown_record_fields_survive() {
    let json = r#"{
        "changeType": "renameLabel",
        "layer": "CUSTOMER",
        "selector": { "id": "SimpleForm", "idIsLocal": true },
        "content": { "sRenameId": "Label0", "origin": "tool" },
        "texts": { "formText": { "value": "a" }, "tooltip": { "value": "b" } }
    }"#;

    let change = ChangeRecord::parse(json).unwrap();
    assert!(change.selector.as_ref().unwrap().id_is_local);

    let written: serde_json::Value = serde_json::from_str(&change.to_json().unwrap()).unwrap();
    let expected: serde_json::Value = serde_json::from_str(json).unwrap();
    assert_eq!(written, expected);
}

#[test]
fn unknown_change_type_has_no_handler() {
    let mut form = live_form();
    let root = form.simple_form;
    let mut change = change("Label0", "x");
    change.change_type = Some("hideControl".into());

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut form.tree, root);
    assert!(flex::apply_change(&change, Some(root), &mut bag).is_err());
    assert_eq!(form.text("Label0"), "oldLabel0");
}
