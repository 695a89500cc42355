mod common;

use common::xml_form;
use formflex::builtin::form::{self, container};
use formflex::core::control::ControlKey;
use formflex::core::tree::ControlTree;
use formflex::flex::move_controls::{self, MoveInfo};
use formflex::flex::{self, AggregationSelector, ChangeRecord, MovedElement, PropertyBag};
use formflex::modifier::{JsControlTreeModifier, Selector, TreeModifier, XmlTreeModifier};
use formflex::ErrorKind;
use pretty_assertions::assert_eq;

fn move_info(parent: &str, aggregation: &str, moved: &[(&str, usize, usize)]) -> MoveInfo {
    let selector = AggregationSelector {
        selector: Selector::new(parent),
        aggregation: aggregation.into(),
    };

    MoveInfo {
        source: selector.clone(),
        target: selector,
        moved_elements: moved.iter().map(|(id, source_index, target_index)| MovedElement {
            selector: Selector::new(id),
            source_index: *source_index,
            target_index: *target_index,
        }).collect(),
    }
}

fn move_change(parent: &str, aggregation: &str, moved: &[(&str, usize, usize)]) -> ChangeRecord {
    let mut change = ChangeRecord::new(move_controls::CHANGE_TYPE, Selector::new(parent));
    move_controls::complete_change_content(&mut change, &move_info(parent, aggregation, moved)).unwrap();
    change
}

fn form_with_containers(tree: &mut ControlTree) -> (ControlKey, Vec<ControlKey>) {
    let form = form::form::create(tree, Some("Form")).unwrap();
    let mut containers = Vec::new();
    for id in ["C1", "C2", "C3"] {
        let container = container::create(tree, Some(id)).unwrap();
        form::form::add_form_container(tree, form, container).unwrap();
        containers.push(container);
    }
    (form, containers)
}

fn xml_content_ids(form: &common::XmlForm) -> Vec<String> {
    let modifier = XmlTreeModifier;
    modifier.get_aggregation(&form.document, form.simple_form, "content").unwrap()
        .into_iter()
        .filter_map(|node| modifier.get_id(&form.document, node))
        .collect()
}

#[test]
fn moves_form_containers() {
    let mut tree = ControlTree::new();
    let (form, containers) = form_with_containers(&mut tree);
    let change = move_change("Form", "formContainers", &[("C3", 2, 0)]);

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut tree, form);
    assert!(move_controls::apply_change(&change, Some(form), &mut bag).unwrap());

    let expected = vec![containers[2], containers[0], containers[1]];
    assert_eq!(form::form::form_containers(&tree, form).unwrap(), &expected[..]);
    assert_eq!(tree.parent(containers[2]), Some(form));
}

#[test]
fn moves_xml_content() {
    let mut form = xml_form();
    let (root, simple_form) = (form.root, form.simple_form);
    let change = move_change("SimpleForm", "content", &[("Input1", 4, 0)]);

    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut form.document, root);
    assert!(move_controls::apply_change(&change, Some(simple_form), &mut bag).unwrap());

    assert_eq!(xml_content_ids(&form), vec!["Input1", "Title0", "Label0", "Input0", "Label1"]);
}

#[test]
fn moves_several_elements_in_order() {
    let mut form = xml_form();
    let (root, simple_form) = (form.root, form.simple_form);
    let change = move_change("SimpleForm", "content", &[("Label1", 3, 1), ("Input1", 4, 2)]);

    let mut bag = PropertyBag::new(&XmlTreeModifier, &mut form.document, root);
    assert!(move_controls::apply_change(&change, Some(simple_form), &mut bag).unwrap());

    assert_eq!(xml_content_ids(&form), vec!["Title0", "Label1", "Input1", "Label0", "Input0"]);
}

#[test]
fn unknown_moved_element_moves_nothing() {
    let mut tree = ControlTree::new();
    let (form, containers) = form_with_containers(&mut tree);
    let change = move_change("Form", "formContainers", &[("C3", 2, 0), ("C9", 3, 0)]);

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut tree, form);
    let error = move_controls::apply_change(&change, Some(form), &mut bag).unwrap_err();
    assert_eq!(error.kind, ErrorKind::InvalidTarget);
    assert_eq!(form::form::form_containers(&tree, form).unwrap(), &containers[..]);
}

#[test]
fn element_outside_the_source_moves_nothing() {
    let mut tree = ControlTree::new();
    let (form, containers) = form_with_containers(&mut tree);
    let element = form::element::create(&mut tree, Some("E1")).unwrap();
    container::add_form_element(&mut tree, containers[0], element).unwrap();
    let change = move_change("Form", "formContainers", &[("C3", 2, 0), ("E1", 0, 1)]);

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut tree, form);
    let error = move_controls::apply_change(&change, Some(form), &mut bag).unwrap_err();
    assert_eq!(error.kind, ErrorKind::InvalidTarget);
    assert_eq!(form::form::form_containers(&tree, form).unwrap(), &containers[..]);
    assert_eq!(tree.parent(element), Some(containers[0]));
}

#[test]
fn unknown_aggregation_moves_nothing() {
    let mut tree = ControlTree::new();
    let (form, containers) = form_with_containers(&mut tree);
    let change = move_change("Form", "sections", &[("C3", 2, 0)]);

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut tree, form);
    assert!(move_controls::apply_change(&change, Some(form), &mut bag).is_err());
    assert_eq!(form::form::form_containers(&tree, form).unwrap(), &containers[..]);
}

#[test]
fn incomplete_changes_are_rejected() {
    let mut tree = ControlTree::new();
    let (form, _) = form_with_containers(&mut tree);

    let mut change = move_change("Form", "formContainers", &[("C3", 2, 0)]);
    change.content.source = None;
    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut tree, form);
    let error = move_controls::apply_change(&change, Some(form), &mut bag).unwrap_err();
    assert_eq!(error.kind, ErrorKind::MissingSelector);

    let mut change = ChangeRecord::default();
    let error = move_controls::complete_change_content(&mut change, &move_info("Form", "formContainers", &[])).unwrap_err();
    assert_eq!(error.kind, ErrorKind::MissingSelector);
    assert_eq!(change, ChangeRecord::default());
}

#[test]
fn completed_change_is_json() {
    let change = move_change("Form", "formContainers", &[("C3", 2, 0)]);
    let written: serde_json::Value = serde_json::from_str(&change.to_json().unwrap()).unwrap();

    assert_eq!(written, serde_json::json!({
        "changeType": "moveControls",
        "selector": { "id": "Form" },
        "content": {
            "movedElements": [{ "selector": { "id": "C3" }, "sourceIndex": 2, "targetIndex": 0 }],
            "source": { "selector": { "id": "Form" }, "aggregation": "formContainers" },
            "target": { "selector": { "id": "Form" }, "aggregation": "formContainers" }
        },
        "texts": {}
    }));
}

#[test]
fn design_time_move_action_is_dispatched() {
    let mut tree = ControlTree::new();
    let (form, containers) = form_with_containers(&mut tree);
    let design_time = form::design_time().unwrap();
    let change_type = design_time.move_action("formContainers").unwrap();

    let mut change = ChangeRecord::new(change_type, Selector::new("Form"));
    move_controls::complete_change_content(&mut change, &move_info("Form", "formContainers", &[("C1", 0, 2)])).unwrap();

    let mut bag = PropertyBag::new(&JsControlTreeModifier, &mut tree, form);
    let control = change.resolve_control(&bag);
    assert!(flex::apply_change(&change, control, &mut bag).unwrap());

    let expected = vec![containers[1], containers[2], containers[0]];
    assert_eq!(form::form::form_containers(&tree, form).unwrap(), &expected[..]);
}
