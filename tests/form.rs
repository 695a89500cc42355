use formflex::builtin::form::{self, container, element, grid_container_data, simple_form, TitleArg, TitleRef};
use formflex::builtin::{input, label, title};
use formflex::core::designtime::DomRef;
use formflex::core::tree::ControlTree;
use formflex::CheapString;
use pretty_assertions::assert_eq;

#[test]
fn design_time_descriptor() {
    let mut tree = ControlTree::new();
    let form = form::form::create(&mut tree, None).unwrap();
    let design_time = form::design_time().unwrap();

    assert!(design_time.is_ignored(&tree, form, "title").unwrap());
    assert!(design_time.is_ignored(&tree, form, "toolbar").unwrap());
    assert!(!design_time.is_ignored(&tree, form, "formContainers").unwrap());
    assert_eq!(design_time.move_action("formContainers"), Some("moveControls"));
    assert_eq!(
        design_time.dom_ref(&tree, form, "formContainers").unwrap(),
        Some(DomRef::Selector(":sap-domref".into())),
    );

    let toolbar = title::create(&mut tree, None).unwrap();
    form::form::set_toolbar(&mut tree, form, Some(toolbar)).unwrap();
    assert!(!design_time.is_ignored(&tree, form, "toolbar").unwrap());
    assert_eq!(design_time.dom_ref(&tree, form, "toolbar").unwrap(), Some(DomRef::Control(toolbar)));
    assert_eq!(design_time.editable_aggregations(&tree, form).unwrap(), vec!["formContainers", "toolbar"]);
}

#[test]
fn titles_are_controls_or_text() {
    let mut tree = ControlTree::new();
    let container = container::create(&mut tree, None).unwrap();
    assert_eq!(container::title(&tree, container).unwrap(), None);

    container::set_title(&mut tree, container, TitleArg::Text("Address".into())).unwrap();
    assert_eq!(container::title(&tree, container).unwrap(), Some(TitleRef::Text("Address".into())));

    let heading = title::with_text(&mut tree, Some("T"), "Contact").unwrap();
    container::set_title(&mut tree, container, TitleArg::Control(heading)).unwrap();
    assert_eq!(container::title(&tree, container).unwrap(), Some(TitleRef::Control(heading)));
    assert_eq!(title::text(&tree, heading).unwrap(), CheapString::from("Contact"));

    container::set_title(&mut tree, container, TitleArg::None).unwrap();
    assert_eq!(container::title(&tree, container).unwrap(), None);
    assert_eq!(tree.parent(heading), None);
}

#[test]
fn layout_data_changes_reach_the_form() {
    let mut tree = ControlTree::new();
    let form = form::form::create(&mut tree, None).unwrap();
    let container = container::create(&mut tree, None).unwrap();
    let data = grid_container_data::create(&mut tree, None).unwrap();
    form::form::add_form_container(&mut tree, form, container).unwrap();
    tree.set_aggregation(container, "layoutData", Some(data)).unwrap();

    let before = tree.invalidations(form);
    grid_container_data::set_half_grid(&mut tree, data, true).unwrap();
    assert!(grid_container_data::half_grid(&tree, data).unwrap());
    assert!(tree.invalidations(form) > before);

    // with a layout, the layout is re-arranged instead
    let layout = title::create(&mut tree, None).unwrap();
    form::form::set_layout(&mut tree, form, Some(layout)).unwrap();
    let (form_before, layout_before) = (tree.invalidations(form), tree.invalidations(layout));
    grid_container_data::set_half_grid(&mut tree, data, false).unwrap();
    assert_eq!(tree.invalidations(form), form_before);
    assert!(tree.invalidations(layout) > layout_before);
}

#[test]
fn editable_switch_does_not_rerender_the_form() {
    let mut tree = ControlTree::new();
    let form = form::form::create(&mut tree, None).unwrap();
    let before = tree.invalidations(form);

    form::form::set_editable(&mut tree, form, true).unwrap();
    assert!(form::form::is_editable(&tree, form).unwrap());
    assert_eq!(tree.invalidations(form), before);
}

#[test]
fn containers_only_collapse_when_expandable() {
    let mut tree = ControlTree::new();
    let container = container::create(&mut tree, None).unwrap();

    container::set_expanded(&mut tree, container, false).unwrap();
    assert!(container::is_expanded(&tree, container).unwrap());

    tree.set_property(container, "expandable", true).unwrap();
    container::set_expanded(&mut tree, container, false).unwrap();
    assert!(!container::is_expanded(&tree, container).unwrap());
}

#[test]
fn hidden_parts_are_filtered() {
    let mut tree = ControlTree::new();
    let form = form::form::create(&mut tree, None).unwrap();
    let (c1, c2) = (container::create(&mut tree, None).unwrap(), container::create(&mut tree, None).unwrap());
    form::form::add_form_container(&mut tree, form, c1).unwrap();
    form::form::add_form_container(&mut tree, form, c2).unwrap();
    tree.set_property(c1, "visible", false).unwrap();
    assert_eq!(form::form::visible_form_containers(&tree, form).unwrap(), vec![c2]);

    let (e1, e2) = (element::create(&mut tree, None).unwrap(), element::create(&mut tree, None).unwrap());
    container::add_form_element(&mut tree, c2, e1).unwrap();
    container::add_form_element(&mut tree, c2, e2).unwrap();
    element::set_visible(&mut tree, e2, false).unwrap();
    assert_eq!(container::visible_form_elements(&tree, c2).unwrap(), vec![e1]);
}

#[test]
fn simple_form_groups_its_content() {
    let mut tree = ControlTree::new();
    let content = [
        input::create(&mut tree, Some("Loose")).unwrap(),
        title::with_text(&mut tree, Some("T1"), "Person").unwrap(),
        label::with_text(&mut tree, Some("L1"), "Name").unwrap(),
        input::create(&mut tree, Some("I1")).unwrap(),
        input::create(&mut tree, Some("I2")).unwrap(),
        label::with_text(&mut tree, Some("L2"), "Age").unwrap(),
        input::create(&mut tree, Some("I3")).unwrap(),
    ];

    let simple_form = simple_form::with_content(&mut tree, Some("SF"), &content).unwrap();
    let inner = simple_form::form(&tree, simple_form).unwrap();
    let containers = form::form::form_containers(&tree, inner).unwrap().to_vec();
    assert_eq!(containers.len(), 2);

    // content before the first title gets an untitled container
    assert_eq!(container::title(&tree, containers[0]).unwrap(), None);
    let loose = container::form_elements(&tree, containers[0]).unwrap().to_vec();
    assert_eq!(element::fields(&tree, loose[0]).unwrap(), &content[..1]);
    assert_eq!(element::label_control(&tree, loose[0]), None);

    assert_eq!(container::title(&tree, containers[1]).unwrap(), Some(TitleRef::Control(content[1])));
    let elements = container::form_elements(&tree, containers[1]).unwrap().to_vec();
    assert_eq!(elements.len(), 2);
    assert_eq!(element::label_control(&tree, elements[0]), Some(content[2]));
    assert_eq!(element::fields(&tree, elements[0]).unwrap(), &content[3..5]);
    assert_eq!(element::label_control(&tree, elements[1]), Some(content[5]));
    assert_eq!(element::fields(&tree, elements[1]).unwrap(), &content[6..]);

    assert_eq!(simple_form::content(&tree, simple_form).unwrap(), content.to_vec());
    assert_eq!(label::label_for(&tree, content[2]).as_deref(), Some("I1"));
}

#[test]
fn simple_form_editable_reaches_labels() {
    let mut tree = ControlTree::new();
    let name = label::with_text(&mut tree, None, "Name").unwrap();
    let field = input::create(&mut tree, None).unwrap();
    let simple_form = simple_form::with_content(&mut tree, None, &[name, field]).unwrap();

    assert!(label::is_display_only(&tree, name).unwrap());
    simple_form::set_editable(&mut tree, simple_form, true).unwrap();
    assert!(simple_form::is_editable(&tree, simple_form).unwrap());
    assert!(!label::is_display_only(&tree, name).unwrap());
}
