//! Moves controls between (or within) aggregations
//!
//! This is the handler design-time descriptors name in `actions.move`,
//! e.g. for the `formContainers` of a form.

use super::{AggregationSelector, ChangeRecord, MovedElement, PropertyBag};
use crate::modifier::TreeModifier;
use crate::{Error, error};

pub const CHANGE_TYPE: &str = "moveControls";

/// What a tool reports after a drag & drop
#[derive(Clone, Debug, PartialEq)]
pub struct MoveInfo {
    pub source: AggregationSelector,
    pub target: AggregationSelector,
    pub moved_elements: Vec<MovedElement>,
}

struct ResolvedMove<N> {
    node: N,
    target_index: usize,
}

/// Moves every element listed in the change
///
/// Parents, aggregations and moved elements are all resolved before the
/// first move, so a change which cannot be applied leaves the view as it was.
/// Every moved element must be in the source aggregation.
pub fn apply_change<M: TreeModifier>(
    change: &ChangeRecord,
    control: Option<M::Node>,
    bag: &mut PropertyBag<M>,
) -> Result<bool, Error> {
    bag.check_target(control)?;

    let content = &change.content;
    let (source, target) = match (&content.source, &content.target) {
        (Some(source), Some(target)) => (source, target),
        _ => return Err(error!(MissingSelector, "Move change without source or target")),
    };

    if content.moved_elements.is_empty() {
        return Err(error!(MissingSelector, "Move change without moved elements"));
    }

    let source_parent = resolve(bag, &source.selector.id)?;
    let target_parent = resolve(bag, &target.selector.id)?;

    // unknown aggregations fail here
    let source_content = bag.modifier.get_aggregation(&*bag.view, source_parent, &source.aggregation)?;
    bag.modifier.get_aggregation(&*bag.view, target_parent, &target.aggregation)?;

    let mut moves = Vec::with_capacity(content.moved_elements.len());
    for moved in &content.moved_elements {
        let node = resolve(bag, &moved.selector.id)?;
        if !source_content.contains(&node) {
            return Err(error!(
                InvalidTarget,
                "{} is not in {}.{}",
                moved.selector.id, source.selector.id, source.aggregation,
            ));
        }

        moves.push(ResolvedMove {
            node,
            target_index: moved.target_index,
        });
    }

    for ResolvedMove { node, target_index } in moves {
        bag.modifier.remove_aggregation(bag.view, source_parent, &source.aggregation, node)?;
        bag.modifier.insert_aggregation(bag.view, target_parent, &target.aggregation, node, target_index)?;
        log::debug!("moved {:?} to {}[{}]", node, target.aggregation, target_index);
    }

    Ok(true)
}

fn resolve<M: TreeModifier>(bag: &PropertyBag<M>, id: &str) -> Result<M::Node, Error> {
    bag.modifier.by_id(&*bag.view, bag.root, id)
        .ok_or_else(|| error!(InvalidTarget, "No control with id {:?} in the view", id))
}

/// Fills a move change from what the tool reported
pub fn complete_change_content(change: &mut ChangeRecord, info: &MoveInfo) -> Result<(), Error> {
    if info.moved_elements.is_empty() {
        return Err(error!(MissingSelector, "Move change requires at least one moved element"));
    }

    change.content.source = Some(info.source.clone());
    change.content.target = Some(info.target.clone());
    change.content.moved_elements = info.moved_elements.clone();

    if change.change_type.is_none() {
        change.change_type = Some(CHANGE_TYPE.into());
    }

    Ok(())
}
