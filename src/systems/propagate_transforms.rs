//! Transform propagation for parent-child entity hierarchies.
//!
//! Computes [`GlobalTransform3D`] for every entity with a [`Transform3D`]:
//! roots (no [`ChildOf`]) copy their local transform, descendants compose it
//! with their parent's global transform.
//!
//! # Schedule position
//!
//! Should run **after** all systems that mutate local transforms (gestures,
//! tweens, following) and **before** trigger detection so that downstream
//! systems see up-to-date world poses.

use bevy_ecs::hierarchy::{ChildOf, Children};
use bevy_ecs::prelude::*;

use crate::components::transform::{GlobalTransform3D, Transform3D};

type ChildQuery<'w, 's> = Query<'w, 's, (&'static Transform3D, Option<&'static Children>), With<ChildOf>>;

/// Propagate transforms from root entities down through the hierarchy.
///
/// Entities that already have a `GlobalTransform3D` are updated in place.
/// Entities missing the component get it inserted via deferred [`Commands`]
/// (visible next frame).
pub fn propagate_transforms(
    roots: Query<(Entity, &Transform3D, Option<&Children>), Without<ChildOf>>,
    children_query: ChildQuery,
    mut globals: Query<&mut GlobalTransform3D>,
    mut commands: Commands,
) {
    for (root_entity, local, children) in roots.iter() {
        let root_gt = GlobalTransform3D(*local);
        write_global(root_entity, root_gt, &mut globals, &mut commands);

        if let Some(children) = children {
            propagate_children(
                &root_gt,
                children,
                &children_query,
                &mut globals,
                &mut commands,
            );
        }
    }
}

fn write_global(
    entity: Entity,
    value: GlobalTransform3D,
    globals: &mut Query<&mut GlobalTransform3D>,
    commands: &mut Commands,
) {
    if let Ok(mut gt) = globals.get_mut(entity) {
        if *gt != value {
            *gt = value;
        }
    } else {
        commands.entity(entity).insert(value);
    }
}

fn propagate_children(
    parent_gt: &GlobalTransform3D,
    children: &Children,
    children_query: &ChildQuery,
    globals: &mut Query<&mut GlobalTransform3D>,
    commands: &mut Commands,
) {
    for child_entity in children.iter() {
        let Ok((local, grandchildren)) = children_query.get(child_entity) else {
            continue;
        };
        let child_gt = GlobalTransform3D(parent_gt.0.mul_transform(local));
        write_global(child_entity, child_gt, globals, commands);

        if let Some(grandchildren) = grandchildren {
            propagate_children(&child_gt, grandchildren, children_query, globals, commands);
        }
    }
}
