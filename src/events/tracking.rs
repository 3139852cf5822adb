//! Marker tracking updates and their observer.
//!
//! The tracking subsystem reports, once per update, the markers it started
//! tracking (`added`) and the ones whose pose or state changed (`updated`).
//! [`observe_tracked_markers_changed`] mirrors each marker into a proxy
//! entity, drives the board placement prompt from the `Card` marker and
//! spawns a piece the first time an `O` or `X` marker reaches
//! [`TrackingState::Tracking`].
//!
//! Handling is idempotent: the same marker reported as tracking any number of
//! times yields exactly one proxy and at most one bound piece.
use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::{Vec2, Vec3};
use log::{debug, error, info};
use smallvec::SmallVec;

use crate::components::marker::{BoundPiece, MarkerId, MarkerKind, TrackedMarker, TrackingState};
use crate::components::piece::{Piece, PieceKind, PlacementPrompt};
use crate::components::scale::ScaleAdjuster;
use crate::components::transform::{GlobalTransform3D, Transform3D};
use crate::resources::camera::ArCamera;
use crate::resources::markerregistry::MarkerRegistry;
use crate::resources::prefabs::PiecePrefabs;
use crate::resources::session::{BoardPrompt, BoardSession, PlacementTracking};

/// One marker as reported by the tracking subsystem.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerUpdate {
    pub id: MarkerId,
    /// Reference image name: `"Card"`, `"O"` or `"X"`.
    pub name: String,
    pub pose: Transform3D,
    pub tracking: TrackingState,
    /// Physical image size in meters.
    pub size: Vec2,
}

impl MarkerUpdate {
    pub fn tracking(id: MarkerId, name: impl Into<String>, pose: Transform3D) -> Self {
        Self {
            id,
            name: name.into(),
            pose,
            tracking: TrackingState::Tracking,
            size: Vec2::splat(0.05),
        }
    }

    pub fn with_state(mut self, tracking: TrackingState) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn with_size(mut self, size: Vec2) -> Self {
        self.size = size;
        self
    }
}

/// Batched tracking update.
#[derive(Event, Debug, Clone, Default)]
pub struct TrackedMarkersChanged {
    pub added: Vec<MarkerUpdate>,
    pub updated: Vec<MarkerUpdate>,
}

impl TrackedMarkersChanged {
    pub fn updated(updates: impl Into<Vec<MarkerUpdate>>) -> Self {
        Self {
            added: Vec::new(),
            updated: updates.into(),
        }
    }
}

/// Observer that mirrors tracked markers and reacts to them.
///
/// Contract
/// - Every update lands on the proxy registered for its id; unknown or stale
///   ids get a fresh proxy.
/// - The pose is copied only while the marker is tracking; other states just
///   record the confidence.
/// - `Card`: while placement tracking is enabled and no board exists, a
///   tracking update shows the confirmation prompt at the marker's screen
///   position. Once a board exists the prompt is hidden.
/// - `O` / `X`: a tracking update spawns a piece unless one is already bound
///   to the proxy.
pub fn observe_tracked_markers_changed(
    trigger: On<TrackedMarkersChanged>,
    mut commands: Commands,
    mut registry: ResMut<MarkerRegistry>,
    mut markers: Query<(&mut TrackedMarker, &mut Transform3D, Option<&BoundPiece>)>,
    mut session: ResMut<BoardSession>,
    mut prompt: ResMut<BoardPrompt>,
    placement: Res<PlacementTracking>,
    camera: Option<Res<ArCamera>>,
    prefabs: Option<Res<PiecePrefabs>>,
) {
    let event = trigger.event();
    // proxies spawned or bound during this batch; their components are not
    // visible to the queries until commands apply
    let mut spawned_this_batch: SmallVec<[Entity; 4]> = SmallVec::new();
    let mut bound_this_batch: SmallVec<[Entity; 4]> = SmallVec::new();

    for update in event.added.iter().chain(event.updated.iter()) {
        let kind = MarkerKind::from_name(&update.name);
        if kind == MarkerKind::Unknown {
            debug!("Ignoring unknown marker '{}' ({})", update.name, update.id);
            continue;
        }

        let is_tracking = update.tracking == TrackingState::Tracking;
        let mut already_bound = false;
        let proxy = match registry.get(update.id) {
            Some(proxy) if markers.contains(proxy) => {
                if let Ok((mut marker, mut transform, bound)) = markers.get_mut(proxy) {
                    marker.tracking = update.tracking;
                    marker.size = update.size;
                    if is_tracking {
                        *transform = update.pose;
                    }
                    already_bound = bound.is_some();
                }
                proxy
            }
            Some(proxy) if spawned_this_batch.contains(&proxy) => {
                let (marker, pose, global) = proxy_bundle(update, kind);
                let mut entity = commands.entity(proxy);
                entity.insert(marker);
                if is_tracking {
                    entity.insert((pose, global));
                }
                proxy
            }
            _ => {
                let proxy = commands.spawn(proxy_bundle(update, kind)).id();
                registry.insert(update.id, proxy);
                spawned_this_batch.push(proxy);
                debug!("Registered marker '{}' ({}) as {:?}", update.name, update.id, proxy);
                proxy
            }
        };

        match kind {
            MarkerKind::Card => {
                if session.has_board() {
                    prompt.hide_confirm();
                    continue;
                }
                if !placement.enabled || !is_tracking {
                    continue;
                }
                if session.await_confirmation(proxy) {
                    let screen = camera
                        .as_deref()
                        .and_then(|c| c.world_to_screen(update.pose.translation));
                    prompt.show_confirm(screen);
                }
            }
            MarkerKind::Piece(piece_kind) => {
                if !is_tracking || already_bound || bound_this_batch.contains(&proxy) {
                    continue;
                }
                if spawn_piece(
                    &mut commands,
                    proxy,
                    piece_kind,
                    update,
                    prefabs.as_deref(),
                )
                .is_some()
                {
                    bound_this_batch.push(proxy);
                }
            }
            MarkerKind::Unknown => {}
        }
    }
}

fn proxy_bundle(
    update: &MarkerUpdate,
    kind: MarkerKind,
) -> (TrackedMarker, Transform3D, GlobalTransform3D) {
    (
        TrackedMarker {
            id: update.id,
            kind,
            tracking: update.tracking,
            size: update.size,
        },
        update.pose,
        GlobalTransform3D(update.pose),
    )
}

/// Spawn a piece following `proxy` and bind it.
///
/// Aborts with an error log when no prefab is bound for `kind` or the marker
/// reports a non-positive width; the next tracking update retries.
fn spawn_piece(
    commands: &mut Commands,
    proxy: Entity,
    kind: PieceKind,
    update: &MarkerUpdate,
    prefabs: Option<&PiecePrefabs>,
) -> Option<Entity> {
    let Some(prefab) = prefabs.and_then(|p| p.get(kind)) else {
        error!("No piece prefab bound for '{}'", kind.name());
        return None;
    };
    let Some(base_scale) = prefab.scale_for_width(update.size.x) else {
        error!(
            "Invalid image size {} for marker '{}' ({})",
            update.size.x, update.name, update.id
        );
        return None;
    };

    let (position, rotation) = prefab.follow.target_pose(&update.pose);
    let adjuster = ScaleAdjuster::new(Vec3::splat(base_scale), prefab.scale_multiplier);
    let transform = Transform3D {
        translation: position,
        rotation,
        scale: adjuster.scale(),
    };
    let mut piece = Piece::new(kind, proxy);
    piece.last_stable_position = position;

    let entity = commands
        .spawn((
            piece,
            prefab.follow,
            adjuster,
            transform,
            GlobalTransform3D(transform),
            PlacementPrompt::default(),
        ))
        .id();
    commands.entity(proxy).insert(BoundPiece(entity));
    info!(
        "Spawned '{}' piece {:?} for marker {}",
        kind.name(),
        entity,
        update.id
    );
    Some(entity)
}
