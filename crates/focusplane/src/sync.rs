//! Two-way sync between camera focus distance and proxy offset.
//!
//! Each direction is a guarded one-way copy. The `!=` check before writing is
//! what stops a write from bouncing back and forth between the two change
//! subscriptions forever.

use std::rc::Rc;

use focusplane_core::{AttrChangeHandler, FocusPair, Result, SceneGraph, Subscription};

/// What a sync pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Values differed and the target was written.
    Written,
    /// Values already agreed; nothing was written.
    Unchanged,
}

/// Relationship between focus distance and proxy offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// `|offset| == focusDistance`.
    InSync,
    /// Either side changed and the other has not caught up.
    Diverged,
}

/// Moves the proxy to the camera's focus distance.
///
/// The proxy sits in front of the camera, which looks down its local -Z, so
/// the offset written is the negated distance.
pub fn update_plane_from_camera(
    scene: &mut dyn SceneGraph,
    pair: &FocusPair,
) -> Result<SyncOutcome> {
    let distance = scene.get_attr(pair.focus_distance())?;
    let offset = scene.get_attr(pair.offset())?;
    if distance == offset.abs() {
        return Ok(SyncOutcome::Unchanged);
    }
    log::debug!("focus distance {distance} -> plane offset {}", -distance);
    scene.set_attr(pair.offset(), -distance)?;
    Ok(SyncOutcome::Written)
}

/// Sets the camera's focus distance from where the proxy was moved.
pub fn update_camera_from_plane(
    scene: &mut dyn SceneGraph,
    pair: &FocusPair,
) -> Result<SyncOutcome> {
    let distance = scene.get_attr(pair.offset())?.abs();
    if distance == scene.get_attr(pair.focus_distance())? {
        return Ok(SyncOutcome::Unchanged);
    }
    log::debug!("plane offset -> focus distance {distance}");
    scene.set_attr(pair.focus_distance(), distance)?;
    Ok(SyncOutcome::Written)
}

/// Reports whether the pair currently agrees, without writing anything.
pub fn sync_state(scene: &dyn SceneGraph, pair: &FocusPair) -> Result<SyncState> {
    let distance = scene.get_attr(pair.focus_distance())?;
    let offset = scene.get_attr(pair.offset())?;
    Ok(if distance == offset.abs() {
        SyncState::InSync
    } else {
        SyncState::Diverged
    })
}

/// Reaction to focus distance changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaneFollowsCamera;

impl AttrChangeHandler for PlaneFollowsCamera {
    fn name(&self) -> &str {
        "plane follows camera"
    }

    fn on_change(&self, scene: &mut dyn SceneGraph, pair: &FocusPair) -> Result<()> {
        update_plane_from_camera(scene, pair).map(|_| ())
    }
}

/// Reaction to proxy offset changes.
#[derive(Debug, Default, Clone, Copy)]
pub struct CameraFollowsPlane;

impl AttrChangeHandler for CameraFollowsPlane {
    fn name(&self) -> &str {
        "camera follows plane"
    }

    fn on_change(&self, scene: &mut dyn SceneGraph, pair: &FocusPair) -> Result<()> {
        update_camera_from_plane(scene, pair).map(|_| ())
    }
}

/// Subscribes both reactions. Returns `[camera -> plane, plane -> camera]`.
pub fn subscribe_sync(scene: &mut dyn SceneGraph, pair: FocusPair) -> Result<[Subscription; 2]> {
    let plane_follows = scene.subscribe(pair.focus_distance(), pair, Rc::new(PlaneFollowsCamera))?;
    let camera_follows = scene.subscribe(pair.offset(), pair, Rc::new(CameraFollowsPlane))?;
    Ok([plane_follows, camera_follows])
}
