//! The focus plane controls window.

use focusplane_core::{
    flag, Attr, CheckBoxLayout, FocusPair, PanelLayout, PanelOptions, Plug, Result, SceneGraph,
};

/// Label of the frustum checkbox.
pub const FRUSTUM_LABEL: &str = "Display Camera Frustum";

/// Label of the plane checkbox.
pub const PLANE_LABEL: &str = "Display Focus Plane";

/// State behind an open controls window.
///
/// The checkbox handlers are [`ControlsPanel::set_frustum_visible`] and
/// [`ControlsPanel::set_plane_visible`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsPanel {
    pair: FocusPair,
    title: String,
    width: u32,
    frustum_visible: bool,
    plane_visible: bool,
}

impl ControlsPanel {
    pub fn pair(&self) -> &FocusPair {
        &self.pair
    }

    pub fn frustum_visible(&self) -> bool {
        self.frustum_visible
    }

    pub fn plane_visible(&self) -> bool {
        self.plane_visible
    }

    /// Shows or hides the frustum, near clip and far clip drawing together.
    pub fn set_frustum_visible(&mut self, scene: &mut dyn SceneGraph, visible: bool) -> Result<()> {
        for attr in Attr::FRUSTUM_DISPLAY {
            scene.set_attr(Plug::new(self.pair.camera, attr), flag(visible))?;
        }
        self.frustum_visible = visible;
        Ok(())
    }

    /// Shows or hides the proxy. Hidden proxies keep syncing.
    pub fn set_plane_visible(&mut self, scene: &mut dyn SceneGraph, visible: bool) -> Result<()> {
        scene.set_visibility(self.pair.proxy, visible)?;
        self.plane_visible = visible;
        Ok(())
    }

    /// Window description handed to the host.
    pub fn layout(&self) -> PanelLayout {
        PanelLayout {
            title: self.title.clone(),
            width: self.width,
            checkboxes: vec![
                CheckBoxLayout {
                    label: FRUSTUM_LABEL.to_string(),
                    value: self.frustum_visible,
                },
                CheckBoxLayout {
                    label: PLANE_LABEL.to_string(),
                    value: self.plane_visible,
                },
            ],
        }
    }
}

/// Opens the controls for `pair`.
///
/// Both the frustum and the plane are switched on before the window shows,
/// whatever their state was.
pub fn open_controls(
    scene: &mut dyn SceneGraph,
    pair: FocusPair,
    options: &PanelOptions,
) -> Result<ControlsPanel> {
    let mut panel = ControlsPanel {
        pair,
        title: options.title.clone(),
        width: options.width,
        frustum_visible: false,
        plane_visible: false,
    };
    panel.set_frustum_visible(scene, true)?;
    panel.set_plane_visible(scene, true)?;
    scene.present_panel(&panel.layout())?;
    Ok(panel)
}

#[cfg(test)]
mod tests {
    use focusplane_core::as_flag;
    use focusplane_scene::InMemoryScene;

    use super::*;

    fn setup() -> (InMemoryScene, FocusPair) {
        let mut scene = InMemoryScene::new();
        let (camera_transform, camera) = scene.create_camera("camera1").unwrap();
        let proxy = scene
            .create_transform("camera1FocusPlane", Some(camera_transform))
            .unwrap();
        (
            scene,
            FocusPair {
                camera,
                camera_transform,
                proxy,
            },
        )
    }

    fn frustum_flags(scene: &InMemoryScene, pair: &FocusPair) -> Vec<bool> {
        Attr::FRUSTUM_DISPLAY
            .iter()
            .map(|a| as_flag(scene.get_attr(Plug::new(pair.camera, *a)).unwrap()))
            .collect()
    }

    #[test]
    fn test_open_forces_both_on() {
        let (mut scene, pair) = setup();
        scene.set_visibility(pair.proxy, false).unwrap();

        let panel = open_controls(&mut scene, pair, &PanelOptions::default()).unwrap();
        assert!(panel.frustum_visible() && panel.plane_visible());
        assert_eq!(frustum_flags(&scene, &pair), vec![true, true, true]);
        assert_eq!(scene.get_attr(Plug::new(pair.proxy, Attr::Visibility)).unwrap(), 1.0);

        let shown = scene.panels().last().unwrap();
        assert_eq!(shown.title, "Focus Plane Controls");
        assert_eq!(shown.width, 300);
        assert_eq!(shown.checkboxes[0].label, FRUSTUM_LABEL);
        assert_eq!(shown.checkboxes[1].label, PLANE_LABEL);
        assert!(shown.checkboxes.iter().all(|c| c.value));
    }

    #[test]
    fn test_frustum_toggle_moves_all_three_flags() {
        let (mut scene, pair) = setup();
        let mut panel = open_controls(&mut scene, pair, &PanelOptions::default()).unwrap();
        panel.set_frustum_visible(&mut scene, false).unwrap();
        assert_eq!(frustum_flags(&scene, &pair), vec![false, false, false]);
        assert!(!panel.layout().checkboxes[0].value);
        // The plane is untouched.
        assert!(panel.plane_visible());
    }

    #[test]
    fn test_plane_toggle_hides_without_deleting() {
        let (mut scene, pair) = setup();
        let mut panel = open_controls(&mut scene, pair, &PanelOptions::default()).unwrap();
        panel.set_plane_visible(&mut scene, false).unwrap();
        assert_eq!(scene.get_attr(Plug::new(pair.proxy, Attr::Visibility)).unwrap(), 0.0);
        assert!(scene.node(pair.proxy).is_ok());
    }
}
