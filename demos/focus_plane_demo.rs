//! Builds a focus plane for a camera in an in-memory scene and drives it.
//!
//! Run with `RUST_LOG=info` to see what the command does.

use focusplane_rs::*;

fn main() -> Result<()> {
    init_logging();

    let mut scene = InMemoryScene::new();
    let (camera, shape) = scene.create_camera("shotCam")?;
    scene.set_attr(Plug::new(shape, Attr::FocalLength), 50.0)?;
    scene.set_attr(Plug::new(camera, Attr::TranslateZ), 20.0)?;
    scene.set_selection(&[camera])?;

    let options = Options::default();
    let pair = *run(&mut scene, &options)?.pair();

    for distance in [2.5, 8.0, 14.0] {
        scene.set_attr(pair.focus_distance(), distance)?;
        log::info!(
            "focus {distance}: offset {}, scale {:.3} x {:.3}",
            scene.get_attr(pair.offset())?,
            scene.get_attr(Plug::new(pair.proxy, Attr::ScaleX))?,
            scene.get_attr(Plug::new(pair.proxy, Attr::ScaleY))?,
        );
    }

    // Drag the plane; the camera follows.
    scene.set_attr(pair.offset(), -6.0)?;
    log::info!(
        "after drag: focus distance {}",
        scene.get_attr(pair.focus_distance())?
    );

    // A second run reopens the controls instead of building again.
    match run(&mut scene, &options)? {
        CommandOutcome::Built(_) => log::warn!("unexpected second build"),
        CommandOutcome::Reopened { controls, .. } => {
            log::info!("reopened '{}'", controls.layout().title);
        }
    }
    Ok(())
}
