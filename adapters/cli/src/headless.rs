//! Backend that runs frames without opening a window.

use std::time::Duration;

use anyhow::Result as AnyResult;
use arena_rendering::{
    is_on_screen, view_projection, FrameInput, Presentation, RenderingBackend, Scene,
};
use tracing::{info, trace};

/// Steps a fixed number of frames at a fixed delta and reports what would be drawn.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    frames: u64,
    dt: Duration,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u64, dt: Duration) -> Self {
        Self { frames, dt }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool + 'static,
    {
        let Presentation {
            window_title,
            viewport,
            mut scene,
            ..
        } = presentation;
        info!(
            title = %window_title,
            width = viewport.width(),
            height = viewport.height(),
            "headless backend started"
        );

        let mut presented = 0;
        while presented < self.frames {
            let keep_running = update_scene(self.dt, FrameInput::default(), &mut scene);
            presented += 1;

            let matrix = view_projection(&scene.camera, &viewport);
            let visible = scene
                .instances()
                .filter(|(model, _)| is_on_screen(matrix, *model))
                .count();
            trace!(frame = presented, visible, "frame presented");

            if !keep_running {
                break;
            }
        }

        info!(frames = presented, "headless backend stopped");
        Ok(())
    }
}
