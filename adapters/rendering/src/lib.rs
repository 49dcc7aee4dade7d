#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for arena adapters.
//!
//! The simulation never talks to a graphics API. Backends receive a
//! [`Presentation`], feed [`FrameInput`] snapshots back to the adapter and draw
//! whatever [`Scene`] the adapter leaves behind after each frame.

use anyhow::Result as AnyResult;
use arena_core::{CameraParams, Drawable, InputFrame, Rgb, RoundState};
use glam::Mat4;
use std::time::Duration;

/// Vertical field of view, in radians, used by every backend.
pub const FIELD_OF_VIEW: f32 = 1.0;

/// Distance to the near clip plane.
pub const NEAR_PLANE: f32 = 1.0;

/// Distance to the far clip plane.
pub const FAR_PLANE: f32 = 100.0;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Pairs a simulation colour with an opacity.
    #[must_use]
    pub const fn from_rgb(rgb: Rgb, alpha: f32) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue, alpha)
    }

    /// Colour a backend should use for the drawable, with alpha clamped to `0.0..=1.0`.
    #[must_use]
    pub fn of(drawable: &Drawable) -> Self {
        Self::from_rgb(drawable.color, drawable.alpha.clamp(0.0, 1.0))
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Horizontal movement axis reported by the device.
    pub axis_x: f32,
    /// Vertical movement axis reported by the device.
    pub axis_y: f32,
    /// Whether the fire control is held.
    pub fire: bool,
    /// Whether the dash control was pressed on this frame.
    pub dash: bool,
    /// Whether the ultimate control was pressed on this frame.
    pub ultimate: bool,
}

impl FrameInput {
    /// Converts the device snapshot into the simulation's input frame with
    /// clamped axes.
    #[must_use]
    pub fn to_input_frame(self) -> InputFrame {
        InputFrame {
            axis_x: self.axis_x,
            axis_y: self.axis_y,
            fire: self.fire,
            dash: self.dash,
            ultimate: self.ultimate,
        }
        .clamped()
    }
}

/// Pixel dimensions of the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Viewport {
    width: u32,
    height: u32,
}

impl Viewport {
    /// Creates a viewport; a zero height is promoted to one pixel.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height: if height == 0 { 1 } else { height },
        }
    }

    /// Applies a window resize, promoting a zero height to one pixel.
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// Surface width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels, never zero.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width divided by height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Right-handed perspective projection for this surface.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(FIELD_OF_VIEW, self.aspect(), NEAR_PLANE, FAR_PLANE)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720)
    }
}

/// World-to-view transform for the camera.
#[must_use]
pub fn view_matrix(camera: &CameraParams) -> Mat4 {
    Mat4::look_at_rh(camera.eye, camera.focus, camera.up)
}

/// Combined projection and view transform handed to the draw pass.
#[must_use]
pub fn view_projection(camera: &CameraParams, viewport: &Viewport) -> Mat4 {
    viewport.projection() * view_matrix(camera)
}

/// Model transform that places a unit cube for the drawable.
#[must_use]
pub fn model_matrix(drawable: &Drawable) -> Mat4 {
    Mat4::from_translation(drawable.position) * Mat4::from_scale(drawable.scale)
}

/// Whether the centre of a model lands inside the clip volume.
#[must_use]
pub fn is_on_screen(view_projection: Mat4, model: Mat4) -> bool {
    let clip = view_projection * model.w_axis;
    if clip.w <= 0.0 {
        return false;
    }
    let ndc = clip.truncate() / clip.w;
    ndc.abs().max_element() <= 1.0
}

/// Heads-up display values captured alongside the world snapshot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hud {
    /// Player hit points.
    pub hp: f32,
    /// Bots still standing.
    pub bots_alive: usize,
    /// Ultimate charge in `0.0..=1.0`.
    pub ultimate_progress: f32,
    /// Whether the ultimate is running.
    pub ultimate_active: bool,
    /// Opacity of the kill banner, `None` while it is hidden.
    pub kill_feed_alpha: Option<f32>,
    /// Current round state.
    pub round: RoundState,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            hp: 0.0,
            bots_alive: 0,
            ultimate_progress: 1.0,
            ultimate_active: false,
            kill_feed_alpha: None,
            round: RoundState::Playing,
        }
    }
}

/// Everything a backend needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Camera placement for the frame.
    pub camera: CameraParams,
    /// Objects to draw, already in draw order.
    pub drawables: Vec<Drawable>,
    /// Overlay values.
    pub hud: Hud,
}

impl Scene {
    /// Creates a new scene descriptor.
    #[must_use]
    pub fn new(camera: CameraParams, drawables: Vec<Drawable>, hud: Hud) -> Self {
        Self {
            camera,
            drawables,
            hud,
        }
    }

    /// Model transforms and colours in draw order.
    pub fn instances(&self) -> impl Iterator<Item = (Mat4, Color)> + '_ {
        self.drawables
            .iter()
            .map(|drawable| (model_matrix(drawable), Color::of(drawable)))
    }
}

/// Describes how a backend should present the simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Initial surface size.
    pub viewport: Viewport,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, viewport: Viewport, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            viewport,
            scene,
        }
    }
}

/// Abstraction implemented by concrete rendering backends.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta, per-frame
    /// input captured by the backend and the scene to refresh before it is
    /// drawn. Returning `false` asks the backend to stop.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> bool + 'static;
}
