use std::collections::HashSet;
use std::env;
use std::error::Error as StdError;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, error, info, warn};
use winit::dpi::LogicalSize;
use winit::error::{EventLoopError, OsError};
use winit::event::{ElementState, Event, KeyEvent, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop, EventLoopWindowTarget};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowBuilder};

use crate::assets::{AssetLoader, FsAssetLoader};

use super::input::ActionStates;
use super::metrics::MetricsAccumulator;
use super::rendering::RenderError;
use super::tools::{draw_overlay, draw_startup_failure, OverlayData};
use super::{InputAction, InputSnapshot, Renderer, Scene, SceneCommand, Viewport};

pub const SLOW_FRAME_ENV_VAR: &str = "PLATFORMER_SLOW_FRAME_MS";

const STARTUP_FAILURE_LINES: [&str; 2] = [
    "Failed to load game assets.",
    "Check file paths in log.",
];

#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub window_title: String,
    pub viewport: Viewport,
    pub max_frame_delta: Duration,
    pub metrics_log_interval: Duration,
    pub simulated_slow_frame_ms: u64,
    pub overlay_visible_by_default: bool,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            window_title: "Platformer".to_string(),
            viewport: Viewport {
                width: 960,
                height: 540,
            },
            max_frame_delta: Duration::from_millis(33),
            metrics_log_interval: Duration::from_secs(1),
            simulated_slow_frame_ms: 0,
            overlay_visible_by_default: true,
        }
    }
}

pub type SceneBuildError = Box<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to create event loop: {0}")]
    CreateEventLoop(#[source] EventLoopError),
    #[error("failed to create application window: {0}")]
    CreateWindow(#[source] OsError),
    #[error("failed to initialize renderer: {0}")]
    CreateRenderer(#[source] RenderError),
    #[error("failed to build scene: {0}")]
    SceneBuild(#[source] SceneBuildError),
    #[error("renderer failed while drawing: {0}")]
    Render(#[source] RenderError),
    #[error("event loop failed: {0}")]
    EventLoopRun(#[source] EventLoopError),
}

/// Loads everything the scene needs, then opens the window and drives it.
///
/// `build_scene` runs before the window exists and sees every asset load.
/// When it fails the window still opens, shows a failure notice, and the
/// error is returned once the user closes it.
pub fn run_app<F, E>(config: LoopConfig, asset_dir: PathBuf, build_scene: F) -> Result<(), AppError>
where
    F: FnOnce(&mut dyn AssetLoader) -> Result<Box<dyn Scene>, E>,
    E: Into<SceneBuildError>,
{
    info!(asset_dir = %asset_dir.display(), "asset_load_started");
    let mut loader = FsAssetLoader::new(asset_dir);
    let stage = match build_scene(&mut loader) {
        Ok(scene) => {
            info!("scene_ready");
            Stage::Running(scene)
        }
        Err(source) => {
            let source = source.into();
            error!(error = %source, "scene_build_failed");
            Stage::Failed(Some(source))
        }
    };
    let images = loader.into_store();
    info!(image_count = images.len(), "asset_load_finished");

    let event_loop = EventLoop::new().map_err(AppError::CreateEventLoop)?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(config.window_title.clone())
            .with_inner_size(LogicalSize::new(
                config.viewport.width as f64,
                config.viewport.height as f64,
            ))
            .build(&event_loop)
            .map_err(AppError::CreateWindow)?,
    );
    let renderer = Renderer::new(Arc::clone(&window), config.viewport, images)
        .map_err(AppError::CreateRenderer)?;

    event_loop.set_control_flow(ControlFlow::Poll);

    let max_frame_delta =
        normalize_non_zero_duration(config.max_frame_delta, Duration::from_millis(33));
    let metrics_log_interval =
        normalize_non_zero_duration(config.metrics_log_interval, Duration::from_secs(1));
    let slow_frame_delay = resolve_slow_frame_delay(config.simulated_slow_frame_ms);
    info!(
        viewport_width = config.viewport.width,
        viewport_height = config.viewport.height,
        max_frame_delta_ms = max_frame_delta.as_millis() as u64,
        metrics_log_interval_ms = metrics_log_interval.as_millis() as u64,
        slow_frame_delay_ms = slow_frame_delay.as_millis() as u64,
        "loop_config"
    );

    let mut state = RunState {
        window,
        renderer,
        stage,
        input: InputCollector::default(),
        clock: FrameClock::new(max_frame_delta),
        metrics: MetricsAccumulator::new(metrics_log_interval, Instant::now()),
        overlay_visible: config.overlay_visible_by_default,
        slow_frame_delay,
        fatal: None,
    };

    event_loop
        .run(|event, window_target| state.handle_event(event, window_target))
        .map_err(AppError::EventLoopRun)?;

    state.finish()
}

enum Stage {
    Running(Box<dyn Scene>),
    /// Holds the build error until shutdown so it can become the exit status.
    Failed(Option<SceneBuildError>),
}

struct RunState {
    window: Arc<Window>,
    renderer: Renderer,
    stage: Stage,
    input: InputCollector,
    clock: FrameClock,
    metrics: MetricsAccumulator,
    overlay_visible: bool,
    slow_frame_delay: Duration,
    fatal: Option<AppError>,
}

impl RunState {
    fn handle_event(&mut self, event: Event<()>, window_target: &EventLoopWindowTarget<()>) {
        match event {
            Event::WindowEvent { window_id, event } if window_id == self.window.id() => {
                self.handle_window_event(event, window_target);
            }
            Event::AboutToWait => self.window.request_redraw(),
            Event::LoopExiting => {
                if let Stage::Running(scene) = &mut self.stage {
                    scene.shutdown();
                }
                info!("shutdown");
            }
            _ => {}
        }
    }

    fn handle_window_event(
        &mut self,
        event: WindowEvent,
        window_target: &EventLoopWindowTarget<()>,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!(reason = "window_close", "shutdown_requested");
                window_target.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Err(error) = self.renderer.resize(new_size.width, new_size.height) {
                    warn!(error = %error, "renderer_resize_failed");
                    self.fatal = Some(AppError::Render(error));
                    window_target.exit();
                }
            }
            WindowEvent::Focused(false) => self.input.release_all(),
            WindowEvent::KeyboardInput { event, .. } => {
                self.input.handle_keyboard_input(&event);
                if self.input.quit_requested {
                    info!(reason = "escape_key", "shutdown_requested");
                    window_target.exit();
                }
            }
            WindowEvent::RedrawRequested => self.redraw(window_target),
            _ => {}
        }
    }

    fn redraw(&mut self, window_target: &EventLoopWindowTarget<()>) {
        if self.input.take_overlay_toggle_pressed() {
            self.overlay_visible = !self.overlay_visible;
            info!(overlay_visible = self.overlay_visible, "overlay_toggled");
        }

        if self.slow_frame_delay > Duration::ZERO {
            thread::sleep(self.slow_frame_delay);
        }

        let now = Instant::now();
        let delta = self.clock.tick(now);
        if delta.was_clamped() {
            debug!(
                raw_ms = delta.raw.as_secs_f32() * 1000.0,
                clamped_ms = delta.clamped.as_secs_f32() * 1000.0,
                "frame_delta_clamped"
            );
        }

        let snapshot = self.input.snapshot_for_tick();
        let overlay_visible = self.overlay_visible;
        let metrics = self.metrics.latest();
        let result = match &mut self.stage {
            Stage::Running(scene) => {
                if scene.update(delta.clamped.as_secs_f32(), &snapshot) == SceneCommand::Quit {
                    info!(reason = "scene_quit", "shutdown_requested");
                    window_target.exit();
                }
                let scene_lines = if overlay_visible {
                    scene.debug_lines()
                } else {
                    Vec::new()
                };
                self.renderer.render_frame(|canvas| {
                    scene.render(canvas);
                    if overlay_visible {
                        draw_overlay(
                            canvas,
                            &OverlayData {
                                metrics,
                                scene_lines,
                            },
                        );
                    }
                })
            }
            Stage::Failed(_) => {
                let lines: Vec<String> =
                    STARTUP_FAILURE_LINES.iter().map(|line| line.to_string()).collect();
                self.renderer
                    .render_frame(|canvas| draw_startup_failure(canvas, &lines))
            }
        };
        if let Err(error) = result {
            warn!(error = %error, "renderer_draw_failed");
            self.fatal = Some(AppError::Render(error));
            window_target.exit();
            return;
        }

        self.metrics.record_frame(delta.raw, delta.was_clamped());
        if let Some(snapshot) = self.metrics.maybe_snapshot(now) {
            info!(
                fps = snapshot.fps,
                frame_time_ms = snapshot.frame_time_ms,
                clamped_frames = snapshot.clamped_frames,
                "loop_metrics"
            );
        }
    }

    fn finish(mut self) -> Result<(), AppError> {
        if let Some(error) = self.fatal.take() {
            return Err(error);
        }
        match &mut self.stage {
            Stage::Failed(source) => match source.take() {
                Some(source) => Err(AppError::SceneBuild(source)),
                None => Ok(()),
            },
            Stage::Running(_) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FrameDelta {
    raw: Duration,
    clamped: Duration,
}

impl FrameDelta {
    fn was_clamped(&self) -> bool {
        self.raw > self.clamped
    }
}

/// Measures wall time between presented frames. The first frame reports zero.
#[derive(Debug)]
struct FrameClock {
    last_frame: Option<Instant>,
    max_frame_delta: Duration,
}

impl FrameClock {
    fn new(max_frame_delta: Duration) -> Self {
        Self {
            last_frame: None,
            max_frame_delta,
        }
    }

    fn tick(&mut self, now: Instant) -> FrameDelta {
        let raw = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.saturating_duration_since(last));
        self.last_frame = Some(now);
        FrameDelta {
            raw,
            clamped: clamp_frame_delta(raw, self.max_frame_delta),
        }
    }
}

#[derive(Debug, Default)]
struct InputCollector {
    quit_requested: bool,
    held_keys: HashSet<KeyCode>,
    pressed_edges: ActionStates,
    overlay_toggle_pressed_edge: bool,
}

impl InputCollector {
    fn handle_keyboard_input(&mut self, key_event: &KeyEvent) {
        if let PhysicalKey::Code(code) = key_event.physical_key {
            self.handle_key_state(code, key_event.state);
        }
    }

    fn handle_key_state(&mut self, code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                // OS key repeat arrives as further presses of a key already down.
                if !self.held_keys.insert(code) {
                    return;
                }
                if let Some(action) = action_for_key(code) {
                    self.pressed_edges.set(action, true);
                }
                match code {
                    KeyCode::F3 => self.overlay_toggle_pressed_edge = true,
                    KeyCode::Escape => self.quit_requested = true,
                    _ => {}
                }
            }
            ElementState::Released => {
                self.held_keys.remove(&code);
            }
        }
    }

    fn release_all(&mut self) {
        self.held_keys.clear();
    }

    fn held_actions(&self) -> ActionStates {
        let mut held = ActionStates::default();
        for action in self.held_keys.iter().copied().filter_map(action_for_key) {
            held.set(action, true);
        }
        held
    }

    fn snapshot_for_tick(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(self.held_actions(), self.pressed_edges);
        self.pressed_edges.clear();
        snapshot
    }

    fn take_overlay_toggle_pressed(&mut self) -> bool {
        let was_pressed = self.overlay_toggle_pressed_edge;
        self.overlay_toggle_pressed_edge = false;
        was_pressed
    }
}

fn action_for_key(code: KeyCode) -> Option<InputAction> {
    match code {
        KeyCode::ArrowLeft | KeyCode::KeyA => Some(InputAction::MoveLeft),
        KeyCode::ArrowRight | KeyCode::KeyD => Some(InputAction::MoveRight),
        KeyCode::Space | KeyCode::ArrowUp | KeyCode::KeyW => Some(InputAction::Jump),
        KeyCode::ArrowDown | KeyCode::KeyS => Some(InputAction::MoveDown),
        _ => None,
    }
}

fn clamp_frame_delta(frame_dt: Duration, max_frame_delta: Duration) -> Duration {
    frame_dt.min(max_frame_delta)
}

fn normalize_non_zero_duration(value: Duration, fallback: Duration) -> Duration {
    if value.is_zero() {
        fallback
    } else {
        value
    }
}

fn resolve_slow_frame_delay(config_slow_frame_ms: u64) -> Duration {
    match env::var(SLOW_FRAME_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(ms) => Duration::from_millis(ms),
            Err(_) => {
                warn!(
                    env_var = SLOW_FRAME_ENV_VAR,
                    value = value.as_str(),
                    "invalid slow-frame env var value; falling back to config"
                );
                Duration::from_millis(config_slow_frame_ms)
            }
        },
        Err(env::VarError::NotPresent) => Duration::from_millis(config_slow_frame_ms),
        Err(err) => {
            warn!(
                env_var = SLOW_FRAME_ENV_VAR,
                error = %err,
                "unable to read slow-frame env var; falling back to config"
            );
            Duration::from_millis(config_slow_frame_ms)
        }
    }
}
