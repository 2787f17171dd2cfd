// ============================================================================
// CRATE CONFIGURATION & IMPORTS
// ============================================================================

pub mod arc;
pub mod config;
pub mod draw;
pub mod error;

pub use arc::{compute_arc, point_on_circle, ArcParams, ArcResult, Boundary, Point, Sample};
pub use config::{CliOptions, Color, PlotConfig};
pub use error::{ArcError, PlotError, Result};

// External crate imports
use log::{debug, error, info, warn};
use pixels::{Pixels, SurfaceTexture};

// Standard library imports
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

// Window management imports
use winit::dpi::{LogicalSize, PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::window::WindowBuilder;

use draw::{Align, Canvas, DrawCommand, Scene, TextRenderer};

// ============================================================================
// PUBLIC API - MAIN INTERFACE
// ============================================================================

/// Updates applied to the arc between frames.
#[derive(Debug, Clone, PartialEq)]
pub enum PlotCommand {
    SetWeights(Vec<f64>),
    SetTotal(f64),
    SetMargin(f64),
    SetSampleCount(usize),
    SetRadius(f64),
}

/// A window showing one proportional arc.
#[derive(Debug, Clone)]
pub struct Plot {
    config: PlotConfig,
}

impl Plot {
    pub fn new(config: PlotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlotConfig {
        &self.config
    }

    /// Open the window and block until it is closed or a key is pressed.
    pub fn show(&self) -> Result<()> {
        self.run_window(None)
    }

    /// Like [`Plot::show`], draining `receiver` before every frame.
    pub fn show_with_commands(&self, receiver: Receiver<PlotCommand>) -> Result<()> {
        self.run_window(Some(receiver))
    }

    fn run_window(&self, receiver: Option<Receiver<PlotCommand>>) -> Result<()> {
        self.config.arc.validate()?;
        let mut state = PlotState::new(self.config.arc.clone());

        let text = match self.config.font_path.as_deref() {
            Some(path) => match TextRenderer::from_file(path) {
                Ok(renderer) => Some(renderer),
                Err(err) => {
                    warn!("{err}; labels disabled");
                    None
                }
            },
            None => {
                info!("no font configured; labels disabled");
                None
            }
        };

        let size = self.config.window_size;
        let event_loop = EventLoop::new()?;
        let mut builder = WindowBuilder::new()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(size as f64, size as f64))
            .with_resizable(true);
        if self.config.center_window {
            if let Some(monitor) = event_loop.primary_monitor() {
                let physical = (size as f64 * monitor.scale_factor()).round() as u32;
                let (x, y) = centered_position(
                    (monitor.position().x, monitor.position().y),
                    (monitor.size().width, monitor.size().height),
                    (physical, physical),
                );
                builder = builder.with_position(PhysicalPosition::new(x, y));
            }
        }
        let window = std::sync::Arc::new(builder.build(&event_loop)?);
        info!("window {:?} created ({size}x{size})", self.config.title);

        let window_clone = window.clone();
        let surface: PhysicalSize<u32> = window.inner_size();
        let surface_texture = SurfaceTexture::new(surface.width, surface.height, &window);
        // The buffer stays at the logical plot size and is scaled onto the surface.
        let mut pixels = Pixels::new(size, size, surface_texture)?;

        if self.config.log_adapter_info {
            let adapter = pixels.adapter().get_info();
            info!("adapter name: {}", adapter.name);
            info!("adapter vendor: {:#06x}", adapter.vendor);
            info!("adapter backend: {:?}", adapter.backend);
            info!("adapter driver: {} {}", adapter.driver, adapter.driver_info);
        }

        let frame_duration = Duration::from_secs_f64(1.0 / self.config.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut result: Result<()> = Ok(());

        event_loop.run(|event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        info!("exiting program now");
                        window_target.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. }
                        if event.state == ElementState::Pressed =>
                    {
                        info!("key pressed, exiting program now");
                        window_target.exit();
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height)
                        {
                            warn!("failed to resize surface: {err}");
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        if let Some(ref receiver) = receiver {
                            state.update_with_commands(receiver);
                        }

                        let mut canvas =
                            Canvas::new(pixels.frame_mut(), size as usize, size as usize);
                        if let Err(err) =
                            render_plot(&mut canvas, &state, &self.config, text.as_ref())
                        {
                            warn!("skipping frame: {err}");
                        }
                        if let Err(err) = pixels.render() {
                            error!("render failed: {err}");
                            result = Err(err.into());
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        result
    }
}

// ============================================================================
// PLOT STATE
// ============================================================================

/// Arc parameters currently on screen. The arc itself is recomputed each frame.
#[derive(Debug, Clone)]
pub struct PlotState {
    params: ArcParams,
}

impl PlotState {
    pub fn new(params: ArcParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ArcParams {
        &self.params
    }

    /// Apply one command; rejected updates leave the parameters unchanged.
    pub fn apply(&mut self, command: PlotCommand) -> std::result::Result<(), ArcError> {
        let mut next = self.params.clone();
        match command {
            PlotCommand::SetWeights(weights) => next.weights = weights,
            PlotCommand::SetTotal(total) => next.total = total,
            PlotCommand::SetMargin(margin) => next.margin = margin,
            PlotCommand::SetSampleCount(count) => next.sample_count = count,
            PlotCommand::SetRadius(radius) => next.radius = radius,
        }
        next.validate()?;
        debug!("arc parameters updated: {:?}", next);
        self.params = next;
        Ok(())
    }

    pub fn update_with_commands(&mut self, receiver: &Receiver<PlotCommand>) {
        while let Ok(command) = receiver.try_recv() {
            if let Err(err) = self.apply(command) {
                warn!("rejected plot command: {err}");
            }
        }
    }
}

// ============================================================================
// RENDERING
// ============================================================================

/// Top-left window position that centers a window on a monitor.
pub fn centered_position(
    monitor_position: (i32, i32),
    monitor_size: (u32, u32),
    window_size: (u32, u32),
) -> (i32, i32) {
    let offset = |monitor: u32, window: u32| (monitor as i64 - window as i64) / 2;
    (
        monitor_position.0 + offset(monitor_size.0, window_size.0) as i32,
        monitor_position.1 + offset(monitor_size.1, window_size.1) as i32,
    )
}

/// Compute the arc for the current state and draw it.
pub fn render_plot(
    canvas: &mut Canvas,
    state: &PlotState,
    config: &PlotConfig,
    text: Option<&TextRenderer>,
) -> std::result::Result<(), ArcError> {
    let arc = state.params().compute()?;
    build_scene(&arc, &state.params().weights, config).render(canvas, text);
    Ok(())
}

/// Where each segment's accumulated weight ends, for every segment that ends
/// inside the circle. A segment may end there without a sample crossing its
/// boundary, so the ends come from the running totals.
pub fn segment_ends(arc: &ArcResult) -> Vec<(usize, Point)> {
    (0..arc.cumulative.len())
        .map_while(|segment| arc.segment_end(segment).map(|end| (segment, end)))
        .collect()
}

/// Two decimals at most, trailing zeros trimmed.
fn format_total(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn build_scene(arc: &ArcResult, weights: &[f64], config: &PlotConfig) -> Scene {
    let mut scene = Scene::new();
    scene.add_command(DrawCommand::Clear(config.background_color));

    let size = config.window_size as f64;
    scene.add_command(DrawCommand::Text {
        text: config.title.clone(),
        position: Point::new(size / 2.0, size - config.title_top_margin),
        rotation: 0.0,
        font_size: config.title_font_size,
        align: Align::Center,
        color: config.title_color,
    });

    scene.add_command(DrawCommand::Dot {
        center: arc.center,
        radius: config.center_dot_radius,
        color: config.center_color,
    });

    // Circle outline, one line per sample
    for sample in arc.samples() {
        let next = arc.points[(sample.index + 1) % arc.len()];
        let color = if sample.in_transition {
            config.transition_color
        } else {
            config.segment_color(sample.segment)
        };
        scene.add_command(DrawCommand::Line {
            from: sample.position,
            to: next,
            thickness: config.line_thickness,
            color,
        });
    }

    let ends = segment_ends(arc);
    if ends.len() >= 2 {
        scene.add_command(DrawCommand::Polygon {
            points: ends.iter().map(|(_, p)| *p).collect(),
            thickness: config.line_thickness,
            color: config.chord_color,
        });
    }

    for (position, label) in arc.quadrant_points.iter().zip(&config.quadrant_labels) {
        scene.add_command(DrawCommand::Text {
            text: label.clone(),
            position: *position,
            rotation: 0.0,
            font_size: config.label_font_size,
            align: Align::Left,
            color: config.quadrant_label_color,
        });
    }

    for (segment, position) in ends {
        let (Some(weight), Some(total)) = (weights.get(segment), arc.cumulative.get(segment))
        else {
            continue;
        };
        scene.add_command(DrawCommand::Text {
            text: format!(
                "{}{segment} {weight}({})",
                config.point_label_prefix,
                format_total(*total)
            ),
            position: Point::new(position.x + config.point_label_offset, position.y),
            rotation: 0.0,
            font_size: config.label_font_size,
            align: Align::Left,
            color: config.point_label_color,
        });
    }

    scene
}
