// ============================================================================
// WINDOW VIEWER
// ============================================================================
//
// Hosts a single gauge in a winit window. The window's redraw request is the
// frame callback: the animation driver asks for one redraw per step while the
// tween runs, and the loop sleeps otherwise.

use std::sync::mpsc::Receiver;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use log::{error, info, trace, warn};
use pixels::{Pixels, SurfaceTexture};
use rusttype::Font;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoopBuilder};
use winit::window::{Window, WindowBuilder};

use crate::config::GaugeProps;
use crate::error::{GaugeError, Result};
use crate::gauge::Gauge;
use crate::render::{render_geometry, Canvas};
use crate::segments::Threshold;
use crate::tween::{FrameHandle, FrameHost};

/// Updates that can be pushed to a running viewer.
#[derive(Debug, Clone)]
pub enum GaugeCommand {
    SetValue(f64),
    SetThresholds(Vec<Threshold>),
    SetReferenceThresholds(Vec<Threshold>),
    SetTransition(Duration),
    SetProps(GaugeProps),
}

/// Applies `command` to `gauge`. Configuration errors leave the gauge as it was.
pub fn apply_command<H: FrameHost>(
    gauge: &mut Gauge<H>,
    command: GaugeCommand,
    now: Instant,
) -> Result<()> {
    let mut props = gauge.props().clone();
    match command {
        GaugeCommand::SetValue(value) => {
            gauge.set_value(value, now);
            return Ok(());
        }
        GaugeCommand::SetThresholds(thresholds) => props.thresholds = Some(thresholds),
        GaugeCommand::SetReferenceThresholds(thresholds) => {
            props.reference_thresholds = Some(thresholds)
        }
        GaugeCommand::SetTransition(duration) => props.transition_duration = duration,
        GaugeCommand::SetProps(new_props) => props = new_props,
    }
    gauge.set_props(props, now)
}

/// Frame host backed by winit redraw requests.
///
/// A redraw request cannot be revoked, so cancellation only bumps the handle
/// counter; the driver drops frames whose handle is no longer pending.
pub struct WindowFrameHost {
    window: Arc<Window>,
    next: u64,
}

impl WindowFrameHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self { window, next: 0 }
    }
}

impl FrameHost for WindowFrameHost {
    fn request_frame(&mut self) -> FrameHandle {
        self.next += 1;
        self.window.request_redraw();
        FrameHandle(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        trace!("frame {handle:?} cancelled");
    }
}

fn window_error(err: impl std::fmt::Display) -> GaugeError {
    GaugeError::Window(err.to_string())
}

pub struct GaugeWindow {
    props: GaugeProps,
    title: String,
    font: Option<Font<'static>>,
}

impl GaugeWindow {
    pub fn new(props: GaugeProps) -> Self {
        Self {
            props,
            title: "Gauge".to_string(),
            font: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Font used for the value, unit and threshold labels.
    pub fn with_font_data(mut self, data: Vec<u8>) -> Result<Self> {
        let font = Font::try_from_vec(data)
            .ok_or_else(|| GaugeError::InvalidInput("unreadable font data".to_string()))?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn show(self) -> Result<()> {
        self.run(None)
    }

    pub fn show_with_commands(self, receiver: Receiver<GaugeCommand>) -> Result<()> {
        self.run(Some(receiver))
    }

    fn run(self, receiver: Option<Receiver<GaugeCommand>>) -> Result<()> {
        let event_loop = EventLoopBuilder::<GaugeCommand>::with_user_event()
            .build()
            .map_err(window_error)?;
        let window = WindowBuilder::new()
            .with_title(&self.title)
            .with_inner_size(LogicalSize::new(self.props.width, self.props.height))
            .build(&event_loop)
            .map_err(window_error)?;
        let window = Arc::new(window);

        if let Some(receiver) = receiver {
            let proxy = event_loop.create_proxy();
            thread::spawn(move || {
                for command in receiver {
                    if proxy.send_event(command).is_err() {
                        break;
                    }
                }
            });
        }

        if self.font.is_none() {
            warn!("no font loaded, text will not be drawn");
        }

        let size = window.inner_size();
        let mut fb_width = size.width as usize;
        let mut fb_height = size.height as usize;
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        let mut pixels =
            Pixels::new(size.width, size.height, surface_texture).map_err(window_error)?;

        let host = WindowFrameHost::new(window.clone());
        let redraw_window = window.clone();
        let mut gauge = Some(Gauge::new(self.props, host, Instant::now())?);
        let font = self.font;
        info!("gauge window opened at {fb_width}x{fb_height}");

        event_loop
            .run(move |event, window_target| {
                window_target.set_control_flow(ControlFlow::Wait);
                let Some(active) = gauge.as_mut() else {
                    return;
                };

                match event {
                    Event::UserEvent(command) => {
                        if let Err(e) = apply_command(active, command, Instant::now()) {
                            warn!("rejected gauge update: {e}");
                        }
                        redraw_window.request_redraw();
                    }
                    Event::WindowEvent { event, .. } => match event {
                        WindowEvent::CloseRequested => {
                            info!("gauge window closed");
                            // drops the animation driver and its pending frame
                            gauge = None;
                            window_target.exit();
                        }
                        WindowEvent::Resized(new_size) => {
                            if new_size.width == 0 || new_size.height == 0 {
                                return;
                            }
                            fb_width = new_size.width as usize;
                            fb_height = new_size.height as usize;
                            let _ = pixels.resize_buffer(new_size.width, new_size.height);
                            let _ = pixels.resize_surface(new_size.width, new_size.height);
                            redraw_window.request_redraw();
                        }
                        WindowEvent::RedrawRequested => {
                            if let Some(handle) = active.pending_frame() {
                                active.on_frame(handle, Instant::now());
                            }
                            let geometry = active.geometry();
                            let mut canvas = Canvas::new(pixels.frame_mut(), fb_width, fb_height);
                            render_geometry(&mut canvas, &geometry, font.as_ref());
                            if let Err(e) = pixels.render() {
                                error!("render failed: {e}");
                                window_target.exit();
                            }
                        }
                        _ => {}
                    },
                    _ => {}
                }
            })
            .map_err(window_error)
    }
}
