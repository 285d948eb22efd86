// src/lib.rs
//! Domino run: a Catmull-Rom spiral of rigid-body dominoes on a table,
//! knocked over by ctrl-clicked projectiles.

pub mod body;
pub mod camera;
pub mod curve;
pub mod domino;
pub mod engine;
pub mod error;
pub mod physics;
pub mod placement;
pub mod render;
pub mod scene;
pub mod shot;
pub mod sync;
pub mod time;

pub use body::{BodyFactory, ShapeDesc};
pub use camera::{Camera, Ray};
pub use curve::CatmullRom;
pub use engine::Simulation;
pub use error::{Error, Result};
pub use physics::PhysicsWorld;
pub use placement::{Pose, PosePlacer};
pub use scene::{ProxyHandle, RenderProxy, Scene};
pub use shot::{ShotEvent, Shooter};
pub use sync::SyncRegistry;

use std::sync::Arc;

use glam::Vec3;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::render::Renderer;
use crate::time::FrameClock;

struct DominoApp {
    instance: wgpu::Instance,
    window: Option<Arc<Window>>,
    surface: Option<wgpu::Surface<'static>>,
    device: Option<wgpu::Device>,
    queue: Option<wgpu::Queue>,
    config: Option<wgpu::SurfaceConfiguration>,
    renderer: Option<Renderer>,
    // `None` until the GPU surface is up; input handlers treat that as
    // "not ready" and do nothing.
    sim: Option<Simulation>,
    camera: Camera,
    clock: FrameClock,
    shooter: Shooter,
    cursor: (f32, f32),
    ctrl_held: bool,
}

impl DominoApp {
    fn new() -> Self {
        Self {
            instance: wgpu::Instance::new(wgpu::InstanceDescriptor {
                backends: wgpu::Backends::PRIMARY,
                ..Default::default()
            }),
            window: None,
            surface: None,
            device: None,
            queue: None,
            config: None,
            renderer: None,
            sim: None,
            camera: Camera::new(
                Vec3::new(0.0, 20.0, 20.0),
                std::f32::consts::PI,
                -std::f32::consts::FRAC_PI_4,
                16.0 / 9.0,
            ),
            clock: FrameClock::new(),
            shooter: Shooter::default(),
            cursor: (0.0, 0.0),
            ctrl_held: false,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> std::result::Result<(), String> {
        let window = Arc::new(
            event_loop
                .create_window(
                    Window::default_attributes()
                        .with_title("Domino Run")
                        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720)),
                )
                .map_err(|e| format!("window creation failed: {e}"))?,
        );

        let surface = self
            .instance
            .create_surface(window.clone())
            .map_err(|e| format!("surface creation failed: {e}"))?;

        let adapter = pollster::block_on(self.instance.request_adapter(
            &wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            },
        ))
        .ok_or("no suitable GPU adapter")?;
        log::info!("adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("domino device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: wgpu::MemoryHints::default(),
            },
            None,
        ))
        .map_err(|e| format!("device request failed: {e}"))?;

        let size = window.inner_size();
        let caps = surface.get_capabilities(&adapter);
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        self.camera.set_aspect(config.width, config.height);
        self.renderer = Some(Renderer::new(&device, &config));
        self.window = Some(window);
        self.surface = Some(surface);
        self.device = Some(device);
        self.queue = Some(queue);
        self.config = Some(config);

        let mut sim = Simulation::new();
        domino::build(&mut sim).map_err(|e| format!("scene construction failed: {e}"))?;
        self.sim = Some(sim);
        Ok(())
    }
}

impl ApplicationHandler for DominoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.init_gpu(event_loop) {
            log::error!("initialization failed: {err}");
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => {
                if let (Some(surface), Some(device), Some(config)) =
                    (&self.surface, &self.device, &mut self.config)
                {
                    config.width = size.width.max(1);
                    config.height = size.height.max(1);
                    surface.configure(device, config);
                    self.camera.set_aspect(config.width, config.height);
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(device, config);
                    }
                }
            }
            WindowEvent::ModifiersChanged(modifiers) => {
                self.ctrl_held = modifiers.state().control_key();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = (position.x as f32, position.y as f32);
            }
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => {
                let viewport = self
                    .config
                    .as_ref()
                    .map(|c| (c.width as f32, c.height as f32))
                    .unwrap_or((1.0, 1.0));
                self.shooter.on_click(
                    ShotEvent {
                        x: self.cursor.0,
                        y: self.cursor.1,
                        guard_held: self.ctrl_held,
                    },
                    viewport,
                    &self.camera,
                    self.sim.as_mut(),
                );
            }
            WindowEvent::RedrawRequested => {
                let dt = self.clock.tick();
                if let Some(sim) = &mut self.sim {
                    if let Err(err) = sim.tick(dt) {
                        log::error!("simulation tick failed: {err}");
                    }
                }
                if let (Some(renderer), Some(device), Some(queue), Some(surface), Some(config)) = (
                    &mut self.renderer,
                    &self.device,
                    &self.queue,
                    &self.surface,
                    &self.config,
                ) {
                    match renderer.render(
                        device,
                        queue,
                        surface,
                        config,
                        self.sim.as_ref().map(|s| &s.scene),
                        &self.camera,
                    ) {
                        Ok(()) => {}
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            log::error!("out of GPU memory, exiting");
                            event_loop.exit();
                        }
                        Err(err) => log::warn!("frame skipped: {err:?}"),
                    }
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Open a window and run the demo until the user closes it.
pub fn run_native() -> std::result::Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);
    let mut app = DominoApp::new();
    event_loop.run_app(&mut app)
}
