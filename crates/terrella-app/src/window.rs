//! Window creation and event handling via winit.
//!
//! Provides [`ViewerApp`] which implements winit's [`ApplicationHandler`]
//! trait, and [`run_with_config`] to start the event loop. The redraw
//! handler is the frame callback of the whole program: it polls the
//! one-shot texture and geolocation channels, advances the frame driver,
//! applies orbit input, and records the three sphere passes.

use std::sync::Arc;

use crossbeam_channel::Receiver;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use terrella_config::Config;
use terrella_geo::{
    ConfiguredProvider, FALLBACK_COORDINATES, GeoCoordinates, GeolocationError,
    UnavailableProvider, locate_in_background, surface_position,
};
use terrella_globe::{GlobeRenderer, MarkerRenderer, NightShellRenderer, generate_sphere};
use terrella_input::{MouseState, OrbitController};
use terrella_render::{
    Camera, DecodedImage, DepthBuffer, GlobeTexture, RenderContext, SurfaceWrapper, TextureError,
    init_render_context_blocking, load_image_in_background,
};
use terrella_solar::SimClock;

use crate::driver::FrameDriver;
use crate::overlay::window_title;

/// Clear color: deep space behind the globe.
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.004,
    g: 0.005,
    b: 0.012,
    a: 1.0,
};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state: window, GPU context, renderers, and the frame driver.
pub struct ViewerApp {
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    surface_wrapper: SurfaceWrapper,
    depth_buffer: Option<DepthBuffer>,
    globe: Option<GlobeRenderer>,
    night: Option<NightShellRenderer>,
    marker: Option<MarkerRenderer>,
    camera: Camera,
    orbit: OrbitController,
    mouse: MouseState,
    driver: FrameDriver,
    config: Config,
    /// One-shot delivery of the decoded Earth texture; `None` once consumed.
    texture_rx: Option<Receiver<Result<DecodedImage, TextureError>>>,
    /// One-shot delivery of the geolocation result; `None` once consumed.
    geo_rx: Option<Receiver<Result<GeoCoordinates, GeolocationError>>>,
}

impl ViewerApp {
    /// Create the application state from a config and simulated clock.
    pub fn new(config: Config, clock: SimClock) -> Self {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(config.window.width as f32, config.window.height as f32);

        Self {
            window: None,
            gpu: None,
            surface_wrapper: SurfaceWrapper::default(),
            depth_buffer: None,
            globe: None,
            night: None,
            marker: None,
            camera,
            orbit: OrbitController::default(),
            mouse: MouseState::new(),
            driver: FrameDriver::new(clock),
            config,
            texture_rx: None,
            geo_rx: None,
        }
    }

    fn initialize_rendering(&mut self, ctx: &RenderContext) {
        let size = self.surface_wrapper.physical_size();
        self.depth_buffer = Some(DepthBuffer::new(&ctx.device, size.width, size.height));

        let mesh = generate_sphere(self.config.render.sphere_subdivisions);
        let placeholder = GlobeTexture::placeholder(&ctx.device, &ctx.queue);
        let globe = GlobeRenderer::new(&ctx.device, ctx.surface_format, &mesh, &placeholder);

        let night = NightShellRenderer::new(
            &ctx.device,
            ctx.surface_format,
            globe.camera_bind_group_layout(),
            &mesh,
            self.config.render.shell_scale,
            self.config.render.night_opacity,
        );

        // The marker starts at the fallback and moves at most once, when
        // the geolocation query resolves.
        let marker = MarkerRenderer::new(
            &ctx.device,
            ctx.surface_format,
            globe.camera_bind_group_layout(),
            surface_position(FALLBACK_COORDINATES, 1.0).as_vec3(),
        );

        self.globe = Some(globe);
        self.night = Some(night);
        self.marker = Some(marker);

        // Kick off both one-shot background queries; they race against
        // first render and the frame loop polls for their results.
        self.texture_rx = Some(load_image_in_background(
            self.config.render.texture_path.clone().into(),
        ));
        self.geo_rx = Some(match (self.config.geo.latitude_deg, self.config.geo.longitude_deg) {
            (Some(lat), Some(lon)) => locate_in_background(ConfiguredProvider::new(lat, lon)),
            _ => locate_in_background(UnavailableProvider),
        });
    }

    /// Poll the one-shot channels. Each result is consumed exactly once;
    /// afterwards the receiver is dropped and never checked again.
    fn poll_async_arrivals(&mut self) {
        if let Some(rx) = &self.texture_rx
            && let Ok(result) = rx.try_recv()
        {
            self.texture_rx = None;
            if let (Ok(image), Some(gpu), Some(globe)) = (result, &self.gpu, &mut self.globe) {
                let texture = GlobeTexture::from_image(&gpu.device, &gpu.queue, &image);
                globe.set_texture(&gpu.device, &texture);
                info!("Earth texture applied");
            }
            // A failed load was already logged; the placeholder stays.
        }

        if let Some(rx) = &self.geo_rx
            && let Ok(result) = rx.try_recv()
        {
            self.geo_rx = None;
            match result {
                Ok(coords) => {
                    if let (Some(gpu), Some(marker)) = (&self.gpu, &self.marker) {
                        marker.set_position(
                            &gpu.queue,
                            surface_position(coords, 1.0).as_vec3(),
                        );
                        info!(
                            "Geolocation resolved: ({:.3}, {:.3})",
                            coords.latitude_deg, coords.longitude_deg
                        );
                    }
                }
                Err(e) => {
                    // Marker stays at the fallback; no retry.
                    warn!("Using fallback coordinates: {e}");
                }
            }
        }
    }

    fn apply_orbit_input(&mut self, dt: f64) {
        if self.mouse.is_button_pressed(MouseButton::Left) {
            self.orbit.apply_drag(self.mouse.delta());
        }
        let scroll = self.mouse.scroll();
        if scroll.abs() > f32::EPSILON {
            self.orbit.apply_scroll(scroll);
        }
        self.orbit.advance(dt as f32);

        self.camera.position = self.orbit.position();
        self.camera.rotation = self.orbit.rotation();
    }

    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(gpu) = &self.gpu else {
            return;
        };
        let (Some(globe), Some(night), Some(marker), Some(depth)) =
            (&self.globe, &self.night, &self.marker, &self.depth_buffer)
        else {
            return;
        };

        globe.update(&gpu.queue, &self.camera.to_uniform(), self.driver.sun_direction());
        night.update(
            &gpu.queue,
            self.driver.clip_plane_normal(),
            self.driver.clip_plane_offset(),
        );

        match gpu.get_current_texture() {
            Ok(surface_texture) => {
                let view = surface_texture
                    .texture
                    .create_view(&wgpu::TextureViewDescriptor::default());
                let mut encoder =
                    gpu.device
                        .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                            label: Some("frame-encoder"),
                        });

                {
                    let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                        label: Some("globe-pass"),
                        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                            view: &view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        })],
                        depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                            view: &depth.view,
                            depth_ops: Some(wgpu::Operations {
                                load: wgpu::LoadOp::Clear(DepthBuffer::CLEAR_VALUE),
                                store: wgpu::StoreOp::Store,
                            }),
                            stencil_ops: None,
                        }),
                        timestamp_writes: None,
                        occlusion_query_set: None,
                        multiview_mask: None,
                    });

                    // Opaque globe first, then the translucent night
                    // shell, then the marker on top of both.
                    globe.render(&mut pass);
                    night.render(&mut pass, globe.camera_bind_group());
                    marker.render(&mut pass, globe.camera_bind_group());
                }

                gpu.queue.submit(std::iter::once(encoder.finish()));
                surface_texture.present();
            }
            Err(terrella_render::SurfaceError::Lost) => {
                let size = self.surface_wrapper.physical_size();
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(size.width, size.height);
                }
            }
            Err(terrella_render::SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                event_loop.exit();
            }
            Err(terrella_render::SurfaceError::Timeout) => {
                warn!("Surface timeout, skipping frame");
            }
        }
    }

    fn handle_resize(&mut self, width: u32, height: u32, scale_factor: Option<f64>) {
        let resize = match scale_factor {
            Some(factor) => self
                .surface_wrapper
                .handle_scale_factor_changed(factor, width, height),
            None => self.surface_wrapper.handle_resize(width, height),
        };

        if let Some(resize) = resize {
            let w = resize.physical.width;
            let h = resize.physical.height;

            self.camera.set_aspect_ratio(w as f32, h as f32);

            if let Some(gpu) = &mut self.gpu {
                gpu.resize(w, h);
            }
            if let (Some(depth), Some(gpu)) = (&mut self.depth_buffer, &self.gpu) {
                depth.resize(&gpu.device, w, h);
            }

            info!("Window resized to {w}x{h} (scale: {:.2})", resize.scale_factor);
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            let attrs = window_attributes_from_config(&self.config);
            let window = event_loop
                .create_window(attrs)
                .expect("Failed to create window");
            let window = Arc::new(window);

            let scale_factor = window.scale_factor();
            let inner_size = window.inner_size();
            self.surface_wrapper =
                SurfaceWrapper::new(inner_size.width, inner_size.height, scale_factor);
            self.camera
                .set_aspect_ratio(inner_size.width as f32, inner_size.height as f32);

            match init_render_context_blocking(window.clone(), self.config.window.vsync) {
                Ok(ctx) => {
                    self.initialize_rendering(&ctx);
                    self.gpu = Some(ctx);
                }
                Err(e) => {
                    error!("GPU initialization failed: {e}");
                    event_loop.exit();
                    return;
                }
            }

            window.request_redraw();
            self.window = Some(window);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                // Exiting the loop drops this struct: GPU resources and
                // the redraw schedule go with it, so nothing ticks after
                // teardown.
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.handle_resize(new_size.width, new_size.height, None);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let new_inner = window.inner_size();
                    self.handle_resize(new_inner.width, new_inner.height, Some(scale_factor));
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.mouse.on_scroll(delta);
            }
            WindowEvent::RedrawRequested => {
                self.poll_async_arrivals();

                let dt = self.driver.frame();
                self.apply_orbit_input(dt);
                self.mouse.clear_transients();

                self.render_frame(event_loop);

                if let Some(window) = &self.window {
                    window.set_title(&window_title(
                        &self.config.window.title,
                        self.driver.overlay(),
                    ));
                    // Reschedule indefinitely; the loop ends only with the
                    // window.
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }
}

/// Create the event loop and run the viewer until the window closes.
pub fn run_with_config(config: Config, clock: SimClock) {
    let event_loop = EventLoop::new().expect("Failed to create event loop");
    let mut app = ViewerApp::new(config, clock);
    event_loop.run_app(&mut app).expect("Event loop failed");
}
