use std::sync::Arc;

use wgpu::{
    Adapter, Device, DeviceDescriptor, Instance, PollType, Queue, RequestAdapterOptions, Surface,
    SurfaceConfiguration, TextureFormat, TextureViewDescriptor,
};
use winit::{
    application::ApplicationHandler,
    event::{KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::game::Game;

/// Everything a [`Game`] may touch while handling one callback.
#[derive(Debug, Clone, Copy)]
pub struct GameContext<'a> {
    pub window: &'a Window,
    pub device: &'a Device,
    pub queue: &'a Queue,
    pub surface_format: TextureFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameFlow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    CloseRequested,
    KeyPressed(KeyCode),
}

macro_rules! handle_flow {
    ($runner:expr, $event_loop:expr, $flow:expr) => {
        match $flow {
            GameFlow::Continue => {}
            GameFlow::Exit => {
                $runner.exit($event_loop);
                return;
            }
        }
    };
}

pub fn run() {
    let event_loop = EventLoop::new().expect("failed to create event loop");
    let mut runner = Runner::Uninit;
    event_loop.run_app(&mut runner).expect("failed to run game");
}

enum Runner {
    Uninit,
    Init(InitRunner),
}

struct InitRunner {
    gpu: Gpu,
    game: Game,
}

/// Window and wgpu state that lives as long as the game.
struct Gpu {
    window: Arc<Window>,
    device: Device,
    queue: Queue,
    surface: Surface<'static>,
    surface_config: SurfaceConfiguration,
}

impl ApplicationHandler for Runner {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Runner::Uninit = self else {
            return;
        };

        let gpu = Gpu::new(event_loop);
        let game = Game::new(gpu.ctx());

        *self = Runner::Init(InitRunner { gpu, game });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _: WindowId, event: WindowEvent) {
        let Runner::Init(runner) = self else {
            return;
        };

        runner.window_event(event_loop, event);
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Runner::Init(runner) = self else {
            return;
        };

        handle_flow!(runner, event_loop, runner.game.update(runner.gpu.ctx()));

        runner.gpu.window.request_redraw();
    }
}

impl InitRunner {
    fn window_event(&mut self, event_loop: &ActiveEventLoop, event: WindowEvent) {
        if let Some(game_event) = game_event(&event) {
            handle_flow!(self, event_loop, self.game.event(game_event, self.gpu.ctx()));
        }

        match event {
            WindowEvent::RedrawRequested => self.redraw(),
            WindowEvent::Resized(size) => self.gpu.resize(size.width, size.height),
            _ => {}
        }
    }

    fn redraw(&mut self) {
        let surface_texture = match self.gpu.surface.get_current_texture() {
            Ok(surface_texture) => surface_texture,
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return;
            }
        };

        let view = surface_texture
            .texture
            .create_view(&TextureViewDescriptor::default());

        self.game.render(&view, self.gpu.ctx());

        self.gpu.window.pre_present_notify();
        surface_texture.present();

        self.gpu
            .device
            .poll(PollType::Poll)
            .expect("failed to poll device");
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop) {
        self.game.end(self.gpu.ctx());
        event_loop.exit();
    }
}

impl Gpu {
    fn new(event_loop: &ActiveEventLoop) -> Self {
        let window = Arc::new(
            event_loop
                .create_window(Game::window_attributes())
                .expect("failed to create window"),
        );

        let instance = Instance::default();

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions::default()))
            .expect("failed to get adapter");

        let info = adapter.get_info();
        log::info!("using adapter {} ({:?})", info.name, info.backend);

        let (device, queue) =
            pollster::block_on(adapter.request_device(&DeviceDescriptor::default()))
                .expect("failed to get device");

        let surface = instance
            .create_surface(window.clone())
            .expect("failed to create surface");

        let surface_config = surface_config(&surface, &adapter, &window);
        surface.configure(&device, &surface_config);

        Self {
            window,
            device,
            queue,
            surface,
            surface_config,
        }
    }

    fn ctx(&self) -> GameContext<'_> {
        GameContext {
            window: &self.window,
            device: &self.device,
            queue: &self.queue,
            surface_format: self.surface_config.format,
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        // minimized windows report a zero size, which cannot be configured
        if width == 0 || height == 0 {
            return;
        }

        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
    }
}

fn game_event(event: &WindowEvent) -> Option<GameEvent> {
    match event {
        WindowEvent::CloseRequested => Some(GameEvent::CloseRequested),

        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    repeat: false,
                    ..
                },
            ..
        } if state.is_pressed() => Some(GameEvent::KeyPressed(*code)),

        _ => None,
    }
}

fn surface_config(surface: &Surface, adapter: &Adapter, window: &Window) -> SurfaceConfiguration {
    let size = window.inner_size();

    let mut config = surface
        .get_default_config(adapter, size.width, size.height)
        .expect("failed to create surface config");

    config.format = gamma_space_format(&surface.get_capabilities(adapter).formats, config.format);

    log::info!(
        "configured {}x{} surface as {:?}",
        config.width,
        config.height,
        config.format
    );

    config
}

/// Prefers the non-srgb twin of `default`, so colors and blending stay in the
/// same space as the stored pixels.
fn gamma_space_format(supported: &[TextureFormat], default: TextureFormat) -> TextureFormat {
    let plain = default.remove_srgb_suffix();

    if supported.contains(&plain) {
        plain
    } else {
        default
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn close_requests_reach_the_game() {
        assert_eq!(
            game_event(&WindowEvent::CloseRequested),
            Some(GameEvent::CloseRequested)
        );
        assert_eq!(game_event(&WindowEvent::RedrawRequested), None);
    }

    #[test]
    fn surface_prefers_the_plain_twin_of_the_default() {
        let supported = [TextureFormat::Bgra8UnormSrgb, TextureFormat::Bgra8Unorm];

        assert_eq!(
            gamma_space_format(&supported, TextureFormat::Bgra8UnormSrgb),
            TextureFormat::Bgra8Unorm
        );
    }

    #[test]
    fn surface_keeps_srgb_when_it_is_the_only_choice() {
        let supported = [TextureFormat::Rgba8UnormSrgb, TextureFormat::Rgba16Float];

        assert_eq!(
            gamma_space_format(&supported, TextureFormat::Rgba8UnormSrgb),
            TextureFormat::Rgba8UnormSrgb
        );
    }

    #[test]
    fn surface_keeps_plain_defaults() {
        let supported = [TextureFormat::Bgra8Unorm];

        assert_eq!(
            gamma_space_format(&supported, TextureFormat::Bgra8Unorm),
            TextureFormat::Bgra8Unorm
        );
    }
}
