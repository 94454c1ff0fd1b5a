use std::path::Path;

use wgpu::TextureView;
use winit::{
    dpi::LogicalSize,
    keyboard::KeyCode,
    window::{Window, WindowAttributes},
};

use crate::{
    asset_path,
    game::{GameContext, GameEvent, GameFlow, Time},
    renderer::{Camera, Renderer, SpriteId},
    scene::Scene,
};

#[derive(Debug)]
pub struct Game {
    time: Time,
    renderer: Renderer,
    camera: Camera,
    dog_sprite: SpriteId,
    squirrel_sprite: SpriteId,
    scene: Scene,
}

impl Game {
    pub fn window_attributes() -> WindowAttributes {
        Window::default_attributes()
            .with_title("Hello, Project 1!")
            .with_inner_size(LogicalSize::new(640.0, 480.0))
            .with_resizable(false)
    }

    pub fn new(ctx: GameContext) -> Self {
        let mut renderer = Renderer::new(ctx.into());

        let dog_sprite = load_sprite_or_abort(&mut renderer, asset_path!("sprites/dog.png"), ctx);
        let squirrel_sprite =
            load_sprite_or_abort(&mut renderer, asset_path!("sprites/squirrel.png"), ctx);

        Self {
            time: Time::new(),
            renderer,
            camera: Camera::default(),
            dog_sprite,
            squirrel_sprite,
            scene: Scene::default(),
        }
    }

    pub fn update(&mut self, _: GameContext) -> GameFlow {
        let dt = self.time.tick();

        self.scene.update(dt);

        GameFlow::Continue
    }

    pub fn render(&mut self, output: &TextureView, ctx: GameContext) {
        self.renderer.render_frame(
            &self.camera,
            |r| {
                r.draw_sprite(self.dog_sprite, self.scene.dog.model_matrix());
                r.draw_sprite(self.squirrel_sprite, self.scene.squirrel.model_matrix());
            },
            output,
            ctx.into(),
        );
    }

    pub fn event(&mut self, event: GameEvent, _: GameContext) -> GameFlow {
        match event {
            GameEvent::CloseRequested | GameEvent::KeyPressed(KeyCode::Escape) => GameFlow::Exit,
            GameEvent::KeyPressed(_) => GameFlow::Continue,
        }
    }

    pub fn end(&mut self, _: GameContext) {
        log::info!("exiting after {:.1}s", self.time.elapsed());
    }
}

fn load_sprite_or_abort(renderer: &mut Renderer, path: &str, ctx: GameContext) -> SpriteId {
    match renderer.load_sprite(Path::new(path), ctx.into()) {
        Ok(sprite) => sprite,
        Err(err) => {
            log::error!("{err}: {}", source_chain(&err));
            log::error!("Unable to load image. Make sure the path is correct.");
            std::process::abort();
        }
    }
}

fn source_chain(err: &dyn std::error::Error) -> String {
    let mut causes = Vec::new();
    let mut source = err.source();

    while let Some(cause) = source {
        causes.push(cause.to_string());
        source = cause.source();
    }

    causes.join(": ")
}
