pub mod asset;
pub mod game;
pub mod renderer;
pub mod scene;
