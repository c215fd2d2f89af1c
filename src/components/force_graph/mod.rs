mod component;
mod config;
mod error;
mod interaction;
mod layout;
mod legend;
mod loader;
mod render;
mod scene;
mod state;
mod types;
mod view;

pub use component::ForceGraphCanvas;
pub use loader::load_graph;
pub use types::RawGraph;
