mod component;
mod frame_loop;
mod render;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use types::GraphData;
