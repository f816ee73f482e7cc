mod load_layout;
mod load_vertices;

pub use load_layout::{LoadLayout, LoadedLayout};
pub use load_vertices::LoadVertices;
