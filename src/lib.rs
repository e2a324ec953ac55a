pub mod cli;
pub mod config;
pub mod extractor;
pub mod model;
pub mod render;
pub mod util;

pub use extractor::{Extractor, extract};
pub use model::NormalizedRecord;
pub use render::render;
