pub mod flows;
pub mod render;
