pub mod image_dimensions;
pub mod imagemagick_compositor;
