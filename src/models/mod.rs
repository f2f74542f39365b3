mod api;
pub mod pixel;
pub mod region;

pub use api::HealthResponse;
pub use pixel::{PIXEL_CONTENT_TYPE, PIXEL_GIF};
pub use region::{Region, RegionSet, classify};
