mod health;
pub mod pixel;

pub use health::{health_check, readiness_check};
pub use pixel::{is_norrland, is_skane, unmatched};
