//! Source implementations.

pub mod mock;
pub mod youtube;

pub use mock::MockSource;
pub use youtube::YouTubeSource;
