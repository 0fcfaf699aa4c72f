pub mod config;
pub mod error;
pub mod filters;
pub mod status;
pub mod stream;
pub mod types;
pub mod yo;

pub use config::ProfileConfig;
pub use error::{ProfileError, Result};
pub use filters::{FilterChain, FilterKind, ProfileFilter};
pub use types::{ProfileDirection, ProfileWindow, Sample};
pub use yo::{find_profiles, find_profiles_with, find_yo_extrema, ProfileIndex, YoExtrema};
