pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod logging;
pub mod progress;
pub mod timestamps;

pub use constants::*;
pub use coordinates::{mean_center, LatLon};
pub use filename::generate_default_dashboard_filename;
pub use logging::init_tracing;
pub use progress::ProgressReporter;
pub use timestamps::parse_timestamp;
