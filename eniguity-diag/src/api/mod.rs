//! HTTP API handlers for eniguity-diag

pub mod analysis;
pub mod health;
pub mod overview;
pub mod root;
pub mod vehicles;

pub use analysis::analysis_routes;
pub use health::health_routes;
pub use overview::overview_routes;
pub use root::root_routes;
pub use vehicles::vehicle_routes;
