pub mod logging;

pub use logging::{TelemetrySettings, init_tracing, shutdown_tracing};
