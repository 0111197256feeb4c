mod macros;

pub mod logging;
pub mod scene;

pub use logging::{init_logging, LogConfig};
