pub mod config;
pub mod logging;

pub mod clock;
pub mod gate;
pub mod result;
pub mod session;
pub mod storage;
pub mod throttle;
pub mod transport;
pub mod validate;
