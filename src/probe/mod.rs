pub mod http_probe;
pub mod throttle;

pub use http_probe::{HttpProber, ProbeResult, Prober};
pub use throttle::{ConcurrencyGate, GatePermit};
