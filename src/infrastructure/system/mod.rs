//! Host statistics sampling.

mod probe;
mod sysinfo_probe;

pub use probe::SystemProbe;
pub use sysinfo_probe::SysinfoProbe;

#[cfg(test)]
pub use probe::MockSystemProbe;
