//! HTTP Scanner - favicon probing over plain HTTP
//!
//! One GET per address, bounded by the probe timeout and body cap. No
//! retries; every failure is final for that probe and reported as absent.

mod fetch;
mod prober;

pub use prober::HttpProber;
