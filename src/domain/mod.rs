pub mod scope;
pub mod throughput;
