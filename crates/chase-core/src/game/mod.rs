pub mod belief;
pub mod sampler;
pub mod serialization;
