pub mod algorithms;
pub mod builder;
pub mod engine;
pub mod error;
pub mod network;
pub mod protocol;
pub mod render;

/// Node identifier, unique within a network. Generated topologies use
/// single letters (A..Z), but any stable string works.
pub type NodeId = String;

/// Link cost. Always positive for a configured link.
pub type Weight = u32;
