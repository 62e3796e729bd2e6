pub mod node;
pub mod routing_table;

pub use node::*;
pub use routing_table::*;
