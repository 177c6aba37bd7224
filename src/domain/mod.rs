// Domain layer: the product model and the ports the crawler talks through.

pub mod model;
pub mod ports;
