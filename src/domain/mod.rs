// Domain layer: the draw record and the ports the core talks to.

pub mod model;
pub mod ports;
