// Domain layer: request/result models and the ports the dispatcher depends on.

pub mod model;
pub mod ports;
