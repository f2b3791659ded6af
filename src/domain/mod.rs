// Domain layer: request/response models and the ports the tools talk through.

pub mod model;
pub mod ports;
