// Domain layer: team model, scoring strategies and ports (interfaces).

pub mod model;
pub mod ports;
pub mod scoring;
