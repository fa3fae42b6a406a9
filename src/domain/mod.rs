// Domain layer: portal models and ports. Only std/serde/chrono here.

pub mod model;
pub mod ports;
