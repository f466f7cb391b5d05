// Domain layer: catalog and quote models, the calculator, and the ports the session talks to.

pub mod calculator;
pub mod model;
pub mod ports;
pub mod selections;
