pub mod amount;
pub mod chain;
pub mod fees;
pub mod ports;
pub mod settlement;
