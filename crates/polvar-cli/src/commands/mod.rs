pub mod describe;
pub mod publish;
pub mod resolve;
