pub mod dns;
pub mod domain;
pub mod ssl;
pub mod stack;
