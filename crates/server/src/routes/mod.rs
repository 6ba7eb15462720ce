pub mod rfq;
pub mod system;
