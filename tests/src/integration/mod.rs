pub mod console;
pub mod expiration;
pub mod lifecycle;
