pub mod app;
pub mod core;
pub mod pool;
pub mod scanner;
pub mod signatures;
