//! Document processing module

pub mod processor;

pub use processor::DocumentProcessor;
