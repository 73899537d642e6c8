// File I/O: CSV loading, preview rendering, report export

pub mod csv;
pub mod error;
pub mod preview;
pub mod report;

pub use error::LoadError;
