// rowcheck CLI library: pieces shared by the binary and its tests

pub mod edits;
pub mod gate;
pub mod shell;
