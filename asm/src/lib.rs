//! Two-pass assembler for SAP source text.
//!
//! Pass 1 binds labels to addresses, pass 2 encodes every line against the
//! finished symbol table and builds the listing. Errors stay local to the
//! line they occur on.

pub mod assembler;
pub mod error;
pub mod files;
pub mod listing;
pub mod parser;

pub use assembler::{assemble, Assembly, MAX_WORDS};
pub use error::{Error, FileError};
pub use files::assemble_file;
