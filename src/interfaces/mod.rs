//! Interface adapters: the CSV operation stream and report writers used by
//! the command-line binary.

pub mod csv;
