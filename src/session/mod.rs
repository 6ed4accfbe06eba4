//! Session state: the loaded tree, the current directory and the single
//! `execute` entry point the front-end talks to.

mod session;

pub use session::Session;

#[cfg(test)]
pub(crate) use session::tests;
