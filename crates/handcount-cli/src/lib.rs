//! Terminal front-end for the `handcount` scorekeeper: an interactive table
//! driven from stdin and a scripted replay mode that prints JSON.

pub mod config;
pub mod logging;
pub mod repl;
pub mod replay;
