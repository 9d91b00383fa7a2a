//! Internal test modules, grouped by area.

mod error;
mod resolver;
