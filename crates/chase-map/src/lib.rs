#![deny(warnings)]
pub mod overlay;
pub mod theme;
