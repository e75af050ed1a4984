//! UI module - shared rendering helpers

pub mod components;
