//! Reusable components

pub mod spinner;
pub mod star_field;

pub use spinner::LoadingSpinner;
pub use star_field::StarFieldCanvas;
