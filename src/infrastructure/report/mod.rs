//! Printable reports over stored link sets.

pub mod pdf;

pub use pdf::{render_pdf, render_pdf_blocking};
