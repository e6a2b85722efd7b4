//! Long-term occupational growth forecast.

pub mod estimates;
pub mod handlers;
pub mod projector;

pub use projector::Forecaster;
