//! Presentation adapter: reads [`crate::state::AppState`] and forwards user
//! input to its `set_*` methods. No filtering happens here.

pub mod cards;
pub mod charts;
pub mod modal;
pub mod panels;
