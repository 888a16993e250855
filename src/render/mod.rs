//! Output rendering.

pub mod error;
pub mod human;
pub mod junit;

pub use error::render_error;
pub use human::{
    render_resources, render_run_progress, render_run_started, render_run_summary,
    render_update_status,
};
pub use junit::render_junit;
