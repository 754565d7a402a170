//! Command implementations.

mod info;
mod run;
mod validate;
mod watch;

pub use info::run_info;
pub use run::run_pipeline;
pub use validate::run_validate;
pub use watch::run_watch;
