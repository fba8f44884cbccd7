mod install;
mod loader;
mod paths;
mod types;

pub use install::first_install_time;
pub use types::Config;
