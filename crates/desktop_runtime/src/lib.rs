pub mod config;
mod effect_executor;
pub mod model;
pub mod persistence;
pub mod profile;
pub mod reducer;
pub mod session;
pub mod window_manager;

pub use config::{ConfigError, SessionConfig};
pub use model::*;
pub use persistence::{clear_profile, load_profile, persist_profile, ProfileRecord};
pub use profile::ProfileStore;
pub use reducer::{reduce_desktop, DesktopAction, ReducerError, RuntimeEffect};
pub use session::{DesktopSession, SessionError};
pub use window_manager::WindowManager;
