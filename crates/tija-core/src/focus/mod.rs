mod clock;
mod session;
mod shared;
mod tracker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use session::FocusSession;
pub use shared::SharedTracker;
pub use tracker::{FocusSessionTracker, TrackerState, TrackerStatus, DEFAULT_FOCUS_SECS};
