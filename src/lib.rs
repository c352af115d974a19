mod error;

pub mod dinner;
pub mod notify;
pub mod pace;
pub mod philosopher;
pub mod shutdown;
pub mod table;

pub use dinner::Dinner;
pub use error::{Error, Result};
pub use notify::{Event, LogNotify, Notify, NullNotify, Recorder};
pub use pace::Pace;
pub use philosopher::Philosopher;
pub use shutdown::{install_signal_handler, Shutdown};
pub use table::{State, Table};
