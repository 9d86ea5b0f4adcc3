pub mod classify;
pub mod monitor;
pub mod window;

pub use classify::classify;
pub use monitor::TrendMonitor;
pub use window::BarWindow;
