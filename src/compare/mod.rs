mod picker;
mod session;
pub mod slots;

pub use picker::ComparePicker;
pub use session::{ComparisonSession, ComparisonState};
pub use slots::{SelectionSlots, Slot};
