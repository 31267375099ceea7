// File: ./src/model/mod.rs
pub mod agenda;
pub mod item;
pub mod parser;
pub mod recurrence;

pub use item::{Event, Priority, RecurrenceDescriptor, Recurring, Task};
pub use parser::{QuickEntry, parse_quick_entry};
pub use recurrence::{CustomRule, RecurrenceEngine, RepeatRule, RepeatUnit};
