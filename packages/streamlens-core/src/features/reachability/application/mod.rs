pub mod terminal_check;

pub use terminal_check::{check_consumption, ConsumptionReport};
