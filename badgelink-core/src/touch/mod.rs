//! Capacitive touch input
//!
//! [`TouchFilter`] turns touch reports into press events and pressed
//! levels. [`NavHistory`] remembers the order in which press events were
//! consumed.

pub mod filter;
pub mod history;

pub use filter::TouchFilter;
pub use history::NavHistory;
