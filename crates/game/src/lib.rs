pub mod categories;
pub mod content;
pub mod demo;
pub mod fsms;
pub mod scenario;
