//! Routing module
//!
//! Explicit route table for the wiki actions, with title validation.

mod table;

pub use table::{Action, Pattern, Route, RouteMatch, RouteTable, RouteTableError};
