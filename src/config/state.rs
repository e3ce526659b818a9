// Application state module
// Everything a request handler needs, built once at startup

use std::sync::Arc;

use super::types::Config;
use crate::render::Templates;
use crate::routing::{RouteTable, RouteTableError};
use crate::storage::PageStore;

/// Application state
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn PageStore>,
    pub templates: Templates,
    pub routes: RouteTable,
}

impl AppState {
    /// Build state around an opened store; fails if the route table is invalid
    pub fn new(config: Config, store: Arc<dyn PageStore>) -> Result<Self, RouteTableError> {
        let routes = RouteTable::wiki(&config.wiki.front_page)?;
        Ok(Self {
            config,
            store,
            templates: Templates::new(),
            routes,
        })
    }
}
