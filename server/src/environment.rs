use std::sync::Arc;

use log::Logger;

use crate::db::Db;
use crate::store::Store;
use crate::urls::Urls;

pub type SafeDb = dyn Db + Send + Sync;
pub type SafeStore = dyn Store;

/// The collaborators shared by every route.
#[derive(Clone)]
pub struct Environment {
    pub logger: Arc<Logger>,
    pub db: Arc<SafeDb>,
    pub urls: Arc<Urls>,
    pub store: Arc<SafeStore>,
}

impl Environment {
    pub fn new(
        logger: Arc<Logger>,
        db: Arc<SafeDb>,
        urls: Arc<Urls>,
        store: Arc<SafeStore>,
    ) -> Self {
        Self {
            logger,
            db,
            urls,
            store,
        }
    }
}
