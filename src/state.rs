use std::sync::Arc;

use super::{
    config::Config,
    database::{Store, init_mongo},
};

pub struct State {
    pub config: Config,
    pub store: Store,
}

impl State {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store = init_mongo(&config.mongo_url, &config.mongo_db)
            .await
            .expect("MongoDB misconfigured!");

        Arc::new(Self { config, store })
    }
}
