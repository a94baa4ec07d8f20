use mongodb::{options::{ClientOptions, Credential}, Client, Database};
use std::time::Duration;
use tracing::{info, instrument};

use crate::config::mongo_conf::MongoConfig;

/// Open the process-wide MongoDB client and return the configured database.
/// Repositories share the returned handle; the driver pools connections internally.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect(config: &MongoConfig) -> Result<Database, mongodb::error::Error> {
    let mut client_options = ClientOptions::parse(&config.uri).await?;
    client_options.app_name = Some("InkpostBackend".to_string());
    client_options.max_pool_size = Some(config.pool_size);
    client_options.connect_timeout = Some(Duration::from_secs(config.connection_timeout_secs));

    if let (Some(ref username), Some(ref password)) = (&config.username, &config.password) {
        client_options.credential = Some(Credential::builder()
            .username(username.clone())
            .password(password.clone())
            .build());
    }

    let client = Client::with_options(client_options)?;
    info!("MongoDB client created");
    Ok(client.database(&config.database))
}
