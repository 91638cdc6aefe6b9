//! Subscribers API example
//!
//! Serves the default demo configuration (or a YAML file passed as the first
//! argument): a `subscribers` resource seeded with three users, a `hellos`
//! resource, and the token routes.
//!
//! ```text
//! cargo run --example subscribers_api [config.yaml]
//! ```

use crudkit::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AppConfig::from_yaml_file(&path)?,
        None => AppConfig::default_config(),
    };
    let bind = config.bind.clone();

    println!("🚀 crudkit subscribers example\n");
    for resource in &config.resources {
        println!("  📦 /{} ({:?})", resource.plural, resource.auth);
        println!("    GET    /{}            - List", resource.plural);
        println!("    POST   /{}            - Create", resource.plural);
        println!("    GET    /{}/{{id}}       - Retrieve", resource.plural);
        println!("    PUT    /{}/{{id}}       - Replace", resource.plural);
        println!("    DELETE /{}/{{id}}       - Delete", resource.plural);
    }
    println!("\n  🔐 POST /auth    - Exchange username/password for a token");
    println!("  🔐 GET  /private - Requires Authorization: Bearer <token>");
    println!("\n🌐 Server running on http://{}\n", bind);

    ServerBuilder::new().with_config(config).serve(&bind).await
}
