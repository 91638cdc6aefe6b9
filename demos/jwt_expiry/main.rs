//! Token expiry example
//!
//! Issues a token that lives for two seconds, waits ten, then tries to
//! verify it.

use chrono::Duration;
use crudkit::prelude::*;
use serde_json::json;

const SECRET_KEY: &str = "SUPERSECRET";

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let issuer = TokenIssuer::new(SECRET_KEY);

    let mut claims = Claims::new();
    claims.insert("uid".into(), json!(23));
    claims.insert("name".into(), json!("mungbean"));

    let token = issuer.issue(claims, Duration::seconds(2))?;
    println!("Generated Token: {}", token);
    println!("Decoded right away: {:?}", issuer.verify(&token)?);

    // Wait long enough for the token to expire
    tokio::time::sleep(std::time::Duration::from_secs(10)).await;

    match issuer.verify(&token) {
        Ok(claims) => println!("Unexpectedly still valid: {:?}", claims),
        Err(AuthError::Expired) => println!("Token expired, as expected"),
        Err(e) => println!("Verification failed: {}", e),
    }

    Ok(())
}
