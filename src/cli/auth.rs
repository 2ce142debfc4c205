use crate::core::preferences::Preferences;
use anyhow::Result;
use tracing::debug;

pub async fn login(prefs: &Preferences, token: &str) -> Result<()> {
    if token.trim().is_empty() {
        anyhow::bail!("Token must not be empty");
    }
    prefs.set_credential(token).await?;
    debug!("Credential saved");
    println!("Logged in. Predictions will use the remote model.");
    Ok(())
}

pub async fn logout(prefs: &Preferences) -> Result<()> {
    prefs.clear_credential().await?;
    debug!("Credential removed");
    println!("Logged out. Predictions will use the demo heuristic.");
    Ok(())
}
