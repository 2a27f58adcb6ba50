//! Session command handlers.

use anyhow::{Context, Result};

use crate::store::{FileSessionStore, SessionStore};

pub fn show() -> Result<()> {
    let store = FileSessionStore::default_location();
    match store.get().context("load session")? {
        Some(blob) => {
            println!(
                "{}",
                serde_json::to_string_pretty(&blob).context("format session")?
            );
        }
        None => println!("No session stored."),
    }
    Ok(())
}

pub fn clear() -> Result<()> {
    let store = FileSessionStore::default_location();
    store.clear().context("clear session")?;
    println!("Session cleared.");
    Ok(())
}
