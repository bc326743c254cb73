//! Basic usage of lorelei-config
//!
//! Builds a throwaway data directory, then walks through what the bot's
//! command handlers do with the three stores.
//!
//! Run with: cargo run --example basic_usage

use lorelei_config::{LANGUAGE_KEY, LANGUAGE_SECTION, Stores, StoresConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let data_dir = std::env::temp_dir().join("lorelei-config-demo");
    for sub in ["guilds", "users", "lang"] {
        std::fs::create_dir_all(data_dir.join(sub))?;
    }
    std::fs::write(
        data_dir.join("lang").join("en.toml"),
        "[Responds]\ngreeting = \"hi\"\nsaved = \"Setting saved.\"\n",
    )?;
    std::fs::write(
        data_dir.join("lang").join("cs.toml"),
        "[Responds]\ngreeting = \"ahoj\"\n",
    )?;

    let stores = Stores::open(&StoresConfig::new().data_dir(&data_dir))?;
    println!("Languages: {:?}", stores.available_languages());

    let guild_id: u64 = 1_100_000_000_000_000_001;
    let user_id: u64 = 420;

    // /config security anti-invite true
    stores.guilds.set(guild_id, "Security", "anti-invite", true)?;
    println!("{}", stores.localized_text(user_id, "Responds", "saved")?);

    // on_message
    let block = stores
        .guilds
        .get_bool(guild_id, "Security", "anti-invite")?
        .unwrap_or(false);
    println!("Block invites in {guild_id}: {block}");

    // /settings language cs
    stores.users.set(user_id, LANGUAGE_SECTION, LANGUAGE_KEY, "cs")?;
    println!("Greeting: {}", stores.localized_text(user_id, "Responds", "greeting")?);
    // Not translated to Czech, comes from en.toml
    println!("Saved: {}", stores.localized_text(user_id, "Responds", "saved")?);

    // /config security anti-invite reset
    stores.guilds.delete_key(guild_id, "Security", "anti-invite")?;
    println!("Guild records left: {}", stores.guilds.len());

    std::fs::remove_dir_all(&data_dir)?;
    Ok(())
}
