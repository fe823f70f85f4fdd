use std::path::Path;

use anyhow::{Context, Result};
use noirdeck_core::deck::Deck;

pub fn run(path: &Path) -> Result<()> {
    let deck = Deck::load(path).with_context(|| format!("invalid deck {}", path.display()))?;

    println!("{}: \"{}\"", path.display(), deck.title);
    println!("  Screens: {}", deck.len());

    for (idx, screen) in deck.screens.iter().enumerate() {
        let tiers = screen.fragments.iter().filter(|f| f.tier.is_some()).count();
        let hints = screen.fragments.iter().filter(|f| f.is_hint()).count();
        println!(
            "  [{}] {} fragments ({} tiered, {} hints)",
            idx + 1,
            screen.fragments.len(),
            tiers,
            hints
        );
    }

    match &deck.audio {
        Some(audio) if audio.exists() => println!("  Audio: {}", audio.display()),
        Some(audio) => println!("  Audio: {} (missing, playback will be skipped)", audio.display()),
        None => println!("  Audio: none"),
    }

    if deck.len() < 2 {
        println!("\nNote: a single-screen deck never advances.");
    }

    Ok(())
}
