use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use noirdeck_core::deck::{Deck, Fragment};
use noirdeck_core::reveal::{Choreographer, RevealClass};
use noirdeck_core::AppConfig;

use super::load_deck;

pub fn run(config: &AppConfig, path: Option<&Path>) -> Result<()> {
    let deck = load_deck(config, path)?;
    let timing = &config.timing;

    println!("\"{}\" ({} screens)", deck.title, deck.len());
    println!(
        "Transitions: fade out {}, settle {}\n",
        secs(timing.fade_out()),
        secs(timing.settle())
    );

    for line in timeline_lines(&deck, config) {
        println!("{}", line);
    }

    Ok(())
}

/// One line per fragment: reveal time after the screen arrives, then the text
pub fn timeline_lines(deck: &Deck, config: &AppConfig) -> Vec<String> {
    let choreographer = Choreographer::new(config.timing.reveal_timings());
    let mut lines = Vec::new();

    for (idx, screen) in deck.screens.iter().enumerate() {
        lines.push(format!("Screen {}", idx + 1));
        // The first screen waits out the intro delay at launch
        let offset = if idx == 0 {
            config.timing.intro_delay()
        } else {
            Duration::ZERO
        };
        for fragment in &screen.fragments {
            let class = fragment.reveal_class();
            let at = offset + choreographer.delay_for(class, idx);
            lines.push(format!("  +{:>6}  {:<8} {}", secs(at), label(class), preview(fragment)));
        }
    }

    lines
}

fn secs(d: Duration) -> String {
    format!("{:.2}s", d.as_secs_f64())
}

fn label(class: RevealClass) -> String {
    match class {
        RevealClass::Tier(k) => format!("tier {}", k),
        RevealClass::Hint => "hint".to_string(),
        RevealClass::Default => "-".to_string(),
    }
}

fn preview(fragment: &Fragment) -> String {
    const MAX: usize = 48;
    if fragment.text.chars().count() <= MAX {
        fragment.text.clone()
    } else {
        let truncated: String = fragment.text.chars().take(MAX - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeline_uses_reveal_rules() {
        let deck = Deck::from_toml(
            r#"
            [[screens]]
            [[screens.fragments]]
            text = "opening"

            [[screens]]
            [[screens.fragments]]
            text = "plain"
            [[screens.fragments]]
            text = "later"
            class = "delay-2"
            [[screens.fragments]]
            text = "tap"
            class = "tap-hint"
            "#,
        )
        .unwrap();

        let lines = timeline_lines(&deck, &AppConfig::default());
        assert_eq!(lines[0], "Screen 1");
        assert!(lines[1].contains("0.80s") && lines[1].ends_with("opening"));
        assert_eq!(lines[2], "Screen 2");
        assert!(lines[3].contains("0.60s"));
        assert!(lines[4].contains("2.90s") && lines[4].contains("tier 2"));
        assert!(lines[5].contains("4.00s") && lines[5].contains("hint"));
    }

    #[test]
    fn test_preview_truncates() {
        let fragment = Fragment::new("x".repeat(100), Default::default(), None);
        assert_eq!(preview(&fragment).chars().count(), 48);
    }
}
