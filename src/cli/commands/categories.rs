//! Inspect the category mapping.

use console::style;

use opensextant_tagger::services::tagging::resolve;
use opensextant_tagger::services::tagging::type_map::{is_known_category, KNOWN_CATEGORIES};

fn describe(category: &str) -> String {
    match resolve(category) {
        Some((et, mt)) => format!("{} {}", style(et).green(), style(mt).cyan()),
        None => style("-").dim().to_string(),
    }
}

pub fn cmd_resolve(categories: &[String]) -> anyhow::Result<()> {
    for category in categories {
        let marker = if is_known_category(category) {
            String::new()
        } else {
            format!(" {}", style("(not in taxonomy)").yellow())
        };
        println!("{:<50} {}{}", category, describe(category), marker);
    }
    Ok(())
}

pub fn cmd_categories(mapped_only: bool) -> anyhow::Result<()> {
    let mut shown = 0usize;
    for category in KNOWN_CATEGORIES {
        if mapped_only && resolve(category).is_none() {
            continue;
        }
        println!("{:<50} {}", category, describe(category));
        shown += 1;
    }
    println!(
        "\n{} of {} categories",
        style(shown).bold(),
        KNOWN_CATEGORIES.len()
    );
    Ok(())
}
