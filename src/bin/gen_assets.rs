//! Writes a placeholder for every asset the game looks up, so a fresh checkout
//! has something to draw and play.

#[allow(dead_code)]
#[path = "../asset_gen.rs"]
mod asset_gen;

use std::path::Path;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dir = std::env::args().nth(1).unwrap_or_else(|| "assets".to_string());
    let written = asset_gen::write_placeholder_set(Path::new(&dir))?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    println!("{} placeholder assets in {dir}", written.len());
    Ok(())
}
