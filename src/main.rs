use log::debug;
use recipe_extract::fetch::fetch_html;
use recipe_extract::{EngineConfig, RecipeExtractor};
use std::env;
use std::fs;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let url = args
        .get(1)
        .ok_or("Usage: recipe-extract <url> [html-file]")?;

    // A saved page skips the network entirely
    let html = match args.get(2) {
        Some(path) => fs::read_to_string(path)?,
        None => fetch_html(url, None)?,
    };

    let config = EngineConfig::load()?;
    debug!("{:#?}", config);

    let result = RecipeExtractor::new(config).extract(url, &html);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
