//! Prints the JSON schema of `config.json`.

use anyhow::Result;

fn main() -> Result<()> {
    let schema = ezshot::Config::json_schema();
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}
