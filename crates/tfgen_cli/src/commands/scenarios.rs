//! Scenarios command - list built-in demo descriptions.

use anyhow::Result;

use tfgen_pipeline::SCENARIOS;

pub fn execute() -> Result<()> {
    println!("Available scenarios:");
    println!();
    for (index, scenario) in SCENARIOS.iter().enumerate() {
        println!("{}. {} [{}]", index + 1, scenario.name, scenario.id);
        println!("   {}", scenario.headline());
    }
    println!();
    println!("Run one with: tfgen generate --scenario <id>");
    Ok(())
}
