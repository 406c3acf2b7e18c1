//! `cogwork tools` — List the default tool catalog.

pub async fn run() -> anyhow::Result<()> {
    let catalog = cogwork_tools::default_catalog();

    println!("Cogwork Tools ({} registered)", catalog.len());
    println!("=============================");
    for descriptor in catalog.descriptors() {
        println!("  {}", descriptor.render());
    }

    Ok(())
}
