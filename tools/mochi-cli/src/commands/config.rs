//! Show or save the configuration.

use mochi_common::AppConfig;

pub fn run(config: AppConfig, save: bool) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&config)?);

    if save {
        let path = config.save()?;
        println!("Saved configuration to {}", path.display());
    } else {
        println!(
            "Config file: {}",
            mochi_common::config::config_file_path().display()
        );
    }

    Ok(())
}
