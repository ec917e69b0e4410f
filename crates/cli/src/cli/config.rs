use dc_domain::config::Config;

/// Dump the resolved config (with all defaults filled in) as TOML.
pub fn show(config: &Config, config_path: &str) -> anyhow::Result<()> {
    let output = toml::to_string_pretty(config)
        .map_err(|e| anyhow::anyhow!("serializing config: {e}"))?;
    println!("# resolved from {config_path} (defaults applied)");
    print!("{output}");
    Ok(())
}
