use focusroom_core::Config;

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = Config::load_or_default().catalog()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&catalog)?);
        return Ok(());
    }
    for preset in catalog.iter() {
        println!("{:>4} min  {}", preset.minutes, preset.label);
    }
    Ok(())
}
