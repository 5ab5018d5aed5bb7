/// Example program to print the loaded configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    let config = rune_config::RuneConfig::load();

    println!("=== Rune Transition Configuration ===\n");

    println!("Transition Defaults:");
    println!("  Delay (ms): {}", config.transition.delay_ms);
    println!("  Duration (ms): {}", config.transition.duration_ms);
    println!();

    println!("Diagnostics:");
    println!("  Configured: {:?}", config.diagnostics.enabled);
    println!("  Effective: {}", config.diagnostics.is_enabled());
    println!();

    println!("Driver:");
    println!("  Frame (ms): {}", config.demo.frame_ms);
    println!("  Script: {:?}", config.demo.script);
    println!();

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}
