use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};
use regula_core::config::Config;

const BANNER: &str = r"
    -------------------------------------

    regula — compliance assistant

    -------------------------------------
";

fn print_step(step: usize, total: usize, title: &str) {
    println!();
    println!(
        "{}",
        style(format!("[{}/{}] {}", step, total, title))
            .cyan()
            .bold()
    );
    println!();
}

fn setup_api_key() -> Result<String> {
    let api_key: String = Input::new()
        .with_prompt("Enter your OpenAI API key (leave empty to use OPENAI_API_KEY)")
        .allow_empty(true)
        .interact_text()
        .context("Failed to read API key")?;

    Ok(api_key)
}

fn setup_model() -> Result<String> {
    let models = vec!["gpt-4", "gpt-4o", "gpt-4o-mini"];

    let selection = Select::new()
        .with_prompt("Select your model")
        .items(&models)
        .default(0)
        .interact()
        .context("Failed to select model")?;

    Ok(models[selection].to_string())
}

pub fn run_onboard() -> Result<Config> {
    println!("{}", style(BANNER).cyan().bold());

    println!("  {}", style("Welcome to regula!").white().bold());
    println!(
        "  {}",
        style("This wizard will configure your assistant in under 30 seconds.").dim()
    );
    println!();

    print_step(1, 2, "API Key Setup");
    let api_key = setup_api_key()?;

    print_step(2, 2, "Model Selection");
    let model = setup_model()?;

    let config = Config {
        api_key,
        model,
        ..Default::default()
    };

    println!();
    println!("  {} Configuration complete!", style("✓").green().bold());
    println!(
        "  {} Config saved to {}",
        style("→").green(),
        style(regula_core::config::get_config_path().display()).cyan()
    );
    println!(
        "  {} Login password comes from the APP_PASSWORD environment variable.",
        style("→").green()
    );
    println!();
    println!(
        "  {} You can now run: {}",
        style("→").green(),
        style("regula ask").cyan().bold()
    );
    println!();

    Ok(config)
}
