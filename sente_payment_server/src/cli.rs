use std::{env, env::VarError};

use momo_gateway::{MomoApi, MomoConfig};

/// There's no real CLI for the server, so just do quick 'n dirty argument handling.
/// Returns true when the process should exit instead of serving.
pub async fn handle_command_line_args() -> bool {
    let mut args = env::args().skip(1);
    match args.next().as_deref() {
        None => false,
        Some("provision") => {
            provision_sub_account().await;
            true
        },
        Some(_) => {
            // We only understand `provision`, so print the help for anything else
            display_readme();
            display_envs();
            true
        },
    }
}

/// One-shot provider sub-account provisioning: creates an api user, issues its key, and prints
/// both so they can be placed in the environment.
async fn provision_sub_account() {
    let config = MomoConfig::from_env_or_default();
    if config.subscription_key.reveal().is_empty() {
        eprintln!("SPG_MOMO_SUBSCRIPTION_KEY must be set before provisioning.");
        return;
    }
    let api = match MomoApi::new(config) {
        Ok(api) => api,
        Err(e) => {
            eprintln!("Could not initialize the provider client: {e}");
            return;
        },
    };
    match api.create_api_user().await {
        Ok(api_user) => match api.create_api_key(api_user).await {
            Ok(api_key) => {
                println!("Provisioned a provider sub-account. Add these to your environment:");
                println!("  SPG_MOMO_API_USER={api_user}");
                println!("  SPG_MOMO_API_KEY={api_key}");
                match api.fetch_api_user(api_user).await {
                    Ok(info) => println!(
                        "Provider environment: {} (callback host {})",
                        info.target_environment, info.provider_callback_host
                    ),
                    Err(e) => eprintln!("Could not read back the api user details: {e}"),
                }
            },
            Err(e) => eprintln!("Created api user {api_user}, but could not issue an API key: {e}"),
        },
        Err(e) => eprintln!("Could not create the provider api user: {e}"),
    }
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 11] = [
        "RUST_LOG",
        "SPG_HOST",
        "SPG_PORT",
        "SPG_DATABASE_URL",
        "SPG_POLL_INTERVAL_SECS",
        "SPG_MAX_POLL_FAILURES",
        "SPG_RATE_HBAR_USD",
        "SPG_RATE_USDC_USD",
        "SPG_RATE_CFA_USD",
        "SPG_MOMO_BASE_URL",
        "SPG_MOMO_TARGET_ENVIRONMENT",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
