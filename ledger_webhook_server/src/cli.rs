use std::{env, env::VarError};

/// There's no real CLI for the server, so just do quick 'n dirty
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        // We don't expect any CLI args, so always print the help
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Be explicit about which envars to print, so as to avoid accidentally exposing secrets
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "LWG_HOST",
        "LWG_PORT",
        "LWG_DATABASE_URL",
        "LWG_WEBHOOK_HMAC_HEADER",
        "LWG_WEBHOOK_HMAC_CHECKS",
        "LWG_WEBHOOK_IP_WHITELIST",
        "LWG_OAUTH_TOKEN_URL",
        "LWG_OAUTH_REVOCATION_URL",
        "LWG_OAUTH_TIMEOUT",
        "LWG_REFRESH_INTERVAL",
        "LWG_REFRESH_MARGIN",
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
