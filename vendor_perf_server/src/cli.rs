use std::{env, env::VarError};

/// The server takes no arguments. Passing any at all prints the help text and the current configuration.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
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
    // VPM_JWT_SECRET is left out on purpose
    const DISPLAY_ENVS: [&str; 9] = [
        "RUST_LOG",
        "VPM_HOST",
        "VPM_PORT",
        "VPM_DATABASE_URL",
        "VPM_DB_MAX_CONNECTIONS",
        "VPM_AUTO_MIGRATE",
        "VPM_ACCESS_TOKEN_LIFETIME",
        "VPM_REFRESH_TOKEN_LIFETIME",
        "VPM_BCRYPT_COST",
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
