//! Shell completion system for qbrgen

use clap::Command;
use clap_complete::{Generator, generate};
use std::path::PathBuf;

/// Generate shell completions for the given shell
pub fn print_completions<G: Generator>(generator: G, app: &mut Command) {
    generate(
        generator,
        app,
        app.get_name().to_string(),
        &mut std::io::stdout(),
    );
}

/// Install shell completion to standard system location
pub fn install_completion(shell: clap_complete::Shell) -> Result<String, String> {
    use std::fs;

    let completion_dir = get_completion_directory(shell)?;
    let filename = get_completion_filename(shell);
    let completion_path = completion_dir.join(filename);

    let completion_script = generate_completion_script(shell);

    fs::write(&completion_path, completion_script).map_err(|e| {
        format!(
            "Failed to write completion file to {}: {}",
            completion_path.display(),
            e
        )
    })?;

    let instructions = get_shell_setup_instructions(shell, &completion_path);
    Ok(format!(
        "Shell completion installed successfully!\n\n{instructions}"
    ))
}

/// Get the standard completion directory for a shell
fn get_completion_directory(shell: clap_complete::Shell) -> Result<PathBuf, String> {
    use std::fs;

    let home =
        std::env::var("HOME").map_err(|_| "HOME environment variable not set".to_string())?;

    match shell {
        clap_complete::Shell::Bash => {
            let path = PathBuf::from(format!(
                "{home}/.local/share/bash-completion/completions"
            ));
            fs::create_dir_all(&path)
                .map_err(|e| format!("Failed to create completion directory: {e}"))?;
            Ok(path)
        }
        clap_complete::Shell::Zsh => {
            let path = PathBuf::from(format!("{home}/.local/share/zsh/site-functions"));
            fs::create_dir_all(&path)
                .map_err(|e| format!("Failed to create completion directory: {e}"))?;
            Ok(path)
        }
        clap_complete::Shell::Fish => {
            let path = PathBuf::from(format!("{home}/.config/fish/completions"));
            fs::create_dir_all(&path)
                .map_err(|e| format!("Failed to create fish completions directory: {e}"))?;
            Ok(path)
        }
        clap_complete::Shell::PowerShell => Err(
            "PowerShell completion installation not supported. Use 'qbrgen completion-generate powershell' and add to your profile manually.".to_string(),
        ),
        clap_complete::Shell::Elvish => Err(
            "Elvish completion installation not supported. Use 'qbrgen completion-generate elvish' and add to rc.elv manually.".to_string(),
        ),
        _ => Err(format!("Unsupported shell: {shell:?}")),
    }
}

/// Get the standard filename for shell completions
fn get_completion_filename(shell: clap_complete::Shell) -> &'static str {
    match shell {
        clap_complete::Shell::Bash => "qbrgen",
        clap_complete::Shell::Zsh => "_qbrgen",
        clap_complete::Shell::Fish => "qbrgen.fish",
        _ => "qbrgen",
    }
}

/// Render the completion script to a string
fn generate_completion_script(shell: clap_complete::Shell) -> Vec<u8> {
    use clap::CommandFactory;

    let mut app = crate::ui::cli::Cli::command();
    let mut buffer = Vec::new();
    generate(shell, &mut app, "qbrgen".to_string(), &mut buffer);
    buffer
}

/// Post-install instructions per shell
fn get_shell_setup_instructions(shell: clap_complete::Shell, path: &std::path::Path) -> String {
    match shell {
        clap_complete::Shell::Bash => format!(
            "Completions written to {}.\nRestart your shell or run 'source ~/.bashrc' to activate.",
            path.display()
        ),
        clap_complete::Shell::Zsh => format!(
            "Completions written to {}.\nEnsure the directory is in your fpath, then restart your shell.",
            path.display()
        ),
        clap_complete::Shell::Fish => format!(
            "Completions written to {}.\nFish picks them up automatically on next start.",
            path.display()
        ),
        _ => format!("Completions written to {}.", path.display()),
    }
}
