//! # Shell Completion Module
//!
//! ```bash
//! # Generate bash completions
//! autotracks completion bash > ~/.local/share/bash-completion/completions/autotracks
//!
//! # Generate zsh completions
//! autotracks completion zsh > ~/.config/zsh/completions/_autotracks
//! ```

use std::io::{self, Write};

use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};

use crate::cli::Shell;

/// Write completions for `cmd` to `out`.
pub fn write_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Generate shell completions for the given shell on stdout
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command) {
    write_completions(gen, cmd, &mut io::stdout());
}

#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Args;
    use clap::CommandFactory;

    #[test]
    fn test_shell_conversion() {
        assert_eq!(shell_to_completion_shell(Shell::Bash), CompletionShell::Bash);
        assert_eq!(shell_to_completion_shell(Shell::Fish), CompletionShell::Fish);
        assert_eq!(
            shell_to_completion_shell(Shell::PowerShell),
            CompletionShell::PowerShell
        );
    }

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut out = Vec::new();
        write_completions(CompletionShell::Bash, &mut Args::command(), &mut out);
        let script = String::from_utf8(out).unwrap();
        assert!(script.contains("autotracks"));
        assert!(script.contains("generate"));
        assert!(script.contains("analyse"));
    }
}
