use std::path::Path;
use std::process::{Command, Output};

/// `file://` store URL for a directory.
pub fn store_url(dir: &Path) -> String {
    url::Url::from_directory_path(dir)
        .expect("absolute directory path")
        .to_string()
}

/// Run the CLI binary with arguments.
pub fn run_cli(args: &[&str]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_mergulho"));
    cmd.args(args);
    cmd.env_remove("MERGULHO_STORE");
    cmd.env_remove("MERGULHO_PROJECT");
    cmd.env_remove("RUST_LOG");
    cmd.output().expect("Failed to execute CLI")
}

/// Run the CLI and expect success.
pub fn run_cli_success(args: &[&str]) -> String {
    let output = run_cli(args);
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("CLI command failed: {:?}\nstderr: {}", args, stderr);
    }
    String::from_utf8_lossy(&output.stdout).to_string()
}
