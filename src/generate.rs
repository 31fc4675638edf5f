use std::fs::{self, File};
use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use schemars::schema_for;
use waypoint_trainer::cli::Args;
use waypoint_trainer::config::path::get_schema_path;
use waypoint_trainer::config::TrainerConfig;
use waypoint_trainer::constants::APP_NAME;

fn main() {
    let schema_dir = get_schema_path();
    fs::create_dir_all(&schema_dir).expect("Failed to create schema directory");
    let config_schema = schema_for!(TrainerConfig);
    let mut file =
        File::create(schema_dir.join("config_v1.json")).expect("Failed to create schema file");
    write!(
        file,
        "{}",
        serde_json::to_string_pretty(&config_schema).unwrap()
    )
    .expect("Failed to write schema");

    let completions_dir = "./rootfs/usr/share/waypoint-trainer/completions";
    fs::create_dir_all(completions_dir).expect("Failed to create completions directory");
    let mut cmd = Args::command();
    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish] {
        generate_to(shell, &mut cmd, APP_NAME, completions_dir)
            .expect("Failed to write shell completions");
    }
}
