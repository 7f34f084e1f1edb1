//! `pagewright make-input` command: write a starter run-input file.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::Local;

use crate::config::{RunConfig, RunInput};
use crate::error::Result;

/// Execute the `make-input` command: writes a starter run-input JSON file
/// and echoes it to the console for editing.
///
/// # Errors
///
/// Fails if the file cannot be written.
pub fn run(output: &Path) -> Result<()> {
    let input = starter_input();
    let rendered = serde_json::to_string_pretty(&input)?;
    fs::write(output, &rendered)?;
    println!("{rendered}");
    Ok(())
}

fn starter_input() -> RunInput {
    RunInput {
        config: RunConfig {
            // Page ids come from the wiki's page URLs; these are samples.
            template_page_id: 61_210_645,
            parent_page_id: 61_210_633,
            spacekey: None,
            test_mode: false,
            sprint_count: None,
            project: Some("GEAR".to_owned()),
            build_type_id: None,
            build_server: None,
        },
        variables: BTreeMap::from([
            ("REVIEW_DATE".to_owned(), Local::now().format("%Y-%m-%d").to_string()),
            ("RELEASE_VERSION".to_owned(), "4.8.0".to_owned()),
        ]),
    }
}
