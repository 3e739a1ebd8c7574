//! The `gavel validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(testcase_path: PathBuf) -> Result<()> {
    let cases = if testcase_path.is_dir() {
        gavel_core::parser::load_testcase_directory(&testcase_path)?
    } else {
        vec![gavel_core::parser::parse_test_case(&testcase_path)?]
    };

    let mut total_warnings = 0;

    for case in &cases {
        println!(
            "Test case: {} ({} criteria, threshold {})",
            case.name,
            case.rubric.len(),
            case.pass_threshold
        );

        let warnings = gavel_core::parser::validate_test_case(case);
        for w in &warnings {
            let prefix = w
                .criterion
                .as_ref()
                .map(|name| format!("  [{name}]"))
                .unwrap_or_else(|| "  ".to_string());
            println!("{prefix} WARNING: {}", w.message);
        }
        total_warnings += warnings.len();
    }

    if total_warnings == 0 {
        println!("All test cases valid.");
    } else {
        println!("\n{total_warnings} warning(s) found.");
    }

    Ok(())
}
