use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;
use tempfile::tempdir;

const FULL_INVOICE: &str = r#"fill influencer "Asha Rao" "12 MG Road, Pune" 9876543210
fill campaign Meera https://instagram.com/asha.creates "Glow Co" Sunscreen - March 2025
fill financial INV-001 25000 2500 yes 27ABCDE1234F1Z5 18
fill bank "Asha Rao" 123456789012 123456789012 "HDFC Bank" HDFC0001234 ABCDE1234F "Koregaon Park"
preview
export
exit
"#;

fn cli(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("invoice_core_cli").unwrap();
    cmd.env("INVOICE_CORE_CLI_SCRIPT", "1")
        .env("INVOICE_CORE_HOME", home)
        .env("NO_COLOR", "1");
    cmd
}

#[test]
fn script_mode_reports_status_and_help() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("status\nhelp\nexit\n")
        .assert()
        .success()
        .stdout(contains("Step 1 of 4: Influencer Details"))
        .stdout(contains("Available commands"))
        .stdout(contains("set-financial"));
}

#[test]
fn unknown_command_gets_a_suggestion() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("stauts\nexit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `stauts`"))
        .stdout(contains("Suggestion: `status`?"));
}

#[test]
fn full_invoice_is_exported_and_submitted() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin(FULL_INVOICE)
        .assert()
        .success()
        .stdout(contains("INFLUENCER INVOICE"))
        .stdout(contains("PDF Downloaded"))
        .stdout(contains("Invoice Submitted Successfully"))
        .stdout(contains("₹32000.00"));

    let exports: Vec<_> = std::fs::read_dir(home.path().join("exports"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(exports.len(), 1);
    assert!(exports[0].starts_with("Invoice_Glow Co_"));
    assert!(!home
        .path()
        .join("local_storage/invoice_form_data.json")
        .exists());
}

#[test]
fn saved_draft_is_restored_on_next_run() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("fill influencer \"Asha Rao\" \"12 MG Road, Pune\" 9876543210\nexit\n")
        .assert()
        .success()
        .stdout(contains("Influencer Details saved."));

    cli(home.path())
        .write_stdin("status\nexit\n")
        .assert()
        .success()
        .stdout(contains("Restored saved invoice draft."))
        .stdout(contains("complete"));
}

#[test]
fn dashboards_require_sign_in() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin("dashboard admin\nlogin staff@example.com staff\ndashboard admin\nwhoami\nexit\n")
        .assert()
        .success()
        .stdout(contains("Sign in required."))
        .stdout(contains("Redirecting to /staff."))
        .stdout(contains("Staff Dashboard"))
        .stdout(contains("staff@example.com"))
        .stdout(contains("Admin Dashboard").not());
}

#[test]
fn non_finite_tax_percentage_is_rejected_and_draft_survives() {
    let home = tempdir().unwrap();
    cli(home.path())
        .write_stdin(concat!(
            "# influencer first\n",
            "fill influencer \"Asha Rao\" \"12 MG Road, Pune\" 9876543210\n",
            "set-financial tax-percentage nan\n",
            "set-financial reimbursement inf\n",
            "exit\n",
        ))
        .assert()
        .success()
        .stdout(contains("invalid tax percentage `nan`"))
        .stdout(contains("Total: ₹0.00"));

    cli(home.path())
        .write_stdin("status\nexit\n")
        .assert()
        .success()
        .stdout(contains("Restored saved invoice draft."));
}
