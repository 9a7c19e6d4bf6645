mod common;

use std::fs;

use assert_cmd::Command;
use common::temp_home;
use predicates::str::contains;

fn shell(home: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("expense_core_cli").unwrap();
    cmd.env("EXPENSE_CORE_CLI_SCRIPT", "1")
        .env("EXPENSE_CORE_HOME", home);
    cmd
}

#[test]
fn script_mode_adds_and_lists_expenses() {
    let home = temp_home();
    let input = "user alice\n\
                 add \"Bought pizza for dinner\" 12.5 --date 2024-03-15 --category Food\n\
                 list\n\
                 exit\n";

    shell(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Expense added: Bought pizza for dinner $12.50 [Food]"))
        .stdout(contains("2024-03-15"));

    let csv = fs::read_to_string(home.join("expenses.csv")).unwrap();
    assert!(csv.starts_with("User,Date,Description,Amount,Currency,Category,Receipt"));
    assert!(csv.contains("alice,2024-03-15,Bought pizza for dinner,12.5,USD,Food,"));
}

#[test]
fn add_falls_back_to_others_without_a_model() {
    let home = temp_home();
    shell(&home)
        .write_stdin("user bob\nadd \"Mystery purchase\" 9 --date 2024-01-01\n")
        .assert()
        .success()
        .stdout(contains("No category suggestion available"))
        .stdout(contains("[Others]"));
}

#[test]
fn train_then_suggest_and_auto_categorise() {
    let home = temp_home();
    shell(&home)
        .write_stdin(
            "train\n\
             suggest Bought pizza for dinner\n\
             user carol\n\
             add \"Bought pizza for dinner\" 20 --date 2024-02-02\n",
        )
        .assert()
        .success()
        .stdout(contains("Classifier trained on 8 examples"))
        .stdout(contains("Suggested category: Food"))
        .stdout(contains("[Food]"));
}

#[test]
fn summary_and_trend_report_monthly_totals() {
    let home = temp_home();
    shell(&home)
        .write_stdin(
            "user dana\n\
             add Pizza 10 --date 2024-01-03 --category Food\n\
             add Salad 5 --date 2024-01-09 --category Food\n\
             add Sandwich 3 --date 2024-02-01 --category Food\n\
             summary 2024-01\n\
             trend\n",
        )
        .assert()
        .success()
        .stdout(contains("Expense Breakdown for 2024-01"))
        .stdout(contains("Food: 2024-01 15.00, 2024-02 3.00"));
}

#[test]
fn receipts_are_copied_per_user() {
    let home = temp_home();
    let upload = home.join("scan.png");
    fs::write(&upload, b"fake png").unwrap();

    shell(&home)
        .write_stdin(format!(
            "user erin\nadd Taxi 30 --date 2024-04-01 --category Transport --receipt {}\nreceipts\n",
            upload.display()
        ))
        .assert()
        .success()
        .stdout(contains("scan.png"));

    let stored = home.join("receipts").join("erin").join("scan.png");
    assert_eq!(fs::read(stored).unwrap(), b"fake png");
}

#[test]
fn export_writes_only_the_active_users_rows() {
    let home = temp_home();
    let out = home.join("export.csv");
    shell(&home)
        .write_stdin(format!(
            "user frank\nadd Bus 2 --date 2024-01-01 --category Transport\n\
             user gina\nadd Gym 40 --date 2024-01-02 --category Health\n\
             export {}\n",
            out.display()
        ))
        .assert()
        .success()
        .stdout(contains("Exported 1 expenses"));

    let exported = fs::read_to_string(out).unwrap();
    assert!(exported.contains("gina"));
    assert!(!exported.contains("frank"));
}

#[test]
fn clear_in_script_mode_deletes_everything() {
    let home = temp_home();
    shell(&home)
        .write_stdin("user hal\nadd Bus 2 --date 2024-01-01 --category Transport\nclear\nclear\nlist\n")
        .assert()
        .success()
        .stdout(contains("All expenses deleted permanently!"))
        .stdout(contains("No expenses recorded."));
    assert!(!home.join("expenses.csv").exists());
}

#[test]
fn unknown_commands_get_a_suggestion() {
    let home = temp_home();
    shell(&home)
        .write_stdin("lsit\n")
        .assert()
        .success()
        .stdout(contains("Unknown command `lsit`"))
        .stdout(contains("Suggestion: `list`?"));
}

#[test]
fn failed_insert_leaves_no_orphaned_receipt() {
    let home = temp_home();
    fs::write(home.join("blocker"), b"not a directory").unwrap();
    fs::write(
        home.join("config.json"),
        r#"{ "ledger_file": "blocker/expenses.csv" }"#,
    )
    .unwrap();
    let upload = home.join("scan.png");
    fs::write(&upload, b"fake png").unwrap();

    shell(&home)
        .write_stdin(format!(
            "user ivy\nadd Taxi 30 --date 2024-04-01 --category Transport --receipt {}\nlist\n",
            upload.display()
        ))
        .assert()
        .success()
        .stdout(contains("No expenses recorded."));

    assert!(!home.join("receipts").join("ivy").join("scan.png").exists());
}
