//! CLI integration tests against the file-backed store.

mod common;

use std::path::Path;

use tempfile::TempDir;
use url::Url;

use common::{run_cli_with_env, run_cli_with_env_success};

fn file_store_url(path: &Path) -> String {
    Url::from_directory_path(path)
        .expect("Failed to convert path to file URL")
        .to_string()
}

/// Set up an isolated store with a signed-in admin session.
fn setup() -> (TempDir, String, std::path::PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store-root");
    std::fs::create_dir_all(&store_path).unwrap();
    let store_url = file_store_url(&store_path);
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();

    run_cli_with_env_success(
        &[
            "auth",
            "signup",
            "--store",
            &store_url,
            "--password",
            "test-password",
            "admin@salon.test",
        ],
        &home,
        &store_url,
    );
    run_cli_with_env_success(
        &[
            "auth",
            "login",
            "--store",
            &store_url,
            "--identifier",
            "admin@salon.test",
            "--password",
            "test-password",
        ],
        &home,
        &store_url,
    );

    (temp_dir, store_url, home)
}

fn add_service(home: &Path, store_url: &str, name: &str, price: &str, duration: &str) {
    run_cli_with_env_success(
        &[
            "services",
            "add",
            "--name",
            name,
            "--description",
            "Integration test service description",
            "--price",
            price,
            "--duration",
            duration,
            "--category",
            "cut",
        ],
        home,
        store_url,
    );
}

#[test]
fn test_signup_prints_uid() {
    let temp_dir = TempDir::new().unwrap();
    let store_path = temp_dir.path().join("store-root");
    std::fs::create_dir_all(&store_path).unwrap();
    let store_url = file_store_url(&store_path);
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();

    let output = run_cli_with_env(
        &[
            "auth",
            "signup",
            "--store",
            &store_url,
            "--password",
            "test-password",
            "alice@salon.test",
        ],
        &home,
        &store_url,
    );

    assert!(
        output.status.success(),
        "Signup failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("alice@salon.test"));
    assert!(stdout.contains("Uid"));
}

#[test]
fn test_login_with_wrong_password_fails() {
    let (_temp, store_url, home) = setup();

    let output = run_cli_with_env(
        &[
            "auth",
            "login",
            "--store",
            &store_url,
            "--identifier",
            "admin@salon.test",
            "--password",
            "wrong",
        ],
        &home,
        &store_url,
    );

    assert!(!output.status.success());
}

#[test]
fn test_add_and_list_services() {
    let (_temp, store_url, home) = setup();

    add_service(&home, &store_url, "Cut & blow-dry", "32", "45");
    add_service(&home, &store_url, "Balayage", "120", "150");

    let stdout = run_cli_with_env_success(&["services", "list"], &home, &store_url);

    assert!(stdout.contains("Cut & blow-dry"));
    assert!(stdout.contains("Balayage"));
    // Default store-side order is by name.
    let balayage = stdout.find("Balayage").unwrap();
    let cut = stdout.find("Cut & blow-dry").unwrap();
    assert!(balayage < cut);
}

#[test]
fn test_add_rejects_invalid_draft_without_writing() {
    let (_temp, store_url, home) = setup();

    let output = run_cli_with_env(
        &[
            "services",
            "add",
            "--name",
            "X",
            "--description",
            "short",
            "--price",
            "-5",
            "--duration",
            "45",
            "--category",
            "cut",
        ],
        &home,
        &store_url,
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("price"));

    // Nothing was written to the store.
    let stdout = run_cli_with_env_success(&["services", "list"], &home, &store_url);
    assert!(stdout.contains("No records found.") || !stdout.contains("X"));
}

#[test]
fn test_edit_merges_fields() {
    let (_temp, store_url, home) = setup();

    add_service(&home, &store_url, "Cut", "30", "45");

    let json =
        run_cli_with_env_success(&["services", "list", "--json"], &home, &store_url);
    let services: serde_json::Value = serde_json::from_str(&json).unwrap();
    let id = services[0]["id"].as_str().unwrap().to_string();

    run_cli_with_env_success(
        &["services", "edit", &id, "--price", "35"],
        &home,
        &store_url,
    );

    let json =
        run_cli_with_env_success(&["services", "list", "--json"], &home, &store_url);
    let services: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(services[0]["price"].as_f64(), Some(35.0));
    // Unspecified fields were retained by the merge.
    assert_eq!(services[0]["name"].as_str(), Some("Cut"));
    assert_eq!(services[0]["duration"].as_i64(), Some(45));
}

#[test]
fn test_delete_requires_confirmation_and_removes_row() {
    let (_temp, store_url, home) = setup();

    add_service(&home, &store_url, "Doomed", "30", "45");

    let json =
        run_cli_with_env_success(&["services", "list", "--json"], &home, &store_url);
    let services: serde_json::Value = serde_json::from_str(&json).unwrap();
    let id = services[0]["id"].as_str().unwrap().to_string();

    run_cli_with_env_success(
        &["services", "delete", &id, "--yes"],
        &home,
        &store_url,
    );

    let stdout = run_cli_with_env_success(&["services", "list"], &home, &store_url);
    assert!(!stdout.contains("Doomed"));
}

#[test]
fn test_catalog_filters_and_sorts() {
    let (_temp, store_url, home) = setup();

    add_service(&home, &store_url, "A", "10", "30");
    add_service(&home, &store_url, "B", "50", "60");
    add_service(&home, &store_url, "C", "30", "45");

    // Price window plus price sort keeps A and C, in that order.
    let stdout = run_cli_with_env_success(
        &[
            "catalog",
            "--price-min",
            "0",
            "--price-max",
            "40",
            "--sort",
            "price",
        ],
        &home,
        &store_url,
    );
    assert!(stdout.contains('A'));
    assert!(stdout.contains('C'));
    assert!(!stdout.contains("B "));

    // Case-insensitive search.
    let stdout =
        run_cli_with_env_success(&["catalog", "--search", "b"], &home, &store_url);
    assert!(stdout.contains('B'));
    assert!(!stdout.contains("A "));
}

#[test]
fn test_catalog_csv_export() {
    let (_temp, store_url, home) = setup();

    add_service(&home, &store_url, "Cut", "30", "45");

    let stdout = run_cli_with_env_success(
        &["catalog", "--export", "csv"],
        &home,
        &store_url,
    );

    let mut lines = stdout.lines();
    assert_eq!(
        lines.next(),
        Some("name,category,subcategory,price,salePrice,duration")
    );
    assert_eq!(lines.next(), Some("Cut,cut,,30,,45"));
}

#[test]
fn test_blog_post_gets_slug_and_publish_date() {
    let (_temp, store_url, home) = setup();

    run_cli_with_env_success(
        &[
            "blog",
            "add",
            "--title",
            "Summer Hair Trends 2025!",
            "--content",
            "A long enough body about summer hair trends, repeated to pass validation checks.",
        ],
        &home,
        &store_url,
    );

    let json = run_cli_with_env_success(&["blog", "list", "--json"], &home, &store_url);
    let posts: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        posts[0]["slug"].as_str(),
        Some("summer-hair-trends-2025")
    );
    // The store resolved the publish date at write time.
    let publish_date = posts[0]["publishDate"].as_str().unwrap();
    assert!(publish_date.contains('T'));
}

#[test]
fn test_hours_prints_a_status() {
    let temp_dir = TempDir::new().unwrap();
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    let store_url = file_store_url(temp_dir.path());

    let stdout = run_cli_with_env_success(&["hours"], &home, &store_url);
    assert!(stdout.contains("currently"));
}

#[test]
fn test_gallery_rotation_is_deterministic_within_a_day() {
    let temp_dir = TempDir::new().unwrap();
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    let store_url = file_store_url(temp_dir.path());

    let first = run_cli_with_env_success(&["gallery", "--json"], &home, &store_url);
    let second = run_cli_with_env_success(&["gallery", "--json"], &home, &store_url);
    assert_eq!(first, second);

    let images: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(images.as_array().unwrap().len(), 6);
}

#[test]
fn test_book_rate_limits_repeat_reservations() {
    let temp_dir = TempDir::new().unwrap();
    let home = temp_dir.path().join("home");
    std::fs::create_dir_all(&home).unwrap();
    let store_url = file_store_url(temp_dir.path());

    let first = run_cli_with_env(&["book"], &home, &store_url);
    assert!(first.status.success());
    assert!(
        String::from_utf8_lossy(&first.stdout).contains("https://")
    );

    // Immediately booking again trips the 10-second limit.
    let second = run_cli_with_env(&["book"], &home, &store_url);
    assert!(!second.status.success());
}
