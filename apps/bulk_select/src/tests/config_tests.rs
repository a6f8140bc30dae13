use super::*;

use std::{
    env,
    time::{SystemTime, UNIX_EPOCH},
};

use shared::domain::FilterKind;

fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn defaults_apply_without_file_or_environment() {
    let settings = resolve_settings(&HashMap::new(), &HashMap::new());
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.request_timeout(), Some(Duration::from_secs(30)));
}

#[test]
fn environment_overrides_the_settings_file() {
    let file_cfg = map(&[
        ("base_url", "https://file.example.edu/tool/"),
        ("resource_link_id", "from-file"),
        ("request_timeout_secs", "5"),
        ("seed_path", "seed.json"),
    ]);
    let env = map(&[
        ("APP__BASE_URL", "https://env.example.edu/tool/"),
        ("APP__CSRF_TOKEN", "token"),
        ("APP__REQUEST_TIMEOUT_SECS", "not-a-number"),
    ]);
    let settings = resolve_settings(&file_cfg, &env);

    assert_eq!(settings.base_url, "https://env.example.edu/tool/");
    assert_eq!(settings.resource_link_id.as_deref(), Some("from-file"));
    assert_eq!(settings.csrf_token.as_deref(), Some("token"));
    assert_eq!(settings.request_timeout_secs, 5);
    assert_eq!(settings.seed_path, Some(PathBuf::from("seed.json")));
}

#[test]
fn app_prefixed_base_url_wins_over_legacy_name() {
    let env = map(&[
        ("BULK_SELECT_BASE_URL", "https://legacy.example.edu/"),
        ("APP__BASE_URL", "https://app.example.edu/"),
    ]);
    assert_eq!(
        resolve_settings(&HashMap::new(), &env).base_url,
        "https://app.example.edu/"
    );
}

#[test]
fn blank_values_clear_optional_settings() {
    let file_cfg = map(&[("csrf_token", "file-token")]);
    let env = map(&[("APP__CSRF_TOKEN", "  "), ("APP__REQUEST_TIMEOUT_SECS", "0")]);
    let settings = resolve_settings(&file_cfg, &env);
    assert_eq!(settings.csrf_token, None);
    assert_eq!(settings.request_timeout(), None);
}

#[test]
fn missing_seed_path_yields_an_empty_seed() {
    let seed = load_seed(None).expect("empty seed");
    assert_eq!(seed, PageSeed::default());
}

#[test]
fn seed_file_is_parsed_and_errors_name_the_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("bulk_select_seed_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");

    let good = temp_root.join("seed.json");
    fs::write(
        &good,
        r#"{"filters": {"school": "school:fas"}, "schools": [{"id": "school:fas", "name": "FAS"}]}"#,
    )
    .expect("write seed");
    let seed = load_seed(Some(&good)).expect("parse seed");
    assert_eq!(
        seed.filters.get(&FilterKind::School).map(String::as_str),
        Some("school:fas")
    );

    let bad = temp_root.join("broken.json");
    fs::write(&bad, "{not json").expect("write seed");
    let err = load_seed(Some(&bad)).expect_err("broken seed");
    assert!(format!("{err:#}").contains("broken.json"));

    let err = load_seed(Some(&temp_root.join("missing.json"))).expect_err("missing seed");
    assert!(err.to_string().contains("missing.json"));

    fs::remove_dir_all(temp_root).expect("cleanup");
}
