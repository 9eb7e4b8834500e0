use gitsync::prelude::*;
use gitsync::{App, parse_source_with_imports};

#[test]
fn test_parse_str_and_wrap() {
    let config = parse_str(
        "Caddyfile",
        r#"
git {
  repo authp.github.io {
    url https://github.com/authp/authp.github.io.git
    auth username foo password bar
  }
}"#,
    )
    .unwrap();

    assert_eq!(
        config.repositories[0].auth,
        Some(AuthConfig::username_password("foo", "bar"))
    );

    let app = App::new(config.clone()).unwrap();
    assert_eq!(app.name, "git");
    assert_eq!(
        app.value["config"]["repositories"][0]["auth"],
        serde_json::json!({ "username": "foo", "password": "bar" })
    );
    assert_eq!(app.config().unwrap(), config);
}

#[test]
fn test_errors_carry_file_name_and_chain() {
    let err = parse_source_with_imports("sites/git.caddy", "git {\n  repo a {\n    url\n  }\n}", ["Caddyfile:3"])
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "sites/git.caddy:3 - Error during parsing: too few args for \"url\" directive (config: 0, min: 1), import chain: ['Caddyfile:3']"
    );
}
