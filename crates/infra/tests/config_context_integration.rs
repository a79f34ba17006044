//! Config file loading through to a wired pipeline context.

mod support;

use campuscal_common::testing::TempDir;
use campuscal_domain::{CacheKey, CampusCalError, SourceFormat};
use campuscal_infra::config::load_from_file;
use campuscal_infra::CampusCalContext;
use support::{titles, ACADEMIC_PAGE};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write_config(dir: &TempDir, sources_toml: &str) -> std::path::PathBuf {
    let db_path = dir.path().join("data").join("campuscal.db");
    let contents = format!(
        r#"
[database]
path = "{}"
pool_size = 2

[scrape]
ttl_seconds = 3600
request_timeout_seconds = 5
max_attempts = 2
user_agent = "campuscal-tests"
{sources_toml}
"#,
        db_path.display()
    );
    dir.create_file("campuscal.toml", &contents).expect("config file should be written")
}

#[tokio::test]
async fn context_from_file_scrapes_configured_source() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/calendar/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(ACADEMIC_PAGE))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new("campuscal-config").unwrap();
    let config_path = write_config(
        &dir,
        &format!(
            r#"
[[sources]]
key = "academic-events-last-saved"
url = "{}/calendar/"
format = "academic_html"
"#,
            server.uri()
        ),
    );

    let config = load_from_file(Some(&config_path)).unwrap();
    assert_eq!(config.scrape.ttl_seconds, 3600);

    let context = CampusCalContext::new(config).unwrap();
    assert_eq!(context.sources().len(), 1);
    assert!(context.source(&CacheKey::CAMPUS_EVENTS).is_none());

    let academic = context.source(&CacheKey::ACADEMIC_EVENTS).unwrap().clone();
    assert_eq!(academic.format, SourceFormat::AcademicHtml);

    let first = context.orchestrator.refresh(&academic).await;
    assert_eq!(titles(first.entries().unwrap()), vec!["Fall Welcome", "Add/Drop Deadline", "Finals Begin"]);
    let second = context.orchestrator.refresh(&academic).await;
    assert_eq!(first, second);
}

#[test]
fn duplicate_source_keys_are_rejected() {
    let dir = TempDir::new("campuscal-config").unwrap();
    let config_path = write_config(
        &dir,
        r#"
[[sources]]
key = "campus-events-last-saved"
url = "https://events.example.edu/a.ics"
format = "icalendar"

[[sources]]
key = "campus-events-last-saved"
url = "https://events.example.edu/b.ics"
format = "icalendar"
"#,
    );

    let config = load_from_file(Some(&config_path)).unwrap();
    let result = CampusCalContext::new(config);
    assert!(matches!(result, Err(CampusCalError::Config(ref m)) if m.contains("campus-events-last-saved")));
}

#[test]
fn invalid_cache_key_fails_to_load() {
    let dir = TempDir::new("campuscal-config").unwrap();
    let config_path = write_config(
        &dir,
        r#"
[[sources]]
key = "Campus Events!"
url = "https://events.example.edu/a.ics"
format = "icalendar"
"#,
    );

    assert!(matches!(load_from_file(Some(&config_path)), Err(CampusCalError::Config(_))));
}
