#![allow(non_snake_case)]

use super::*;
use test_case::test_case;

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{port}/")
}

// extract_urls tests

#[test]
fn extract_urls___sorts_and_dedupes() {
    let html = br#"
        <a href="https://b.example/page?id=1">b</a>
        <a href="http://a.example/">a</a>
        <a href="https://b.example/page?id=1">again</a>
    "#;

    let urls = extract_urls(html).unwrap();

    assert_eq!(urls, vec!["http://a.example/", "https://b.example/page?id=1"]);
}

#[test_case(b"no links here" ; "plain text")]
#[test_case(b"ftp://files.example/" ; "other scheme")]
#[test_case(b"" ; "empty")]
fn extract_urls___no_matches_is_empty(html: &[u8]) {
    assert!(extract_urls(html).unwrap().is_empty());
}

#[test]
fn extract_urls___stops_at_characters_outside_pattern() {
    let html = b"see https://x.example/a_b-c.html#frag and \"https://y.example/q=1\"";

    let urls = extract_urls(html).unwrap();

    assert_eq!(
        urls,
        vec!["https://x.example/a_b-c.html", "https://y.example/q=1"]
    );
}

#[test]
fn extract_urls___tolerates_invalid_utf8_around_matches() {
    let mut html = vec![0xff, 0xfe];
    html.extend_from_slice(b"http://ok.example/");
    html.push(0xc3);

    let urls = extract_urls(&html).unwrap();

    assert_eq!(urls, vec!["http://ok.example/"]);
}

// write_urls tests

#[tokio::test]
async fn write_urls___writes_one_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.txt");
    let urls = vec!["http://a.example/".to_string(), "http://b.example/".to_string()];

    write_urls(&path, &urls).await.unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    assert_eq!(contents, "http://a.example/\nhttp://b.example/\n");
}

#[tokio::test]
async fn write_urls___replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("urls.txt");
    std::fs::write(&path, "old contents that are longer\n").unwrap();

    write_urls(&path, &["http://new.example/".to_string()])
        .await
        .unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "http://new.example/\n");
}

#[tokio::test]
async fn write_urls___missing_directory_is_task_exception() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("urls.txt");

    let failure = write_urls(&path, &[]).await.unwrap_err();

    assert_eq!(failure.kind_name(), TASK_EXCEPTION);
    assert!(failure.message().starts_with("Write "));
}

// fetch_html tests

#[tokio::test]
async fn fetch_html___refused_connection_retries_then_fails() {
    let config = ScrapeConfig {
        retries: 1,
        ..Default::default()
    };
    let client = config.client().unwrap();

    let failure = fetch_html(&client, &closed_port_url(), config.retries)
        .await
        .unwrap_err();

    assert_eq!(failure.kind_name(), TASK_EXCEPTION);
    assert!(
        failure.message().contains("after 2 attempts"),
        "unexpected message: {}",
        failure.message()
    );
}

#[tokio::test]
async fn fetch_html___invalid_url_is_task_exception() {
    let client = ScrapeConfig::default().client().unwrap();

    let failure = fetch_html(&client, "not a url", 0).await.unwrap_err();

    assert_eq!(failure.kind_name(), TASK_EXCEPTION);
}

#[test]
fn ScrapeConfig___default___matches_client_settings() {
    let config = ScrapeConfig::default();

    assert_eq!(config.retries, 2);
    assert_eq!(config.connect_timeout, Duration::from_secs(2));
    assert_eq!(config.read_timeout, Duration::from_secs(2));
    assert_eq!(config.max_redirects, 4);
}
