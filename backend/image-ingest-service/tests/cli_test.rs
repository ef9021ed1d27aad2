/// Invocation-level behavior of the `image-ingest` binary
use image::{DynamicImage, ImageOutputFormat, RgbImage};
use std::io::{Cursor, Write};
use std::path::Path;
use std::process::Output;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn run_cli(args: &[&str], cwd: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_image-ingest"))
        .args(args)
        .current_dir(cwd)
        .env_remove("INGEST_CONCURRENCY")
        .env_remove("INGEST_FETCH_TIMEOUT_SECS")
        .output()
        .await
        .unwrap()
}

fn json_files(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".json"))
        .collect()
}

#[tokio::test]
async fn test_no_input_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();

    let output = run_cli(&[], dir.path()).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Provide --url or --csv"));
    assert!(json_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_csv_without_urls_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("urls.csv");
    std::fs::write(&csv, "image_url\nnot-a-url\n").unwrap();

    let output = run_cli(&["--csv", csv.to_str().unwrap()], dir.path()).await;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No valid URLs supplied."));
    assert!(json_files(dir.path()).is_empty());
}

#[tokio::test]
async fn test_url_and_csv_write_ordered_artifact() {
    let server = MockServer::start().await;
    let mut png = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(64, 48))
        .write_to(&mut Cursor::new(&mut png), ImageOutputFormat::Png)
        .unwrap();
    Mock::given(method("GET"))
        .and(path("/ok.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(png))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/missing.png"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("urls.csv");
    let mut file = std::fs::File::create(&csv).unwrap();
    writeln!(file, "url,comment").unwrap();
    writeln!(file, "{}/missing.png,gone", server.uri()).unwrap();
    writeln!(file, "skip me").unwrap();
    writeln!(file, "{}/ok.png", server.uri()).unwrap();
    drop(file);
    let out = dir.path().join("result.json");
    let single = format!("{}/ok.png", server.uri());

    let output = run_cli(
        &[
            "--url",
            &single,
            "--csv",
            csv.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
            "--concurrency",
            "2",
        ],
        dir.path(),
    )
    .await;

    assert!(output.status.success(), "{output:?}");
    assert!(String::from_utf8_lossy(&output.stdout).contains("(3 records)"));

    let records: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["status"], "success");
    assert_eq!(records[0]["original_resolution"], "64x48");
    assert_eq!(records[1]["status"], "error");
    assert_eq!(records[1]["error"], "transport error: 404");
    assert_eq!(records[2]["status"], "success");
    assert_eq!(records[2]["image_url"], single.as_str());
}

#[tokio::test]
async fn test_dedupe_and_default_output_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let csv = dir.path().join("urls.csv");
    let url = format!("{}/x.png", server.uri());
    std::fs::write(&csv, format!("{url}\n{url}\n")).unwrap();

    let output = run_cli(
        &["--url", &url, "--csv", csv.to_str().unwrap(), "--dedupe"],
        dir.path(),
    )
    .await;

    assert!(output.status.success(), "{output:?}");
    let files = json_files(dir.path());
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("output_"));

    let records: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join(&files[0])).unwrap())
            .unwrap();
    assert_eq!(records.as_array().unwrap().len(), 1);
}
