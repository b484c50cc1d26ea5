use std::fs;
use std::time::Duration;

use guideview::{
    AnySource, CancellationToken, ContentSource, FailureKind, FileSource, HttpSource, Outcome,
    ViewState, load_section,
};
use serde_json::json;

fn guide_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("content/sections")).unwrap();
    fs::write(
        dir.path().join("content/sections/overview.json"),
        r#"[
            { "type": "h2", "text": "Créer un dossier" },
            { "type": "paragraph", "text": "Ouvrez la fiche client." }
        ]"#,
    )
    .unwrap();
    fs::write(dir.path().join("content/sections/broken.json"), "[{ \"type\": ").unwrap();
    dir
}

#[tokio::test]
async fn file_source_reads_relative_to_root() {
    let dir = guide_dir();
    let source = FileSource::new(dir.path());

    let with_slash = source.fetch("/content/sections/overview.json").await.unwrap();
    let without = source.fetch("content/sections/overview.json").await.unwrap();
    assert_eq!(with_slash, without);
    assert_eq!(with_slash[0]["text"], json!("Créer un dossier"));
}

#[tokio::test]
async fn file_source_errors() {
    let dir = guide_dir();
    let source = FileSource::new(dir.path());

    let missing = source.fetch("/content/sections/nope.json").await.unwrap_err();
    assert_eq!(missing.kind(), FailureKind::Fetch);

    let broken = source.fetch("/content/sections/broken.json").await.unwrap_err();
    assert_eq!(broken.kind(), FailureKind::Parse);
    assert_eq!(broken.location(), "/content/sections/broken.json");
}

#[tokio::test]
async fn section_from_disk() {
    let dir = guide_dir();
    let source = AnySource::File(FileSource::new(dir.path()));
    let token = CancellationToken::new();

    let outcome = load_section(
        &source,
        "/content/sections/overview.json",
        "creer-un-dossier",
        &token,
    )
    .await;
    let Outcome::Commit(ViewState::Ready(section)) = outcome else {
        panic!("expected a ready section, got {:?}", outcome);
    };
    assert_eq!(section.title, "Créer un dossier");
    assert_eq!(section.body.len(), 1);
}

#[test]
fn http_urls_join_base_and_location() {
    let source = HttpSource::new("https://help.example.test/", Duration::from_secs(5)).unwrap();
    assert_eq!(
        source.url("/content/sections/overview.json"),
        "https://help.example.test/content/sections/overview.json"
    );
    assert_eq!(
        source.url("content/a.json"),
        "https://help.example.test/content/a.json"
    );
    assert_eq!(
        source.url("https://cdn.example.test/b.json"),
        "https://cdn.example.test/b.json"
    );
}

#[test]
fn user_messages_by_kind() {
    let fetch = guideview::ViewError::Status {
        location: "/x.json".into(),
        status: 500,
    };
    assert_eq!(fetch.kind(), FailureKind::Fetch);
    assert!(fetch.user_message().contains("retry"));
    assert_eq!(fetch.to_string(), "/x.json answered with status 500");

    let parse = guideview::ViewError::parse("/x.json", "expected an array");
    assert_eq!(parse.kind(), FailureKind::Parse);
    assert_eq!(parse.to_string(), "cannot parse /x.json: expected an array");
}
