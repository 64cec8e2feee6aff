//! End-to-end tests of the download phase against a mock GitLab API

mod common;

use asset_mirror::config::{MirrorConfig, Pagination};
use asset_mirror::{ConvertConfig, ConversionOrchestrator, ConversionTool, ConversionJob, Mirror};
use common::{MockRepository, assert_dir_files, dir_snapshot};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const PROJECT: &str = "cable-mc/cobblemon-assets";
const ROOT: &str = "blockbench/pokemon/gen1";

async fn gen1_repository() -> MockRepository {
    let repo = MockRepository::start(PROJECT, "master").await;
    repo.dir(
        ROOT,
        &[
            ("tree", "blockbench/pokemon/gen1/0001_bulbasaur"),
            ("tree", "blockbench/pokemon/gen1/0063_abra"),
            ("blob", "blockbench/pokemon/gen1/README.md"),
        ],
    )
    .await;
    repo.dir(
        "blockbench/pokemon/gen1/0001_bulbasaur",
        &[
            ("blob", "blockbench/pokemon/gen1/0001_bulbasaur/bulbasaur.bbmodel"),
            ("blob", "blockbench/pokemon/gen1/0001_bulbasaur/bulbasaur.png"),
        ],
    )
    .await;
    repo.dir(
        "blockbench/pokemon/gen1/0063_abra",
        &[
            ("blob", "blockbench/pokemon/gen1/0063_abra/abra.bbmodel"),
            ("blob", "blockbench/pokemon/gen1/0063_abra/abra.png"),
        ],
    )
    .await;
    repo.file(
        "blockbench/pokemon/gen1/0001_bulbasaur/bulbasaur.bbmodel",
        b"bulbasaur-model",
    )
    .await;
    repo.file("blockbench/pokemon/gen1/0001_bulbasaur/bulbasaur.png", b"bulbasaur-texture")
        .await;
    repo.file("blockbench/pokemon/gen1/0063_abra/abra.bbmodel", b"abra-model")
        .await;
    repo.file("blockbench/pokemon/gen1/0063_abra/abra.png", b"abra-texture")
        .await;
    repo
}

#[tokio::test]
async fn test_models_and_textures_mirror_into_separate_flat_dirs() {
    let repo = gen1_repository().await;
    let temp = TempDir::new().unwrap();
    let models = temp.path().join("bbmodels_gen1");
    let textures = temp.path().join("png_gen1");

    let model_report = Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        ROOT,
        &models,
        ".bbmodel",
    ))
    .unwrap()
    .run()
    .await
    .unwrap();
    let texture_report = Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        ROOT,
        &textures,
        ".png",
    ))
    .unwrap()
    .run()
    .await
    .unwrap();

    assert!(model_report.is_success());
    assert!(texture_report.is_success());
    assert_dir_files(&models, &["abra.bbmodel", "bulbasaur.bbmodel"]);
    assert_dir_files(&textures, &["abra.png", "bulbasaur.png"]);
    assert_eq!(dir_snapshot(&models)["abra.bbmodel"], b"abra-model");
}

#[tokio::test]
async fn test_flattening_collision_keeps_last_walked_file() {
    let repo = MockRepository::start(PROJECT, "master").await;
    repo.dir(
        "shared",
        &[("tree", "shared/male"), ("tree", "shared/female")],
    )
    .await;
    repo.dir("shared/male", &[("blob", "shared/male/nidoran.bbmodel")])
        .await;
    repo.dir("shared/female", &[("blob", "shared/female/nidoran.bbmodel")])
        .await;
    repo.file("shared/male/nidoran.bbmodel", b"male").await;
    repo.file("shared/female/nidoran.bbmodel", b"female").await;

    let temp = TempDir::new().unwrap();
    let report = Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        "shared",
        temp.path(),
        ".bbmodel",
    ))
    .unwrap()
    .run()
    .await
    .unwrap();

    assert_eq!(report.stored.len(), 2);
    assert_eq!(report.collisions, 1);
    assert_dir_files(temp.path(), &["nidoran.bbmodel"]);

    // Content belongs to whichever path the walk yielded last
    let last = &report.stored[1].remote_path;
    let expected: &[u8] = if last.contains("female") { b"female" } else { b"male" };
    assert_eq!(dir_snapshot(temp.path())["nidoran.bbmodel"], expected);
}

#[tokio::test]
async fn test_mirroring_twice_is_idempotent() {
    let repo = gen1_repository().await;
    let temp = TempDir::new().unwrap();
    let mirror = Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        ROOT,
        temp.path(),
        ".bbmodel",
    ))
    .unwrap();

    let first_report = mirror.run().await.unwrap();
    let first = dir_snapshot(temp.path());
    let second_report = mirror.run().await.unwrap();
    let second = dir_snapshot(temp.path());

    assert_eq!(first, second);
    // Every run downloads everything again
    assert_eq!(first_report.stored.len(), second_report.stored.len());
    assert_eq!(second_report.collisions, 0);
}

#[tokio::test]
async fn test_pagination_policies_over_a_large_directory() {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, ResponseTemplate};

    let repo = MockRepository::start(PROJECT, "master").await;
    let page = |range: std::ops::Range<usize>| {
        let entries: Vec<_> = range
            .map(|i| json!({"type": "blob", "name": format!("m{i:03}.bbmodel"), "path": format!("big/m{i:03}.bbmodel")}))
            .collect();
        json!(entries)
    };
    let tree_path = "/api/v4/projects/cable-mc%2Fcobblemon-assets/repository/tree";
    Mock::given(method("GET"))
        .and(path(tree_path))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Next-Page", "2")
                .set_body_json(page(0..100)),
        )
        .mount(&repo.server)
        .await;
    Mock::given(method("GET"))
        .and(path(tree_path))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(100..101)))
        .mount(&repo.server)
        .await;
    for i in 0..101 {
        repo.file(&format!("big/m{i:03}.bbmodel"), b"m").await;
    }

    for (pagination, expected) in [(Pagination::FirstPage, 100), (Pagination::Follow, 101)] {
        let temp = TempDir::new().unwrap();
        let mut repository = repo.repository_config();
        repository.pagination = pagination;
        let report = Mirror::new(MirrorConfig::new(repository, "big", temp.path(), ".bbmodel"))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert_eq!(report.stored.len(), expected, "{pagination:?}");
        assert_eq!(dir_snapshot(temp.path()).len(), expected, "{pagination:?}");
    }
}

#[tokio::test]
async fn test_fetch_failure_is_skipped_and_reported() {
    let repo = MockRepository::start(PROJECT, "master").await;
    repo.dir(
        "models",
        &[("blob", "models/lfs.bbmodel"), ("blob", "models/ok.bbmodel")],
    )
    .await;
    repo.failing_file("models/lfs.bbmodel", 500).await;
    repo.file("models/ok.bbmodel", b"ok").await;

    let temp = TempDir::new().unwrap();
    let report = Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        "models",
        temp.path(),
        ".bbmodel",
    ))
    .unwrap()
    .run()
    .await
    .unwrap();

    assert!(!report.is_success());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].remote_path, "models/lfs.bbmodel");
    assert_dir_files(temp.path(), &["ok.bbmodel"]);
}

#[tokio::test]
async fn test_listing_failure_aborts_the_run() {
    let repo = MockRepository::start(PROJECT, "master").await;
    // No listing mounted: every tree request answers 404

    let temp = TempDir::new().unwrap();
    let result = Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        "missing",
        temp.path(),
        ".bbmodel",
    ))
    .unwrap()
    .run()
    .await;

    match result {
        Err(asset_mirror::Error::Listing { path, status }) => {
            assert_eq!(path, "missing");
            assert_eq!(status, 404);
        }
        other => panic!("expected Listing error, got {other:?}"),
    }
}

/// Records conversion jobs without running anything
#[derive(Default)]
struct RecordingTool {
    calls: Mutex<Vec<ConversionJob>>,
}

#[async_trait::async_trait]
impl ConversionTool for RecordingTool {
    async fn convert(&self, job: &ConversionJob) -> asset_mirror::Result<()> {
        self.calls.lock().unwrap().push(job.clone());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

#[tokio::test]
async fn test_conversion_picks_up_whatever_the_mirror_left_on_disk() {
    let repo = gen1_repository().await;
    let temp = TempDir::new().unwrap();
    let models = temp.path().join("bbmodels_gen1");

    Mirror::new(MirrorConfig::new(
        repo.repository_config(),
        ROOT,
        &models,
        ".bbmodel",
    ))
    .unwrap()
    .run()
    .await
    .unwrap();
    // A file placed by hand is converted as well
    std::fs::write(models.join("mew.bbmodel"), b"manual").unwrap();

    let tool = Arc::new(RecordingTool::default());
    let config = ConvertConfig::new("export_gltf.js", &models, temp.path().join("gltf_gen1"));
    let orchestrator = ConversionOrchestrator::new(config, tool.clone()).unwrap();
    let report = orchestrator.convert_all().await.unwrap();

    assert_eq!(report.attempted, 3);
    let outputs: Vec<_> = tool
        .calls
        .lock()
        .unwrap()
        .iter()
        .map(|job| job.output.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(outputs, vec!["abra.glb", "bulbasaur.glb", "mew.glb"]);
}
