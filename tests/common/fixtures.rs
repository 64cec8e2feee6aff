//! Mock GitLab repository and fake converter fixtures

use asset_mirror::config::RepositoryConfig;
use asset_mirror::utils::encode_path_segment;
use serde_json::json;
use std::path::{Path, PathBuf};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A wiremock server answering the tree listing and raw file endpoints of one project
pub struct MockRepository {
    pub server: MockServer,
    project: String,
    git_ref: String,
}

impl MockRepository {
    /// Start a server for `project` at `git_ref`
    pub async fn start(project: &str, git_ref: &str) -> Self {
        Self {
            server: MockServer::start().await,
            project: project.to_string(),
            git_ref: git_ref.to_string(),
        }
    }

    /// Repository coordinates pointing at this server
    pub fn repository_config(&self) -> RepositoryConfig {
        let mut config = RepositoryConfig::new(&self.project, &self.git_ref);
        config.api_base = format!("{}/api/v4", self.server.uri());
        config
    }

    fn project_path(&self) -> String {
        format!("/api/v4/projects/{}", encode_path_segment(&self.project))
    }

    /// Serve a directory listing; entries are `(type, full path)` pairs
    pub async fn dir(&self, dir: &str, entries: &[(&str, &str)]) {
        let body: Vec<_> = entries
            .iter()
            .map(|(kind, path)| {
                let name = path.rsplit('/').next().unwrap_or(*path);
                json!({"type": kind, "name": name, "path": path})
            })
            .collect();

        Mock::given(method("GET"))
            .and(path(format!("{}/repository/tree", self.project_path())))
            .and(query_param("path", dir))
            .and(query_param("ref", self.git_ref.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Serve the raw contents of a file
    pub async fn file(&self, file_path: &str, body: &[u8]) {
        self.raw(file_path, ResponseTemplate::new(200).set_body_bytes(body.to_vec()))
            .await;
    }

    /// Answer the raw endpoint of a file with an error status
    pub async fn failing_file(&self, file_path: &str, status: u16) {
        self.raw(file_path, ResponseTemplate::new(status)).await;
    }

    async fn raw(&self, file_path: &str, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!(
                "{}/repository/files/{}/raw",
                self.project_path(),
                encode_path_segment(file_path)
            )))
            .and(query_param("ref", self.git_ref.as_str()))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }
}

/// Write a shell script standing in for the converter
///
/// The script appends `input|output|<flags>|<env hint>` to `log` for each call,
/// exits 3 when the input path contains "broken" and otherwise writes a small
/// artifact to the output path.
#[cfg(unix)]
pub fn write_fake_converter(dir: &Path, log: &Path, env_var: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = format!(
        r#"#!/bin/sh
printf '%s|%s|%s %s %s %s|%s\n' "$6" "$7" "$1" "$2" "$3" "$5" "${{{env_var}-unset}}" >> '{log}'
case "$6" in
  *broken*) exit 3 ;;
esac
printf 'glTF' > "$7"
"#,
        log = log.display(),
    );

    let path = dir.join("fake-blockbench");
    std::fs::write(&path, script).expect("Failed to write fake converter");
    let mut perms = std::fs::metadata(&path)
        .expect("Failed to stat fake converter")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("Failed to chmod fake converter");
    path
}

/// Parsed line of the fake converter log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakeCall {
    pub input: PathBuf,
    pub output: PathBuf,
    pub flags: String,
    pub env_hint: String,
}

/// Read back every call recorded by [`write_fake_converter`]
pub fn read_fake_calls(log: &Path) -> Vec<FakeCall> {
    let Ok(content) = std::fs::read_to_string(log) else {
        return Vec::new();
    };
    content
        .lines()
        .map(|line| {
            let parts: Vec<&str> = line.split('|').collect();
            FakeCall {
                input: PathBuf::from(parts[0]),
                output: PathBuf::from(parts[1]),
                flags: parts[2].to_string(),
                env_hint: parts[3].to_string(),
            }
        })
        .collect()
}
