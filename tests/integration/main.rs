//! Integration tests for outresolve

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use sha2::{Digest, Sha256};
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn outresolve() -> Command {
        cargo_bin_cmd!("outresolve")
    }

    /// Temp dir with a config pointing the disk cache inside it
    fn workspace() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("config.toml");
        let content = format!(
            "[cache]\ncas_dir = {:?}\noutput_dir = {:?}\n\n[session]\nname = \"it\"\nworkspace_root = {:?}\n",
            temp.path().join("disk").to_string_lossy(),
            temp.path().join("out").to_string_lossy(),
            temp.path().to_string_lossy(),
        );
        std::fs::write(&config, content).unwrap();
        (temp, config)
    }

    fn put_blob(root: &Path, data: &[u8]) -> String {
        let digest = hex::encode(Sha256::digest(data));
        let dir = root.join("disk/cas").join(&digest[..2]);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(&digest), data).unwrap();
        digest
    }

    #[test]
    fn help_displays() {
        outresolve()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Resolve Bazel build artifacts"));
    }

    #[test]
    fn version_displays() {
        outresolve()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("outresolve"));
    }

    #[test]
    fn canonicalize_rewrites_external_symlinks() {
        outresolve()
            .args([
                "canonicalize",
                "/home/user/.cache/bazel/execroot/myrepo/external/some_dep/file.txt",
                "/home/user/.cache/bazel/execroot/myrepo/bazel-out/k8-fastbuild/bin/external/some_dep/file.txt",
            ])
            .assert()
            .success()
            .stdout(
                "/external/some_dep/file.txt\n\
                 /home/user/.cache/bazel/execroot/myrepo/bazel-out/k8-fastbuild/bin/external/some_dep/file.txt\n",
            );
    }

    #[test]
    fn resolve_skips_missing_remote_outputs() {
        let (temp, config) = workspace();
        let present = put_blob(temp.path(), b"generated");
        let missing = hex::encode(Sha256::digest(b"never built"));

        let manifest = temp.path().join("refs.json");
        let refs = serde_json::json!([
            {"kind": "local", "path": "/c/execroot/ws/external/dep/A.java"},
            {"kind": "remote", "digest": missing, "relative_path": "bazel-out/bin/gone.jar"},
            {"kind": "remote", "digest": present, "relative_path": "bazel-out/bin/lib.jar"},
            {"kind": "local", "path": "/ws/src/B.java"},
        ]);
        std::fs::write(&manifest, refs.to_string()).unwrap();

        let materialized = temp.path().join("out/it").join(&present).join("lib.jar");
        let expected = format!(
            "/external/dep/A.java\n{}\n/ws/src/B.java\n",
            materialized.display()
        );

        outresolve()
            .arg("--config")
            .arg(&config)
            .arg("resolve")
            .arg(&manifest)
            .assert()
            .success()
            .stdout(expected);

        assert_eq!(std::fs::read(&materialized).unwrap(), b"generated");
    }

    #[test]
    fn resolve_json_output() {
        let (temp, config) = workspace();
        let manifest = temp.path().join("refs.json");
        std::fs::write(&manifest, r#"[{"kind":"local","path":"/ws/a.txt"}]"#).unwrap();

        outresolve()
            .arg("--config")
            .arg(&config)
            .args(["resolve", "--format", "json"])
            .arg(&manifest)
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""/ws/a.txt""#));
    }

    #[test]
    fn resolve_rejects_malformed_manifest() {
        let (temp, config) = workspace();
        let manifest = temp.path().join("refs.json");
        std::fs::write(&manifest, r#"[{"kind":"elsewhere"}]"#).unwrap();

        outresolve()
            .arg("--config")
            .arg(&config)
            .arg("resolve")
            .arg(&manifest)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid artifact manifest"));
    }

    #[test]
    fn resolve_one_reports_miss() {
        let (_temp, config) = workspace();
        let digest = hex::encode(Sha256::digest(b"absent"));
        let artifact = format!(
            r#"{{"kind":"remote","digest":"{digest}","relative_path":"bazel-out/bin/x.jar"}}"#
        );

        outresolve()
            .arg("--config")
            .arg(&config)
            .args(["resolve-one", &artifact])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Artifact not found"));
    }

    #[test]
    fn resolve_one_reports_cache_error() {
        let (_temp, config) = workspace();

        outresolve()
            .arg("--config")
            .arg(&config)
            .args([
                "resolve-one",
                r#"{"kind":"remote","digest":"nothex","relative_path":"bazel-out/bin/x.jar"}"#,
            ])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid content digest"));
    }

    #[test]
    fn resolve_one_local() {
        let (_temp, config) = workspace();

        outresolve()
            .arg("--config")
            .arg(&config)
            .args([
                "resolve-one",
                r#"{"kind":"local","path":"/b/execroot/ws/external/dep/x.h"}"#,
            ])
            .assert()
            .success()
            .stdout("/external/dep/x.h\n");
    }

    #[test]
    fn config_path() {
        let (_temp, config) = workspace();
        outresolve()
            .arg("--config")
            .arg(&config)
            .args(["config", "path"])
            .assert()
            .success()
            .stdout(predicate::str::contains("config.toml"));
    }

    #[test]
    fn config_show() {
        let (_temp, config) = workspace();
        outresolve()
            .arg("--config")
            .arg(&config)
            .args(["config", "show"])
            .assert()
            .success()
            .stdout(predicate::str::contains("[cache]"))
            .stdout(predicate::str::contains("name = \"it\""));
    }

    #[test]
    fn config_set_persists() {
        let (_temp, config) = workspace();
        outresolve()
            .arg("--config")
            .arg(&config)
            .args(["config", "set", "session.name", "renamed"])
            .assert()
            .success();

        let content = std::fs::read_to_string(&config).unwrap();
        assert!(content.contains("name = \"renamed\""));
    }
}
