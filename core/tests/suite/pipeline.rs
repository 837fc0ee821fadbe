//! End-to-end pipeline runs against temp trees and a mock completion
//! endpoint.

use std::path::Path;
use std::time::Duration;

use replat_core::config::{CompletionConfig, MigrationConfig, PlannerConfig, ReportConfig};
use replat_core::pipeline::{self, Outcome};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "choices": [
            { "message": { "role": "assistant", "content": content } }
        ]
    })
}

fn test_config(server: &MockServer, report_dir: &Path) -> MigrationConfig {
    MigrationConfig {
        completion: CompletionConfig {
            api_url: format!("{}/v1/chat/completions", server.uri()),
            retries: 2,
            rate_limit_backoff: Duration::from_millis(5),
            http_retry_delay: Duration::from_millis(5),
            timeout_retry_delay: Duration::from_millis(5),
            ..CompletionConfig::default()
        },
        planner: PlannerConfig {
            request_delay: Duration::ZERO,
            ..PlannerConfig::default()
        },
        report: ReportConfig {
            path: report_dir.join("migration_report.md"),
        },
        ..MigrationConfig::default()
    }
}

/// A small Expo app with a Convex backend and two files using its hooks.
fn seed_source(root: &Path) {
    write(
        root,
        "package.json",
        r#"{"name":"tasks-app","dependencies":{"convex":"^1.13.0","expo":"~51.0.0"}}"#,
    );
    write(root, "app.json", r#"{"expo":{"name":"tasks-app"}}"#);
    write(
        root,
        "convex/schema.ts",
        "import { defineSchema, defineTable } from \"convex/server\";\n",
    );
    write(
        root,
        "convex/tasks.ts",
        "import { query, mutation } from \"./_generated/server\";\n",
    );
    write(
        root,
        "App.tsx",
        "import { useQuery } from \"convex/react\";\n",
    );
    write(
        root,
        "src/components/TaskList.tsx",
        "const tasks = useQuery(api.tasks.list);\n",
    );
    write(root, "README.md", "A task app.\n");
    write(root, "convex.json", r#"{"project":"tasks"}"#);
    write(root, "assets/icon.png", "not really a png");
}

async fn mount_passes(server: &MockServer) {
    Mock::given(method("POST"))
        .and(body_string_contains("Analyze this Convex backend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(concat!(
            "<FILE path=\"supabase/config.ts\">export const supabase = createClient();</FILE>\n",
            "<FILE path=\"supabase/migrations/001_initial.sql\">CREATE TABLE tasks (id uuid primary key);</FILE>",
        ))))
        .expect(1)
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("Files to migrate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(concat!(
            "<FILE path=\"App.tsx\">import { supabase } from './supabase/config';</FILE>\n",
            "<DELETE path=\"convex.json\" />",
        ))))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_run_copies_applies_and_reports() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let report_dir = TempDir::new().unwrap();
    seed_source(source.path());

    let server = MockServer::start().await;
    mount_passes(&server).await;

    let config = test_config(&server, report_dir.path());
    let outcome = pipeline::run(&config, source.path(), target.path(), false, "test-key")
        .await
        .unwrap();

    let Outcome::Completed {
        stats,
        operations,
        report_path,
    } = outcome
    else {
        panic!("expected a completed run");
    };

    // Copy step: everything except convex/* and the ignored png.
    assert_eq!(stats.copied, 6);
    assert_eq!(stats.written, 3);
    assert_eq!(stats.deleted, 1);
    assert_eq!(stats.skipped, 0);

    // Schema-pass operations come first.
    assert_eq!(operations[0].path(), "supabase/config.ts");
    assert_eq!(operations[1].path(), "supabase/migrations/001_initial.sql");

    // Legacy subtree deleted by omission; generated content wins collisions.
    assert!(!target.path().join("convex").exists());
    assert!(!target.path().join("convex.json").exists());
    assert!(target.path().join("supabase/config.ts").is_file());
    assert!(target.path().join("README.md").is_file());
    let app = std::fs::read_to_string(target.path().join("App.tsx")).unwrap();
    assert_eq!(app, "import { supabase } from './supabase/config';");

    let report = std::fs::read_to_string(report_path).unwrap();
    assert!(report.contains("| Files copied (unchanged) | 6 |"));
    assert!(report.contains("- `supabase/config.ts`"));
    assert!(report.contains("- `convex.json`"));
}

#[tokio::test]
async fn dry_run_counts_plan_without_writing() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let report_dir = TempDir::new().unwrap();
    seed_source(source.path());

    let server = MockServer::start().await;
    mount_passes(&server).await;

    let config = test_config(&server, report_dir.path());
    let outcome = pipeline::run(&config, source.path(), target.path(), true, "test-key")
        .await
        .unwrap();

    let Outcome::Completed { stats, .. } = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(stats.copied, 0);
    assert_eq!(stats.written, 3);
    assert_eq!(stats.deleted, 1);
    assert_eq!(std::fs::read_dir(target.path()).unwrap().count(), 0);

    // The report is still part of run completion.
    let report =
        std::fs::read_to_string(report_dir.path().join("migration_report.md")).unwrap();
    assert!(report.contains("**Dry run:** `true`"));
}

#[tokio::test]
async fn zero_work_exits_before_any_service_call() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let report_dir = TempDir::new().unwrap();
    write(source.path(), "README.md", "plain project, no backend\n");

    let server = MockServer::start().await;
    let config = test_config(&server, report_dir.path());
    let outcome = pipeline::run(&config, source.path(), target.path(), false, "test-key")
        .await
        .unwrap();

    assert!(matches!(outcome, Outcome::NothingToMigrate));
    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!report_dir.path().join("migration_report.md").exists());
}

#[tokio::test]
async fn missing_legacy_dir_uses_placeholder_in_schema_prompt() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let report_dir = TempDir::new().unwrap();
    write(
        source.path(),
        "App.tsx",
        "import { useQuery } from \"convex/react\";\n",
    );

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("(No convex/ directory found)"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("no changes")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("Files to migrate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("no changes")))
        .expect(1)
        .mount(&server)
        .await;

    let config = test_config(&server, report_dir.path());
    let outcome = pipeline::run(&config, source.path(), target.path(), false, "test-key")
        .await
        .unwrap();

    // Parse recovered zero operations; the run still completes and reports.
    let Outcome::Completed { stats, .. } = outcome else {
        panic!("expected a completed run");
    };
    assert_eq!(stats.written, 0);
    assert_eq!(stats.copied, 1);
}

#[tokio::test]
async fn twelve_candidates_make_three_batches() {
    let source = TempDir::new().unwrap();
    let target = TempDir::new().unwrap();
    let report_dir = TempDir::new().unwrap();
    write(source.path(), "convex/schema.ts", "export default {};\n");
    for i in 0..12 {
        write(
            source.path(),
            &format!("src/screens/screen{i:02}.tsx"),
            "const data = useQuery(api.items.list);\n",
        );
    }

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_string_contains("Analyze this Convex backend"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("no output")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(body_string_contains("Files to migrate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("no output")))
        .expect(3)
        .mount(&server)
        .await;

    let config = test_config(&server, report_dir.path());
    pipeline::run(&config, source.path(), target.path(), true, "test-key")
        .await
        .unwrap();
}
