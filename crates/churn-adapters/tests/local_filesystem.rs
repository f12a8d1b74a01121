//! Scaffolds onto a real temporary directory.

use churn_adapters::{LocalFilesystem, RecordingProcessRunner};
use churn_core::application::{ScaffoldOptions, ScaffoldService};
use churn_core::domain::{ConfigurationDraft, Language, generators};
use tempfile::TempDir;

#[test]
fn writes_a_typescript_project_to_disk() {
    let tmp = TempDir::new().unwrap();
    let config = ConfigurationDraft {
        project_name: Some("disk-app".into()),
        language: Some(Language::Ts),
        docker: Some(true),
        ..Default::default()
    }
    .resolve()
    .unwrap();
    let root = tmp.path().join("disk-app");
    let plan = generators::plan(&config).unwrap().with_root(&root);

    let runner = RecordingProcessRunner::new();
    let service = ScaffoldService::new(Box::new(LocalFilesystem::new()), Box::new(runner.clone()));
    let report = service.execute(&plan, &ScaffoldOptions::default()).unwrap();

    assert_eq!(report.files_written.len(), plan.file_count());
    for file in plan.files() {
        let on_disk = std::fs::read_to_string(root.join(&file.path)).unwrap();
        assert_eq!(on_disk, file.content, "{}", file.path.display());
    }
    assert!(root.join("prisma").is_dir());
    assert_eq!(runner.calls()[0].1, root);
}

#[test]
fn unwritable_parent_fails_without_leftovers() {
    let tmp = TempDir::new().unwrap();
    let blocker = tmp.path().join("blocker");
    std::fs::write(&blocker, "not a directory").unwrap();

    let config = ConfigurationDraft::default().resolve().unwrap();
    let plan = generators::plan(&config).unwrap().with_root(blocker.join("app"));

    let service = ScaffoldService::new(
        Box::new(LocalFilesystem::new()),
        Box::new(RecordingProcessRunner::new()),
    );
    let err = service.execute(&plan, &ScaffoldOptions::default()).unwrap_err();
    assert!(err.to_string().starts_with("Failed to create project directory"));
    assert!(blocker.is_file());
}
