//! Integration tests for the report client.
//!
//! The controller is driven end to end by a collaborator that replays
//! recorded service responses from `tests/fixtures`.

use lex_report::collaborator::{parse_clean_response, parse_upload_response};
use lex_report::reporting::{ReportDocument, ReportGenerator, table};
use lex_report::{
    CellClass, CellValue, CleaningOptions, Collaborator, Completion, DatasetFile,
    ImputationMethod, OutlierCoordinate, OutlierIndex, OutlierMethod, ReportController,
    ReportError, ReportResult, SessionPhase, Snapshot, UploadOutcome, ViewSide, partition,
    project,
};
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::PathBuf;

// ============================================================================
// Helper Functions
// ============================================================================

fn fixtures_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(filename: &str) -> Vec<u8> {
    std::fs::read(fixtures_path().join(filename)).expect("Failed to read fixture")
}

fn snapshot_from(value: serde_json::Value) -> Snapshot {
    serde_json::from_value(value).expect("Invalid snapshot JSON")
}

/// Replays the recorded upload and clean responses.
#[derive(Default)]
struct ReplayCollaborator {
    fail_clean: bool,
    requests: Mutex<Vec<String>>,
}

impl ReplayCollaborator {
    fn failing_clean() -> Self {
        Self {
            fail_clean: true,
            ..Self::default()
        }
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Collaborator for ReplayCollaborator {
    async fn upload(&self, file: DatasetFile) -> ReportResult<UploadOutcome> {
        self.requests.lock().push(format!("upload {}", file.name));
        parse_upload_response(&load_fixture("upload_response.json"))
    }

    async fn clean(&self, options: &CleaningOptions) -> ReportResult<Snapshot> {
        let body = serde_json::to_string(options)?;
        self.requests.lock().push(format!("clean {body}"));
        if self.fail_clean {
            return Err(ReportError::Collaborator {
                status: 500,
                message: "Cleaning failed".to_string(),
            });
        }
        parse_clean_response(&load_fixture("clean_response.json"))
    }

    async fn reset(&self) -> ReportResult<()> {
        self.requests.lock().push("reset".to_string());
        Ok(())
    }

    async fn export_report(&self) -> ReportResult<Vec<u8>> {
        self.requests.lock().push("export".to_string());
        Ok(b"%PDF-1.4\n%%EOF".to_vec())
    }

    fn name(&self) -> &str {
        "replay"
    }
}

fn titanic() -> DatasetFile {
    DatasetFile::new("titanic.csv", b"PassengerId,Age\n1,25\n".to_vec()).unwrap()
}

// ============================================================================
// Reconciliation Scenarios
// ============================================================================

#[test]
fn test_null_cell_in_before_view() {
    let before = snapshot_from(json!({
        "preview": {"columns": ["id", "v"], "data": [{"id": 1, "v": null}], "indices": [0]},
        "stats": {"health_score": 50.0}
    }));

    let grid = project(&before, None, &OutlierIndex::default()).unwrap();
    assert_eq!(grid.cell(0, "v").unwrap().class, CellClass::Null);
    assert_eq!(grid.cell(0, "id").unwrap().class, CellClass::Unchanged);
}

#[test]
fn test_flagged_cell_in_before_view() {
    let before = snapshot_from(json!({
        "preview": {
            "columns": ["age"],
            "data": [{"age": 31}, {"age": 240}],
            "indices": [4, 5]
        },
        "stats": {"health_score": 90.0}
    }));
    let outliers = OutlierIndex::build(&[OutlierCoordinate::new(5, "age")]);

    let grid = project(&before, None, &outliers).unwrap();
    assert_eq!(grid.rows[1].index, 5);
    assert_eq!(grid.cell(1, "age").unwrap().class, CellClass::Outlier);
    assert_eq!(grid.cell(0, "age").unwrap().class, CellClass::Unchanged);
}

#[test]
fn test_reformatted_string_is_changed() {
    let after = snapshot_from(json!({
        "preview": {"columns": ["age"], "data": [{"age": "25.0"}], "indices": [0]},
        "original_preview": {"data": [{"age": "25"}], "indices": [0]},
        "stats": {"health_score": 100.0}
    }));

    let grid = project(&after, Some(&after), &OutlierIndex::default()).unwrap();
    assert_eq!(grid.cell(0, "age").unwrap().class, CellClass::Changed);
}

#[test]
fn test_bucket_partition_of_fixture() {
    let outcome = parse_upload_response(&load_fixture("upload_response.json")).unwrap();
    let buckets = partition(&outcome.snapshot.visualizations);

    let categorical: Vec<&str> = buckets.categorical.iter().map(|v| v.column.as_str()).collect();
    let numerical: Vec<&str> = buckets.numerical.iter().map(|v| v.column.as_str()).collect();
    assert_eq!(categorical, vec!["Embarked"]);
    assert_eq!(numerical, vec!["Age", "Fare"]);
    assert_eq!(buckets.dropped, 1);
}

// ============================================================================
// Session Flow Tests
// ============================================================================

#[tokio::test]
async fn test_upload_clean_export_reset() {
    let controller = ReportController::new(ReplayCollaborator::default());

    // Before report
    assert_eq!(controller.upload(titanic()).await.unwrap(), Completion::Applied);
    let before = controller.view().unwrap().unwrap();

    assert_eq!(before.showing, ViewSide::Before);
    assert_eq!(before.health_before, 78.4);
    assert_eq!(before.missing_info["Age"].count, 177);
    assert_eq!(before.grid.count(CellClass::Null), 2);
    assert_eq!(before.grid.count(CellClass::Outlier), 2);
    assert_eq!(before.grid.count(CellClass::Unchanged), 20);
    assert_eq!(before.grid.cell(5, "Age").unwrap().class, CellClass::Outlier);
    assert_eq!(before.grid.cell(3, "Fare").unwrap().class, CellClass::Outlier);
    assert_eq!(before.grid.cell(3, "Embarked").unwrap().value, CellValue::Null);
    assert_eq!(before.dropped_charts, 1);

    // After report
    let options = CleaningOptions::builder()
        .imputation_method(ImputationMethod::Median)
        .outlier_method(OutlierMethod::Iqr)
        .build();
    assert_eq!(controller.clean(&options).await.unwrap(), Completion::Applied);
    assert_eq!(controller.phase(), SessionPhase::Cleaned);
    let after = controller.view().unwrap().unwrap();

    assert_eq!(after.showing, ViewSide::After);
    assert_eq!(after.health_after, Some(97.2));
    assert_eq!(after.summary.unwrap().missing_fixed, 179);
    assert_eq!(after.stats_after.as_ref().unwrap().missing_values, 0);
    assert_eq!(
        after.grid.classes(),
        vec![
            // PassengerId, Age, Fare, Embarked
            CellClass::Unchanged, CellClass::Changed, CellClass::Unchanged, CellClass::Unchanged,
            CellClass::Unchanged, CellClass::Changed, CellClass::Unchanged, CellClass::Unchanged,
            CellClass::Unchanged, CellClass::Unchanged, CellClass::Unchanged, CellClass::Unchanged,
            CellClass::Unchanged, CellClass::Unchanged, CellClass::Changed, CellClass::Changed,
            CellClass::Unchanged, CellClass::Unchanged, CellClass::Unchanged, CellClass::Unchanged,
            CellClass::Unchanged, CellClass::Changed, CellClass::Unchanged, CellClass::Unchanged,
        ]
    );
    assert_eq!(after.charts.categorical.len(), 1);
    assert_eq!(after.charts.numerical.len(), 1);

    // Export and reset
    let pdf = controller.export_report().await.unwrap();
    assert!(pdf.starts_with(b"%PDF"));

    controller.reset().await;
    assert_eq!(controller.phase(), SessionPhase::Empty);
    assert_eq!(
        controller.collaborator().requests(),
        vec![
            "upload titanic.csv".to_string(),
            r#"clean {"imputationMethod":"median","outlierMethod":"iqr","removeDuplicates":true}"#
                .to_string(),
            "export".to_string(),
            "reset".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_failed_clean_keeps_before_report() {
    let controller = ReportController::new(ReplayCollaborator::failing_clean());
    controller.upload(titanic()).await.unwrap();
    let before = controller.view().unwrap().unwrap();

    let err = controller
        .clean(&CleaningOptions::default())
        .await
        .unwrap_err();

    assert!(err.is_recoverable());
    assert_eq!(controller.phase(), SessionPhase::Reported);
    assert!(!controller.is_busy());
    assert_eq!(controller.view().unwrap().unwrap(), before);
    assert_eq!(
        controller.last_error().as_deref(),
        Some("Cleaning failed (status 500)")
    );

    // The session is still usable after the failure.
    controller.reset().await;
    controller.upload(titanic()).await.unwrap();
    assert_eq!(controller.phase(), SessionPhase::Reported);
}

#[tokio::test]
async fn test_upload_rejects_unsupported_file() {
    let controller = ReportController::new(ReplayCollaborator::default());
    let err = controller.upload_path("slides.pptx").await.unwrap_err();

    assert!(matches!(err, ReportError::UnsupportedFile(_)));
    assert!(controller.collaborator().requests().is_empty());
}

// ============================================================================
// Report Output Tests
// ============================================================================

#[tokio::test]
async fn test_report_document_and_table() {
    let controller = ReportController::new(ReplayCollaborator::default());
    controller.upload(titanic()).await.unwrap();
    controller.clean(&CleaningOptions::default()).await.unwrap();
    let view = controller.view().unwrap().unwrap();

    let rendered = table::render_grid(&view.grid, 3);
    let lines: Vec<&str> = rendered.lines().collect();
    assert!(lines[0].starts_with("#  PassengerId  Age"));
    assert!(lines[2].contains("*25.0"));
    assert!(lines[3].contains("*28"));
    assert!(rendered.ends_with("... 3 more rows\n"));

    let dir = tempfile::tempdir().unwrap();
    let generator = ReportGenerator::new(dir.path());
    let document = ReportDocument::new(
        "titanic.csv",
        "replay",
        Some(CleaningOptions::default()),
        view,
    );
    let path = generator.write_report_to_file(&document, "titanic").unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(written["input_file"], "titanic.csv");
    assert_eq!(written["options"]["removeDuplicates"], true);
    assert_eq!(written["report"]["showing"], "after");
    assert_eq!(written["report"]["grid"]["rows"][0]["cells"][1]["class"], "changed");
    assert_eq!(written["report"]["grid"]["rows"][1]["index"], 1);
}
