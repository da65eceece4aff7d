use std::fs;

use serde_json::{Value, json};
use time::macros::datetime;

use kyso_storage::{DraftStore, Error, LocalStore, ReportDraft};
use kyso_testkit::TestDir;

fn draft() -> ReportDraft {
	ReportDraft {
		title: "Churn analysis".to_string(),
		description: "Q3 cohort".to_string(),
		tags: vec!["churn".to_string()],
		organization: Some("acme".to_string()),
		team: Some("research".to_string()),
		main_file: Some("analysis.ipynb".to_string()),
		updated_at: datetime!(2024-06-01 12:00 UTC),
	}
}

#[test]
fn stores_reads_and_removes_blobs() {
	let dir = TestDir::new("kyso_store").expect("Failed to create test dir.");
	let store = LocalStore::new(dir.path()).expect("Failed to open store.");

	assert_eq!(store.get_json::<Value>("settings").expect("Read must succeed."), None);

	store.put_json("settings", &json!({ "a": 1 })).expect("Write must succeed.");

	assert_eq!(store.get_json::<Value>("settings").expect("Read must succeed."), Some(json!({ "a": 1 })));
	assert!(store.remove("settings").expect("Remove must succeed."));
	assert!(!store.remove("settings").expect("Remove must succeed."));
	assert!(!store.contains("settings").expect("Lookup must succeed."));
}

#[test]
fn corrupt_blobs_surface_as_decode_errors() {
	let dir = TestDir::new("kyso_store").expect("Failed to create test dir.");
	let store = LocalStore::new(dir.path()).expect("Failed to open store.");

	store.put_json("broken", &json!([1])).expect("Write must succeed.");

	for entry in fs::read_dir(dir.path()).expect("Dir must list.") {
		let path = entry.expect("Entry must read.").path();

		fs::write(path, "{not json").expect("Overwrite must succeed.");
	}

	assert!(matches!(store.get_json::<Value>("broken"), Err(Error::Decode { .. })));
}

#[test]
fn drafts_round_trip_and_clear() {
	let dir = TestDir::new("kyso_drafts").expect("Failed to create test dir.");
	let drafts = DraftStore::new(LocalStore::new(dir.path()).expect("Failed to open store."));

	drafts.save("new-report", &draft()).expect("Save must succeed.");

	assert_eq!(drafts.load("new-report").expect("Load must succeed."), Some(draft()));
	assert!(drafts.clear("new-report").expect("Clear must succeed."));
	assert_eq!(drafts.load("new-report").expect("Load must succeed."), None);
}

#[test]
fn unreadable_drafts_are_discarded() {
	let dir = TestDir::new("kyso_drafts").expect("Failed to create test dir.");
	let store = LocalStore::new(dir.path()).expect("Failed to open store.");

	store.put_json("draft:stale", &json!({ "unexpected": true })).expect("Write must succeed.");

	let drafts = DraftStore::new(store.clone());

	assert_eq!(drafts.load("stale").expect("Load must succeed."), None);
	assert!(!store.contains("draft:stale").expect("Lookup must succeed."));
}
