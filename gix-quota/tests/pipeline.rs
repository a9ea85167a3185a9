//! End-to-end decisions of `QuotaHook` against an in-memory object store.
//!
//! Each fake counts its calls so tests can assert which collaborators were
//! consulted, not only what was decided.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;

use gix_hash::ObjectId;
use gix_quota::{
    Error, Kind, ObjectStore, Outcome, QuotaHook, QuotaThresholds, Reason, RepositorySizeGauge, Revision,
    UpdateRequest,
};

const OLD: &str = "5713ac70b1aba88fc2d218a015d0b7ff7bf5c244";
const NEW: &str = "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391";
const NULL: &str = "0000000000000000000000000000000000000000";
const BLOB_A: &str = "8ab686eafeb1f44702738c8b0f24f2567c36da6d";
const BLOB_B: &str = "d95f3ad14dee633a758d2e331151e950dd13e4ed";
const MB: u64 = 1024 * 1024;

fn oid(hex: &str) -> ObjectId {
    ObjectId::from_hex(hex.as_bytes()).expect("valid hex")
}

#[derive(Default)]
struct MemoryStore {
    diff: String,
    sizes: HashMap<ObjectId, u64>,
    diff_calls: Cell<usize>,
    size_queries: RefCell<Vec<ObjectId>>,
}

impl MemoryStore {
    fn with_diff(lines: &[String]) -> Self {
        MemoryStore {
            diff: lines.iter().map(|line| format!("{line}\n")).collect(),
            ..Default::default()
        }
    }

    fn size(mut self, hex: &str, bytes: u64) -> Self {
        self.sizes.insert(oid(hex), bytes);
        self
    }
}

impl ObjectStore for MemoryStore {
    fn diff_tree(&self, _repo: &Path, _old: &Revision, _new: &Revision) -> Result<bstr::BString, Error> {
        self.diff_calls.set(self.diff_calls.get() + 1);
        Ok(self.diff.clone().into())
    }

    fn object_size(&self, _repo: &Path, id: &ObjectId) -> Result<u64, Error> {
        self.size_queries.borrow_mut().push(*id);
        self.sizes.get(id).copied().ok_or_else(|| Error::SizeQueryFailure {
            id: *id,
            message: "fatal: Not a valid object name".into(),
        })
    }
}

struct FixedSize {
    mb: i64,
    measurements: usize,
}

impl FixedSize {
    fn new(mb: i64) -> Self {
        FixedSize { mb, measurements: 0 }
    }
}

impl RepositorySizeGauge for FixedSize {
    fn current_size_mb(&mut self, _repo: &Path) -> Result<i64, Error> {
        self.measurements += 1;
        Ok(self.mb)
    }
}

fn hook(store: MemoryStore, current_mb: i64) -> QuotaHook<MemoryStore, FixedSize> {
    QuotaHook::new(
        QuotaThresholds::new(950, 1024).unwrap(),
        store,
        FixedSize::new(current_mb),
    )
}

fn added(hex: &str, path: &str) -> String {
    format!(":000000 100644 {NULL} {hex} A\t{path}")
}

fn deleted(hex: &str, path: &str) -> String {
    format!(":100644 000000 {hex} {NULL} D\t{path}")
}

fn modified(old: &str, new: &str, path: &str) -> String {
    format!(":100644 100644 {old} {new} M\t{path}")
}

fn update_line(old: &str, new: &str) -> String {
    format!("{old} {new} refs/heads/main")
}

#[test]
fn over_max_limit_is_rejected() {
    let store = MemoryStore::with_diff(&[added(BLOB_A, "assets/video.mp4")]).size(BLOB_A, 30 * MB);
    let mut hook = hook(store, 1000);

    let request = UpdateRequest::parse("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    let decision = hook.evaluate(&request).unwrap();
    assert_eq!(decision.outcome, Outcome::Rejected);
    assert_eq!(decision.reason, Reason::MaxLimitReached);
    assert_eq!(decision.projected_size_mb, Some(1030));
    assert!(decision.message.as_deref().unwrap().contains("1024 mb"));

    let err = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap_err();
    assert_eq!(err.kind(), Kind::Quota);
    assert!(matches!(
        err,
        Error::QuotaExceeded {
            max_limit_mb: 1024,
            projected_size_mb: 1030
        }
    ));
}

#[test]
fn over_nag_limit_is_accepted_with_a_warning() {
    let store = MemoryStore::with_diff(&[modified(BLOB_A, BLOB_B, "data.bin")])
        .size(BLOB_A, 20 * MB)
        .size(BLOB_B, 40 * MB);
    let mut hook = hook(store, 900);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Warned);
    assert_eq!(decision.projected_size_mb, Some(960));
    let message = decision.message.unwrap();
    for needle in ["960 mb", "950 mb", "1024 mb", "*** YOU ARE OVER NAGGING QUOTA! ***"] {
        assert!(message.contains(needle), "{needle:?} missing in {message:?}");
    }
}

#[test]
fn below_nag_limit_is_accepted_silently() {
    let store = MemoryStore::with_diff(&[added(BLOB_A, "a.bin")]).size(BLOB_A, 10 * MB + 12);
    let mut hook = hook(store, 500);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed);
    assert_eq!(decision.reason, Reason::BelowNagLimit);
    assert_eq!(decision.message, None);
    assert_eq!(decision.projected_size_mb, Some(510));
}

#[test]
fn new_branch_is_accepted_without_consulting_the_store() {
    let mut hook = hook(MemoryStore::default(), 5000);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(NULL, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed);
    assert_eq!(decision.reason, Reason::NewBranch);
    assert_eq!(decision.projected_size_mb, None);
    assert_eq!(hook.store().diff_calls.get(), 0);
    assert!(hook.store().size_queries.borrow().is_empty());
    assert_eq!(hook.gauge().measurements, 0);
}

#[test]
fn ref_deletion_is_accepted_without_consulting_the_store() {
    let mut hook = hook(MemoryStore::default(), 5000);

    let decision = hook
        .pre_receive("repo.git", "user-1", &format!("{OLD} {NULL} refs/heads/topic"))
        .unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed);
    assert_eq!(decision.reason, Reason::RefDeleted);
    assert_eq!(decision.projected_size_mb, None);
    assert_eq!(hook.store().diff_calls.get(), 0);
    assert!(hook.store().size_queries.borrow().is_empty());
    assert_eq!(hook.gauge().measurements, 0);
}

#[test]
fn delete_only_update_is_accepted_without_size_queries() {
    let store = MemoryStore::with_diff(&[deleted(BLOB_A, "huge.iso")]);
    let mut hook = hook(store, 5000);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed);
    assert_eq!(decision.reason, Reason::DeleteOnly);
    assert_eq!(decision.projected_size_mb, Some(5000), "the repository stays over quota");
    assert_eq!(hook.store().diff_calls.get(), 1);
    assert!(hook.store().size_queries.borrow().is_empty());
}

#[test]
fn type_changes_alone_are_accepted_without_size_queries() {
    let store = MemoryStore::with_diff(&[format!(":100644 120000 {BLOB_A} {BLOB_B} T\tlink")]);
    let mut hook = hook(store, 1000);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed);
    assert_eq!(decision.reason, Reason::DeleteOnly);
    assert!(hook.store().size_queries.borrow().is_empty());
}

#[test]
fn empty_change_set_counts_as_delete_only() {
    let mut hook = hook(MemoryStore::default(), 960);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed, "no warning although over the nag limit");
    assert_eq!(decision.reason, Reason::DeleteOnly);
    assert_eq!(decision.projected_size_mb, Some(960));
    assert!(hook.store().size_queries.borrow().is_empty());
}

#[test]
fn malformed_ref_fails_before_any_collaborator_call() {
    let mut hook = hook(MemoryStore::default(), 0);

    for (input, literal) in [
        (format!("{OLD} e69de29bb2d1d6434b8b29ae775ad8c2e48c539z"), "e69de29bb2d1d6434b8b29ae775ad8c2e48c539z"),
        (format!("main {NEW}"), "main"),
    ] {
        let err = hook.pre_receive("repo.git", "user-1", &input).unwrap_err();
        assert_eq!(err.kind(), Kind::Input);
        assert!(
            matches!(err, Error::InvalidRef { ref value, .. } if value == literal),
            "{err}"
        );
    }
    assert_eq!(hook.store().diff_calls.get(), 0);
    assert_eq!(hook.gauge().measurements, 0);
}

#[test]
fn deletions_offset_additions() {
    let store = MemoryStore::with_diff(&[added(BLOB_A, "new.bin"), deleted(BLOB_B, "old.bin")])
        .size(BLOB_A, 70 * MB)
        .size(BLOB_B, 50 * MB);
    let mut hook = hook(store, 940);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.projected_size_mb, Some(960));
    assert_eq!(decision.outcome, Outcome::Warned);
    assert_eq!(hook.store().size_queries.borrow().len(), 2);
}

#[test]
fn failed_size_query_aborts_the_decision() {
    let store = MemoryStore::with_diff(&[added(BLOB_A, "a.bin"), added(BLOB_B, "b.bin")]).size(BLOB_B, MB);
    let mut hook = hook(store, 10);

    let err = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap_err();
    assert_eq!(err.kind(), Kind::Store);
    assert!(matches!(err, Error::SizeQueryFailure { id, .. } if id == oid(BLOB_A)));
}

#[test]
fn sub_megabyte_objects_do_not_count() {
    let store = MemoryStore::with_diff(&[added(BLOB_A, "a.txt"), added(BLOB_B, "b.txt")])
        .size(BLOB_A, MB - 1)
        .size(BLOB_B, MB - 1);
    let mut hook = hook(store, 949);

    let decision = hook.pre_receive("repo.git", "user-1", &update_line(OLD, NEW)).unwrap();
    assert_eq!(decision.outcome, Outcome::Allowed);
    assert_eq!(decision.projected_size_mb, Some(949));
}
