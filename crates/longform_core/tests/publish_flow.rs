use longform_core::capability::{
    Acquisition, CapabilityCache, CapabilityHost, DirectoryCapability, WriteCapability,
};
use longform_core::db::open_db_in_memory;
use longform_core::{
    ArticleDraft, ArticleId, EditBuffer, MemorySlotStore, PublishError, PublishOutcome,
    Publisher, SqliteSlotStore,
};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::rc::Rc;

/// Shared record of every write performed through scripted capabilities,
/// keyed by destination file name.
type WriteLog = Rc<RefCell<BTreeMap<String, Vec<String>>>>;

struct ScriptedCapability {
    name: String,
    log: WriteLog,
    fail_writes: bool,
}

impl WriteCapability for ScriptedCapability {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn write_all(&mut self, contents: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.log
            .borrow_mut()
            .entry(self.name.clone())
            .or_default()
            .push(contents.to_string());
        Ok(())
    }
}

struct ScriptedDirectory {
    log: WriteLog,
}

impl DirectoryCapability for ScriptedDirectory {
    fn display_name(&self) -> &str {
        "exports"
    }

    fn create_file(&self, file_name: &str) -> io::Result<Box<dyn WriteCapability>> {
        Ok(Box::new(ScriptedCapability {
            name: file_name.to_string(),
            log: Rc::clone(&self.log),
            fail_writes: false,
        }))
    }
}

/// Scripted interactive host recording picker interactions.
struct ScriptedHost {
    log: WriteLog,
    directory_available: bool,
    file_available: bool,
    cancel_directory: bool,
    cancel_file: bool,
    directory_picks: u32,
    file_picks: u32,
    last_file_hint: Option<Option<String>>,
    picked_file_name: String,
}

impl ScriptedHost {
    fn new(log: WriteLog) -> Self {
        Self {
            log,
            directory_available: true,
            file_available: true,
            cancel_directory: false,
            cancel_file: false,
            directory_picks: 0,
            file_picks: 0,
            last_file_hint: None,
            picked_file_name: "picked.md".to_string(),
        }
    }
}

impl CapabilityHost for ScriptedHost {
    fn directory_picker_available(&self) -> bool {
        self.directory_available
    }

    fn file_picker_available(&self) -> bool {
        self.file_available
    }

    fn pick_directory(&mut self) -> Acquisition<Box<dyn DirectoryCapability>> {
        self.directory_picks += 1;
        if self.cancel_directory {
            return Acquisition::Cancelled;
        }
        Acquisition::Acquired(Box::new(ScriptedDirectory {
            log: Rc::clone(&self.log),
        }))
    }

    fn pick_file(&mut self, name_hint: Option<&str>) -> Acquisition<Box<dyn WriteCapability>> {
        self.file_picks += 1;
        self.last_file_hint = Some(name_hint.map(str::to_string));
        if self.cancel_file {
            return Acquisition::Cancelled;
        }
        let name = name_hint.unwrap_or(&self.picked_file_name).to_string();
        Acquisition::Acquired(Box::new(ScriptedCapability {
            name,
            log: Rc::clone(&self.log),
            fail_writes: false,
        }))
    }
}

fn valid_buffer(title: &str) -> EditBuffer {
    EditBuffer {
        id: None,
        draft: ArticleDraft {
            title: title.to_string(),
            description: "Description".to_string(),
            content: "# Heading\n\nBody text.".to_string(),
            tag: "tag".to_string(),
            date: "2025-06-01".to_string(),
            ..ArticleDraft::default()
        },
    }
}

fn total_writes(log: &WriteLog) -> usize {
    log.borrow().values().map(Vec::len).sum()
}

#[test]
fn publish_with_empty_content_reports_one_violation_and_writes_nothing() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    let mut cache = CapabilityCache::new(MemorySlotStore::new());
    let mut publisher = Publisher::new(&mut cache, &mut host);

    let mut buffer = valid_buffer("A title");
    buffer.draft.content = String::new();

    match publisher.publish(&buffer) {
        PublishOutcome::Invalid(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].field, "content");
        }
        other => panic!("expected invalid outcome, got {other:?}"),
    }

    assert_eq!(total_writes(&log), 0);
    assert_eq!(host.directory_picks, 0);
}

#[test]
fn publish_writes_serialized_content_and_caches_the_capability() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let buffer = valid_buffer("Hello, World!");
    let outcome = Publisher::new(&mut cache, &mut host).publish(&buffer);

    let PublishOutcome::Done { file_name } = outcome else {
        panic!("expected done outcome");
    };
    assert_eq!(file_name, "2025-06-01-hello-world.md");

    let written = log.borrow().get(&file_name).cloned().unwrap();
    assert_eq!(written.len(), 1);
    assert!(written[0].starts_with("---\n"));
    assert!(written[0].contains("title: Hello, World!"));
    assert!(written[0].contains("# Heading"));

    // The derived identity and capability are now cached for the session.
    let id = ArticleId::derive(&file_name);
    assert!(cache.get(&id).is_some());
    assert_eq!(cache.remembered_name(&id).as_deref(), Some(file_name.as_str()));
}

#[test]
fn publish_cancellation_is_a_benign_outcome_with_zero_writes() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    host.cancel_directory = true;
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let outcome = Publisher::new(&mut cache, &mut host).publish(&valid_buffer("A title"));
    assert!(matches!(outcome, PublishOutcome::Cancelled));
    assert_eq!(total_writes(&log), 0);
}

#[test]
fn publish_without_a_directory_picker_fails_as_capability_unavailable() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    host.directory_available = false;
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let outcome = Publisher::new(&mut cache, &mut host).publish(&valid_buffer("A title"));
    match outcome {
        PublishOutcome::Failed(PublishError::CapabilityUnavailable(picker)) => {
            assert_eq!(picker, "directory picker");
        }
        other => panic!("expected capability failure, got {other:?}"),
    }
    assert_eq!(host.directory_picks, 0);
}

#[test]
fn update_without_identity_fails_with_missing_identity() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let outcome = Publisher::new(&mut cache, &mut host).update(&valid_buffer("A title"));
    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishError::MissingIdentity)
    ));
    assert_eq!(total_writes(&log), 0);
}

#[test]
fn update_reuses_the_session_capability_without_any_picker() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let mut buffer = valid_buffer("Hello, World!");
    let outcome = Publisher::new(&mut cache, &mut host).publish(&buffer);
    let PublishOutcome::Done { file_name } = outcome else {
        panic!("expected done outcome");
    };

    buffer.id = Some(ArticleId::derive(&file_name));
    buffer.draft.content = "# Heading\n\nEdited body.".to_string();
    let outcome = Publisher::new(&mut cache, &mut host).update(&buffer);
    assert!(outcome.is_done());

    // Silent path: the directory picker ran once for publish, the file
    // picker never ran, and both writes landed on the same destination.
    assert_eq!(host.directory_picks, 1);
    assert_eq!(host.file_picks, 0);
    let written = log.borrow().get(&file_name).cloned().unwrap();
    assert_eq!(written.len(), 2);
    assert!(written[1].contains("Edited body."));
}

#[test]
fn update_in_a_fresh_session_prompts_with_the_remembered_name() {
    let conn = open_db_in_memory().unwrap();
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut buffer = valid_buffer("Hello, World!");

    // First session: publish and remember the destination name.
    let file_name = {
        let mut host = ScriptedHost::new(Rc::clone(&log));
        let mut cache = CapabilityCache::new(SqliteSlotStore::new(&conn));
        let PublishOutcome::Done { file_name } =
            Publisher::new(&mut cache, &mut host).publish(&buffer)
        else {
            panic!("expected done outcome");
        };
        file_name
    };

    // Fresh session: the capability is gone, only the name survived.
    buffer.id = Some(ArticleId::derive(&file_name));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    let mut cache = CapabilityCache::new(SqliteSlotStore::new(&conn));
    assert!(cache.get(buffer.id.as_ref().unwrap()).is_none());

    let outcome = Publisher::new(&mut cache, &mut host).update(&buffer);
    assert!(outcome.is_done());
    assert_eq!(host.file_picks, 1);
    assert_eq!(
        host.last_file_hint,
        Some(Some(file_name.clone()))
    );

    // The re-acquired capability is cached again for this session.
    assert!(cache.get(buffer.id.as_ref().unwrap()).is_some());
}

#[test]
fn update_cancellation_leaves_no_write_and_no_cache_entry() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    host.cancel_file = true;
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let mut buffer = valid_buffer("A title");
    buffer.id = Some(ArticleId::Store(5));

    let outcome = Publisher::new(&mut cache, &mut host).update(&buffer);
    assert!(matches!(outcome, PublishOutcome::Cancelled));
    assert_eq!(total_writes(&log), 0);
    assert!(cache.get(&ArticleId::Store(5)).is_none());
}

#[test]
fn update_without_a_file_picker_fails_as_capability_unavailable() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    host.file_available = false;
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let mut buffer = valid_buffer("A title");
    buffer.id = Some(ArticleId::Store(5));

    let outcome = Publisher::new(&mut cache, &mut host).update(&buffer);
    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishError::CapabilityUnavailable("file picker"))
    ));
}

#[test]
fn a_failed_destination_write_surfaces_as_io_failure() {
    let log: WriteLog = Rc::new(RefCell::new(BTreeMap::new()));
    let mut host = ScriptedHost::new(Rc::clone(&log));
    let mut cache = CapabilityCache::new(MemorySlotStore::new());

    let mut buffer = valid_buffer("A title");
    let id = ArticleId::Store(7);
    buffer.id = Some(id.clone());
    cache.remember(
        &id,
        Box::new(ScriptedCapability {
            name: "doomed.md".to_string(),
            log: Rc::clone(&log),
            fail_writes: true,
        }),
        "doomed.md",
    );

    let outcome = Publisher::new(&mut cache, &mut host).update(&buffer);
    assert!(matches!(
        outcome,
        PublishOutcome::Failed(PublishError::Io(_))
    ));
    assert_eq!(total_writes(&log), 0);
}
