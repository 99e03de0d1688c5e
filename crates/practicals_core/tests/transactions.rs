use practicals_core::db::{open_db, open_db_in_memory, open_db_with, OpenOptions};
use practicals_core::{
    Employee, EmployeeService, GuestbookEntry, RepoError, Repository, SqliteRepository,
    TransactionCoordinator, SALARY_GUARD_MESSAGE,
};
use std::collections::HashSet;
use std::thread;
use std::time::Duration;

#[test]
fn failed_unit_of_work_leaves_no_records() {
    let conn = open_db_in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&conn);

    let err = coordinator
        .run(|unit| -> Result<(), RepoError> {
            let repo = unit.repository::<GuestbookEntry>()?;
            repo.create(&GuestbookEntry::new("A", "first"))?;
            repo.create(&GuestbookEntry::new("B", "second"))?;
            Err(RepoError::business_rule("post-condition failed"))
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::BusinessRule(ref message) if message == "post-condition failed"));

    let repo = SqliteRepository::<GuestbookEntry>::try_new(&conn).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn successful_unit_of_work_commits_every_record() {
    let conn = open_db_in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&conn);

    let (a, b) = coordinator
        .run(|unit| {
            let repo = unit.repository::<GuestbookEntry>()?;
            let a = repo.create(&GuestbookEntry::new("A", "first"))?;
            let b = repo.create(&GuestbookEntry::new("B", "second"))?;
            Ok((a, b))
        })
        .unwrap();

    let listed = SqliteRepository::<GuestbookEntry>::try_new(&conn)
        .unwrap()
        .list()
        .unwrap();
    assert_eq!(listed, vec![a.clone(), b.clone()]);
    assert!(a.id.is_some() && b.id.is_some());
}

#[test]
fn salary_guard_scenario_rolls_back_both_employees() {
    let conn = open_db_in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&conn);

    let err = coordinator
        .run(|unit| -> Result<(), RepoError> {
            let repo = unit.repository::<Employee>()?;
            let john = repo.create(&Employee::new("John", "Doe", "Engineering", 75000.0))?;
            assert_eq!(john.id, Some(1));
            let jane = repo.create(&Employee::new("Jane", "Smith", "Marketing", 65000.0))?;
            unit.ensure(jane.salary <= 60000.0, SALARY_GUARD_MESSAGE)?;
            Ok(())
        })
        .unwrap_err();

    assert_eq!(err.to_string(), "Simulating an error to test rollback!");
    assert!(matches!(err, RepoError::BusinessRule(_)));
    let repo = SqliteRepository::<Employee>::try_new(&conn).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn employee_service_guard_rolls_back_and_allows_valid_pairs() {
    let conn = open_db_in_memory().unwrap();
    let service = EmployeeService::new(&conn);

    let err = service
        .save_with_salary_guard(
            &Employee::new("John", "Doe", "Engineering", 75000.0),
            &Employee::new("Jane", "Smith", "Marketing", 65000.0),
            60000.0,
        )
        .unwrap_err();
    assert_eq!(err.to_string(), SALARY_GUARD_MESSAGE);
    assert!(service.repository().unwrap().list().unwrap().is_empty());

    let (john, jane) = service
        .save_with_salary_guard(
            &Employee::new("John", "Doe", "Engineering", 75000.0),
            &Employee::new("Jane", "Smith", "Marketing", 55000.0),
            60000.0,
        )
        .unwrap();
    assert!(john.id < jane.id);
    assert_eq!(service.repository().unwrap().list().unwrap().len(), 2);
}

#[test]
fn rolled_back_updates_and_deletes_are_discarded() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteRepository::<Employee>::try_new(&conn).unwrap();
    let kept = repo
        .create(&Employee::new("Ada", "Lovelace", "Research", 90000.0))
        .unwrap();
    let id = kept.id.unwrap();

    let coordinator = TransactionCoordinator::new(&conn);
    let _ = coordinator.run(|unit| -> Result<(), RepoError> {
        let repo = unit.repository::<Employee>()?;
        repo.update(id, &Employee::new("Ada", "Byron", "Research", 1.0))?;
        repo.delete(id)?;
        Err(RepoError::business_rule("undo"))
    });

    assert_eq!(repo.get(id).unwrap(), Some(kept));
}

#[test]
fn validation_error_inside_unit_of_work_keeps_its_kind() {
    let conn = open_db_in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&conn);

    let err = coordinator
        .run(|unit| {
            let repo = unit.repository::<Employee>()?;
            repo.create(&Employee::new("Ok", "Person", "Ops", 1.0))?;
            repo.create(&Employee::new("", "Missing", "Ops", 1.0))
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(SqliteRepository::<Employee>::try_new(&conn)
        .unwrap()
        .list()
        .unwrap()
        .is_empty());
}

#[test]
fn save_all_inside_unit_of_work_follows_outer_decision() {
    let conn = open_db_in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&conn);

    let _ = coordinator.run(|unit| -> Result<(), RepoError> {
        unit.repository::<GuestbookEntry>()?.save_all(&[
            GuestbookEntry::new("A", "one"),
            GuestbookEntry::new("B", "two"),
        ])?;
        Err(RepoError::business_rule("abort after bulk save"))
    });

    let repo = SqliteRepository::<GuestbookEntry>::try_new(&conn).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn nested_unit_of_work_is_illegal() {
    let conn = open_db_in_memory().unwrap();
    let coordinator = TransactionCoordinator::new(&conn);

    let err = coordinator
        .run(|unit| {
            unit.repository::<GuestbookEntry>()?
                .create(&GuestbookEntry::new("outer", "write"))?;
            coordinator.run(|_| Ok(()))
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::IllegalState(_)));

    let repo = SqliteRepository::<GuestbookEntry>::try_new(&conn).unwrap();
    assert!(repo.list().unwrap().is_empty());
}

#[test]
fn readers_on_other_connections_see_only_committed_rows() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("isolation.db");
    let writer = open_db(&path).unwrap();
    let reader = open_db(&path).unwrap();

    TransactionCoordinator::new(&writer)
        .run(|unit| {
            unit.repository::<GuestbookEntry>()?
                .create(&GuestbookEntry::new("pending", "not yet"))?;
            let visible = SqliteRepository::<GuestbookEntry>::try_new(&reader)?.list()?;
            assert!(visible.is_empty());
            Ok(())
        })
        .unwrap();

    let visible = SqliteRepository::<GuestbookEntry>::try_new(&reader)
        .unwrap()
        .list()
        .unwrap();
    assert_eq!(visible.len(), 1);
}

#[test]
fn competing_writer_gets_conflict_after_busy_timeout() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("conflict.db");
    let holder = open_db(&path).unwrap();
    let impatient = open_db_with(
        &path,
        OpenOptions {
            busy_timeout: Duration::from_millis(50),
        },
    )
    .unwrap();

    TransactionCoordinator::new(&holder)
        .run(|unit| {
            unit.repository::<GuestbookEntry>()?
                .create(&GuestbookEntry::new("holder", "owns the lock"))?;
            let err = TransactionCoordinator::new(&impatient)
                .run(|_| Ok(()))
                .unwrap_err();
            assert!(matches!(err, RepoError::Conflict(_)));
            Ok(())
        })
        .unwrap();
}

#[test]
fn concurrent_writers_are_serialized() {
    const THREADS: usize = 4;
    const UNITS_PER_THREAD: usize = 10;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("writers.db");
    drop(open_db(&path).unwrap());

    let handles: Vec<_> = (0..THREADS)
        .map(|worker| {
            let path = path.clone();
            thread::spawn(move || {
                let conn = open_db(&path).unwrap();
                let coordinator = TransactionCoordinator::new(&conn);
                for unit_index in 0..UNITS_PER_THREAD {
                    coordinator
                        .run(|unit| {
                            unit.repository::<GuestbookEntry>()?.save_all(&[
                                GuestbookEntry::new(format!("w{worker}"), format!("u{unit_index}a")),
                                GuestbookEntry::new(format!("w{worker}"), format!("u{unit_index}b")),
                            ])
                        })
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let conn = open_db(&path).unwrap();
    let entries = SqliteRepository::<GuestbookEntry>::try_new(&conn)
        .unwrap()
        .list()
        .unwrap();
    assert_eq!(entries.len(), THREADS * UNITS_PER_THREAD * 2);

    let ids: HashSet<_> = entries.iter().map(|entry| entry.id.unwrap()).collect();
    assert_eq!(ids.len(), entries.len());

    // Pairs from one unit of work are adjacent: no interleaving inside a commit.
    for pair in entries.chunks(2) {
        assert_eq!(pair[0].name, pair[1].name);
        assert_eq!(
            pair[0].message.trim_end_matches('a'),
            pair[1].message.trim_end_matches('b')
        );
    }
}
