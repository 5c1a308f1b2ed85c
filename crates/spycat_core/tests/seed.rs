use spycat_core::{open_db_in_memory, seed_demo_data, MissionService, TargetStatus};

#[test]
fn seed_creates_demo_agency_with_consistent_links() {
    let mut conn = open_db_in_memory().unwrap();

    let summary = seed_demo_data(&mut conn).unwrap();
    assert_eq!(summary.cats, 5);
    assert_eq!(summary.missions, 3);
    assert_eq!(summary.targets, 6);

    let service = MissionService::new(&mut conn);
    let missions = service.list_missions().unwrap();
    assert_eq!(missions.len(), 3);

    let goldfish = &missions[0];
    assert_eq!(goldfish.name, "Operation Goldfish");
    assert!(goldfish.cat_id.is_some());
    assert!(!goldfish.is_completed);
    let statuses: Vec<TargetStatus> = goldfish.targets.iter().map(|t| t.status).collect();
    assert_eq!(
        statuses,
        [
            TargetStatus::Completed,
            TargetStatus::InProgress,
            TargetStatus::Init
        ]
    );

    let mouse_hunt = &missions[2];
    assert!(mouse_hunt.is_completed);
    assert_eq!(mouse_hunt.cat_id, None);

    let free = service.free_cats().unwrap();
    assert_eq!(free.len(), 4);
    let shadow = goldfish.cat_id.unwrap();
    assert_eq!(
        service.mission_for_cat(shadow).unwrap().map(|m| m.id),
        Some(goldfish.id)
    );
}

#[test]
fn reseeding_replaces_previous_rows() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn).unwrap();
    seed_demo_data(&mut conn).unwrap();

    let cats: i64 = conn
        .query_row("SELECT COUNT(*) FROM spy_cats;", [], |row| row.get(0))
        .unwrap();
    let first_id: i64 = conn
        .query_row("SELECT MIN(id) FROM missions;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(cats, 5);
    assert_eq!(first_id, 1);
}

#[test]
fn failed_reseed_keeps_previous_rows() {
    let mut conn = open_db_in_memory().unwrap();
    seed_demo_data(&mut conn).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER refuse_luna BEFORE INSERT ON spy_cats WHEN NEW.name = 'Luna' \
         BEGIN SELECT RAISE(ABORT, 'refused'); END;",
    )
    .unwrap();

    assert!(seed_demo_data(&mut conn).is_err());

    let (cats, missions, targets): (i64, i64, i64) = conn
        .query_row(
            "SELECT (SELECT COUNT(*) FROM spy_cats),
                    (SELECT COUNT(*) FROM missions),
                    (SELECT COUNT(*) FROM targets);",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .unwrap();
    assert_eq!((cats, missions, targets), (5, 3, 6));
}
