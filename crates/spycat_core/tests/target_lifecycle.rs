use rusqlite::Connection;
use spycat_core::repo::cat_repo::CatRepository;
use spycat_core::{
    open_db_in_memory, AgencyError, CatId, ErrorKind, Mission, MissionService, NewCat,
    NewMission, NewTarget, RepoContext, TargetStatus,
};

struct Fixture {
    conn: Connection,
    owner: CatId,
    stranger: CatId,
    mission: Mission,
}

fn insert_cat(conn: &Connection, name: &str) -> CatId {
    RepoContext::new(conn)
        .cats()
        .create_cat(&NewCat {
            name: name.to_string(),
            years_of_experience: 4,
            breed: "Bengal".to_string(),
            salary: 70_000.0,
        })
        .unwrap()
        .id
}

/// One mission with targets `Rex` and `Tom`, assigned to `owner`.
fn fixture() -> Fixture {
    let mut conn = open_db_in_memory().unwrap();
    let owner = insert_cat(&conn, "Felix");
    let stranger = insert_cat(&conn, "Luna");
    let mission = {
        let mut service = MissionService::new(&mut conn);
        let mission = service
            .create_mission(&NewMission {
                name: "Night Watch".to_string(),
                description: "Watch the docks".to_string(),
                start_date: None,
                end_date: None,
                targets: vec![NewTarget::new("Rex", "Chile"), NewTarget::new("Tom", "Peru")],
            })
            .unwrap();
        service.assign_cat(mission.id, owner).unwrap()
    };
    Fixture {
        conn,
        owner,
        stranger,
        mission,
    }
}

#[test]
fn only_the_assigned_cat_may_update_a_target() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);

    let err = service
        .update_target_status(fx.stranger, target_id, TargetStatus::InProgress)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
    let err = service
        .update_target_notes(fx.stranger, target_id, Some("sneaky"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);

    let updated = service
        .update_target_status(fx.owner, target_id, TargetStatus::InProgress)
        .unwrap();
    assert_eq!(updated.status, TargetStatus::InProgress);
}

#[test]
fn unassigned_mission_targets_are_forbidden_for_everyone() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);
    service.unassign_cat(fx.mission.id).unwrap();

    let err = service
        .update_target_status(fx.owner, target_id, TargetStatus::InProgress)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Forbidden);
}

#[test]
fn status_moves_forward_only() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);

    service
        .update_target_status(fx.owner, target_id, TargetStatus::InProgress)
        .unwrap();
    // Same status again is accepted.
    service
        .update_target_status(fx.owner, target_id, TargetStatus::InProgress)
        .unwrap();

    let err = service
        .update_target_status(fx.owner, target_id, TargetStatus::Init)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTransition);
}

#[test]
fn init_may_jump_straight_to_completed() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[1].id;
    let mut service = MissionService::new(&mut fx.conn);

    let target = service
        .update_target_status(fx.owner, target_id, TargetStatus::Completed)
        .unwrap();
    assert_eq!(target.status, TargetStatus::Completed);
    assert!(!service.get_mission(fx.mission.id).unwrap().is_completed);
}

#[test]
fn completed_target_is_frozen_for_any_cat() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);
    service
        .update_target_notes(fx.owner, target_id, Some("spotted at the pier"))
        .unwrap();
    service
        .update_target_status(fx.owner, target_id, TargetStatus::Completed)
        .unwrap();

    for cat_id in [fx.owner, fx.stranger] {
        let status_err = service
            .update_target_status(cat_id, target_id, TargetStatus::Completed)
            .unwrap_err();
        assert_eq!(status_err.kind(), ErrorKind::InvalidTransition);
        assert!(status_err.kind().is_lifecycle_violation());

        let notes_err = service
            .update_target_notes(cat_id, target_id, Some("rewrite history"))
            .unwrap_err();
        assert_eq!(notes_err.kind(), ErrorKind::InvalidTransition);
    }

    let mission = service.get_mission(fx.mission.id).unwrap();
    assert_eq!(
        mission.targets[0].notes.as_deref(),
        Some("spotted at the pier")
    );
}

#[test]
fn notes_are_stored_cleared_and_bounded() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);

    let noted = service
        .update_target_notes(fx.owner, target_id, Some("wears a red collar"))
        .unwrap();
    assert_eq!(noted.notes.as_deref(), Some("wears a red collar"));

    let cleared = service
        .update_target_notes(fx.owner, target_id, Some("   "))
        .unwrap();
    assert_eq!(cleared.notes, None);

    let too_long = "x".repeat(2001);
    let err = service
        .update_target_notes(fx.owner, target_id, Some(&too_long))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
}

#[test]
fn missing_target_is_not_found() {
    let mut fx = fixture();
    let mut service = MissionService::new(&mut fx.conn);

    assert!(matches!(
        service.update_target_status(fx.owner, 999, TargetStatus::Completed),
        Err(AgencyError::NotFound { entity: "target", id: 999 })
    ));
}

#[test]
fn init_targets_cannot_be_deleted() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);

    let err = service.delete_target(fx.mission.id, target_id).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    service
        .update_target_status(fx.owner, target_id, TargetStatus::InProgress)
        .unwrap();
    service.delete_target(fx.mission.id, target_id).unwrap();

    let remaining = service.get_mission(fx.mission.id).unwrap().targets;
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].name, "Tom");
}

#[test]
fn delete_checks_the_owning_mission() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);

    assert!(matches!(
        service.delete_target(fx.mission.id + 1, target_id),
        Err(AgencyError::NotFound { .. })
    ));
}

#[test]
fn add_target_rejects_duplicates_and_completed_missions() {
    let mut fx = fixture();
    let mission_id = fx.mission.id;
    let mut service = MissionService::new(&mut fx.conn);

    let err = service
        .add_target(mission_id, &NewTarget::new(" Rex ", "Bolivia"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    let added = service
        .add_target(mission_id, &NewTarget::new("Kit", "Spain"))
        .unwrap();
    assert_eq!(added.status, TargetStatus::Init);
    assert_eq!(added.mission_id, mission_id);

    assert!(matches!(
        service.add_target(mission_id + 100, &NewTarget::new("Nobody", "Nowhere")),
        Err(AgencyError::NotFound { entity: "mission", .. })
    ));

    let targets = service.get_mission(mission_id).unwrap().targets;
    for target in &targets {
        service
            .update_target_status(fx.owner, target.id, TargetStatus::Completed)
            .unwrap();
    }
    assert!(service.get_mission(mission_id).unwrap().is_completed);

    // Completed missions keep their targets frozen.
    let err = service
        .add_target(mission_id, &NewTarget::new("Late", "Chad"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[test]
fn deleted_target_name_can_be_reused() {
    let mut fx = fixture();
    let target_id = fx.mission.targets[0].id;
    let mut service = MissionService::new(&mut fx.conn);

    service
        .update_target_status(fx.owner, target_id, TargetStatus::InProgress)
        .unwrap();
    service.delete_target(fx.mission.id, target_id).unwrap();

    let again = service
        .add_target(fx.mission.id, &NewTarget::new("Rex", "Chile"))
        .unwrap();
    assert_ne!(again.id, target_id);
}
