use spycat_core::{
    open_db_in_memory, AgencyError, Breed, BreedError, BreedSource, CachedBreedCatalog,
    CatService, ErrorKind, MissionService, NewCat, NewMission, NewTarget, StaticBreedSource,
    ValidationError,
};

fn catalog() -> CachedBreedCatalog<StaticBreedSource> {
    CachedBreedCatalog::new(StaticBreedSource::from_names([
        "Abyssinian",
        "Bengal",
        "Maine Coon",
        "Siamese",
    ]))
}

fn new_cat(name: &str, breed: &str) -> NewCat {
    NewCat {
        name: name.to_string(),
        years_of_experience: 2,
        breed: breed.to_string(),
        salary: 40_000.0,
    }
}

struct OfflineSource;

impl BreedSource for OfflineSource {
    fn fetch_breeds(&self) -> Result<Vec<Breed>, BreedError> {
        Err(BreedError::Unavailable("connection refused".to_string()))
    }
}

#[test]
fn create_cat_accepts_known_breed_and_trims_fields() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let mut service = CatService::new(&mut conn, &catalog);

    let cat = service.create_cat(&new_cat("  Shadow ", "Abyssinian")).unwrap();
    assert_eq!(cat.name, "Shadow");
    assert_eq!(cat.breed, "Abyssinian");
    assert!(cat.is_free());
    assert_eq!(service.get_cat(cat.id).unwrap(), cat);
}

#[test]
fn create_cat_rejects_unknown_breed() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let mut service = CatService::new(&mut conn, &catalog);

    let err = service.create_cat(&new_cat("Shadow", "Dragon")).unwrap_err();
    assert!(matches!(
        err,
        AgencyError::Validation(ValidationError::UnknownBreed(ref breed)) if breed == "Dragon"
    ));
    assert_eq!(service.list_cats(None, None).unwrap().total, 0);
}

#[test]
fn create_cat_rejects_bad_numbers() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let mut service = CatService::new(&mut conn, &catalog);

    let mut negative_salary = new_cat("Kvas", "Maine Coon");
    negative_salary.salary = -1.0;
    assert_eq!(
        service.create_cat(&negative_salary).unwrap_err().kind(),
        ErrorKind::Validation
    );

    let mut negative_years = new_cat("Kvas", "Maine Coon");
    negative_years.years_of_experience = -3;
    assert_eq!(
        service.create_cat(&negative_years).unwrap_err().kind(),
        ErrorKind::Validation
    );
}

#[test]
fn unreachable_catalog_is_external_service_error() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = CachedBreedCatalog::new(OfflineSource);
    let mut service = CatService::new(&mut conn, &catalog);

    let err = service.create_cat(&new_cat("Shadow", "Bengal")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ExternalService);
    assert_eq!(
        service.list_breeds().unwrap_err().kind(),
        ErrorKind::ExternalService
    );
}

#[test]
fn list_breeds_returns_catalog_names() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let service = CatService::new(&mut conn, &catalog);

    let breeds = service.list_breeds().unwrap();
    assert!(breeds.contains(&"Maine Coon".to_string()));
    assert_eq!(breeds.len(), 4);
}

#[test]
fn list_cats_pages_by_id() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let mut service = CatService::new(&mut conn, &catalog);
    for name in ["a", "b", "c", "d", "e"] {
        service.create_cat(&new_cat(name, "Bengal")).unwrap();
    }

    let page = service.list_cats(Some(2), Some(1)).unwrap();
    assert_eq!(page.total, 5);
    assert_eq!(page.limit, 2);
    assert_eq!(page.offset, 1);
    let names: Vec<&str> = page.cats.iter().map(|cat| cat.name.as_str()).collect();
    assert_eq!(names, ["b", "c"]);

    let defaults = service.list_cats(None, None).unwrap();
    assert_eq!(defaults.cats.len(), 5);
    assert_eq!(defaults.limit, 10);

    assert_eq!(
        service.list_cats(Some(0), None).unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        service.list_cats(Some(101), None).unwrap_err().kind(),
        ErrorKind::Validation
    );
}

#[test]
fn update_salary_validates_and_persists() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let mut service = CatService::new(&mut conn, &catalog);
    let cat = service.create_cat(&new_cat("Mittens", "Siamese")).unwrap();

    let updated = service.update_salary(cat.id, 90_000.0).unwrap();
    assert_eq!(updated.salary, 90_000.0);

    assert_eq!(
        service.update_salary(cat.id, f64::NAN).unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert_eq!(
        service.update_salary(cat.id, -5.0).unwrap_err().kind(),
        ErrorKind::Validation
    );
    assert!(matches!(
        service.update_salary(404, 1.0),
        Err(AgencyError::NotFound { .. })
    ));
}

#[test]
fn assigned_cat_cannot_be_deleted_until_released() {
    let mut conn = open_db_in_memory().unwrap();
    let catalog = catalog();
    let cat = CatService::new(&mut conn, &catalog)
        .create_cat(&new_cat("Felix", "Bengal"))
        .unwrap();

    let mission = {
        let mut missions = MissionService::new(&mut conn);
        let mission = missions
            .create_mission(&NewMission {
                name: "Operation Mouse Hunt".to_string(),
                description: "Clear the warehouse".to_string(),
                start_date: None,
                end_date: None,
                targets: vec![NewTarget::new("Rodent King", "USA")],
            })
            .unwrap();
        missions.assign_cat(mission.id, cat.id).unwrap()
    };

    let err = CatService::new(&mut conn, &catalog)
        .delete_cat(cat.id)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);

    MissionService::new(&mut conn).unassign_cat(mission.id).unwrap();

    let mut cats = CatService::new(&mut conn, &catalog);
    cats.delete_cat(cat.id).unwrap();
    assert!(matches!(
        cats.get_cat(cat.id),
        Err(AgencyError::NotFound { entity: "spy cat", .. })
    ));
    assert!(matches!(
        cats.delete_cat(cat.id),
        Err(AgencyError::NotFound { .. })
    ));
}
