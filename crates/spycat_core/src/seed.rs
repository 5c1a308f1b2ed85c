//! Demo data for fresh databases.
//!
//! # Responsibility
//! - Wipe all agency rows and insert a small, explorable data set.
//!
//! # Invariants
//! - Wipe and insert happen in one transaction; a failure leaves the
//!   previous data untouched.
//! - Seeded rows go through the same lifecycle functions as API writes, so
//!   every mission invariant holds afterwards.

use crate::model::cat::NewCat;
use crate::model::mission::NewMission;
use crate::model::target::{NewTarget, TargetStatus};
use crate::repo::cat_repo::CatRepository;
use crate::repo::context::{run_in_transaction, RepoContext};
use crate::repo::target_repo::TargetRepository;
use crate::repo::RepoError;
use crate::service::error::AgencyResult;
use crate::service::{assignment, mission_lifecycle, now_epoch_ms};
use log::info;
use rusqlite::Connection;

const WIPE_SQL: &str = "
UPDATE spy_cats SET mission_id = NULL;
DELETE FROM targets;
DELETE FROM missions;
DELETE FROM spy_cats;
DELETE FROM sqlite_sequence WHERE name IN ('targets', 'missions', 'spy_cats');
";

/// Row counts written by [`seed_demo_data`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub cats: usize,
    pub missions: usize,
    pub targets: usize,
}

struct DemoMission {
    name: &'static str,
    description: &'static str,
    targets: &'static [(&'static str, &'static str, TargetStatus, Option<&'static str>)],
    /// Index into `DEMO_CATS`.
    cat: Option<usize>,
}

const DEMO_CATS: &[(&str, i32, &str, f64)] = &[
    ("Shadow", 5, "Abyssinian", 75_000.0),
    ("Kvas", 3, "Maine Coon", 65_000.0),
    ("Mittens", 7, "Siamese", 85_000.0),
    ("Luna", 2, "Persian", 55_000.0),
    ("Felix", 4, "Bengal", 70_000.0),
];

const DEMO_MISSIONS: &[DemoMission] = &[
    DemoMission {
        name: "Operation Goldfish",
        description: "Gather intelligence on the goldfish smuggling ring at the city aquarium.",
        targets: &[
            ("Dr. Fisherman", "Monaco", TargetStatus::Completed, Some("Documents retrieved from his office.")),
            ("Captain Aquarius", "Greece", TargetStatus::InProgress, Some("Tracking movements near the harbor.")),
            ("Marina Scales", "Italy", TargetStatus::Init, None),
        ],
        cat: Some(0),
    },
    DemoMission {
        name: "Catnip Cartel",
        description: "Map the underground catnip distribution network.",
        targets: &[
            ("Pablo Whiskers", "Colombia", TargetStatus::Init, None),
            ("El Gato", "Mexico", TargetStatus::Init, None),
        ],
        cat: None,
    },
    DemoMission {
        name: "Operation Mouse Hunt",
        description: "Clear the warehouse district of its mouse infestation.",
        targets: &[(
            "Rodent King",
            "USA",
            TargetStatus::Completed,
            Some("Warehouse secured."),
        )],
        cat: Some(1),
    },
];

/// Replaces every agency row with the demo data set.
///
/// "Operation Mouse Hunt" ends up completed (its cat released again);
/// "Operation Goldfish" stays assigned to Shadow.
pub fn seed_demo_data(conn: &mut Connection) -> AgencyResult<SeedSummary> {
    let summary = run_in_transaction(conn, "seed_demo", |ctx| -> AgencyResult<SeedSummary> {
        ctx.conn().execute_batch(WIPE_SQL).map_err(RepoError::from)?;
        seed_rows(ctx)
    })?;
    info!(
        "event=seed_demo module=seed status=ok cats={} missions={} targets={}",
        summary.cats, summary.missions, summary.targets
    );
    Ok(summary)
}

fn seed_rows(ctx: &RepoContext<'_>) -> AgencyResult<SeedSummary> {
    let mut cat_ids = Vec::with_capacity(DEMO_CATS.len());
    for (name, years_of_experience, breed, salary) in DEMO_CATS {
        let cat = ctx.cats().create_cat(&NewCat {
            name: (*name).to_string(),
            years_of_experience: *years_of_experience,
            breed: (*breed).to_string(),
            salary: *salary,
        })?;
        cat_ids.push(cat.id);
    }

    let mut target_count = 0;
    for demo in DEMO_MISSIONS {
        let request = NewMission {
            name: demo.name.to_string(),
            description: demo.description.to_string(),
            start_date: None,
            end_date: None,
            targets: demo
                .targets
                .iter()
                .map(|(name, country, _, notes)| NewTarget {
                    name: (*name).to_string(),
                    country: (*country).to_string(),
                    notes: notes.map(str::to_string),
                })
                .collect(),
        };
        let mission = mission_lifecycle::create(ctx, &request)?;
        target_count += mission.targets.len();

        if let Some(cat_index) = demo.cat {
            assignment::assign(ctx, mission.id, cat_ids[cat_index], now_epoch_ms())?;
        }

        for (target, (_, _, status, _)) in mission.targets.iter().zip(demo.targets) {
            if *status != TargetStatus::Init {
                ctx.targets().update_status(target.id, *status)?;
            }
        }
        mission_lifecycle::check_and_complete(ctx, mission.id, now_epoch_ms())?;
    }

    Ok(SeedSummary {
        cats: cat_ids.len(),
        missions: DEMO_MISSIONS.len(),
        targets: target_count,
    })
}
