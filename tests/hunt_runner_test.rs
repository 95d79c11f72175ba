//! End-to-end hunt tests: background tasks, pause on a shiny, persistence,
//! and prompt shutdown.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use shinyhunt::catalog::{fingerprint, CatalogStore};
use shinyhunt::config::Config;
use shinyhunt::encounter::{HuntState, ScriptedDice};
use shinyhunt::hunt::{HuntEvent, HuntHandle, HuntSetup};
use shinyhunt::journal::EncounterJournal;
use shinyhunt::progress_store::ProgressStore;
use std::collections::BTreeMap;
use std::fs;
use std::time::Duration;
use tempfile::{tempdir, TempDir};
use tokio::time::timeout;

const CATALOG: &str = "Pidgey,Common\nRattata,Common\n";
const WAIT: Duration = Duration::from_secs(5);

fn hunt_config(dir: &TempDir, shiny_rate: u32, encounter_delay: f64) -> Config {
    let source = dir.path().join("gen1.txt");
    fs::write(&source, CATALOG).unwrap();
    Config {
        encounter_delay,
        shiny_rate,
        catalog_files: BTreeMap::from([("gen1".to_string(), source)]),
        catalog_fingerprints: BTreeMap::from([("gen1".to_string(), fingerprint(CATALOG))]),
        shiny_count_file: dir.path().join("logs/shiny_count.bin"),
        shiny_log_file: dir.path().join("logs/shinies_encountered.txt"),
        error_log_file: dir.path().join("logs/error.log"),
        ..Config::default()
    }
}

/// Next event that is not an elapsed-time tick.
async fn next_significant(hunt: &mut HuntHandle) -> HuntEvent {
    loop {
        let event = timeout(WAIT, hunt.next_event())
            .await
            .expect("timed out waiting for a hunt event")
            .expect("event channel closed");
        if !matches!(event, HuntEvent::Elapsed(_)) {
            return event;
        }
    }
}

#[tokio::test]
async fn test_rare_find_pauses_persists_and_resumes() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, 1, 0.01);
    let store = CatalogStore::new();

    let setup = HuntSetup::prepare(&config, &store).unwrap();
    assert_eq!(setup.total_finds(), 0);
    let mut hunt = setup.spawn(ChaCha8Rng::seed_from_u64(3));

    assert_eq!(
        next_significant(&mut hunt).await,
        HuntEvent::Started {
            total_finds: 0,
            catalog_size: 2
        }
    );

    let first_name = match next_significant(&mut hunt).await {
        HuntEvent::RareFound {
            event,
            total_finds,
            entry,
        } => {
            assert!(event.rare);
            assert_eq!(event.sequence, 1);
            assert_eq!(total_finds, 1);
            assert_eq!(entry.count, 1);
            assert_eq!(entry.rarity, "Common");
            event.name
        }
        other => panic!("expected a rare find, got {:?}", other),
    };
    assert_eq!(hunt.state(), HuntState::RareFound);

    // Paused: nothing else arrives until we continue
    assert!(
        timeout(Duration::from_millis(100), next_significant(&mut hunt))
            .await
            .is_err()
    );

    hunt.continue_hunt().await.unwrap();
    assert_eq!(next_significant(&mut hunt).await, HuntEvent::Resumed);

    match next_significant(&mut hunt).await {
        HuntEvent::RareFound {
            event, total_finds, ..
        } => {
            // Session counter restarts after a resume
            assert_eq!(event.sequence, 1);
            assert_eq!(total_finds, 2);
        }
        other => panic!("expected a rare find, got {:?}", other),
    }

    let outcome = timeout(WAIT, hunt.shutdown()).await.unwrap().unwrap();
    assert_eq!(outcome.progress.count(), 2);
    assert_eq!(outcome.engine.state(), HuntState::Idle);
    assert!(outcome.journal.get(&first_name).is_some());

    // Both stores survive a reopen
    let mut reopened = ProgressStore::new(&config.shiny_count_file);
    assert_eq!(reopened.load(), 2);
    let journal = EncounterJournal::open(&config.shiny_log_file, &config.error_log_file);
    let recorded: u64 = journal.entries().map(|e| e.count).sum();
    assert_eq!(recorded, 2);
}

#[tokio::test]
async fn test_ordinary_encounters_stream_while_running() {
    let dir = tempdir().unwrap();
    // Shiny odds so low the run never pauses
    let config = hunt_config(&dir, u32::MAX, 0.01);
    let store = CatalogStore::new();

    let mut hunt = HuntSetup::prepare(&config, &store)
        .unwrap()
        .spawn(ChaCha8Rng::seed_from_u64(11));

    assert!(matches!(
        next_significant(&mut hunt).await,
        HuntEvent::Started { .. }
    ));
    for expected in 1..=3u64 {
        match next_significant(&mut hunt).await {
            HuntEvent::Encounter(event) => {
                assert_eq!(event.sequence, expected);
                assert!(!event.rare);
                assert!(event.name == "Pidgey" || event.name == "Rattata");
            }
            other => panic!("expected an encounter, got {:?}", other),
        }
    }
    assert_eq!(hunt.state(), HuntState::Running);

    // Continue while running is ignored
    hunt.continue_hunt().await.unwrap();
    assert!(matches!(
        next_significant(&mut hunt).await,
        HuntEvent::Encounter(_)
    ));

    hunt.request_stop().await.unwrap();
    loop {
        if next_significant(&mut hunt).await == HuntEvent::Stopped {
            break;
        }
    }
    let outcome = hunt.shutdown().await.unwrap();
    assert_eq!(outcome.progress.count(), 0);
    assert!(outcome.journal.is_empty());
}

#[tokio::test]
async fn test_shutdown_does_not_wait_for_the_interval() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, 1, 3600.0);
    let store = CatalogStore::new();

    let mut hunt = HuntSetup::prepare(&config, &store)
        .unwrap()
        .spawn(ChaCha8Rng::seed_from_u64(1));
    assert!(matches!(
        next_significant(&mut hunt).await,
        HuntEvent::Started { .. }
    ));

    let outcome = timeout(Duration::from_secs(1), hunt.shutdown())
        .await
        .expect("shutdown should not wait an hour")
        .unwrap();
    assert_eq!(outcome.progress.count(), 0);
    assert_eq!(outcome.engine.session().encounters(), 0);
}

#[tokio::test]
async fn test_cancel_token_stops_a_paused_hunt() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, 1, 0.01);
    let store = CatalogStore::new();

    let mut hunt = HuntSetup::prepare(&config, &store)
        .unwrap()
        .spawn(ChaCha8Rng::seed_from_u64(5));
    let token = hunt.cancel_token();

    loop {
        if let HuntEvent::RareFound { .. } = next_significant(&mut hunt).await {
            break;
        }
    }
    token.cancel();

    assert_eq!(next_significant(&mut hunt).await, HuntEvent::Stopped);
    let outcome = timeout(WAIT, hunt.shutdown()).await.unwrap().unwrap();
    assert_eq!(outcome.progress.count(), 1);
}

#[tokio::test]
async fn test_existing_progress_is_picked_up() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, 1, 0.01);
    let mut seeded = ProgressStore::new(&config.shiny_count_file);
    seeded.save(41).unwrap();

    let store = CatalogStore::new();
    let mut hunt = HuntSetup::prepare(&config, &store)
        .unwrap()
        .spawn(ChaCha8Rng::seed_from_u64(9));

    assert_eq!(
        next_significant(&mut hunt).await,
        HuntEvent::Started {
            total_finds: 41,
            catalog_size: 2
        }
    );
    match next_significant(&mut hunt).await {
        HuntEvent::RareFound { total_finds, .. } => assert_eq!(total_finds, 42),
        other => panic!("expected a rare find, got {:?}", other),
    }
    hunt.shutdown().await.unwrap();
}

// ============================================================================
// Virtual clock
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_elapsed_ticks_freeze_on_rare_and_reset_on_continue() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, 2000, 10.25);
    // Step one is ordinary (no shiny, no hint); step two is the shiny
    let dice = ScriptedDice::new().with_rolls([2000, 400, 1]);
    let mut hunt = HuntSetup::prepare(&config, &CatalogStore::new())
        .unwrap()
        .spawn(dice);

    let mut ticks = Vec::new();
    loop {
        let event = timeout(Duration::from_secs(60), hunt.next_event())
            .await
            .unwrap()
            .unwrap();
        match event {
            HuntEvent::Elapsed(elapsed) => ticks.push(elapsed),
            HuntEvent::Started { .. } | HuntEvent::Encounter(_) => {}
            HuntEvent::RareFound { event, .. } => {
                assert_eq!(event.sequence, 2);
                break;
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    // One tick per second over the 20.5 s of hunting
    assert!(ticks.len() >= 19, "only {} ticks", ticks.len());
    assert!(ticks.windows(2).all(|pair| pair[0] <= pair[1]));
    assert!(*ticks.last().unwrap() <= Duration::from_millis(20_500));

    // Stopped on the find: the clock is frozen and nothing is emitted
    assert!(timeout(Duration::from_secs(30), hunt.next_event())
        .await
        .is_err());

    hunt.continue_hunt().await.unwrap();
    assert_eq!(
        timeout(Duration::from_secs(60), hunt.next_event())
            .await
            .unwrap(),
        Some(HuntEvent::Resumed)
    );
    match timeout(Duration::from_secs(60), hunt.next_event()).await.unwrap() {
        Some(HuntEvent::Elapsed(elapsed)) => assert!(elapsed <= Duration::from_secs(1)),
        other => panic!("expected a fresh tick, got {:?}", other),
    }

    hunt.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_ignored_continue_does_not_delay_next_encounter() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, u32::MAX, 10.0);
    let mut hunt = HuntSetup::prepare(&config, &CatalogStore::new())
        .unwrap()
        .spawn(ChaCha8Rng::seed_from_u64(21));
    assert!(matches!(
        next_significant(&mut hunt).await,
        HuntEvent::Started { .. }
    ));

    // Commands at 3, 6, 9 and 12 s; the step is still due at 10 s
    for _ in 0..4 {
        tokio::time::sleep(Duration::from_secs(3)).await;
        hunt.continue_hunt().await.unwrap();
    }

    let event = timeout(Duration::from_millis(1), next_significant(&mut hunt))
        .await
        .expect("first encounter should already be queued");
    assert!(matches!(event, HuntEvent::Encounter(e) if e.sequence == 1));

    hunt.shutdown().await.unwrap();
}

#[test]
fn test_missing_count_file_is_logged_and_created() {
    let dir = tempdir().unwrap();
    let config = hunt_config(&dir, 1, 0.01);
    let store = CatalogStore::new();

    let setup = HuntSetup::prepare(&config, &store).unwrap();

    assert_eq!(setup.total_finds(), 0);
    assert!(config.shiny_count_file.exists());
    let errors = fs::read_to_string(&config.error_log_file).unwrap();
    assert!(errors.contains("Shiny count file missing"));
    assert!(errors.contains(" - ERROR - "));
}
