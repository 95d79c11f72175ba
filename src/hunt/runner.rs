//! Background tasks that drive a hunt.
//!
//! The encounter task owns the engine, the progress store and the journal;
//! nothing else mutates them. The ticker only learns about state changes
//! through a watch channel.

use super::types::{HuntCommand, HuntError, HuntEvent};
use crate::catalog::CatalogStore;
use crate::config::Config;
use crate::constants::{ELAPSED_TICK_MS, HUNT_COMMAND_BUFFER};
use crate::encounter::{Dice, EncounterEngine, HuntState};
use crate::journal::EncounterJournal;
use crate::progress_store::ProgressStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything a hunt needs, validated and ready to spawn.
#[derive(Debug)]
pub struct HuntSetup {
    engine: EncounterEngine,
    progress: ProgressStore,
    journal: EncounterJournal,
    interval: Duration,
}

impl HuntSetup {
    /// Open the stores and build the engine from the merged catalog.
    ///
    /// Catalog problems are forwarded to the error log. Fails only when no
    /// creature can be encountered.
    pub fn prepare(config: &Config, catalogs: &CatalogStore) -> Result<Self, HuntError> {
        let journal = EncounterJournal::open(&config.shiny_log_file, &config.error_log_file);

        if !config.shiny_count_file.exists() {
            journal.record_error(&format!(
                "Shiny count file missing: {}",
                config.shiny_count_file.display()
            ));
        }
        let mut progress = ProgressStore::new(&config.shiny_count_file);
        progress.load();

        let load = catalogs.load(config);
        for issue in &load.issues {
            journal.record_error(&issue.to_string());
        }

        let engine = match EncounterEngine::from_config(Arc::clone(&load.catalog), config) {
            Ok(engine) => engine,
            Err(e) => {
                journal.record_error(&format!("Hunt not started: {}", e));
                return Err(e.into());
            }
        };

        info!(
            creatures = engine.catalog().len(),
            selectable = engine.selectable_entries(),
            total_finds = progress.count(),
            "Hunt ready"
        );

        Ok(Self {
            engine,
            progress,
            journal,
            interval: config.encounter_interval(),
        })
    }

    pub fn engine(&self) -> &EncounterEngine {
        &self.engine
    }

    pub fn total_finds(&self) -> u64 {
        self.progress.count()
    }

    pub fn journal(&self) -> &EncounterJournal {
        &self.journal
    }

    /// Start both background tasks. Must be called inside a tokio runtime.
    pub fn spawn<D>(self, dice: D) -> HuntHandle
    where
        D: Dice + Send + 'static,
    {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (command_tx, command_rx) = mpsc::channel(HUNT_COMMAND_BUFFER);
        let (state_tx, state_rx) = watch::channel(HuntState::Idle);
        let cancel = CancellationToken::new();

        let ticker_task = tokio::spawn(run_ticker(
            event_tx.clone(),
            state_rx.clone(),
            cancel.clone(),
        ));
        let encounter_task = tokio::spawn(run_encounters(
            self,
            dice,
            event_tx,
            command_rx,
            state_tx,
            cancel.clone(),
        ));

        HuntHandle {
            events: event_rx,
            commands: command_tx,
            state: state_rx,
            cancel,
            encounter_task,
            ticker_task,
        }
    }
}

/// What is left once the hunt has shut down.
#[derive(Debug)]
pub struct HuntOutcome {
    pub engine: EncounterEngine,
    pub progress: ProgressStore,
    pub journal: EncounterJournal,
}

/// Presentation-side handle to a running hunt.
pub struct HuntHandle {
    events: mpsc::UnboundedReceiver<HuntEvent>,
    commands: mpsc::Sender<HuntCommand>,
    state: watch::Receiver<HuntState>,
    cancel: CancellationToken,
    encounter_task: JoinHandle<HuntOutcome>,
    ticker_task: JoinHandle<()>,
}

impl HuntHandle {
    /// Next event, or `None` once both tasks have finished.
    pub async fn next_event(&mut self) -> Option<HuntEvent> {
        self.events.recv().await
    }

    pub fn state(&self) -> HuntState {
        *self.state.borrow()
    }

    /// Resume after a rare find. Ignored while the hunt is running.
    pub async fn continue_hunt(&self) -> Result<(), HuntError> {
        self.commands
            .send(HuntCommand::Continue)
            .await
            .map_err(|_| HuntError::Closed)
    }

    /// Ask the encounter loop to exit after its current step.
    pub async fn request_stop(&self) -> Result<(), HuntError> {
        self.commands
            .send(HuntCommand::Shutdown)
            .await
            .map_err(|_| HuntError::Closed)
    }

    /// Token that stops both tasks when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Cancel both tasks, wait for them, and hand back the stores.
    pub async fn shutdown(self) -> Result<HuntOutcome, HuntError> {
        self.cancel.cancel();
        let outcome = self
            .encounter_task
            .await
            .map_err(|e| HuntError::TaskFailed(e.to_string()))?;
        self.ticker_task
            .await
            .map_err(|e| HuntError::TaskFailed(e.to_string()))?;
        Ok(outcome)
    }
}

async fn run_encounters<D: Dice>(
    setup: HuntSetup,
    mut dice: D,
    events: mpsc::UnboundedSender<HuntEvent>,
    mut commands: mpsc::Receiver<HuntCommand>,
    state: watch::Sender<HuntState>,
    cancel: CancellationToken,
) -> HuntOutcome {
    let HuntSetup {
        mut engine,
        mut progress,
        mut journal,
        interval,
    } = setup;

    // The receiver may already be gone; the loop keeps running for the stores
    let emit = |event: HuntEvent| {
        let _ = events.send(event);
    };

    if let Err(e) = engine.start() {
        journal.record_error(&format!("Hunt not started: {}", e));
    } else {
        state.send_replace(HuntState::Running);
        emit(HuntEvent::Started {
            total_finds: progress.count(),
            catalog_size: engine.catalog().len(),
        });
        info!(interval_ms = interval.as_millis() as u64, "Encounter loop started");

        'hunt: loop {
            // One deadline per step; ignored commands do not push it back
            let next_step = tokio::time::sleep(interval);
            tokio::pin!(next_step);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break 'hunt,
                    command = commands.recv() => match command {
                        Some(HuntCommand::Continue) => debug!("Continue ignored while hunting"),
                        Some(HuntCommand::Shutdown) | None => break 'hunt,
                    },
                    _ = &mut next_step => break,
                }
            }

            let event = match engine.step(&mut dice) {
                Ok(event) => event,
                Err(e) => {
                    journal.record_error(&format!("Encounter step failed: {}", e));
                    break 'hunt;
                }
            };

            if !event.rare {
                if event.hinted {
                    debug!(sequence = event.sequence, "Shiny hint");
                }
                emit(HuntEvent::Encounter(event));
                continue;
            }

            let encounters = event.sequence;
            let (total_finds, saved) = progress.record_find();
            if let Err(e) = saved {
                journal.record_error(&format!("Error saving shiny count: {}", e));
            }
            let entry = journal.record_rare(&event.name, &event.rarity);
            info!(
                name = %event.name,
                rarity = %event.rarity,
                encounters,
                total_finds,
                "Shiny found"
            );

            state.send_replace(HuntState::RareFound);
            emit(HuntEvent::RareFound {
                event,
                total_finds,
                entry,
            });

            let resume = tokio::select! {
                _ = cancel.cancelled() => false,
                command = commands.recv() => matches!(command, Some(HuntCommand::Continue)),
            };
            if !resume {
                break 'hunt;
            }

            if let Err(e) = engine.continue_hunt() {
                warn!(error = %e, "Could not resume hunt");
                break 'hunt;
            }
            state.send_replace(HuntState::Running);
            emit(HuntEvent::Resumed);
        }
    }

    engine.shutdown();
    state.send_replace(HuntState::Idle);
    emit(HuntEvent::Stopped);
    info!("Encounter loop stopped");

    HuntOutcome {
        engine,
        progress,
        journal,
    }
}

async fn run_ticker(
    events: mpsc::UnboundedSender<HuntEvent>,
    mut state: watch::Receiver<HuntState>,
    cancel: CancellationToken,
) {
    let mut ticks = tokio::time::interval(Duration::from_millis(ELAPSED_TICK_MS));
    ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut current = *state.borrow_and_update();
    let mut elapsed = Duration::ZERO;
    let mut last = Instant::now();

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let next = *state.borrow_and_update();
                let now = Instant::now();
                if current == HuntState::Running {
                    elapsed += now - last;
                }
                if next == HuntState::Running && current != HuntState::Running {
                    if current == HuntState::RareFound {
                        elapsed = Duration::ZERO;
                    }
                    last = now;
                }
                current = next;
            }
            _ = ticks.tick() => {
                if current == HuntState::Running {
                    let now = Instant::now();
                    elapsed += now - last;
                    last = now;
                    if events.send(HuntEvent::Elapsed(elapsed)).is_err() {
                        break;
                    }
                }
            }
        }
    }
}
