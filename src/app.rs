use std::path::PathBuf;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use crate::core::{
    config::ConfigManager,
    engine::{Fader, TickReport},
    host::MemoryHost,
    model::{Condition, Rect},
    registry,
};

const TICK: Duration = Duration::from_millis(16);
const RELOAD_EVERY: Duration = Duration::from_secs(5);
const CELL: f32 = 64.0;
const COLUMNS: usize = 8;

/// Condition toggles for the demo host, keyed by seconds since start.
/// The script loops.
const TIMETABLE: &[(f32, Condition, bool)] = &[
    (2.0, Condition::Combat, true),
    (2.1, Condition::Combat, false),
    (2.2, Condition::Combat, true),
    (6.0, Condition::Combat, false),
    (9.0, Condition::Mounted, true),
    (13.0, Condition::Mounted, false),
    (15.0, Condition::ChatActivity, true),
    (16.0, Condition::ChatActivity, false),
];
const SCRIPT_LENGTH: f32 = 20.0;

/// In-memory stand-in for a real HUD: every tracked element laid out on a
/// grid, a pointer sweeping across it, and conditions from [`TIMETABLE`].
struct ScriptedHost {
    host: MemoryHost,
    cursor: usize,
    lap: u64,
}

impl ScriptedHost {
    fn new() -> Self {
        let mut host = MemoryHost::new();
        for (i, (id, _)) in registry::tracked_elements().iter().enumerate() {
            let x = (i % COLUMNS) as f32 * CELL;
            let y = (i / COLUMNS) as f32 * CELL;
            host.present(*id, Rect::new(x, y, CELL - 4.0, CELL - 4.0));
        }
        Self {
            host,
            cursor: 0,
            lap: 0,
        }
    }

    fn advance(&mut self, elapsed: Duration) {
        let secs = elapsed.as_secs_f32();
        let lap = (secs / SCRIPT_LENGTH) as u64;
        if lap != self.lap {
            self.lap = lap;
            self.cursor = 0;
        }
        let t = secs % SCRIPT_LENGTH;
        while let Some((at, condition, value)) = TIMETABLE.get(self.cursor) {
            if *at > t {
                break;
            }
            log::debug!("script: {:?} -> {}", condition, value);
            self.host.set_condition(*condition, *value);
            self.cursor += 1;
        }

        // one sweep along the top row every script lap
        let x = (t / SCRIPT_LENGTH) * COLUMNS as f32 * CELL;
        self.host.move_pointer(x, CELL / 2.0);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = tracing_subscriber::fmt().with_env_filter(filter).try_init() {
        eprintln!("Logging already initialised: {}", e);
    }
}

async fn drive(config_manager: ConfigManager) {
    let mut fader = Fader::new(config_manager.load());
    let mut scripted = ScriptedHost::new();
    let started = Instant::now();
    let mut last_tick = started;
    let mut last_reload = started;
    let mut ticker = tokio::time::interval(TICK);
    let mut was_settled = false;

    log::info!(
        "Driving {} elements at {}ms per tick",
        registry::tracked_elements().len(),
        TICK.as_millis()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now = Instant::now();
                let dt = now.saturating_duration_since(last_tick);
                last_tick = now;

                // Hot-reload
                if now.saturating_duration_since(last_reload) >= RELOAD_EVERY {
                    last_reload = now;
                    let reloaded = config_manager.load();
                    if &reloaded != fader.settings() {
                        fader.update_config(reloaded);
                    }
                }

                scripted.advance(now.saturating_duration_since(started));
                if let TickReport::Applied { settled, .. } =
                    fader.tick(&mut scripted.host, now, dt)
                {
                    if settled != was_settled {
                        log::debug!("settled: {}", settled);
                        was_settled = settled;
                    }
                }
            }
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    log::error!("Failed to listen for Ctrl-C: {}", e);
                }
                break;
            }
        }
    }

    fader.shutdown(&mut scripted.host);
}

pub fn run() {
    init_logging();

    let config_dir = std::env::var("HUD_FADER_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."));
    log::info!("Using configuration in {}", config_dir.display());
    let config_manager = ConfigManager::new(config_dir);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            log::error!("Could not start runtime: {}", e);
            return;
        }
    };
    runtime.block_on(drive(config_manager));
}
