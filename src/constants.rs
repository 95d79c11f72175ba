// Encounter timing
pub const DEFAULT_ENCOUNTER_DELAY_SECONDS: f64 = 2.5;
pub const ELAPSED_TICK_MS: u64 = 1000;

// Rare roll
pub const DEFAULT_SHINY_RATE: u32 = 2000;
pub const HINT_RATE_DIVISOR: u32 = 5;

// Default rarity weights
pub const DEFAULT_RARITY_WEIGHTS: [(&str, f64); 5] = [
    ("Very Common", 45.0),
    ("Common", 30.0),
    ("Semi-rare", 17.0),
    ("Rare", 7.0),
    ("Very Rare", 1.0),
];

// Files under the data root
pub const DEFAULT_CONFIG_FILE: &str = "config.json";
pub const DEFAULT_SHINY_COUNT_FILE: &str = "logs/shiny_count.bin";
pub const DEFAULT_SHINY_LOG_FILE: &str = "logs/shinies_encountered.txt";
pub const DEFAULT_ERROR_LOG_FILE: &str = "logs/error.log";

// Bundled catalog sources (name, path relative to a root)
pub const DEFAULT_CATALOG_FILES: [(&str, &str); 2] = [
    ("gen1", "assets/data/gen1_names.txt"),
    ("gen2", "assets/data/gen2_names.txt"),
];

// Pending operator commands (continue/shutdown) the hunt task will queue
pub const HUNT_COMMAND_BUFFER: usize = 8;
