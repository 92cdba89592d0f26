//! Application-level configuration constants.

// Storage
/// Bump the version suffix whenever the persisted shape changes.
pub const STORAGE_KEY: &str = "poker-store-v10";
pub const STORAGE_ENVELOPE_VERSION: u32 = 0;
pub const MAX_BACKGROUND_IMAGE_BYTES: usize = 4 * 1024 * 1024;

// Timer behavior
pub const TICK_MS: u32 = 1_000;
pub const SECONDS_PER_MINUTE: u32 = 60;

// Default values for levels
pub const DEFAULT_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_LEVEL_MINUTES: u32 = 15;
pub const DEFAULT_STRUCTURE_MINUTES: u32 = 20;
pub const FIRST_SUGGESTED_SMALL_BLIND: u64 = 25;
pub const MIN_SUGGESTED_ANTE: u64 = 5;

/// Clean blind denominations used when suggesting the next level.
pub const BLIND_LADDER: [u64; 33] = [
    5, 10, 15, 20, 25, 30, 40, 50, 60, 75, 100, 200, 300, 400, 500, 600, 800, 1_000, 1_200,
    1_500, 2_000, 3_000, 4_000, 5_000, 6_000, 8_000, 10_000, 12_000, 15_000, 20_000, 30_000,
    40_000, 50_000,
];

// Default values for the player panel
pub const DEFAULT_INITIAL_STACK: u64 = 20_000;

// Display defaults
pub const DEFAULT_BACKGROUND_COLOR: &str = "#1a202c";
pub const DEFAULT_TEXT_COLOR: &str = "#ffffff";
pub const DEFAULT_IMAGE_OPACITY: f64 = 0.5;
pub const DEFAULT_TOURNAMENT_TITLE: &str = "Tournament";
pub const DEFAULT_PRIZE_COUNT: u32 = 3;

// Min/Max limits for input fields
pub const MAX_LEVEL_MINUTES: u32 = 600;
pub const MAX_PLAYERS: u64 = 100_000;
