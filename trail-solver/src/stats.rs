//! Search statistics tracking.

use std::fmt;
use std::time::Instant;

use log::info;
use serde::Serialize;
use trail_core::Player;

/// Peak resident set size of this process in bytes.
/// Returns None if unable to determine.
#[cfg(unix)]
pub fn peak_memory() -> Option<u64> {
    let mut usage = std::mem::MaybeUninit::<libc::rusage>::zeroed();
    // SAFETY: getrusage only writes into the struct we hand it
    let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, usage.as_mut_ptr()) };
    if rc != 0 {
        return None;
    }
    let max_rss = unsafe { usage.assume_init() }.ru_maxrss as u64;

    // macOS reports bytes, everything else kilobytes
    if cfg!(target_os = "macos") {
        Some(max_rss)
    } else {
        Some(max_rss * 1024)
    }
}

#[cfg(not(unix))]
pub fn peak_memory() -> Option<u64> {
    None
}

/// Format bytes as human-readable string.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = 0;
    while value >= 1024.0 && unit + 1 < UNITS.len() {
        value /= 1024.0;
        unit += 1;
    }
    let precision = if unit + 1 == UNITS.len() { 2 } else { 1 };
    format!("{value:.precision$} {}", UNITS[unit])
}

/// Wall-clock bookkeeping for rates and progress lines.
#[derive(Debug, Clone, Copy)]
struct Clock {
    started: Instant,
    last_report: Instant,
    nodes_at_last_report: u64,
}

impl Default for Clock {
    fn default() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            last_report: now,
            nodes_at_last_report: 0,
        }
    }
}

/// Statistics collected during searching.
#[derive(Debug, Default, Serialize)]
pub struct SearchStats {
    /// Nodes searched (internal, terminal and playout leaves; not cache hits)
    pub nodes: u64,
    /// Usable entry already in the transposition table
    pub cache_hits: u64,

    /// Positions where the side to move was stuck, split by winner
    pub terminal_positions: u64,
    pub first_player_wins: u64,
    pub second_player_wins: u64,

    /// Horizon leaves estimated by playouts, and random games played for them
    pub playouts: u64,
    pub playout_games: u64,

    /// Moves dropped as symmetric to an earlier sibling
    pub symmetry_skips: u64,
    /// Sibling moves skipped by alpha-beta cutoffs
    pub branches_pruned: u64,

    /// Deepest ply reached
    pub max_depth: u64,

    #[serde(skip)]
    clock: Clock,
}

impl SearchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a terminal position won by `winner`
    pub fn record_terminal(&mut self, winner: Player) {
        self.terminal_positions += 1;
        *match winner {
            Player::One => &mut self.first_player_wins,
            Player::Two => &mut self.second_player_wins,
        } += 1;
    }

    /// Record a playout estimate of `games` random games
    pub fn record_playout(&mut self, games: u32) {
        self.playouts += 1;
        self.playout_games += u64::from(games);
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.clock.started.elapsed().as_secs_f64()
    }

    /// Average nodes per second since creation
    pub fn nodes_per_sec(&self) -> f64 {
        rate(self.nodes, self.elapsed_secs())
    }

    /// Share of considered moves that cutoffs skipped, in percent
    pub fn pruned_percent(&self) -> f64 {
        let considered = self.nodes + self.branches_pruned;
        if considered == 0 {
            0.0
        } else {
            100.0 * self.branches_pruned as f64 / considered as f64
        }
    }

    /// Check if we should log progress
    pub fn should_log(&self, interval_secs: u64) -> bool {
        self.clock.last_report.elapsed().as_secs() >= interval_secs
    }

    /// Log progress and reset log timer
    pub fn log_progress(&mut self, table_size: usize) {
        let since_last = self.clock.last_report.elapsed().as_secs_f64();
        let recent_rate = rate(self.nodes - self.clock.nodes_at_last_report, since_last);
        let mem = peak_memory()
            .map(|bytes| format!(" mem={}", format_bytes(bytes)))
            .unwrap_or_default();

        info!(
            "[{}] nodes={} unique={} cache_hits={} rate={:.0}/s depth={} pruned={:.1}%{}",
            hms(self.clock.started.elapsed().as_secs()),
            self.nodes,
            table_size,
            self.cache_hits,
            recent_rate,
            self.max_depth,
            self.pruned_percent(),
            mem,
        );
        info!(
            "           terminals: first={} second={} playouts={} symmetric={}",
            self.first_player_wins, self.second_player_wins, self.playouts, self.symmetry_skips
        );

        self.clock.last_report = Instant::now();
        self.clock.nodes_at_last_report = self.nodes;
    }
}

fn rate(count: u64, secs: f64) -> f64 {
    if secs > 0.0 {
        count as f64 / secs
    } else {
        0.0
    }
}

fn hms(secs: u64) -> String {
    format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

impl fmt::Display for SearchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Nodes searched: {}", self.nodes)?;
        writeln!(f, "Cache hits: {}", self.cache_hits)?;
        writeln!(f, "Terminal positions: {}", self.terminal_positions)?;
        writeln!(f, "  - First player wins: {}", self.first_player_wins)?;
        writeln!(f, "  - Second player wins: {}", self.second_player_wins)?;
        writeln!(f, "Playouts: {} ({} games)", self.playouts, self.playout_games)?;
        writeln!(f, "Symmetric moves skipped: {}", self.symmetry_skips)?;
        writeln!(
            f,
            "Branches pruned: {} ({:.1}%)",
            self.branches_pruned,
            self.pruned_percent()
        )?;
        writeln!(f, "Max depth: {}", self.max_depth)?;
        write!(f, "Average rate: {:.0} nodes/sec", self.nodes_per_sec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(5 * 1024 * 1024), "5.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024), "3.00 GB");
    }

    #[test]
    fn test_hms() {
        assert_eq!(hms(0), "00:00:00");
        assert_eq!(hms(3725), "01:02:05");
    }

    #[test]
    fn test_record_terminal() {
        let mut stats = SearchStats::new();
        stats.record_terminal(Player::One);
        stats.record_terminal(Player::Two);
        stats.record_terminal(Player::Two);
        assert_eq!(stats.terminal_positions, 3);
        assert_eq!(stats.first_player_wins, 1);
        assert_eq!(stats.second_player_wins, 2);
    }

    #[test]
    fn test_record_playout() {
        let mut stats = SearchStats::new();
        stats.record_playout(100);
        stats.record_playout(100);
        assert_eq!(stats.playouts, 2);
        assert_eq!(stats.playout_games, 200);
    }

    #[test]
    fn test_pruned_percent() {
        let mut stats = SearchStats::new();
        assert_eq!(stats.pruned_percent(), 0.0);
        stats.nodes = 30;
        stats.branches_pruned = 10;
        assert_eq!(stats.pruned_percent(), 25.0);
    }

    #[test]
    fn test_summary_mentions_counts() {
        let mut stats = SearchStats::new();
        stats.nodes = 17;
        stats.branches_pruned = 3;
        let summary = stats.to_string();
        assert!(summary.contains("Nodes searched: 17"));
        assert!(summary.contains("Branches pruned: 3 (15.0%)"));
    }

    #[test]
    fn test_serialized_counters() {
        let mut stats = SearchStats::new();
        stats.nodes = 4;
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["nodes"], 4);
        assert!(json.get("clock").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_peak_memory_reported() {
        assert!(peak_memory().is_some_and(|bytes| bytes > 0));
    }
}
