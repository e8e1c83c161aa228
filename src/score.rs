//! Round scoring and session accumulation.
//!
//! In-process counterpart of the score service finished rounds are
//! reported to: accepts round summaries, maintains per-player session
//! totals, a leaderboard and global statistics.  Boundary types serialize
//! as camelCase JSON; the transport itself lives outside this crate.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::info;

// ── Round summary ──────────────────────────────────────────

/// One finished round as reported by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSummary {
    pub player_name: String,
    pub score: u32,
    pub hits: u32,
    pub misses: u32,
    /// Round number within the session, starting at 1.
    pub round: u32,
    pub session_id: String,
    pub coins_spawned: u32,
    /// Round length in seconds.
    pub round_duration: u32,
    pub timestamp_ms: u64,
}

impl RoundSummary {
    /// Hit percentage over all shots, 0 when no shots were taken.
    pub fn accuracy(&self) -> f64 {
        accuracy_pct(self.hits, self.misses)
    }
}

fn accuracy_pct(hits: u32, misses: u32) -> f64 {
    let shots = hits + misses;
    if shots == 0 {
        return 0.0;
    }
    round2(hits as f64 / shots as f64 * 100.0)
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

// ── Session totals ─────────────────────────────────────────

/// Accumulated totals for one player session, returned on every submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTotals {
    pub player_name: String,
    pub total_rounds: u32,
    pub total_score: u32,
    pub total_hits: u32,
    pub total_misses: u32,
    /// Accuracy over the whole session, recomputed from totals.
    pub average_accuracy: f64,
    pub highest_score: u32,
    pub is_active: bool,
}

/// One session's running totals.  Individual rounds live in the book's
/// round log.
#[derive(Debug, Clone)]
struct PlayerSession {
    totals: SessionTotals,
}

impl PlayerSession {
    fn new(player_name: &str) -> Self {
        Self {
            totals: SessionTotals {
                player_name: player_name.to_string(),
                total_rounds: 0,
                total_score: 0,
                total_hits: 0,
                total_misses: 0,
                average_accuracy: 0.0,
                highest_score: 0,
                is_active: true,
            },
        }
    }

    fn add_round(&mut self, round: &RoundSummary) {
        let t = &mut self.totals;
        t.total_rounds += 1;
        t.total_score += round.score;
        t.total_hits += round.hits;
        t.total_misses += round.misses;
        t.highest_score = t.highest_score.max(round.score);
        t.average_accuracy = accuracy_pct(t.total_hits, t.total_misses);
    }
}

// ── Player & global stats ──────────────────────────────────

/// Lifetime statistics for one player, across all sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStats {
    pub player_name: String,
    pub total_games: u32,
    pub total_score: u32,
    pub average_score: f64,
    pub highest_score: u32,
    pub total_hits: u32,
    pub total_misses: u32,
    pub overall_accuracy: f64,
}

/// Statistics across every player.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_games: u32,
    pub total_players: u32,
    /// Best round on record: (player, score).
    pub highest_score: Option<(String, u32)>,
}

// ── Score book ─────────────────────────────────────────────

/// In-memory score store: every submitted round plus per-player sessions.
#[derive(Debug, Default)]
pub struct ScoreBook {
    rounds: Vec<RoundSummary>,
    sessions: Vec<PlayerSession>,
}

impl ScoreBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished round and fold it into the player's active
    /// session (opening one if none is active).  Returns the updated
    /// session totals.
    pub fn submit(&mut self, round: RoundSummary) -> SessionTotals {
        info!(
            "round submitted: {} scored {} ({} hits / {} misses)",
            round.player_name, round.score, round.hits, round.misses,
        );

        let session = match self.active_session(&round.player_name) {
            Some(idx) => &mut self.sessions[idx],
            None => {
                self.sessions.push(PlayerSession::new(&round.player_name));
                self.sessions.last_mut().unwrap()
            }
        };
        session.add_round(&round);
        let totals = session.totals.clone();

        self.rounds.push(round);
        totals
    }

    /// Close the player's active session.  Returns its final totals, or
    /// None when no session is active.
    pub fn end_session(&mut self, player_name: &str) -> Option<SessionTotals> {
        let idx = self.active_session(player_name)?;
        self.sessions[idx].totals.is_active = false;
        Some(self.sessions[idx].totals.clone())
    }

    /// Top rounds by score, descending, ties broken by recency.
    pub fn leaderboard(&self, limit: usize) -> Vec<&RoundSummary> {
        let mut entries: Vec<&RoundSummary> = self.rounds.iter().collect();
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.timestamp_ms.cmp(&a.timestamp_ms))
        });
        entries.truncate(limit);
        entries
    }

    /// Lifetime stats for a player, or None with no rounds on record.
    pub fn player_stats(&self, player_name: &str) -> Option<PlayerStats> {
        let rounds: Vec<&RoundSummary> = self
            .rounds
            .iter()
            .filter(|r| r.player_name == player_name)
            .collect();
        if rounds.is_empty() {
            return None;
        }

        let total_games = rounds.len() as u32;
        let total_score: u32 = rounds.iter().map(|r| r.score).sum();
        let total_hits: u32 = rounds.iter().map(|r| r.hits).sum();
        let total_misses: u32 = rounds.iter().map(|r| r.misses).sum();
        let highest_score = rounds.iter().map(|r| r.score).max().unwrap_or(0);

        Some(PlayerStats {
            player_name: player_name.to_string(),
            total_games,
            total_score,
            average_score: round2(total_score as f64 / total_games as f64),
            highest_score,
            total_hits,
            total_misses,
            overall_accuracy: accuracy_pct(total_hits, total_misses),
        })
    }

    /// Statistics across all recorded rounds.
    pub fn global_stats(&self) -> GlobalStats {
        let players: HashSet<&str> = self.rounds.iter().map(|r| r.player_name.as_str()).collect();
        let best = self
            .rounds
            .iter()
            .max_by_key(|r| r.score)
            .map(|r| (r.player_name.clone(), r.score));
        GlobalStats {
            total_games: self.rounds.len() as u32,
            total_players: players.len() as u32,
            highest_score: best,
        }
    }

    /// All sessions recorded for a player, newest last.
    pub fn sessions(&self, player_name: &str) -> Vec<&SessionTotals> {
        self.sessions
            .iter()
            .filter(|s| s.totals.player_name == player_name)
            .map(|s| &s.totals)
            .collect()
    }

    /// Index of the player's most recent active session.
    fn active_session(&self, player_name: &str) -> Option<usize> {
        self.sessions
            .iter()
            .rposition(|s| s.totals.player_name == player_name && s.totals.is_active)
    }
}

// ── Test helpers ───────────────────────────────────────────

#[cfg(test)]
fn round(player: &str, n: u32, score: u32, hits: u32, misses: u32) -> RoundSummary {
    RoundSummary {
        player_name: player.to_string(),
        score,
        hits,
        misses,
        round: n,
        session_id: format!("session-{player}"),
        coins_spawned: hits + misses + 2,
        round_duration: 90,
        timestamp_ms: 1_000 * n as u64,
    }
}

// ── Tests ──────────────────────────────────────────────────
