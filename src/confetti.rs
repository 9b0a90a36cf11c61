//! Confetti bursts fired when a countdown completes. The burst is pure
//! state; the renderer maps flight fractions onto card cells.

use chrono::{DateTime, Utc};
use rand::RngExt;
use ratatui::style::Color;

use crate::types::TimerId;

pub const PIECES_PER_BURST: usize = 60;

/// The burst as a whole is dropped this long after spawning.
pub const BURST_TTL_MS: i64 = 1600;

const PALETTE: [Color; 5] = [
    Color::Rgb(0xff, 0x6b, 0x6b),
    Color::Rgb(0xff, 0xd9, 0x3d),
    Color::Rgb(0x6b, 0xcb, 0xef),
    Color::Rgb(0x51, 0xcf, 0x66),
    Color::Rgb(0x84, 0x5e, 0xf7),
];

const GLYPHS: [char; 6] = ['▪', '◆', '●', '▰', '◗', '▴'];

#[derive(Clone, Debug)]
pub struct ConfettiPiece {
    /// Horizontal position across the card, 0.0 ..= 1.0.
    pub x: f64,
    pub color: Color,
    pub glyph: char,
    /// Flight time of this piece alone.
    pub duration_ms: i64,
}

#[derive(Clone, Debug)]
pub struct ConfettiBurst {
    pub timer_id: TimerId,
    spawned_at: DateTime<Utc>,
    pieces: Vec<ConfettiPiece>,
}

impl ConfettiBurst {
    pub fn spawn(timer_id: TimerId, now: DateTime<Utc>) -> Self {
        let mut rng = rand::rng();
        let pieces = (0..PIECES_PER_BURST)
            .map(|_| ConfettiPiece {
                x: rng.random_range(0.0..1.0),
                color: PALETTE[rng.random_range(0..PALETTE.len())],
                glyph: GLYPHS[rng.random_range(0..GLYPHS.len())],
                duration_ms: rng.random_range(800..1400),
            })
            .collect();
        Self {
            timer_id,
            spawned_at: now,
            pieces,
        }
    }

    pub fn elapsed_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.spawned_at).num_milliseconds()
    }

    pub fn expired(&self, now: DateTime<Utc>) -> bool {
        self.elapsed_ms(now) >= BURST_TTL_MS
    }

    /// Pieces still airborne at `elapsed_ms`, each paired with how far
    /// through its flight it is (0.0 at launch, toward 1.0 at burnout).
    pub fn airborne(&self, elapsed_ms: i64) -> impl Iterator<Item = (&ConfettiPiece, f64)> + '_ {
        self.pieces.iter().filter_map(move |piece| {
            if elapsed_ms < 0 || elapsed_ms >= piece.duration_ms {
                return None;
            }
            Some((piece, elapsed_ms as f64 / piece.duration_ms as f64))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burst() -> ConfettiBurst {
        ConfettiBurst::spawn(42, Utc::now())
    }

    #[test]
    fn spawns_sixty_pieces_from_the_palette() {
        let burst = burst();
        let pieces: Vec<_> = burst.airborne(0).collect();
        assert_eq!(pieces.len(), PIECES_PER_BURST);
        for (piece, fraction) in pieces {
            assert!(PALETTE.contains(&piece.color));
            assert!(GLYPHS.contains(&piece.glyph));
            assert!((0.0..1.0).contains(&piece.x));
            assert!((800..1400).contains(&piece.duration_ms));
            assert_eq!(fraction, 0.0);
        }
    }

    #[test]
    fn every_piece_flies_for_at_least_its_minimum() {
        let burst = burst();
        assert_eq!(burst.airborne(799).count(), PIECES_PER_BURST);
    }

    #[test]
    fn all_pieces_land_before_the_burst_expires() {
        let burst = burst();
        assert_eq!(burst.airborne(1400).count(), 0);
        assert_eq!(burst.airborne(BURST_TTL_MS).count(), 0);
    }

    #[test]
    fn flight_fraction_advances_with_time() {
        let burst = burst();
        let early: Vec<f64> = burst.airborne(100).map(|(_, f)| f).collect();
        let late: Vec<f64> = burst.airborne(700).map(|(_, f)| f).collect();
        assert_eq!(early.len(), late.len());
        for (a, b) in early.iter().zip(&late) {
            assert!(b > a);
        }
    }

    #[test]
    fn burst_expires_at_ttl() {
        let now = Utc::now();
        let burst = ConfettiBurst::spawn(7, now);
        assert!(!burst.expired(now + chrono::TimeDelta::milliseconds(BURST_TTL_MS - 1)));
        assert!(burst.expired(now + chrono::TimeDelta::milliseconds(BURST_TTL_MS)));
    }

    #[test]
    fn negative_elapsed_shows_nothing() {
        let burst = burst();
        assert_eq!(burst.airborne(-50).count(), 0);
    }
}
