/// Random card selection and visit-then-remove
use crate::error::Result;
use crate::link_data::LinkEntry;
use crate::storage::{KeyValueStore, LinkPool};
use crate::tabs::TabService;

/// Source of uniform floats in `[0, 1)`
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

impl<F: FnMut() -> f64> RandomSource for F {
    fn next_unit(&mut self) -> f64 {
        self()
    }
}

/// Randomness from the platform (Web Crypto in the browser)
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_unit(&mut self) -> f64 {
        let mut buf = [0u8; 8];
        if let Err(e) = getrandom::getrandom(&mut buf) {
            log::error!("getrandom failed, falling back to first card: {}", e);
            return 0.0;
        }
        // 53 random bits give every representable step in [0, 1)
        (u64::from_le_bytes(buf) >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Pick one entry uniformly at random, `None` when the pool is empty
pub fn pick<'a>(entries: &'a [LinkEntry], rng: &mut impl RandomSource) -> Option<&'a LinkEntry> {
    if entries.is_empty() {
        return None;
    }
    let index = (rng.next_unit() * entries.len() as f64).floor() as usize;
    entries.get(index.min(entries.len() - 1))
}

/// What the card area shows
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CardState {
    #[default]
    Idle,
    ShowingCard(LinkEntry),
    Exhausted,
}

impl CardState {
    /// Draw a card: used for both "random card" and "next random"
    pub fn draw(entries: &[LinkEntry], rng: &mut impl RandomSource) -> CardState {
        match pick(entries, rng) {
            Some(entry) => CardState::ShowingCard(entry.clone()),
            None => CardState::Exhausted,
        }
    }

    pub fn card(&self) -> Option<&LinkEntry> {
        match self {
            CardState::ShowingCard(entry) => Some(entry),
            _ => None,
        }
    }
}

/// Remove `entry` from the pool, then open it, then draw the next card
///
/// The removal is persisted before the tab is opened: opening a tab closes
/// the popup, and nothing after that call is guaranteed to run. A failed open
/// is returned as an error but the entry stays removed.
pub async fn visit<S, T>(
    pool: &LinkPool<S>,
    tabs: &T,
    entry: &LinkEntry,
    rng: &mut impl RandomSource,
) -> Result<CardState>
where
    S: KeyValueStore,
    T: TabService,
{
    pool.remove_by_url(&entry.url).await?;
    tabs.open_tab(&entry.url, true).await?;

    Ok(CardState::draw(&pool.snapshot().entries, rng))
}
