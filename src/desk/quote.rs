use chrono::NaiveDate;
use rand::seq::SliceRandom;
use rand::Rng;

use super::store::{JsonStore, StoreError};

const DATE_KEY: &str = "date";
const QUOTE_KEY: &str = "quote";
const FAVORITES_KEY: &str = "favorites";
const FAVORITES_FIELD: &str = "quotes";

pub const BUILTIN_QUOTES: [&str; 5] = [
    "It is better to fail in originality than to succeed in imitation. \u{2014}Herman Melville",
    "The road to success and the road to failure are almost exactly the same. \u{2014}Colin R. Davis",
    "Success usually comes to those who are too busy to be looking for it. \u{2014}Henry David Thoreau",
    "Don\u{2019}t let yesterday take up too much of today.\u{2014}Will Rogers",
    "Education is the most powerful weapon which you can use to change the world.\u{2014}Nelson Mandela",
];

/// Today's quote and the favorites list, both kept in a [`JsonStore`].
pub struct QuoteBook {
    store: JsonStore,
    corpus: Vec<String>,
}

impl QuoteBook {
    /// Builds a book over the built-in quotes plus `extra`.
    pub fn new(store: JsonStore, extra: impl IntoIterator<Item = String>) -> Self {
        let mut corpus: Vec<String> = BUILTIN_QUOTES.iter().map(|q| q.to_string()).collect();
        corpus.extend(extra.into_iter().filter(|q| !q.trim().is_empty()));
        Self { store, corpus }
    }

    /// Returns the quote for `today`, picking and persisting a new one on a new day.
    pub fn get_daily<R: Rng + ?Sized>(
        &mut self,
        today: NaiveDate,
        rng: &mut R,
    ) -> Result<String, StoreError> {
        let today = today.format("%Y-%m-%d").to_string();
        let stored_date: Option<String> = self.store.get_field(DATE_KEY, DATE_KEY);

        if stored_date.as_deref() == Some(today.as_str()) {
            if let Some(quote) = self.store.get_field::<String>(QUOTE_KEY, QUOTE_KEY) {
                return Ok(quote);
            }
        }

        let quote = self
            .corpus
            .choose(rng)
            .cloned()
            .unwrap_or_default();
        self.store.put_field(QUOTE_KEY, QUOTE_KEY, quote.clone())?;
        self.store.put_field(DATE_KEY, DATE_KEY, today.clone())?;
        tracing::info!(date = %today, "picked quote of the day");

        Ok(quote)
    }

    /// Appends `quote` unless already saved. Returns whether it was added.
    pub fn save_favorite(&mut self, quote: &str) -> Result<bool, StoreError> {
        let mut favorites = self.list_favorites();
        if favorites.iter().any(|q| q == quote) {
            return Ok(false);
        }

        favorites.push(quote.to_string());
        self.store
            .put_field(FAVORITES_KEY, FAVORITES_FIELD, favorites)?;
        tracing::info!("saved quote to favorites");
        Ok(true)
    }

    pub fn list_favorites(&self) -> Vec<String> {
        self.store
            .get_field(FAVORITES_KEY, FAVORITES_FIELD)
            .unwrap_or_default()
    }

    pub fn has_favorites(&self) -> bool {
        self.store.exists(FAVORITES_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn book(dir: &tempfile::TempDir) -> QuoteBook {
        let store = JsonStore::open(dir.path().join("favorites.json")).unwrap();
        QuoteBook::new(store, Vec::new())
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    #[test]
    fn daily_quote_is_stable_within_a_day() {
        let dir = tempfile::tempdir().unwrap();
        let mut quotes = book(&dir);

        let first = quotes.get_daily(day(1), &mut StdRng::seed_from_u64(1)).unwrap();
        assert!(BUILTIN_QUOTES.contains(&first.as_str()));

        for seed in 2..20 {
            let again = quotes.get_daily(day(1), &mut StdRng::seed_from_u64(seed)).unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn daily_quote_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let first = book(&dir).get_daily(day(4), &mut StdRng::seed_from_u64(7)).unwrap();

        let mut reopened = book(&dir);
        let again = reopened.get_daily(day(4), &mut StdRng::seed_from_u64(99)).unwrap();
        assert_eq!(again, first);
    }

    #[test]
    fn new_day_persists_new_date() {
        let dir = tempfile::tempdir().unwrap();
        let mut quotes = book(&dir);
        quotes.get_daily(day(1), &mut StdRng::seed_from_u64(1)).unwrap();
        let next = quotes.get_daily(day(2), &mut StdRng::seed_from_u64(2)).unwrap();

        let store = JsonStore::open(dir.path().join("favorites.json")).unwrap();
        assert_eq!(store.get_field::<String>("date", "date").as_deref(), Some("2025-03-02"));
        assert_eq!(store.get_field::<String>("quote", "quote"), Some(next));
    }

    #[test]
    fn extra_quotes_join_the_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStore::open(dir.path().join("favorites.json")).unwrap();
        let quotes = QuoteBook::new(store, vec!["Stay curious.".to_string(), "  ".to_string()]);

        assert_eq!(quotes.corpus.len(), BUILTIN_QUOTES.len() + 1);
        assert_eq!(quotes.corpus.last().map(String::as_str), Some("Stay curious."));
    }

    #[test]
    fn save_favorite_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut quotes = book(&dir);
        assert!(!quotes.has_favorites());
        assert!(quotes.list_favorites().is_empty());

        assert!(quotes.save_favorite("a").unwrap());
        assert!(quotes.save_favorite("b").unwrap());
        assert!(!quotes.save_favorite("a").unwrap());

        assert!(quotes.has_favorites());
        assert_eq!(quotes.list_favorites(), vec!["a", "b"]);
        assert_eq!(book(&dir).list_favorites(), vec!["a", "b"]);
    }
}
