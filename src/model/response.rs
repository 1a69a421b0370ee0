//! Trigger → response auto-reply table.
//!
//! Every trigger word carries a `links` mask: bit `i` set means response slot `i` is a
//! candidate reply. Responses live in a `SlotTable` so that a slot's index (and therefore
//! its bit) never moves while any trigger still points at it. After every mutation each
//! live response slot is referenced by at least one trigger; unreferenced slots are
//! tombstoned and reused by later inserts.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    model::{slot_table::SlotTable, LinkMask},
    util::bits::{bit_indices, mask_of},
};

/// Maximum number of response slots, one per bit of a `u64` link mask.
pub const MAX_RESPONSES: usize = u64::BITS as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trigger {
    pub word: String,
    pub links: LinkMask,
}

/// Trigger words sharing one link mask, with the responses that mask resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseGroup {
    pub words: Vec<String>,
    pub responses: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseTable {
    pub triggers: Vec<Trigger>,
    pub responses: SlotTable<String>,
}

impl ResponseTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn trigger_index(&self, word: &str) -> Option<usize> {
        self.triggers.iter().position(|t| t.word == word)
    }

    /// Mask of the live slots holding any of `phrases`. Unknown phrases contribute nothing.
    fn mask_of_phrases(&self, phrases: &[String]) -> u64 {
        mask_of(phrases.iter().filter_map(|p| self.responses.position(p)))
    }

    /// Links every word to every phrase, creating triggers and response slots as needed.
    ///
    /// # Returns
    /// - `Ok(())` - All words now link to all phrases
    /// - `Err(AppError::Validation)` - `words` or `phrases` is empty, or the new phrases
    ///   do not fit into the remaining response slots; nothing is modified
    pub fn link(&mut self, words: &[String], phrases: &[String]) -> Result<(), AppError> {
        if words.is_empty() || phrases.is_empty() {
            let mut missing = Vec::new();
            if words.is_empty() {
                missing.push("triggers");
            }
            if phrases.is_empty() {
                missing.push("responses");
            }
            return Err(AppError::Validation(format!(
                "You did not enter any {}!",
                missing.join(" or ")
            )));
        }

        let new_phrases = phrases
            .iter()
            .filter(|p| self.responses.position(p).is_none())
            .count();
        let live = self.responses.iter().count();
        if live + new_phrases > MAX_RESPONSES {
            return Err(AppError::Validation(format!(
                "A server can hold at most {} responses.",
                MAX_RESPONSES
            )));
        }

        let mut links = 0u64;
        for phrase in phrases {
            let index = match self.responses.position(phrase) {
                Some(index) => index,
                None => self.responses.insert(phrase.clone()),
            };
            links |= 1u64 << index;
        }

        for word in words {
            match self.trigger_index(word) {
                Some(index) => self.triggers[index].links |= links,
                None => self.triggers.push(Trigger {
                    word: word.clone(),
                    links,
                }),
            }
        }

        Ok(())
    }

    /// Removes triggers, or only their links to `phrases` when any are given.
    ///
    /// A trigger whose mask drops to zero is deleted. Afterwards every response no longer
    /// linked from any trigger is tombstoned.
    ///
    /// # Returns
    /// - `Ok(Vec<String>)` - The input words that matched an existing trigger
    /// - `Err(AppError::NotFound)` - None of `words` is an existing trigger
    /// - `Err(AppError::Validation)` - `phrases` was given but none of them is a stored
    ///   response; nothing is modified
    pub fn unlink(&mut self, words: &[String], phrases: &[String]) -> Result<Vec<String>, AppError> {
        let matched: Vec<String> = words
            .iter()
            .filter(|w| self.trigger_index(w).is_some())
            .cloned()
            .collect();

        if matched.is_empty() {
            return Err(AppError::NotFound(
                "Are you sure the triggers exist in the first place?".to_string(),
            ));
        }

        let removal = self.mask_of_phrases(phrases);
        if !phrases.is_empty() && removal == 0 {
            let quoted: Vec<String> = phrases.iter().map(|p| format!("[{}]", p)).collect();
            return Err(AppError::Validation(format!(
                "Bot won't ever reply {}",
                quoted.join(", ")
            )));
        }

        for word in &matched {
            let Some(index) = self.trigger_index(word) else {
                continue;
            };
            if phrases.is_empty() {
                self.triggers.remove(index);
            } else {
                self.triggers[index].links &= !removal;
                if self.triggers[index].links == 0 {
                    self.triggers.remove(index);
                }
            }
        }

        self.prune();

        Ok(matched)
    }

    /// Tombstones every response slot that no trigger links to.
    fn prune(&mut self) {
        let linked = self.triggers.iter().fold(0u64, |acc, t| acc | t.links);
        let orphaned: Vec<usize> = self
            .responses
            .iter()
            .map(|(index, _)| index)
            .filter(|&index| index >= MAX_RESPONSES || linked & (1u64 << index) == 0)
            .collect();

        for index in orphaned {
            self.responses.tombstone(index);
        }
    }

    /// Picks one linked response at random for every trigger contained in `text`.
    ///
    /// `text` is expected to be normalized already (see `util::parse::normalize_message`).
    pub fn resolve<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Vec<&str> {
        self.triggers
            .iter()
            .filter(|trigger| text.contains(trigger.word.as_str()))
            .filter_map(|trigger| {
                let candidates: Vec<&str> = bit_indices(trigger.links)
                    .filter_map(|index| self.responses.get(index))
                    .map(String::as_str)
                    .collect();
                if candidates.is_empty() {
                    None
                } else {
                    Some(candidates[rng.random_range(0..candidates.len())])
                }
            })
            .collect()
    }

    /// Groups triggers by identical link mask, ordered by mask.
    ///
    /// When `filter` is non-empty only the listed words are included.
    pub fn groups(&self, filter: &[String]) -> Vec<ResponseGroup> {
        let mut by_mask: BTreeMap<u64, Vec<String>> = BTreeMap::new();

        let selected: Vec<&Trigger> = if filter.is_empty() {
            self.triggers.iter().collect()
        } else {
            filter
                .iter()
                .filter_map(|word| self.triggers.iter().find(|t| &t.word == word))
                .collect()
        };

        for trigger in selected {
            by_mask
                .entry(trigger.links)
                .or_default()
                .push(trigger.word.clone());
        }

        by_mask
            .into_iter()
            .map(|(links, words)| ResponseGroup {
                words,
                responses: bit_indices(links)
                    .filter_map(|index| self.responses.get(index).cloned())
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn words(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn add_then_resolve() {
        let mut table = ResponseTable::new();
        table.link(&words(&["hello"]), &words(&["hi"])).unwrap();

        assert_eq!(table.resolve("well hello there", &mut rng()), vec!["hi"]);
        assert!(table.resolve("goodbye", &mut rng()).is_empty());
    }

    #[test]
    fn link_or_combines_existing_masks() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a"]), &words(&["x"])).unwrap();
        table.link(&words(&["a", "b"]), &words(&["y", "x"])).unwrap();

        assert_eq!(table.triggers[0].links, 0b11);
        assert_eq!(table.triggers[1].links, 0b11);
        assert_eq!(table.responses.len(), 2);
    }

    #[test]
    fn link_requires_words_and_phrases() {
        let mut table = ResponseTable::new();
        let err = table.link(&[], &words(&["x"])).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("triggers")));

        let err = table.link(&words(&["a"]), &[]).unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m.contains("responses")));
        assert_eq!(table, ResponseTable::new());
    }

    #[test]
    fn link_rejects_overflowing_slots() {
        let mut table = ResponseTable::new();
        let phrases: Vec<String> = (0..MAX_RESPONSES).map(|i| format!("r{i}")).collect();
        table.link(&words(&["a"]), &phrases).unwrap();

        let before = table.clone();
        assert!(table.link(&words(&["b"]), &words(&["one more"])).is_err());
        assert_eq!(table, before);

        // existing phrases still link fine
        table.link(&words(&["b"]), &words(&["r3"])).unwrap();
    }

    #[test]
    fn removing_last_trigger_tombstones_response() {
        let mut table = ResponseTable::new();
        table.link(&words(&["hello", "hey"]), &words(&["hi"])).unwrap();
        table.link(&words(&["bye"]), &words(&["cya"])).unwrap();

        table.unlink(&words(&["hello"]), &[]).unwrap();
        assert_eq!(table.responses.get(0).map(String::as_str), Some("hi"));

        let removed = table.unlink(&words(&["hey"]), &[]).unwrap();
        assert_eq!(removed, words(&["hey"]));
        assert_eq!(table.responses.get(0), None);
        assert!(table.resolve("hello hey", &mut rng()).is_empty());
        assert_eq!(table.resolve("bye", &mut rng()), vec!["cya"]);
    }

    #[test]
    fn tombstoned_slot_is_reused_by_next_add() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a"]), &words(&["x"])).unwrap();
        table.link(&words(&["b"]), &words(&["y"])).unwrap();
        table.unlink(&words(&["a"]), &[]).unwrap();

        table.link(&words(&["c"]), &words(&["z"])).unwrap();
        assert_eq!(table.responses.get(0).map(String::as_str), Some("z"));
        assert_eq!(table.triggers.iter().find(|t| t.word == "c").unwrap().links, 0b1);
    }

    #[test]
    fn unlink_specific_phrases_keeps_the_rest() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a"]), &words(&["x", "y"])).unwrap();

        table.unlink(&words(&["a"]), &words(&["x", "unknown"])).unwrap();
        assert_eq!(table.triggers[0].links, 0b10);
        assert_eq!(table.responses.get(0), None);
        assert_eq!(table.resolve("a", &mut rng()), vec!["y"]);

        table.unlink(&words(&["a"]), &words(&["y"])).unwrap();
        assert!(table.triggers.is_empty());
        assert_eq!(table.responses.iter().count(), 0);
    }

    #[test]
    fn unlink_unknown_phrases_fails_without_changes() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a"]), &words(&["x"])).unwrap();
        let before = table.clone();

        let err = table.unlink(&words(&["a"]), &words(&["nope"])).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(table, before);
    }

    #[test]
    fn unlink_unknown_trigger_is_not_found() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a"]), &words(&["x"])).unwrap();

        let err = table.unlink(&words(&["b"]), &[]).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn every_live_slot_is_linked_after_mutation() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a", "b"]), &words(&["x", "y", "z"])).unwrap();
        table.unlink(&words(&["a"]), &words(&["y"])).unwrap();
        table.unlink(&words(&["b"]), &words(&["y", "z"])).unwrap();

        let linked = table.triggers.iter().fold(0u64, |acc, t| acc | t.links);
        for (index, _) in table.responses.iter() {
            assert_ne!(linked & (1u64 << index), 0, "slot {index} is orphaned");
        }
        assert_eq!(
            table.responses.iter().map(|(_, r)| r.as_str()).collect::<Vec<_>>(),
            vec!["x", "z"]
        );
    }

    #[test]
    fn resolve_picks_from_linked_responses_only() {
        let mut table = ResponseTable::new();
        table.link(&words(&["cat"]), &words(&["meow", "purr"])).unwrap();
        table.link(&words(&["dog"]), &words(&["woof"])).unwrap();

        let mut rng = rng();
        for _ in 0..20 {
            let replies = table.resolve("my cat", &mut rng);
            assert_eq!(replies.len(), 1);
            assert!(["meow", "purr"].contains(&replies[0]));
        }
        assert_eq!(table.resolve("cat and dog", &mut rng).len(), 2);
    }

    #[test]
    fn groups_share_identical_masks() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a", "b"]), &words(&["x"])).unwrap();
        table.link(&words(&["c"]), &words(&["y"])).unwrap();

        let groups = table.groups(&[]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].words, words(&["a", "b"]));
        assert_eq!(groups[0].responses, words(&["x"]));

        let filtered = table.groups(&words(&["c", "missing"]));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].responses, words(&["y"]));
    }

    #[test]
    fn round_trips_through_json_shape() {
        let mut table = ResponseTable::new();
        table.link(&words(&["a"]), &words(&["x", "y"])).unwrap();
        table.unlink(&words(&["a"]), &words(&["x"])).unwrap();

        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "triggers": [{ "word": "a", "links": 2 }],
                "responses": [null, "y"],
            })
        );
        let restored: ResponseTable = serde_json::from_value(json).unwrap();
        assert_eq!(restored, table);
    }
}
