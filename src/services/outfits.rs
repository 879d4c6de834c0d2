//! Outfit assembly: slot grouping, base combinations, accessory picks, ranking.

use rand::Rng;
use std::collections::HashMap;

use crate::{
    knowledge::KnowledgeBase,
    models::{palette_label, MatchResult, Outfit, OutfitType, PaletteType, WardrobeSlot},
};

/// Accessories scoring at least this much are interchangeable picks
pub const GOOD_ACCESSORY_THRESHOLD: f64 = 0.7;

/// Chooses among equally good accessories
pub trait AccessoryPicker {
    /// Returns an index in `0..len`; `len` is at least 2
    fn pick(&mut self, len: usize) -> usize;
}

/// Uniform random picks backed by any `rand` generator
pub struct RngPicker<R>(pub R);

impl<R: Rng> AccessoryPicker for RngPicker<R> {
    fn pick(&mut self, len: usize) -> usize {
        self.0.gen_range(0..len)
    }
}

fn score_of(result: &MatchResult) -> f64 {
    result.score().unwrap_or(0.0)
}

/// Mean of the members that carry a score; 0 when none do
pub fn average_score(items: &[MatchResult]) -> f64 {
    let scores: Vec<f64> = items.iter().filter_map(MatchResult::score).collect();
    if scores.is_empty() {
        0.0
    } else {
        scores.iter().sum::<f64>() / scores.len() as f64
    }
}

/// Sorts by `score_avg`, best first, keeping insertion order on ties
pub fn sort_outfits(outfits: &mut [Outfit]) {
    outfits.sort_by(|a, b| b.score_avg.total_cmp(&a.score_avg));
}

/// Picks one item from an optional slot: a random one when at least two are
/// good, otherwise the best scorer (first on ties).
fn pick_accessory<'a>(
    candidates: &'a [MatchResult],
    picker: &mut dyn AccessoryPicker,
) -> Option<&'a MatchResult> {
    let good: Vec<&MatchResult> = candidates
        .iter()
        .filter(|c| score_of(c) >= GOOD_ACCESSORY_THRESHOLD)
        .collect();

    if good.len() >= 2 {
        let index = picker.pick(good.len()).min(good.len() - 1);
        return Some(good[index]);
    }

    candidates.iter().fold(None, |best: Option<&MatchResult>, c| match best {
        Some(b) if score_of(b) >= score_of(c) => Some(b),
        _ => Some(c),
    })
}

/// Groups scored items by wardrobe slot, keeping wardrobe order within a slot
pub fn group_by_slot(
    results: Vec<MatchResult>,
    knowledge: &KnowledgeBase,
) -> HashMap<WardrobeSlot, Vec<MatchResult>> {
    let mut groups: HashMap<WardrobeSlot, Vec<MatchResult>> = HashMap::new();
    for mut result in results {
        result.group = knowledge.slot_for(result.category);
        groups.entry(result.group).or_default().push(result);
    }
    groups
}

/// Builds every outfit for one palette pass and returns them best first.
pub fn assemble_outfits(
    results: Vec<MatchResult>,
    knowledge: &KnowledgeBase,
    palette: Option<PaletteType>,
    picker: &mut dyn AccessoryPicker,
) -> Vec<Outfit> {
    let groups = group_by_slot(results, knowledge);
    let slot = |slot: WardrobeSlot| groups.get(&slot).map(Vec::as_slice).unwrap_or(&[]);

    if let Some(unknown) = groups.get(&WardrobeSlot::Unknown) {
        tracing::warn!(
            count = unknown.len(),
            "Items without a wardrobe slot are left out of outfits"
        );
    }

    let mut bases: Vec<(OutfitType, Vec<&MatchResult>)> = Vec::new();
    for top in slot(WardrobeSlot::Tops) {
        for bottom in slot(WardrobeSlot::Bottoms) {
            bases.push((OutfitType::TopsBottoms, vec![top, bottom]));
        }
    }
    for outer in slot(WardrobeSlot::Outerwear) {
        for bottom in slot(WardrobeSlot::Bottoms) {
            bases.push((OutfitType::OuterwearBottoms, vec![outer, bottom]));
        }
    }
    for piece in slot(WardrobeSlot::OnePiece) {
        bases.push((OutfitType::OnePiece, vec![piece]));
    }

    let mut outfits: Vec<Outfit> = bases
        .into_iter()
        .map(|(outfit_type, mut members)| {
            for optional in WardrobeSlot::OPTIONAL {
                if let Some(pick) = pick_accessory(slot(optional), &mut *picker) {
                    members.push(pick);
                }
            }
            let items: Vec<MatchResult> = members.into_iter().cloned().collect();
            Outfit {
                outfit_type,
                score_avg: average_score(&items),
                items,
                palette_type: palette_label(palette).to_string(),
            }
        })
        .collect();

    sort_outfits(&mut outfits);

    tracing::debug!(
        palette = palette_label(palette),
        outfits = outfits.len(),
        "Outfits assembled"
    );

    outfits
}
