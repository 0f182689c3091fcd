//! Coin selection: choosing which unspent outputs cover a required value.
//!
//! The strategy is per-unit greedy, largest-first, multi-asset aware. Each
//! required unit is covered by pulling in the candidates richest in that
//! unit; an output pulled in for one unit counts toward every unit it holds.
//! Token units are processed before the base currency so that currency-only
//! outputs are not selected while token-bearing ones are still pending,
//! which keeps change outputs small. UTXO sets are small enough in practice
//! that exact knapsack optimization is not worth its cost.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::{
    utxo::{Utxo, UtxoRef},
    values::{Value, LOVELACE},
};

/// Margin added to the base-currency requirement so the encoder has room
/// for fees and minimum-output adjustments downstream.
pub const DEFAULT_LOVELACE_BUFFER: u64 = 5_000_000;

/// Errors produced by coin selection.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SelectionError {
    /// No subset of the candidate pool covers the requirement for `unit`.
    #[error("insufficient funds: short {shortfall} of unit {unit}")]
    InsufficientFunds {
        /// The unit that cannot be covered.
        unit: String,
        /// Quantity missing after exhausting the pool.
        shortfall: u64,
    },
}

/// Select a subset of `candidates` covering `required` plus a base-currency
/// margin of `lovelace_buffer`.
///
/// The returned sequence preserves first-insertion order and contains no
/// duplicates. Identical input (same order) always yields identical output.
/// The candidate pool is never mutated.
pub fn select(
    required: &Value,
    candidates: &[Utxo],
    lovelace_buffer: u64,
) -> Result<Vec<Utxo>, SelectionError> {
    if required.is_empty() {
        return Ok(Vec::new());
    }

    let mut selected: Vec<Utxo> = Vec::new();
    let mut chosen: BTreeSet<UtxoRef> = BTreeSet::new();

    // Token units first, in lexicographic unit order.
    for (unit, quantity) in required.iter().filter(|(unit, _)| *unit != LOVELACE) {
        accumulate(unit, quantity, candidates, &mut selected, &mut chosen)?;
    }

    // Base currency last, with margin beyond the strict requirement.
    let lovelace_required = required
        .quantity_of(LOVELACE)
        .saturating_add(lovelace_buffer);
    if lovelace_required > 0 {
        accumulate(
            LOVELACE,
            lovelace_required,
            candidates,
            &mut selected,
            &mut chosen,
        )?;
    }

    Ok(selected)
}

/// Pull candidates into `selected` until the accumulated quantity of `unit`
/// meets `required`. Prior picks count toward the running total.
fn accumulate(
    unit: &str,
    required: u64,
    candidates: &[Utxo],
    selected: &mut Vec<Utxo>,
    chosen: &mut BTreeSet<UtxoRef>,
) -> Result<(), SelectionError> {
    let mut have: u64 = selected
        .iter()
        .fold(0u64, |acc, utxo| acc.saturating_add(utxo.quantity_of(unit)));
    if have >= required {
        return Ok(());
    }

    // Largest holding of `unit` first; ties broken by reference order.
    let mut pool: Vec<&Utxo> = candidates
        .iter()
        .filter(|utxo| !chosen.contains(&utxo.input) && utxo.quantity_of(unit) > 0)
        .collect();
    pool.sort_by(|a, b| {
        b.quantity_of(unit)
            .cmp(&a.quantity_of(unit))
            .then_with(|| a.input.cmp(&b.input))
    });

    for candidate in pool {
        have = have.saturating_add(candidate.quantity_of(unit));
        chosen.insert(candidate.input.clone());
        selected.push(candidate.clone());
        if have >= required {
            return Ok(());
        }
    }

    Err(SelectionError::InsufficientFunds {
        unit: unit.to_owned(),
        shortfall: required - have,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        utxo::{TxOutput, Utxo, UtxoRef},
        values::Asset,
    };

    const TOKEN: &str = "746f6b656e";

    fn utxo(tx_hash: &str, index: u32, assets: Vec<Asset>) -> Utxo {
        Utxo::new(
            UtxoRef::new(tx_hash, index),
            TxOutput::new("addr_test1pool", assets),
        )
    }

    fn lovelace_pool(quantities: &[u64]) -> Vec<Utxo> {
        quantities
            .iter()
            .enumerate()
            .map(|(i, q)| utxo("aa", i as u32, vec![Asset::lovelace(*q)]))
            .collect()
    }

    #[test]
    fn it_selects_nothing_for_an_empty_requirement() {
        let pool = lovelace_pool(&[1_000_000]);
        let selected = select(&Value::new(), &pool, DEFAULT_LOVELACE_BUFFER).unwrap();
        assert!(selected.is_empty());
    }

    #[test]
    fn it_prefers_the_largest_single_cover() {
        // Quantities [1, 100, 10], requirement 50: the 100 output alone.
        let pool = vec![
            utxo("aa", 0, vec![Asset::lovelace(1_000_000), Asset::new(TOKEN, 1)]),
            utxo("aa", 1, vec![Asset::lovelace(1_000_000), Asset::new(TOKEN, 100)]),
            utxo("aa", 2, vec![Asset::lovelace(1_000_000), Asset::new(TOKEN, 10)]),
            utxo("bb", 0, vec![Asset::lovelace(9_000_000)]),
        ];
        let mut required = Value::new();
        required.add(TOKEN, 50);

        let selected = select(&required, &pool, 0).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].input, UtxoRef::new("aa", 1));
    }

    #[test]
    fn it_accumulates_until_covered() {
        let pool = vec![
            utxo("aa", 0, vec![Asset::new(TOKEN, 40)]),
            utxo("aa", 1, vec![Asset::new(TOKEN, 35)]),
            utxo("aa", 2, vec![Asset::new(TOKEN, 30)]),
        ];
        let mut required = Value::new();
        required.add(TOKEN, 70);

        let selected = select(&required, &pool, 0).unwrap();
        let refs: Vec<_> = selected.iter().map(|u| u.input.clone()).collect();
        assert_eq!(refs, vec![UtxoRef::new("aa", 0), UtxoRef::new("aa", 1)]);
    }

    #[test]
    fn it_counts_prior_picks_toward_later_units() {
        // The token-bearing output also carries enough currency; the
        // currency-only output must not be pulled in.
        let pool = vec![
            utxo("aa", 0, vec![Asset::lovelace(20_000_000), Asset::new(TOKEN, 5)]),
            utxo("bb", 0, vec![Asset::lovelace(50_000_000)]),
        ];
        let mut required = Value::new();
        required.add(TOKEN, 5);
        required.add(LOVELACE, 10_000_000);

        let selected = select(&required, &pool, DEFAULT_LOVELACE_BUFFER).unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].input, UtxoRef::new("aa", 0));
    }

    #[test]
    fn it_requires_the_buffer_beyond_the_strict_amount() {
        let pool = lovelace_pool(&[10_000_000]);
        let mut required = Value::new();
        required.add(LOVELACE, 7_000_000);

        // 7 ada + 5 ada margin exceeds the 10 ada pool.
        let err = select(&required, &pool, DEFAULT_LOVELACE_BUFFER).unwrap_err();
        assert_eq!(
            err,
            SelectionError::InsufficientFunds {
                unit: LOVELACE.to_owned(),
                shortfall: 2_000_000,
            }
        );

        // With no margin the pool suffices.
        assert_eq!(select(&required, &pool, 0).unwrap().len(), 1);
    }

    #[test]
    fn it_names_the_unmet_unit_and_shortfall() {
        let pool = vec![
            utxo("aa", 0, vec![Asset::new(TOKEN, 30)]),
            utxo("aa", 1, vec![Asset::new(TOKEN, 15)]),
        ];
        let mut required = Value::new();
        required.add(TOKEN, 60);

        let err = select(&required, &pool, 0).unwrap_err();
        assert_eq!(
            err,
            SelectionError::InsufficientFunds {
                unit: TOKEN.to_owned(),
                shortfall: 15,
            }
        );
    }

    #[test]
    fn it_returns_no_duplicates_and_only_pool_members() {
        let pool = vec![
            utxo("aa", 0, vec![Asset::lovelace(3_000_000), Asset::new(TOKEN, 7)]),
            utxo("aa", 1, vec![Asset::lovelace(4_000_000)]),
            utxo("bb", 0, vec![Asset::lovelace(6_000_000)]),
        ];
        let mut required = Value::new();
        required.add(TOKEN, 7);
        required.add(LOVELACE, 5_000_000);

        let selected = select(&required, &pool, 0).unwrap();
        let mut refs: Vec<_> = selected.iter().map(|u| u.input.clone()).collect();
        refs.sort();
        refs.dedup();
        assert_eq!(refs.len(), selected.len());
        for utxo in &selected {
            assert!(pool.contains(utxo));
        }
    }

    #[test]
    fn it_is_deterministic_with_tied_quantities() {
        let pool = vec![
            utxo("cc", 1, vec![Asset::lovelace(5_000_000)]),
            utxo("cc", 0, vec![Asset::lovelace(5_000_000)]),
            utxo("bb", 9, vec![Asset::lovelace(5_000_000)]),
        ];
        let mut required = Value::new();
        required.add(LOVELACE, 1);

        let first = select(&required, &pool, 0).unwrap();
        let second = select(&required, &pool, 0).unwrap();
        assert_eq!(first, second);
        // Equal quantities resolve by reference order.
        assert_eq!(first[0].input, UtxoRef::new("bb", 9));
    }
}
