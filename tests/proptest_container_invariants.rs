//! Property-based invariant tests for wedge and container edits.
//!
//! After any sequence of edits on one container:
//!
//! 1. Recorded positions are dense and match the display order.
//! 2. No widget appears twice in the contents.
//! 3. Every entry's parent is the container.
//! 4. The owned list is exactly the set of entries the container owns.
//! 5. Nothing leaks: every live widget besides the root and the container
//!    is one of its entries.
//! 6. A refused insertion hands the widget back alive.

use std::collections::HashSet;

use proptest::prelude::*;
use sheet_wm::sheet::{Sheet, WidgetId, WidgetKind};

// ── Strategies ──────────────────────────────────────────────────────────

/// Edits applied to a container. Indices are reduced modulo the current
/// entry count when applied.
#[derive(Debug, Clone)]
enum Edit {
    Push,
    InsertStructural(usize),
    Adopt(usize),
    Remove { pick: usize, destroy: bool },
    Release { pick: usize, destroy: bool, rehome: usize },
    Move(usize, usize),
    Swap(usize, usize),
    Clear,
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        3 => Just(Edit::Push),
        3 => any::<usize>().prop_map(Edit::InsertStructural),
        4 => any::<usize>().prop_map(Edit::Adopt),
        3 => (any::<usize>(), any::<bool>())
            .prop_map(|(pick, destroy)| Edit::Remove { pick, destroy }),
        3 => (any::<usize>(), any::<bool>(), any::<usize>())
            .prop_map(|(pick, destroy, rehome)| Edit::Release { pick, destroy, rehome }),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Edit::Move(from, to)),
        2 => (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Edit::Swap(from, to)),
        1 => Just(Edit::Clear),
    ]
}

fn apply(sheet: &mut Sheet, container: WidgetId, edit: &Edit) {
    let count = sheet.count(container).unwrap();
    let owned = sheet.container_contents(container).unwrap().to_vec();
    match *edit {
        Edit::Push => {
            let id = sheet.create(WidgetKind::Widget).into_id();
            sheet.wedge_mut(container).unwrap().push(id).unwrap();
        }
        Edit::InsertStructural(index) => {
            let id = sheet.create(WidgetKind::Spacer).into_id();
            sheet
                .wedge_mut(container)
                .unwrap()
                .insert(id, index % (count + 1))
                .unwrap();
        }
        Edit::Adopt(slot) => {
            let token = sheet.create(WidgetKind::Button);
            sheet
                .container_mut(container)
                .unwrap()
                .insert(token, slot % (owned.len() + 1))
                .unwrap();
        }
        Edit::Remove { pick, destroy } if count > 0 => {
            let victim = sheet.at(container, pick % count).unwrap();
            let token = sheet.wedge_mut(container).unwrap().remove(victim, destroy).unwrap();
            if let Some(token) = token {
                sheet.discard(token);
            }
        }
        Edit::Release {
            pick,
            destroy,
            rehome,
        } if !owned.is_empty() => {
            let victim = owned[pick % owned.len()];
            let token = sheet
                .container_mut(container)
                .unwrap()
                .release(victim, destroy)
                .unwrap();
            if let Some(token) = token {
                let slot = rehome % owned.len();
                let back = sheet.container_mut(container).unwrap().insert(token, slot).unwrap();
                assert_eq!(back, victim);
            }
        }
        Edit::Move(from, to) if count > 0 => {
            sheet
                .wedge_mut(container)
                .unwrap()
                .move_entry(from % count, to % count)
                .unwrap();
        }
        Edit::Swap(from, to) if count > 0 => {
            sheet
                .wedge_mut(container)
                .unwrap()
                .swap(from % count, to % count)
                .unwrap();
        }
        Edit::Clear => sheet.container_mut(container).unwrap().clear().unwrap(),
        _ => {}
    }
}

fn check_invariants(sheet: &Sheet, container: WidgetId) -> Result<(), TestCaseError> {
    let contents = sheet.contents(container).unwrap();
    prop_assert_eq!(contents.len(), sheet.count(container).unwrap());

    let unique: HashSet<_> = contents.iter().collect();
    prop_assert_eq!(unique.len(), contents.len(), "duplicate entries in {:?}", contents);

    for (index, child) in contents.iter().enumerate() {
        let node = sheet.node(*child).unwrap();
        prop_assert_eq!(node.index(), index, "stale position for {:?}", child);
        prop_assert_eq!(node.parent(), Some(container));
    }

    let owned: HashSet<_> = sheet.container_contents(container).unwrap().iter().copied().collect();
    let present: HashSet<_> = contents
        .iter()
        .copied()
        .filter(|child| sheet.node(*child).unwrap().owner() == Some(container))
        .collect();
    prop_assert_eq!(owned, present);

    prop_assert_eq!(sheet.len(), contents.len() + 2, "leaked widgets");
    Ok(())
}

// ═════════════════════════════════════════════════════════════════════════
// 1-5. Arbitrary edit sequences keep the container consistent
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn edit_sequences_keep_positions_dense(edits in proptest::collection::vec(edit_strategy(), 1..120)) {
        let mut sheet = Sheet::new(100, 100);
        let root = sheet.root();
        let container = sheet.spawn(root, WidgetKind::Container).unwrap();

        for edit in &edits {
            apply(&mut sheet, container, edit);
            check_invariants(&sheet, container)?;
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Out-of-range insertion leaves both tree and widget intact
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn refused_insert_returns_the_widget(
        filled in 0usize..8,
        overshoot in 1usize..50,
    ) {
        let mut sheet = Sheet::new(100, 100);
        let root = sheet.root();
        let container = sheet.spawn(root, WidgetKind::Container).unwrap();
        for _ in 0..filled {
            sheet.container_mut(container).unwrap().emplace(WidgetKind::Button).unwrap();
        }
        let before = sheet.contents(container).unwrap().to_vec();

        let token = sheet.create(WidgetKind::Wedge);
        let id = token.id();
        let rejected = sheet
            .container_mut(container)
            .unwrap()
            .insert(token, filled + overshoot)
            .unwrap_err();

        prop_assert_eq!(rejected.widget.id(), id);
        prop_assert!(sheet.contains(id));
        prop_assert_eq!(sheet.contents(container).unwrap(), before.as_slice());
        sheet.discard(rejected.widget);
        check_invariants(&sheet, container)?;
    }
}
