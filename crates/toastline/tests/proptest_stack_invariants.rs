//! Property-based invariant tests for the toast stack.
//!
//! Random sequences of shows, removals, frames, time steps, hover changes,
//! hotkey presses, and swipes must keep:
//!
//! 1. Stack indices over live toasts dense and ordered (`0..k`).
//! 2. Exactly one front toast when any is live, none otherwise.
//! 3. At most three visible toasts, always the lowest indices.
//! 4. Timer bookkeeping consistent with toast state: removed toasts wait on
//!    eviction, mounted toasts in a collapsed stack wait on auto-removal, and
//!    nothing else has a timer.
//! 5. The surface holding exactly the toasts still in the stack.

use core::time::Duration;

use proptest::prelude::*;
use toastline::{
    KeyCode, KeyEvent, MemorySurface, Modifiers, PointerEvent, RenderSurface, StackConfig,
    TimerKind, ToastOptions, ToastStack,
};

#[derive(Debug, Clone)]
enum Op {
    Show { persistent: bool },
    Remove(usize),
    Frame,
    Advance(u64),
    Enter,
    Leave,
    Hotkey,
    Swipe { target: usize, dy: f64, ms: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<bool>().prop_map(|persistent| Op::Show { persistent }),
        2 => (0usize..8).prop_map(Op::Remove),
        3 => Just(Op::Frame),
        3 => (0u64..5_000).prop_map(Op::Advance),
        1 => Just(Op::Enter),
        1 => Just(Op::Leave),
        1 => Just(Op::Hotkey),
        2 => (0usize..8, -60.0f64..60.0, 0u64..500)
            .prop_map(|(target, dy, ms)| Op::Swipe { target, dy, ms }),
    ]
}

fn apply(stack: &ToastStack, op: &Op) {
    let ids: Vec<_> = stack.records().into_iter().map(|r| r.id).collect();
    match op {
        Op::Show { persistent } => {
            let options = if *persistent {
                ToastOptions::new().persistent()
            } else {
                ToastOptions::new()
            };
            stack.show("toast", options);
        }
        Op::Remove(idx) => {
            if let Some(id) = ids.get(*idx) {
                stack.remove(id);
            }
        }
        Op::Frame => stack.frame(),
        Op::Advance(ms) => stack.advance(Duration::from_millis(*ms)),
        Op::Enter => stack.pointer_enter(),
        Op::Leave => stack.pointer_leave(),
        Op::Hotkey => {
            stack.handle_key(&KeyEvent::new(KeyCode::Char('t')).with_modifiers(Modifiers::ALT));
        }
        Op::Swipe { target, dy, ms } => {
            if let Some(id) = ids.get(*target) {
                stack.pointer_down(id, &PointerEvent::new(0.0, 0.0));
                stack.pointer_move(id, &PointerEvent::new(0.0, *dy));
                stack.advance(Duration::from_millis(*ms));
                stack.pointer_up(id);
            }
        }
    }
}

fn check(stack: &ToastStack, surface: &MemorySurface) -> Result<(), TestCaseError> {
    let records = stack.records();
    let live: Vec<_> = records.iter().filter(|r| !r.state.removed).collect();

    // 1. Dense indices.
    let indices: Vec<Option<usize>> = live.iter().map(|r| r.layout.stack_index).collect();
    let expected: Vec<Option<usize>> = (0..live.len()).map(Some).collect();
    prop_assert_eq!(indices, expected);

    // 2. Single front.
    let fronts = records.iter().filter(|r| r.layout.front).count();
    prop_assert_eq!(fronts, usize::from(!live.is_empty()));

    // 3. Visible cap.
    for r in &records {
        let index = r.layout.stack_index;
        prop_assert_eq!(r.layout.visible, index.is_some_and(|i| i < 3));
    }

    // 4. Timers.
    for r in &records {
        let pending = stack.pending_timer(&r.id).map(|(kind, _)| kind);
        let expected = if r.state.removed {
            Some(TimerKind::Evict)
        } else if r.state.mounted && !r.state.expanded && r.duration.lifetime().is_some() {
            Some(TimerKind::AutoRemove)
        } else {
            None
        };
        prop_assert_eq!(pending, expected, "timer mismatch for {:?}", r);
    }

    // 5. Surface mirrors the stack.
    prop_assert_eq!(surface.len(), records.len());
    for r in &records {
        prop_assert!(surface.contains(&r.id));
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn stack_invariants_hold(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let surface = MemorySurface::new();
        let stack = ToastStack::with_config(surface.clone(), StackConfig::default());
        for op in &ops {
            apply(&stack, op);
            check(&stack, &surface)?;
        }
    }

    #[test]
    fn everything_evicts_after_remove_all(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let surface = MemorySurface::new();
        let stack = ToastStack::with_config(surface.clone(), StackConfig::default());
        for op in &ops {
            apply(&stack, op);
        }
        stack.remove_all();
        stack.advance(Duration::from_millis(200));
        prop_assert!(stack.is_empty());
        prop_assert!(surface.is_empty());
        prop_assert_eq!(stack.next_deadline(), None);
    }
}
